//! Data models for Athenaeum

pub mod book;
pub mod enums;
pub mod evaluation;
pub mod library;
pub mod notification;
pub mod physical_book;
pub mod punishment;
pub mod request;
pub mod transfer;
pub mod user;

// Re-export commonly used types
pub use book::{GenericBook, GenericBookDetails};
pub use enums::{PhysicalBookStatus, PunishmentLevel, RequestStatus, Role, TransferStatus};
pub use evaluation::Evaluation;
pub use library::Library;
pub use notification::{Notification, NotificationDraft};
pub use physical_book::PhysicalBook;
pub use punishment::Punishment;
pub use request::Request;
pub use transfer::Transfer;
pub use user::{User, UserClaims, UserShort};
