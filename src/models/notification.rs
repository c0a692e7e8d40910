//! Notification model and constructor functions
//!
//! Notifications are immutable once persisted. They are built by the free
//! functions below rather than by methods on the entities they reference, so
//! the lifecycle rules can produce them without touching storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Notification record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub emit_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub request_id: Option<i32>,
    pub library_id: Option<i32>,
    pub for_all: bool,
}

/// A notification not yet persisted; what the lifecycle rules emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub title: String,
    pub description: String,
    pub end_date: Option<DateTime<Utc>>,
    pub user_id: Option<i32>,
    pub request_id: Option<i32>,
    pub library_id: Option<i32>,
    pub for_all: bool,
}

impl NotificationDraft {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            end_date: None,
            user_id: None,
            request_id: None,
            library_id: None,
            for_all: false,
        }
    }
}

/// Reminder sent while a loan is inside the notice window.
pub fn return_notice(user_id: i32, request_id: i32, title: &str, days_left: i64) -> NotificationDraft {
    let description = if days_left == 0 {
        format!("\"{}\" is due back today.", title)
    } else {
        format!("\"{}\" is due back in {} day(s).", title, days_left)
    };
    NotificationDraft {
        user_id: Some(user_id),
        request_id: Some(request_id),
        ..NotificationDraft::new("Return notice", description)
    }
}

/// First punishment on an overdue loan.
pub fn punishment_issued(user_id: i32, request_id: i32, title: &str) -> NotificationDraft {
    NotificationDraft {
        user_id: Some(user_id),
        request_id: Some(request_id),
        ..NotificationDraft::new(
            "Punishment",
            format!(
                "A punishment was issued for failing to return \"{}\" on time.",
                title
            ),
        )
    }
}

/// Escalation of an existing punishment.
pub fn punishment_increased(
    user_id: i32,
    request_id: i32,
    title: &str,
    new_level: i16,
) -> NotificationDraft {
    NotificationDraft {
        user_id: Some(user_id),
        request_id: Some(request_id),
        ..NotificationDraft::new(
            "Increased punishment level",
            format!(
                "The punishment for \"{}\" was raised to level {}.",
                title, new_level
            ),
        )
    }
}

/// Pending hold closed before pickup, by expiry or by the user.
pub fn request_canceled(user_id: i32, request_id: i32, isbn: &str) -> NotificationDraft {
    NotificationDraft {
        user_id: Some(user_id),
        request_id: Some(request_id),
        ..NotificationDraft::new(
            "Request canceled",
            format!("Your request for {} was canceled before pickup.", isbn),
        )
    }
}

/// Pending transfer abandoned because its deadline passed. Addressed to the
/// destination branch, naming the source branch alias and the copy.
pub fn transfer_canceled(
    destination_library_id: i32,
    source_alias: &str,
    physical_book_id: i32,
) -> NotificationDraft {
    NotificationDraft {
        library_id: Some(destination_library_id),
        ..NotificationDraft::new(
            "Transfer canceled",
            format!(
                "The transfer of copy #{} from {} expired and was canceled.",
                physical_book_id, source_alias
            ),
        )
    }
}

/// A queued hold got a copy; the user has a bounded pickup window.
pub fn available_for_pickup(
    user_id: i32,
    request_id: i32,
    title: &str,
    pickup_deadline: DateTime<Utc>,
    pickup_days: i64,
) -> NotificationDraft {
    NotificationDraft {
        user_id: Some(user_id),
        request_id: Some(request_id),
        // The notice itself is pointless once the window has closed.
        end_date: Some(pickup_deadline + Duration::days(1)),
        ..NotificationDraft::new(
            "Available for pickup",
            format!(
                "\"{}\" is ready for pickup. You have {} days to collect it.",
                title, pickup_days
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_notice_wording_on_due_day() {
        let n = return_notice(1, 2, "Dune", 0);
        assert!(n.description.contains("due back today"));
        assert_eq!(n.user_id, Some(1));
        assert_eq!(n.request_id, Some(2));
        assert!(!n.for_all);
    }

    #[test]
    fn transfer_cancellation_targets_destination() {
        let n = transfer_canceled(9, "NORTH", 42);
        assert_eq!(n.library_id, Some(9));
        assert_eq!(n.user_id, None);
        assert!(n.description.contains("NORTH"));
        assert!(n.description.contains("#42"));
    }
}
