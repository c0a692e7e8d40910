//! Shared domain enums for the lifecycle state machines

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// PhysicalBookStatus
// ---------------------------------------------------------------------------

/// Status of one physical copy. Exactly one at a time; transitions happen
/// only through request or transfer processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum PhysicalBookStatus {
    /// On a shelf, free to be bound to a request or transfer
    AtLibrary = 0,
    /// Reserved by or loaned out for a request
    Requested = 1,
    /// In transit between two branches
    Transfer = 2,
}

impl From<i16> for PhysicalBookStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => PhysicalBookStatus::Requested,
            2 => PhysicalBookStatus::Transfer,
            _ => PhysicalBookStatus::AtLibrary,
        }
    }
}

impl From<PhysicalBookStatus> for i16 {
    fn from(s: PhysicalBookStatus) -> Self {
        s as i16
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Status of a hold/request.
///
/// Waiting and Pending are the two entry states; Returned and Canceled are
/// terminal. NotReturned is set by a librarian when a copy is written off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum RequestStatus {
    /// Copy reserved, user has not confirmed pickup yet
    Pending = 0,
    /// Copy picked up, loan in progress
    Requested = 1,
    /// Loan closed without the copy coming back
    NotReturned = 2,
    /// Loan closed, copy back at the library
    Returned = 3,
    /// No copy available yet, user is queued
    Waiting = 4,
    /// Abandoned before pickup, or canceled by the user
    Canceled = 5,
}

impl RequestStatus {
    /// Terminal states never leave via the scheduled jobs or the API.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Returned | RequestStatus::Canceled)
    }
}

impl From<i16> for RequestStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => RequestStatus::Requested,
            2 => RequestStatus::NotReturned,
            3 => RequestStatus::Returned,
            4 => RequestStatus::Waiting,
            5 => RequestStatus::Canceled,
            _ => RequestStatus::Pending,
        }
    }
}

impl From<RequestStatus> for i16 {
    fn from(s: RequestStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Requested => "Requested",
            RequestStatus::NotReturned => "Not returned",
            RequestStatus::Returned => "Returned",
            RequestStatus::Waiting => "Waiting",
            RequestStatus::Canceled => "Canceled",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PunishmentLevel
// ---------------------------------------------------------------------------

/// Escalation level of a punishment. Ordered, only ever increases, and
/// saturates at Five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum PunishmentLevel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl PunishmentLevel {
    pub const MAX: PunishmentLevel = PunishmentLevel::Five;

    /// Next escalation step, saturating at the cap.
    pub fn next(self) -> PunishmentLevel {
        match self {
            PunishmentLevel::One => PunishmentLevel::Two,
            PunishmentLevel::Two => PunishmentLevel::Three,
            PunishmentLevel::Three => PunishmentLevel::Four,
            PunishmentLevel::Four => PunishmentLevel::Five,
            PunishmentLevel::Five => PunishmentLevel::Five,
        }
    }

    pub fn is_max(self) -> bool {
        self == PunishmentLevel::MAX
    }
}

impl From<i16> for PunishmentLevel {
    fn from(v: i16) -> Self {
        match v {
            2 => PunishmentLevel::Two,
            3 => PunishmentLevel::Three,
            4 => PunishmentLevel::Four,
            5 => PunishmentLevel::Five,
            _ => PunishmentLevel::One,
        }
    }
}

impl From<PunishmentLevel> for i16 {
    fn from(l: PunishmentLevel) -> Self {
        l as i16
    }
}

// ---------------------------------------------------------------------------
// TransferStatus
// ---------------------------------------------------------------------------

/// Status of an inter-branch transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum TransferStatus {
    Pending = 0,
    Accepted = 1,
    Rejected = 2,
    Canceled = 3,
}

impl From<i16> for TransferStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => TransferStatus::Accepted,
            2 => TransferStatus::Rejected,
            3 => TransferStatus::Canceled,
            _ => TransferStatus::Pending,
        }
    }
}

impl From<TransferStatus> for i16 {
    fn from(s: TransferStatus) -> Self {
        s as i16
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    Reader = 0,
    Librarian = 1,
    Admin = 2,
}

impl From<i16> for Role {
    fn from(v: i16) -> Self {
        match v {
            1 => Role::Librarian,
            2 => Role::Admin,
            _ => Role::Reader,
        }
    }
}

impl From<Role> for i16 {
    fn from(r: Role) -> Self {
        r as i16
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Reader => "reader",
            Role::Librarian => "librarian",
            Role::Admin => "admin",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punishment_level_saturates_at_five() {
        let mut level = PunishmentLevel::One;
        for _ in 0..10 {
            level = level.next();
        }
        assert_eq!(level, PunishmentLevel::Five);
        assert_eq!(PunishmentLevel::Five.next(), PunishmentLevel::Five);
    }

    #[test]
    fn punishment_level_roundtrips_through_i16() {
        for raw in 1..=5i16 {
            assert_eq!(i16::from(PunishmentLevel::from(raw)), raw);
        }
    }

    #[test]
    fn terminal_request_states() {
        assert!(RequestStatus::Returned.is_terminal());
        assert!(RequestStatus::Canceled.is_terminal());
        assert!(!RequestStatus::Waiting.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Requested.is_terminal());
    }
}
