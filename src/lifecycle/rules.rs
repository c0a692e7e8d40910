//! State-transition rules applied by the scheduled jobs

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    notification, NotificationDraft, PhysicalBook, PhysicalBookStatus, Punishment,
    PunishmentLevel, Request, Transfer,
};

/// Whole days between `now` and `end_date`, floored. A deadline twelve hours
/// in the past counts as one day overdue, not zero.
pub fn days_left(end_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (end_date - now).num_seconds().div_euclid(86_400)
}

/// Outcome of the deadline check on a Requested request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineOutcome {
    /// Inside the notice window; state unchanged, reminder emitted
    Notice(NotificationDraft),
    /// Overdue with no punishment yet
    IssuePunishment {
        level: PunishmentLevel,
        reason: String,
        notification: NotificationDraft,
    },
    /// Overdue with an existing punishment below the cap
    EscalatePunishment {
        punishment_id: i32,
        new_level: PunishmentLevel,
        notification: NotificationDraft,
    },
    /// Not yet in the notice window, or already capped at level Five
    NoAction,
}

/// Rule A: deadline check for a request whose copy is out on loan.
///
/// `title` is the catalog title used in notification wording. A request
/// without an end date is malformed for this rule; the caller skips those.
pub fn evaluate_requested(
    request: &Request,
    punishment: Option<&Punishment>,
    title: &str,
    notice_window_days: i64,
    now: DateTime<Utc>,
) -> DeadlineOutcome {
    let Some(end_date) = request.end_date else {
        return DeadlineOutcome::NoAction;
    };
    let left = days_left(end_date, now);

    if (0..=notice_window_days).contains(&left) {
        return DeadlineOutcome::Notice(notification::return_notice(
            request.user_id,
            request.id,
            title,
            left,
        ));
    }
    if left >= 0 {
        return DeadlineOutcome::NoAction;
    }

    match punishment {
        None => DeadlineOutcome::IssuePunishment {
            level: PunishmentLevel::One,
            reason: "Failed to return the book on time".to_string(),
            notification: notification::punishment_issued(request.user_id, request.id, title),
        },
        Some(p) if p.level().is_max() => DeadlineOutcome::NoAction,
        Some(p) => {
            let new_level = p.level().next();
            DeadlineOutcome::EscalatePunishment {
                punishment_id: p.id,
                new_level,
                notification: notification::punishment_increased(
                    request.user_id,
                    request.id,
                    title,
                    new_level.into(),
                ),
            }
        }
    }
}

/// Outcome of an expiry check (Rules B and C share the shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// Deadline passed: cancel and free the named copy
    Cancel {
        physical_book_id: i32,
        notification: NotificationDraft,
    },
    /// Still inside the window
    NoAction,
}

/// Rule B: a Pending request whose pickup window has closed is canceled and
/// its copy goes back on the shelf.
pub fn evaluate_pending(request: &Request, now: DateTime<Utc>) -> ExpiryOutcome {
    let (Some(end_date), Some(copy_id)) = (request.end_date, request.physical_book_id) else {
        // Pending without a bound copy or deadline violates the invariant;
        // the caller logs and skips.
        return ExpiryOutcome::NoAction;
    };
    if days_left(end_date, now) >= 0 {
        return ExpiryOutcome::NoAction;
    }
    ExpiryOutcome::Cancel {
        physical_book_id: copy_id,
        notification: notification::request_canceled(request.user_id, request.id, &request.isbn),
    }
}

/// Rule C: a Pending transfer past its deadline is canceled and its copy
/// goes back to the source shelf. The destination branch is told which
/// branch the copy never left.
pub fn evaluate_transfer(transfer: &Transfer, source_alias: &str, now: DateTime<Utc>) -> ExpiryOutcome {
    if days_left(transfer.end_date, now) >= 0 {
        return ExpiryOutcome::NoAction;
    }
    ExpiryOutcome::Cancel {
        physical_book_id: transfer.physical_book_id,
        notification: notification::transfer_canceled(
            transfer.destination_library_id,
            source_alias,
            transfer.physical_book_id,
        ),
    }
}

/// A waiting request bound to a freed copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub physical_book_id: i32,
    pub pickup_deadline: DateTime<Utc>,
    pub notification: NotificationDraft,
}

/// Rule D: bind a Waiting request to a shelved copy of the same ISBN at the
/// same branch, if one exists.
///
/// Ties between eligible copies break by ascending copy id so repeated runs
/// are reproducible; the order is an implementation choice, not a contract.
pub fn promote_waiting(
    request: &Request,
    candidates: &[PhysicalBook],
    title: &str,
    pickup_window_days: i64,
    now: DateTime<Utc>,
) -> Option<Promotion> {
    let copy = candidates
        .iter()
        .filter(|c| {
            c.isbn == request.isbn
                && c.library_id == request.library_id
                && c.status() == PhysicalBookStatus::AtLibrary
        })
        .min_by_key(|c| c.id)?;

    let pickup_deadline = now + Duration::days(pickup_window_days);
    Some(Promotion {
        physical_book_id: copy.id,
        pickup_deadline,
        notification: notification::available_for_pickup(
            request.user_id,
            request.id,
            title,
            pickup_deadline,
            pickup_window_days,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{RequestStatus, TransferStatus};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn requested(end_offset_days: i64) -> Request {
        Request {
            id: 1,
            user_id: 10,
            isbn: "9780441013593".to_string(),
            physical_book_id: Some(100),
            library_id: 1,
            start_date: now() - Duration::days(30),
            end_date: Some(now() + Duration::days(end_offset_days)),
            status: RequestStatus::Requested.into(),
        }
    }

    fn punishment(level: i16) -> Punishment {
        Punishment {
            id: 55,
            request_id: 1,
            reason: "Failed to return the book on time".to_string(),
            level,
            emit_date: now() - Duration::days(level as i64),
        }
    }

    fn copy(id: i32, library_id: i32, isbn: &str, status: i16) -> PhysicalBook {
        PhysicalBook {
            id,
            library_id,
            isbn: isbn.to_string(),
            status,
            crea_date: None,
        }
    }

    #[test]
    fn days_left_floors_partial_days() {
        // 12 hours past due is one day overdue, not zero.
        assert_eq!(days_left(now() - Duration::hours(12), now()), -1);
        assert_eq!(days_left(now() + Duration::hours(12), now()), 0);
        assert_eq!(days_left(now() + Duration::days(3), now()), 3);
        assert_eq!(days_left(now() - Duration::days(2), now()), -2);
    }

    #[test]
    fn notice_emitted_across_whole_window() {
        for day in 0..=3 {
            let req = requested(day);
            match evaluate_requested(&req, None, "Dune", 3, now()) {
                DeadlineOutcome::Notice(n) => {
                    assert_eq!(n.title, "Return notice");
                    assert_eq!(n.user_id, Some(10));
                }
                other => panic!("expected notice at day {}, got {:?}", day, other),
            }
        }
    }

    #[test]
    fn no_notice_outside_window() {
        let req = requested(4);
        assert_eq!(
            evaluate_requested(&req, None, "Dune", 3, now()),
            DeadlineOutcome::NoAction
        );
    }

    #[test]
    fn overdue_without_punishment_issues_level_one() {
        let req = requested(-1);
        match evaluate_requested(&req, None, "Dune", 3, now()) {
            DeadlineOutcome::IssuePunishment { level, reason, notification } => {
                assert_eq!(level, PunishmentLevel::One);
                assert_eq!(reason, "Failed to return the book on time");
                assert_eq!(notification.title, "Punishment");
            }
            other => panic!("expected punishment, got {:?}", other),
        }
    }

    #[test]
    fn overdue_with_punishment_escalates_one_step() {
        let req = requested(-5);
        let p = punishment(2);
        match evaluate_requested(&req, Some(&p), "Dune", 3, now()) {
            DeadlineOutcome::EscalatePunishment { punishment_id, new_level, notification } => {
                assert_eq!(punishment_id, 55);
                assert_eq!(new_level, PunishmentLevel::Three);
                assert!(notification.description.contains("level 3"));
            }
            other => panic!("expected escalation, got {:?}", other),
        }
    }

    #[test]
    fn capped_punishment_is_idempotent() {
        let req = requested(-30);
        let p = punishment(5);
        // Repeated runs at the cap never change the level and never notify.
        for _ in 0..4 {
            assert_eq!(
                evaluate_requested(&req, Some(&p), "Dune", 3, now()),
                DeadlineOutcome::NoAction
            );
        }
    }

    #[test]
    fn escalation_is_monotonic_over_consecutive_runs() {
        // Simulate N daily runs with the request still overdue throughout.
        let mut punishment: Option<Punishment> = None;
        let mut notifications = 0;
        for day in 0..8 {
            let run_now = now() + Duration::days(day);
            let req = requested(-1);
            match evaluate_requested(&req, punishment.as_ref(), "Dune", 3, run_now) {
                DeadlineOutcome::IssuePunishment { level, reason, .. } => {
                    notifications += 1;
                    punishment = Some(Punishment {
                        id: 55,
                        request_id: req.id,
                        reason,
                        level: level.into(),
                        emit_date: run_now,
                    });
                }
                DeadlineOutcome::EscalatePunishment { new_level, .. } => {
                    notifications += 1;
                    punishment.as_mut().unwrap().level = new_level.into();
                }
                DeadlineOutcome::NoAction => {}
                DeadlineOutcome::Notice(_) => panic!("overdue request must not get a notice"),
            }
            let expected = (day + 1).min(5) as i16;
            assert_eq!(punishment.as_ref().unwrap().level, expected);
        }
        assert_eq!(notifications, 5);
    }

    #[test]
    fn requested_without_end_date_is_skipped() {
        let mut req = requested(0);
        req.end_date = None;
        assert_eq!(
            evaluate_requested(&req, None, "Dune", 3, now()),
            DeadlineOutcome::NoAction
        );
    }

    #[test]
    fn pending_expiry_cancels_and_frees_copy() {
        let mut req = requested(-1);
        req.status = RequestStatus::Pending.into();
        match evaluate_pending(&req, now()) {
            ExpiryOutcome::Cancel { physical_book_id, notification } => {
                assert_eq!(physical_book_id, 100);
                assert_eq!(notification.title, "Request canceled");
                assert!(notification.description.contains("9780441013593"));
            }
            ExpiryOutcome::NoAction => panic!("expected cancellation"),
        }
    }

    #[test]
    fn pending_inside_window_is_untouched() {
        let mut req = requested(2);
        req.status = RequestStatus::Pending.into();
        assert_eq!(evaluate_pending(&req, now()), ExpiryOutcome::NoAction);
    }

    #[test]
    fn pending_without_copy_is_skipped_not_crashed() {
        let mut req = requested(-1);
        req.status = RequestStatus::Pending.into();
        req.physical_book_id = None;
        assert_eq!(evaluate_pending(&req, now()), ExpiryOutcome::NoAction);
    }

    #[test]
    fn transfer_expiry_releases_copy_and_notifies_destination() {
        let transfer = Transfer {
            id: 3,
            source_library_id: 1,
            destination_library_id: 2,
            physical_book_id: 77,
            start_date: now() - Duration::days(10),
            end_date: now() - Duration::days(1),
            status: TransferStatus::Pending.into(),
        };
        match evaluate_transfer(&transfer, "CENTRAL", now()) {
            ExpiryOutcome::Cancel { physical_book_id, notification } => {
                assert_eq!(physical_book_id, 77);
                assert_eq!(notification.library_id, Some(2));
                assert!(notification.description.contains("CENTRAL"));
            }
            ExpiryOutcome::NoAction => panic!("expected cancellation"),
        }
    }

    #[test]
    fn promotion_binds_lowest_copy_id() {
        let mut req = requested(0);
        req.status = RequestStatus::Waiting.into();
        req.physical_book_id = None;
        req.end_date = None;

        let candidates = vec![
            copy(12, 1, "9780441013593", 0),
            copy(5, 1, "9780441013593", 0),
            copy(8, 1, "9780441013593", 1), // already requested
        ];
        let promo = promote_waiting(&req, &candidates, "Dune", 3, now()).unwrap();
        assert_eq!(promo.physical_book_id, 5);
        assert_eq!(promo.pickup_deadline, now() + Duration::days(3));
        assert_eq!(promo.notification.title, "Available for pickup");
        assert!(promo.notification.description.contains("3 days"));
    }

    #[test]
    fn no_promotion_when_stock_is_at_another_branch() {
        let mut req = requested(0);
        req.status = RequestStatus::Waiting.into();
        req.physical_book_id = None;

        // Matching ISBN, wrong branch; matching branch, wrong ISBN.
        let candidates = vec![
            copy(1, 2, "9780441013593", 0),
            copy(2, 1, "9780123456786", 0),
        ];
        assert!(promote_waiting(&req, &candidates, "Dune", 3, now()).is_none());
    }
}
