//! Lifecycle rules engine
//!
//! Pure decision logic for the request/copy/punishment/transfer state
//! machines. Every function here takes `now` as an argument and performs no
//! I/O; the jobs runner loads entity snapshots, calls into this module once
//! per entity, and persists whatever outcome comes back.
//!
//! Request state machine:
//!
//! ```text
//! Waiting --(copy found)--> Pending --(pickup expires)--> Canceled
//! Pending --(user confirms pickup, API)--> Requested
//! Requested --(returned, API)--> Returned
//! Requested --(overdue)--> Requested (punishment escalates)
//! Requested --(user cancels, API)--> Canceled
//! ```

mod rules;

pub use rules::{
    days_left, evaluate_pending, evaluate_requested, evaluate_transfer, promote_waiting,
    DeadlineOutcome, ExpiryOutcome, Promotion,
};
