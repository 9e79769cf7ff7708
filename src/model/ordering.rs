//! Shared pin-then-recency ordering policy.
//!
//! # Responsibility
//! - Define the single listing order applied to both files and folders.
//!
//! # Invariants
//! - Pinned entities strictly precede unpinned ones.
//! - Within equal pin status, entities order by recency descending
//!   (files: `updated_at`, folders: `created_at`).
//! - Recency ties break by id ascending, making the order total and stable
//!   across repeated calls with unchanged data.
//!
//! Repositories apply the same policy in SQL via [`pin_ordering_sql`]; the
//! in-memory comparator exists for callers that re-sort mixed result sets
//! and for tests that pin the two forms to each other.

use std::cmp::Ordering;
use uuid::Uuid;

/// Entities subject to the pinned-first listing policy.
pub trait PinSortable {
    /// Pin flag.
    fn pinned(&self) -> bool;
    /// Recency key in epoch milliseconds.
    fn recency_epoch_ms(&self) -> i64;
    /// Tiebreak id guaranteeing a total order.
    fn order_id(&self) -> Uuid;
}

/// Compares two entities under the shared listing policy.
pub fn pin_recency_cmp<T: PinSortable>(a: &T, b: &T) -> Ordering {
    b.pinned()
        .cmp(&a.pinned())
        .then_with(|| b.recency_epoch_ms().cmp(&a.recency_epoch_ms()))
        .then_with(|| a.order_id().cmp(&b.order_id()))
}

/// Returns the SQL `ORDER BY` body implementing the same policy.
///
/// `recency_column` is `updated_at` for files and `created_at` for folders.
pub fn pin_ordering_sql(recency_column: &str) -> String {
    format!("is_pinned DESC, {recency_column} DESC, uuid ASC")
}
