// Widgets module - the dashboard building blocks
//
// Two independent widgets live here. They share no state; each owns its
// change-set and observer list and flushes derived state synchronously
// inside every mutating call.

pub mod chat;
pub mod paginator;

use thiserror::Error;

/// Errors surfaced to callers by widget operations.
///
/// Boundary navigation (prev at page 1, next at the last page) clamps
/// silently and never produces one of these; only invalid direct input does.
/// Renderer failures during chat dispatch are absorbed internally by the
/// fallback chain and never reach the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    /// `goto` was asked for a page outside `1..=num_pages`
    #[error("page {page} is out of range (1..={pages})")]
    OutOfRange { page: usize, pages: usize },

    /// `resize` was asked for a page size below 1
    #[error("page size must be at least 1, got {0}")]
    InvalidSize(usize),

    /// `update` was given another entry's full state plus explicit
    /// user/avatar overrides; set them on the entry instead
    #[error("cannot override user or avatar when updating from a full entry")]
    ConflictingOverride,
}
