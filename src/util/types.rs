//! Shared scalar types.

/// Identifier assigned to a job when it is added to a scheduler.
///
/// Identifiers increase monotonically per scheduler instance, starting at 1.
pub type JobId = u64;

/// Job priority. Lower values are dispatched sooner.
pub type Priority = i64;
