//!  Storage is organized through [log_store::JsonLogStore].
//!  The basic idea is:
//!   - There is a single JSON document holding every logged interval.
//!   - Intervals are grouped by the UTC day they ended on, then by domain.
//!   - Intervals are only ever appended, in the order they were closed.

pub mod entities;
pub mod log_store;
