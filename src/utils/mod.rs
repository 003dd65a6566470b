//! Utility modules
//!
//! Errors, logging setup and small helpers shared across the crate

pub mod clock;
pub mod errors;
pub mod helpers;
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{PgAdminError, ApiError, LoginError, FieldErrors, Result};
