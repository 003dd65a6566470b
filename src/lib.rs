//! PG Admin
//!
//! Administrative console for a paying-guest accommodation. Staff sign in
//! behind an escalating lockout and manage guests, rent records and reviews
//! stored by a remote REST API.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PgAdminError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{AppContext, ListController, SessionContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
