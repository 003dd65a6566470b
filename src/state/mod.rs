//! State management module
//!
//! Login lockout bookkeeping and its storage, the generic list controller,
//! and the session/application context.

pub mod context;
pub mod list_controller;
pub mod lockout;
pub mod storage;

// Re-export commonly used state components
pub use context::{AppContext, Profile, Session, SessionContext};
pub use list_controller::{EditForm, ListController, LoadStatus, ViewMode};
pub use lockout::{LockoutPolicy, LockoutState};
pub use storage::{FileStateStorage, LockoutStore, MemoryStateStorage};
