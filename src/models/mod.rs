//! Data models module
//!
//! Canonical in-memory types for every managed resource, their form drafts,
//! and the versioned wire schemas they are translated from at the API boundary.

pub mod guest;
pub mod rent;
pub mod review;
pub mod session;
pub mod validation;
pub mod wire;

use std::fmt::Debug;
use serde::{de::DeserializeOwned, Serialize};

// Re-export commonly used models
pub use guest::{Guest, GuestDraft, GuestWire, StayStatus, PaymentCycle, FoodPreference};
pub use rent::{RentRecord, RentDraft, RentWire, RentStatus, NoteEntry, RentSummary, Punctuality};
pub use review::{Review, ReviewDraft, ReviewWire, average_rating};
pub use session::{SessionUser, LoginRequest, LoginResponseWire};
pub use validation::Validate;

/// A record type managed through a list/detail/form controller
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Form values used to create or edit a record
    type Draft: Validate + Default + Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    /// Singular display name, e.g. "guest"
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Case-insensitive search over this resource's searchable fields.
    /// `term_lower` is already lowercased.
    fn matches(&self, term_lower: &str) -> bool;

    /// Prefill a draft for editing this record
    fn to_draft(&self) -> Self::Draft;

    /// Adjust a draft right before it is sent as an update of `self`
    fn prepare_update(&self, _draft: &mut Self::Draft) {}
}
