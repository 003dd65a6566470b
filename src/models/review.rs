//! Review model

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::errors::FieldErrors;
use crate::utils::helpers::{contains_ignore_case, parse_api_date};
use super::validation::{require_some, require_text, Validate};
use super::{wire, Resource};

/// A guest review
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub name: String,
    /// 1 to 5
    pub rating: u8,
    pub comment: String,
    pub created_at: Option<NaiveDate>,
}

/// Review form values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewDraft {
    pub name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: Option<NaiveDate>,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            rating: 5,
            comment: String::new(),
            created_at: Some(Local::now().date_naive()),
        }
    }
}

impl Validate for ReviewDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        require_text(&mut errors, "name", &self.name, "Guest name is required");
        require_text(&mut errors, "comment", &self.comment, "Comment is required");
        require_some(&mut errors, "createdAt", &self.created_at, "Date is required");
        if !(1..=5).contains(&self.rating) {
            errors.insert("rating", "Rating must be between 1 and 5");
        }

        errors
    }
}

/// Review as exchanged with the backend (schema v1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWire {
    #[serde(default, alias = "_id", deserialize_with = "wire::string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::number")]
    pub rating: f64,
    #[serde(default, deserialize_with = "wire::string")]
    pub comment: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub created_at: String,
}

impl From<ReviewWire> for Review {
    fn from(wire: ReviewWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            rating: wire.rating.round().clamp(1.0, 5.0) as u8,
            comment: wire.comment,
            created_at: parse_api_date(&wire.created_at),
        }
    }
}

impl From<&ReviewDraft> for ReviewWire {
    fn from(draft: &ReviewDraft) -> Self {
        Self {
            id: String::new(),
            name: draft.name.trim().to_string(),
            rating: draft.rating as f64,
            comment: draft.comment.trim().to_string(),
            created_at: draft
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

impl Resource for Review {
    type Draft = ReviewDraft;

    const KIND: &'static str = "review";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, term_lower: &str) -> bool {
        contains_ignore_case(&self.name, term_lower)
            || contains_ignore_case(&self.comment, term_lower)
    }

    fn to_draft(&self) -> ReviewDraft {
        ReviewDraft {
            name: self.name.clone(),
            rating: self.rating as i64,
            comment: self.comment.clone(),
            created_at: self.created_at.or_else(|| Some(Local::now().date_naive())),
        }
    }
}

/// Mean rating to one decimal place, `"0.0"` when there are no reviews
pub fn average_rating(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "0.0".to_string();
    }
    let total: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    format!("{:.1}", total as f64 / reviews.len() as f64)
}
