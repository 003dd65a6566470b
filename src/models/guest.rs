//! Guest model

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::errors::FieldErrors;
use crate::utils::helpers::{contains_ignore_case, is_valid_email, is_valid_phone, parse_api_date};
use super::validation::{require_some, require_text, Validate};
use super::{wire, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StayStatus {
    #[default]
    CurrentlyStaying,
    JoiningSoon,
    Left,
}

impl StayStatus {
    /// Unknown values fall back to `CurrentlyStaying`
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "joining-soon" => StayStatus::JoiningSoon,
            "left" => StayStatus::Left,
            _ => StayStatus::CurrentlyStaying,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            StayStatus::CurrentlyStaying => "currently-staying",
            StayStatus::JoiningSoon => "joining-soon",
            StayStatus::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentCycle {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl PaymentCycle {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "quarterly" => PaymentCycle::Quarterly,
            "yearly" => PaymentCycle::Yearly,
            _ => PaymentCycle::Monthly,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            PaymentCycle::Monthly => "monthly",
            PaymentCycle::Quarterly => "quarterly",
            PaymentCycle::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPreference {
    #[default]
    WithFood,
    WithoutFood,
}

impl FoodPreference {
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "without-food" => FoodPreference::WithoutFood,
            _ => FoodPreference::WithFood,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            FoodPreference::WithFood => "with-food",
            FoodPreference::WithoutFood => "without-food",
        }
    }
}

/// A paying guest
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub location: String,
    pub dob: Option<NaiveDate>,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_number: String,
    pub occupation_course: String,
    pub join_date: Option<NaiveDate>,
    pub expected_date_from: Option<NaiveDate>,
    pub expected_date_to: Option<NaiveDate>,
    pub payment_cycle: PaymentCycle,
    pub amount_paid: f64,
    pub deposit_amount: f64,
    pub food_preference: FoodPreference,
    pub stay_status: StayStatus,
    pub file_url: Option<String>,
}

/// Guest form values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestDraft {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub location: String,
    pub dob: Option<NaiveDate>,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
    pub emergency_contact_number: String,
    pub occupation_course: String,
    pub join_date: Option<NaiveDate>,
    pub expected_date_from: Option<NaiveDate>,
    pub expected_date_to: Option<NaiveDate>,
    pub payment_cycle: PaymentCycle,
    pub amount_paid: f64,
    pub deposit_amount: f64,
    pub food_preference: FoodPreference,
    pub stay_status: StayStatus,
    pub file_url: Option<String>,
}

impl Default for GuestDraft {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            name: String::new(),
            email: String::new(),
            contact: String::new(),
            location: String::new(),
            dob: None,
            guardian_name: String::new(),
            guardian_contact: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_relation: String::new(),
            emergency_contact_number: String::new(),
            occupation_course: String::new(),
            join_date: Some(today),
            expected_date_from: Some(today),
            expected_date_to: None,
            payment_cycle: PaymentCycle::default(),
            amount_paid: 0.0,
            deposit_amount: 0.0,
            food_preference: FoodPreference::default(),
            stay_status: StayStatus::default(),
            file_url: None,
        }
    }
}

impl Validate for GuestDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        require_text(&mut errors, "name", &self.name, "Name is required");
        require_text(&mut errors, "email", &self.email, "Email is required");
        require_text(&mut errors, "contact", &self.contact, "Contact number is required");
        require_text(&mut errors, "location", &self.location, "Location is required");
        require_some(&mut errors, "dob", &self.dob, "Date of birth is required");
        require_text(&mut errors, "guardianName", &self.guardian_name, "Guardian name is required");
        require_text(&mut errors, "guardianContact", &self.guardian_contact, "Guardian contact is required");
        require_text(&mut errors, "emergencyContactName", &self.emergency_contact_name, "Emergency contact name is required");
        require_text(&mut errors, "emergencyContactRelation", &self.emergency_contact_relation, "Emergency contact relation is required");
        require_text(&mut errors, "emergencyContactNumber", &self.emergency_contact_number, "Emergency contact number is required");
        require_text(&mut errors, "occupationCourse", &self.occupation_course, "Occupation/Course is required");
        if self.amount_paid <= 0.0 || self.amount_paid.is_nan() {
            errors.insert("amountPaid", "Amount paid must be greater than 0");
        }
        require_some(&mut errors, "joinDate", &self.join_date, "Join date is required");
        require_some(&mut errors, "expectedDateFrom", &self.expected_date_from, "Expected start date is required");
        require_some(&mut errors, "expectedDateTo", &self.expected_date_to, "Expected end date is required");

        if !self.email.is_empty() && !is_valid_email(&self.email) {
            errors.insert("email", "Please enter a valid email");
        }
        if !self.contact.is_empty() && !is_valid_phone(&self.contact) {
            errors.insert("contact", "Please enter a valid contact number");
        }
        if !self.guardian_contact.is_empty() && !is_valid_phone(&self.guardian_contact) {
            errors.insert("guardianContact", "Please enter a valid guardian contact number");
        }
        if !self.emergency_contact_number.is_empty() && !is_valid_phone(&self.emergency_contact_number) {
            errors.insert("emergencyContactNumber", "Please enter a valid emergency contact number");
        }

        errors
    }
}

/// Guest as exchanged with the backend (schema v1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestWire {
    #[serde(default, alias = "_id", deserialize_with = "wire::string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub email: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub contact: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub location: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub dob: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub guardian_name: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub guardian_contact: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub emergency_contact_name: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub emergency_contact_relation: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub emergency_contact_number: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub occupation_course: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub join_date: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub expected_date_from: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub expected_date_to: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub payment_cycle: String,
    #[serde(default, deserialize_with = "wire::number")]
    pub amount_paid: f64,
    #[serde(default, deserialize_with = "wire::number")]
    pub deposit_amount: f64,
    #[serde(default, deserialize_with = "wire::string")]
    pub food_preference: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub stay_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

fn wire_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl From<GuestWire> for Guest {
    fn from(wire: GuestWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            contact: wire.contact,
            location: wire.location,
            dob: parse_api_date(&wire.dob),
            guardian_name: wire.guardian_name,
            guardian_contact: wire.guardian_contact,
            emergency_contact_name: wire.emergency_contact_name,
            emergency_contact_relation: wire.emergency_contact_relation,
            emergency_contact_number: wire.emergency_contact_number,
            occupation_course: wire.occupation_course,
            join_date: parse_api_date(&wire.join_date),
            expected_date_from: parse_api_date(&wire.expected_date_from),
            expected_date_to: parse_api_date(&wire.expected_date_to),
            payment_cycle: PaymentCycle::from_wire(&wire.payment_cycle),
            amount_paid: wire.amount_paid,
            deposit_amount: wire.deposit_amount,
            food_preference: FoodPreference::from_wire(&wire.food_preference),
            stay_status: StayStatus::from_wire(&wire.stay_status),
            file_url: wire.file_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

impl From<&GuestDraft> for GuestWire {
    fn from(draft: &GuestDraft) -> Self {
        Self {
            id: String::new(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            contact: draft.contact.trim().to_string(),
            location: draft.location.trim().to_string(),
            dob: wire_date(draft.dob),
            guardian_name: draft.guardian_name.trim().to_string(),
            guardian_contact: draft.guardian_contact.trim().to_string(),
            emergency_contact_name: draft.emergency_contact_name.trim().to_string(),
            emergency_contact_relation: draft.emergency_contact_relation.trim().to_string(),
            emergency_contact_number: draft.emergency_contact_number.trim().to_string(),
            occupation_course: draft.occupation_course.trim().to_string(),
            join_date: wire_date(draft.join_date),
            expected_date_from: wire_date(draft.expected_date_from),
            expected_date_to: wire_date(draft.expected_date_to),
            payment_cycle: draft.payment_cycle.as_wire().to_string(),
            amount_paid: draft.amount_paid,
            deposit_amount: draft.deposit_amount,
            food_preference: draft.food_preference.as_wire().to_string(),
            stay_status: draft.stay_status.as_wire().to_string(),
            file_url: draft.file_url.clone().filter(|url| !url.trim().is_empty()),
        }
    }
}

impl Resource for Guest {
    type Draft = GuestDraft;

    const KIND: &'static str = "guest";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, term_lower: &str) -> bool {
        contains_ignore_case(&self.name, term_lower)
            || contains_ignore_case(&self.email, term_lower)
            || contains_ignore_case(&self.id, term_lower)
    }

    fn to_draft(&self) -> GuestDraft {
        GuestDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            contact: self.contact.clone(),
            location: self.location.clone(),
            dob: self.dob,
            guardian_name: self.guardian_name.clone(),
            guardian_contact: self.guardian_contact.clone(),
            emergency_contact_name: self.emergency_contact_name.clone(),
            emergency_contact_relation: self.emergency_contact_relation.clone(),
            emergency_contact_number: self.emergency_contact_number.clone(),
            occupation_course: self.occupation_course.clone(),
            join_date: self.join_date,
            expected_date_from: self.expected_date_from,
            expected_date_to: self.expected_date_to,
            payment_cycle: self.payment_cycle,
            amount_paid: self.amount_paid,
            deposit_amount: self.deposit_amount,
            food_preference: self.food_preference,
            stay_status: self.stay_status,
            file_url: self.file_url.clone(),
        }
    }
}
