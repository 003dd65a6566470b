//! Rent record model

use chrono::{Datelike, DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::FieldErrors;
use crate::utils::helpers::{contains_ignore_case, parse_api_date};
use super::validation::{require_some, require_text, Validate};
use super::{wire, Resource};

pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const MIN_YEAR: i32 = 2020;
const MAX_YEAR: i32 = 2030;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    AwaitingPayment,
}

impl RentStatus {
    /// Unknown values fall back to `Pending`
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "paid" => RentStatus::Paid,
            "overdue" => RentStatus::Overdue,
            "awaiting-payment" => RentStatus::AwaitingPayment,
            _ => RentStatus::Pending,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            RentStatus::Pending => "pending",
            RentStatus::Paid => "paid",
            RentStatus::Overdue => "overdue",
            RentStatus::AwaitingPayment => "Awaiting_payment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RentStatus::Pending => "Pending",
            RentStatus::Paid => "Paid",
            RentStatus::Overdue => "Overdue",
            RentStatus::AwaitingPayment => "Awaiting payment",
        }
    }
}

/// One entry of the append-only notes history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub date: NaiveDate,
    pub note: String,
}

/// A rent payment record
#[derive(Debug, Clone, PartialEq)]
pub struct RentRecord {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    /// Only set when `status` is `Paid`
    pub paid_date: Option<NaiveDate>,
    pub payment_method: String,
    pub notes: String,
    pub notes_history: Vec<NoteEntry>,
    pub month: String,
    pub year: Option<i32>,
    pub status: RentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuality {
    OnTime,
    Late,
}

impl RentRecord {
    /// Whether a paid record was settled before its due date
    pub fn punctuality(&self) -> Option<Punctuality> {
        if self.status != RentStatus::Paid {
            return None;
        }
        match (self.paid_date, self.due_date) {
            (Some(paid), Some(due)) if paid < due => Some(Punctuality::OnTime),
            (Some(_), Some(_)) => Some(Punctuality::Late),
            _ => None,
        }
    }
}

/// Aggregates shown above the rent list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RentSummary {
    pub total_amount: f64,
    pub collected_amount: f64,
    pub pending_count: usize,
    pub overdue_count: usize,
}

impl RentSummary {
    pub fn from_records(records: &[RentRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total_amount += record.amount;
            match record.status {
                RentStatus::Paid => summary.collected_amount += record.amount,
                RentStatus::Pending => summary.pending_count += 1,
                RentStatus::Overdue => summary.overdue_count += 1,
                RentStatus::AwaitingPayment => {}
            }
            summary
        })
    }
}

/// Rent form values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RentDraft {
    pub name: String,
    pub amount: f64,
    pub status: RentStatus,
    pub paid_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_method: String,
    pub notes: String,
    pub notes_history: Vec<NoteEntry>,
    pub year: i32,
    pub month: String,
}

impl Default for RentDraft {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            name: String::new(),
            amount: 0.0,
            status: RentStatus::Pending,
            paid_date: None,
            due_date: Some(today),
            payment_method: String::new(),
            notes: String::new(),
            notes_history: Vec::new(),
            year: today.year(),
            month: String::new(),
        }
    }
}

impl RentDraft {
    /// Move the previous note into the history when the note text changed
    pub fn record_note_change(&mut self, previous_note: &str, on: NaiveDate) {
        let previous = previous_note.trim();
        if previous.is_empty() || previous == self.notes.trim() {
            return;
        }
        self.notes_history.push(NoteEntry {
            date: on,
            note: previous.to_string(),
        });
    }
}

impl Validate for RentDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        require_text(&mut errors, "name", &self.name, "Guest name is required");
        if self.amount <= 0.0 || self.amount.is_nan() {
            errors.insert("amount", "Amount must be greater than 0");
        }
        require_some(&mut errors, "duedate", &self.due_date, "Due date is required");
        require_text(&mut errors, "month", &self.month, "Month is required");
        if !self.month.trim().is_empty()
            && !MONTHS.iter().any(|m| m.eq_ignore_ascii_case(self.month.trim()))
        {
            errors.insert("month", "Please select a valid month");
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            errors.insert("year", format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR));
        }
        if self.status == RentStatus::Paid && self.paid_date.is_none() {
            errors.insert("date", "Paid date is required when status is paid");
        }
        require_text(&mut errors, "paymentMethod", &self.payment_method, "Payment method is required");

        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteEntryWire {
    #[serde(default, deserialize_with = "wire::string")]
    pub date: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub note: String,
}

/// Rent record as exchanged with the backend (schema v1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentWire {
    #[serde(default, alias = "_id", deserialize_with = "wire::string", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::number")]
    pub amount: f64,
    #[serde(default, rename = "duedate", alias = "dueDate", deserialize_with = "wire::string")]
    pub due_date: String,
    /// Paid date; the backend calls it `date`
    #[serde(default, deserialize_with = "wire::string", skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub payment_method: String,
    #[serde(default, deserialize_with = "wire::string")]
    pub notes: String,
    #[serde(default)]
    pub notes_history: Option<Vec<NoteEntryWire>>,
    #[serde(default, deserialize_with = "wire::string")]
    pub month: String,
    #[serde(default, deserialize_with = "wire::optional_number", skip_serializing_if = "Option::is_none")]
    pub year: Option<f64>,
    #[serde(default, deserialize_with = "wire::string")]
    pub status: String,
}

/// Paid dates sometimes arrive as epoch milliseconds
fn parse_paid_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|ts| ts.date_naive());
    }
    parse_api_date(value)
}

fn wire_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl From<RentWire> for RentRecord {
    fn from(wire: RentWire) -> Self {
        let status = RentStatus::from_wire(&wire.status);
        let paid_date = match status {
            RentStatus::Paid => parse_paid_date(&wire.date),
            _ => None,
        };
        let notes_history = wire
            .notes_history
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| {
                let date = parse_api_date(&entry.date)?;
                Some(NoteEntry { date, note: entry.note })
            })
            .collect();

        Self {
            id: wire.id,
            name: wire.name,
            amount: wire.amount,
            due_date: parse_api_date(&wire.due_date),
            paid_date,
            payment_method: wire.payment_method,
            notes: wire.notes,
            notes_history,
            month: wire.month,
            year: wire.year.map(|y| y as i32),
            status,
        }
    }
}

impl From<&RentDraft> for RentWire {
    fn from(draft: &RentDraft) -> Self {
        let date = match draft.status {
            RentStatus::Paid => wire_date(draft.paid_date),
            _ => String::new(),
        };
        Self {
            id: String::new(),
            name: draft.name.trim().to_string(),
            amount: draft.amount,
            due_date: wire_date(draft.due_date),
            date,
            payment_method: draft.payment_method.trim().to_string(),
            notes: draft.notes.clone(),
            notes_history: Some(
                draft
                    .notes_history
                    .iter()
                    .map(|entry| NoteEntryWire {
                        date: wire_date(Some(entry.date)),
                        note: entry.note.clone(),
                    })
                    .collect(),
            ),
            month: draft.month.clone(),
            year: Some(draft.year as f64),
            status: draft.status.as_wire().to_string(),
        }
    }
}

impl Resource for RentRecord {
    type Draft = RentDraft;

    const KIND: &'static str = "rent record";

    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, term_lower: &str) -> bool {
        contains_ignore_case(&self.name, term_lower)
            || contains_ignore_case(&wire_date(self.due_date), term_lower)
            || contains_ignore_case(&self.month, term_lower)
    }

    fn to_draft(&self) -> RentDraft {
        let defaults = RentDraft::default();
        RentDraft {
            name: self.name.clone(),
            amount: self.amount,
            status: self.status,
            paid_date: self.paid_date,
            due_date: self.due_date.or(defaults.due_date),
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
            notes_history: self.notes_history.clone(),
            year: self.year.unwrap_or(defaults.year),
            month: self.month.clone(),
        }
    }

    fn prepare_update(&self, draft: &mut RentDraft) {
        draft.record_note_change(&self.notes, Local::now().date_naive());
    }
}
