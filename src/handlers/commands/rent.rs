//! Rent page rendering

use crate::models::{Punctuality, RentRecord, RentSummary};
use crate::utils::helpers::{format_amount, format_date};
use super::resources::ResourceView;

impl ResourceView for RentRecord {
    const TITLE: &'static str = "Rent";

    fn row(&self) -> String {
        let period = match self.year {
            Some(year) => format!("{} {}", self.month, year),
            None => self.month.clone(),
        };
        format!(
            "[{}] {} | {} | {} | due {} | {}",
            self.id,
            self.name,
            format_amount(self.amount),
            period,
            format_date(self.due_date),
            self.status.label()
        )
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("Rent record {}", self.id),
            format!("Guest:           {}", self.name),
            format!("Amount:          {}", format_amount(self.amount)),
            format!("Month:           {} {}", self.month, self.year.map(|y| y.to_string()).unwrap_or_default()),
            format!("Due date:        {}", format_date(self.due_date)),
            format!("Status:          {}", self.status.label()),
            format!("Payment method:  {}", self.payment_method),
        ];

        if let Some(paid) = self.paid_date {
            let punctuality = match self.punctuality() {
                Some(Punctuality::OnTime) => " (paid on time)",
                Some(Punctuality::Late) => " (paid late)",
                None => "",
            };
            lines.push(format!("Paid on:         {}{}", format_date(Some(paid)), punctuality));
        }
        if !self.notes.is_empty() {
            lines.push(format!("Notes:           {}", self.notes));
        }
        if !self.notes_history.is_empty() {
            lines.push("History:".to_string());
            for entry in &self.notes_history {
                lines.push(format!("  {}  {}", format_date(Some(entry.date)), entry.note));
            }
        }
        lines.join("\n")
    }

    fn summary(items: &[Self]) -> String {
        let summary = RentSummary::from_records(items);
        format!(
            "Total: {} | Collected: {} | Pending: {} | Overdue: {}",
            format_amount(summary.total_amount),
            format_amount(summary.collected_amount),
            summary.pending_count,
            summary.overdue_count
        )
    }
}
