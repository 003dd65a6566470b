//! Guest page rendering

use crate::models::{Guest, StayStatus};
use crate::utils::helpers::{format_amount, format_date};
use super::resources::ResourceView;

impl ResourceView for Guest {
    const TITLE: &'static str = "Guests";

    fn row(&self) -> String {
        format!(
            "[{}] {} <{}> {} | {} | {}",
            self.id,
            self.name,
            self.email,
            self.contact,
            self.stay_status.as_wire(),
            format_amount(self.amount_paid)
        )
    }

    fn detail(&self) -> String {
        let mut lines = vec![
            format!("Guest {}", self.id),
            format!("Name:               {}", self.name),
            format!("Email:              {}", self.email),
            format!("Contact:            {}", self.contact),
            format!("Location:           {}", self.location),
            format!("Date of birth:      {}", format_date(self.dob)),
            format!("Occupation/course:  {}", self.occupation_course),
            format!("Guardian:           {} ({})", self.guardian_name, self.guardian_contact),
            format!(
                "Emergency contact:  {} ({}) {}",
                self.emergency_contact_name, self.emergency_contact_relation, self.emergency_contact_number
            ),
            format!("Joined:             {}", format_date(self.join_date)),
            format!(
                "Expected stay:      {} to {}",
                format_date(self.expected_date_from),
                format_date(self.expected_date_to)
            ),
            format!("Payment cycle:      {}", self.payment_cycle.as_wire()),
            format!("Amount paid:        {}", format_amount(self.amount_paid)),
            format!("Deposit:            {}", format_amount(self.deposit_amount)),
            format!("Food:               {}", self.food_preference.as_wire()),
            format!("Status:             {}", self.stay_status.as_wire()),
        ];
        if let Some(url) = &self.file_url {
            lines.push(format!("Document:           {}", url));
        }
        lines.join("\n")
    }

    fn summary(items: &[Self]) -> String {
        let count = |status: StayStatus| items.iter().filter(|g| g.stay_status == status).count();
        format!(
            "Guests: {} | Staying: {} | Joining soon: {} | Left: {}",
            items.len(),
            count(StayStatus::CurrentlyStaying),
            count(StayStatus::JoiningSoon),
            count(StayStatus::Left)
        )
    }
}
