//! Review page rendering

use crate::models::{average_rating, Review};
use crate::utils::helpers::{format_date, render_stars, truncate_text};
use super::resources::ResourceView;

impl ResourceView for Review {
    const TITLE: &'static str = "Reviews";

    fn row(&self) -> String {
        format!(
            "[{}] {} {} {} - {}",
            self.id,
            render_stars(self.rating),
            self.name,
            format_date(self.created_at),
            truncate_text(&self.comment, 60)
        )
    }

    fn detail(&self) -> String {
        format!(
            "Review {}\nGuest:   {}\nRating:  {} ({}/5)\nDate:    {}\n\n{}",
            self.id,
            self.name,
            render_stars(self.rating),
            self.rating,
            format_date(self.created_at),
            self.comment
        )
    }

    fn summary(items: &[Self]) -> String {
        format!("Reviews: {} | Average rating: {}", items.len(), average_rating(items))
    }
}
