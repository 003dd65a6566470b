//! Test data
//!
//! Backend-shaped JSON for guests, rent records and reviews, plus valid drafts.

use chrono::NaiveDate;
use serde_json::{json, Value};
use pg_admin::models::{GuestDraft, RentDraft, RentStatus, ReviewDraft};

pub const ADMIN_EMAIL: &str = "admin@girlspg.com";
pub const ADMIN_PASSWORD: &str = "password123";

pub fn admin_user() -> Value {
    json!({ "_id": "u-1", "email": ADMIN_EMAIL, "name": "Warden" })
}

pub fn guest_json(id: &str, name: &str, email: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": email,
        "contact": "+91 9876543210",
        "location": "Kochi",
        "dob": "2001-05-20",
        "guardianName": "Mary",
        "guardianContact": "+91 9876500000",
        "emergencyContactName": "John",
        "emergencyContactRelation": "Father",
        "emergencyContactNumber": "+91 9876511111",
        "occupationCourse": "B.Tech",
        "joinDate": "2024-06-01",
        "expectedDateFrom": "2024-06-01",
        "expectedDateTo": "2025-05-31",
        "paymentCycle": "monthly",
        "amountPaid": "8500",
        "depositAmount": 5000,
        "foodPreference": "with-food",
        "stayStatus": "currently-staying"
    })
}

pub fn guests_json() -> Value {
    json!([
        guest_json("g-1", "Alice Thomas", "alice@example.com"),
        guest_json("g-2", "Bina Paul", "bina@example.com"),
        guest_json("g-3", "Chitra Nair", "chitra@example.com"),
    ])
}

/// `count` guests named `Guest 1`..`Guest count`
pub fn many_guests_json(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| guest_json(&format!("g-{}", i), &format!("Guest {}", i), &format!("guest{}@example.com", i)))
            .collect(),
    )
}

pub fn rent_json() -> Value {
    json!([
        {
            "_id": "r-1",
            "name": "Alice Thomas",
            "amount": 8500,
            "duedate": "2024-03-05",
            "date": "2024-03-02",
            "paymentMethod": "UPI",
            "notes": "",
            "notesHistory": [],
            "month": "March",
            "year": 2024,
            "status": "paid"
        },
        {
            "_id": "r-2",
            "name": "Bina Paul",
            "amount": "7000",
            "duedate": "2024-03-05",
            "paymentMethod": "Cash",
            "notes": "Will pay next week",
            "month": "March",
            "year": "2024",
            "status": "overdue"
        }
    ])
}

pub fn reviews_json() -> Value {
    json!([
        { "_id": "rv-1", "name": "Alice", "rating": 5, "comment": "Clean rooms", "createdAt": "2024-02-01" },
        { "_id": "rv-2", "name": "Bina", "rating": 4, "comment": "Good food", "createdAt": "2024-02-03" },
    ])
}

pub fn valid_guest_draft() -> GuestDraft {
    GuestDraft {
        name: "Deepa Menon".to_string(),
        email: "deepa@example.com".to_string(),
        contact: "+91 9876543210".to_string(),
        location: "Kochi".to_string(),
        dob: NaiveDate::from_ymd_opt(2002, 1, 15),
        guardian_name: "Lakshmi Menon".to_string(),
        guardian_contact: "+91 9876500000".to_string(),
        emergency_contact_name: "Ravi Menon".to_string(),
        emergency_contact_relation: "Brother".to_string(),
        emergency_contact_number: "+91 9876511111".to_string(),
        occupation_course: "MBA".to_string(),
        join_date: NaiveDate::from_ymd_opt(2024, 7, 1),
        expected_date_from: NaiveDate::from_ymd_opt(2024, 7, 1),
        expected_date_to: NaiveDate::from_ymd_opt(2025, 6, 30),
        amount_paid: 8500.0,
        deposit_amount: 5000.0,
        ..GuestDraft::default()
    }
}

pub fn valid_rent_draft() -> RentDraft {
    RentDraft {
        name: "Alice Thomas".to_string(),
        amount: 8500.0,
        status: RentStatus::Paid,
        paid_date: NaiveDate::from_ymd_opt(2024, 4, 3),
        due_date: NaiveDate::from_ymd_opt(2024, 4, 5),
        payment_method: "UPI".to_string(),
        notes: String::new(),
        notes_history: Vec::new(),
        year: 2024,
        month: "April".to_string(),
    }
}

pub fn valid_review_draft() -> ReviewDraft {
    ReviewDraft {
        name: "Chitra".to_string(),
        rating: 4,
        comment: "Quiet and safe".to_string(),
        created_at: NaiveDate::from_ymd_opt(2024, 5, 10),
    }
}
