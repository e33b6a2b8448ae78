use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::schema::donation_submissions;

/// A donation confirmation submitted by a donor.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = donation_submissions)]
pub struct Donation {
    pub id: i32,
    pub transaction_reference: Option<String>,
    pub donor_name: String,
    pub donor_contact: String,
    pub bank_used: String,
    pub amount_donated: String,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
}

/// Insertable form of a validated submission.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = donation_submissions)]
pub struct NewDonation {
    pub transaction_reference: Option<String>,
    pub donor_name: String,
    pub donor_contact: String,
    pub bank_used: String,
    pub amount_donated: String,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// The part of a submission pushed to admin dashboards when it arrives.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DonationSummary {
    pub id: i32,
    pub transaction_reference: Option<String>,
    pub donor_name: String,
    pub donor_contact: String,
    pub bank_used: String,
    pub amount_donated: String,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub is_verified: bool,
}

impl From<&Donation> for DonationSummary {
    fn from(d: &Donation) -> Self {
        Self {
            id: d.id,
            transaction_reference: d.transaction_reference.clone(),
            donor_name: d.donor_name.clone(),
            donor_contact: d.donor_contact.clone(),
            bank_used: d.bank_used.clone(),
            amount_donated: d.amount_donated.clone(),
            message: d.message.clone(),
            submitted_at: d.submitted_at,
            is_verified: d.is_verified,
        }
    }
}

/// Verification state of a submission after an admin toggled it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationChange {
    pub id: i32,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<&Donation> for VerificationChange {
    fn from(d: &Donation) -> Self {
        Self {
            id: d.id,
            is_verified: d.is_verified,
            verified_by: d.verified_by.clone(),
            verified_at: d.verified_at,
        }
    }
}

/// Filtering and paging for submission listings.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery {
    pub skip: i64,
    pub limit: i64,
    pub verified_only: bool,
}
