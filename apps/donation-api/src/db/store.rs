use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::ApiError;
use crate::models::admin::{Admin, NewAdmin};
use crate::models::donation::{Donation, ListQuery, NewDonation};
use crate::models::stats::DashboardStats;

pub const DUPLICATE_REFERENCE: &str = "A submission with this transaction reference already exists";
pub const DUPLICATE_ADMIN: &str = "An admin with this username or email already exists";

/// Persistence for submissions and admin accounts.
///
/// Backed by PostgreSQL in production and an in-memory map in tests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_donation(&self, new: NewDonation) -> Result<Donation, ApiError>;
    async fn get_donation(&self, id: i32) -> Result<Option<Donation>, ApiError>;
    /// Newest first.
    async fn list_donations(&self, query: ListQuery) -> Result<Vec<Donation>, ApiError>;
    /// Returns `None` when no submission has this id.
    async fn set_verification(
        &self,
        id: i32,
        is_verified: bool,
        verified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Donation>, ApiError>;
    async fn stats(&self) -> Result<DashboardStats, ApiError>;

    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, ApiError>;
    async fn insert_admin(&self, new: NewAdmin) -> Result<Admin, ApiError>;
    async fn update_admin_password(&self, username: &str, password_hash: &str) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation (for STORAGE=memory / tests)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    donations: Vec<Donation>,
    admins: Vec<Admin>,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_donation(&self, new: NewDonation) -> Result<Donation, ApiError> {
        let mut t = self.tables.lock();
        if let Some(reference) = &new.transaction_reference {
            if t
                .donations
                .iter()
                .any(|d| d.transaction_reference.as_ref() == Some(reference))
            {
                return Err(ApiError::conflict(DUPLICATE_REFERENCE));
            }
        }

        let donation = Donation {
            id: t.donations.len() as i32 + 1,
            transaction_reference: new.transaction_reference,
            donor_name: new.donor_name,
            donor_contact: new.donor_contact,
            bank_used: new.bank_used,
            amount_donated: new.amount_donated,
            message: new.message,
            submitted_at: new.submitted_at,
            is_verified: false,
            verified_at: None,
            verified_by: None,
        };
        t.donations.push(donation.clone());
        Ok(donation)
    }

    async fn get_donation(&self, id: i32) -> Result<Option<Donation>, ApiError> {
        Ok(self.tables.lock().donations.iter().find(|d| d.id == id).cloned())
    }

    async fn list_donations(&self, query: ListQuery) -> Result<Vec<Donation>, ApiError> {
        let t = self.tables.lock();
        let mut rows: Vec<Donation> = t
            .donations
            .iter()
            .filter(|d| !query.verified_only || d.is_verified)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));

        Ok(rows
            .into_iter()
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn set_verification(
        &self,
        id: i32,
        is_verified: bool,
        verified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Donation>, ApiError> {
        let mut t = self.tables.lock();
        Ok(t.donations.iter_mut().find(|d| d.id == id).map(|d| {
            d.is_verified = is_verified;
            d.verified_at = Some(at);
            d.verified_by = Some(verified_by.to_string());
            d.clone()
        }))
    }

    async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let t = self.tables.lock();
        let verified: Vec<&str> = t
            .donations
            .iter()
            .filter(|d| d.is_verified)
            .map(|d| d.amount_donated.as_str())
            .collect();
        Ok(DashboardStats::tally(t.donations.len() as i64, &verified))
    }

    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, ApiError> {
        Ok(self
            .tables
            .lock()
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert_admin(&self, new: NewAdmin) -> Result<Admin, ApiError> {
        let mut t = self.tables.lock();
        if t
            .admins
            .iter()
            .any(|a| a.username == new.username || a.email == new.email)
        {
            return Err(ApiError::conflict(DUPLICATE_ADMIN));
        }

        let admin = Admin {
            id: t.admins.len() as i32 + 1,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            is_active: new.is_active,
            created_at: new.created_at,
        };
        t.admins.push(admin.clone());
        Ok(admin)
    }

    async fn update_admin_password(&self, username: &str, password_hash: &str) -> Result<(), ApiError> {
        let mut t = self.tables.lock();
        let admin = t
            .admins
            .iter_mut()
            .find(|a| a.username == username)
            .ok_or_else(|| ApiError::not_found("Admin user not found"))?;
        admin.password_hash = password_hash.to_string();
        Ok(())
    }
}
