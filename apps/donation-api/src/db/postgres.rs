//! PostgreSQL-backed [`Store`] using the Diesel async pool.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError, OptionalExtension};
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::{admins, donation_submissions};
use crate::db::store::{Store, DUPLICATE_ADMIN, DUPLICATE_REFERENCE};
use crate::error::ApiError;
use crate::models::admin::{Admin, NewAdmin};
use crate::models::donation::{Donation, ListQuery, NewDonation};
use crate::models::stats::DashboardStats;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a unique-constraint violation to a 409, everything else to a 500.
fn unique_as_conflict(err: DieselError, message: &str) -> ApiError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::conflict(message)
        }
        other => other.into(),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_donation(&self, new: NewDonation) -> Result<Donation, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(donation_submissions::table)
            .values(&new)
            .returning(Donation::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| unique_as_conflict(e, DUPLICATE_REFERENCE))
    }

    async fn get_donation(&self, id: i32) -> Result<Option<Donation>, ApiError> {
        let mut conn = self.pool.get().await?;

        let donation = donation_submissions::table
            .find(id)
            .select(Donation::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(donation)
    }

    async fn list_donations(&self, query: ListQuery) -> Result<Vec<Donation>, ApiError> {
        let mut conn = self.pool.get().await?;

        let mut q = donation_submissions::table
            .select(Donation::as_select())
            .order((
                donation_submissions::submitted_at.desc(),
                donation_submissions::id.desc(),
            ))
            .offset(query.skip)
            .limit(query.limit)
            .into_boxed();

        if query.verified_only {
            q = q.filter(donation_submissions::is_verified.eq(true));
        }

        Ok(q.load(&mut conn).await?)
    }

    async fn set_verification(
        &self,
        id: i32,
        is_verified: bool,
        verified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Donation>, ApiError> {
        let mut conn = self.pool.get().await?;

        let donation = diesel::update(donation_submissions::table.find(id))
            .set((
                donation_submissions::is_verified.eq(is_verified),
                donation_submissions::verified_at.eq(Some(at)),
                donation_submissions::verified_by.eq(Some(verified_by)),
            ))
            .returning(Donation::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;
        Ok(donation)
    }

    async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let mut conn = self.pool.get().await?;

        let total: i64 = donation_submissions::table
            .count()
            .get_result(&mut conn)
            .await?;

        // Amounts are free-form text, so summing happens here rather than in SQL.
        let verified_amounts: Vec<String> = donation_submissions::table
            .filter(donation_submissions::is_verified.eq(true))
            .select(donation_submissions::amount_donated)
            .load(&mut conn)
            .await?;

        Ok(DashboardStats::tally(total, &verified_amounts))
    }

    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, ApiError> {
        let mut conn = self.pool.get().await?;

        let admin = admins::table
            .filter(admins::username.eq(username))
            .select(Admin::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(admin)
    }

    async fn insert_admin(&self, new: NewAdmin) -> Result<Admin, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(admins::table)
            .values(&new)
            .returning(Admin::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| unique_as_conflict(e, DUPLICATE_ADMIN))
    }

    async fn update_admin_password(&self, username: &str, password_hash: &str) -> Result<(), ApiError> {
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(admins::table.filter(admins::username.eq(username)))
            .set(admins::password_hash.eq(password_hash))
            .execute(&mut conn)
            .await?;

        if updated == 0 {
            return Err(ApiError::not_found("Admin user not found"));
        }
        Ok(())
    }
}
