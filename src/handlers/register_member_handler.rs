//! Member Registration Handler
//!
//! Registers a member and issues their membership number.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{MemberStatus, MembershipNumber, RequestContext};
use crate::error::AppError;

use super::{RegisterMemberCommand, RegisterMemberResult};

/// Handler for member registration
pub struct RegisterMemberHandler {
    pool: PgPool,
}

impl RegisterMemberHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the register member command
    pub async fn execute(
        &self,
        command: RegisterMemberCommand,
        context: &RequestContext,
    ) -> Result<RegisterMemberResult, AppError> {
        let mut tx = self.pool.begin().await?;

        // Check if a member with this email already exists
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM members WHERE email = $1")
                .bind(&command.email)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            return Err(AppError::DuplicateMember(command.email));
        }

        // Membership numbers restart each year; the sequence is the count
        // of members registered in the current year plus one.
        let year = Utc::now().year();
        let registered_this_year: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE date_part('year', created_at) = $1",
        )
        .bind(year as f64)
        .fetch_one(&mut *tx)
        .await?;

        let membership_number = MembershipNumber::generate(year, registered_this_year as u32 + 1);

        let member_id = Uuid::new_v4();
        let status = MemberStatus::Prospect;

        sqlx::query(
            r#"
            INSERT INTO members
                (id, membership_number, full_name, email, phone, status,
                 outstanding_balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, NOW(), NOW())
            "#,
        )
        .bind(member_id)
        .bind(membership_number.as_str())
        .bind(&command.full_name)
        .bind(&command.email)
        .bind(&command.phone)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            member_id = %member_id,
            membership_number = %membership_number,
            correlation_id = ?context.correlation_id,
            "Member registered"
        );

        Ok(RegisterMemberResult {
            member_id,
            membership_number: membership_number.into(),
            status: status.as_str().to_string(),
        })
    }
}
