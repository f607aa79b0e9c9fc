//! Dues Assignment Handler
//!
//! Assigns a due to a member and reconciles their balance.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, DomainError, DueStatus, RequestContext};
use crate::error::AppError;
use crate::reconcile::{PgMemberLedger, ReconcileService};

use super::{AssignDuesCommand, AssignDuesResult};

/// Handler for dues assignment
pub struct AssignDuesHandler {
    reconcile: ReconcileService<PgMemberLedger>,
    pool: PgPool,
}

impl AssignDuesHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reconcile: ReconcileService::new(PgMemberLedger::new(pool.clone())),
            pool,
        }
    }

    /// Execute the assign dues command
    pub async fn execute(
        &self,
        command: AssignDuesCommand,
        context: &RequestContext,
    ) -> Result<AssignDuesResult, AppError> {
        let amount: Amount = command
            .amount
            .parse()
            .map_err(|e: crate::domain::AmountError| AppError::Domain(DomainError::from(e)))?;

        // The write path verifies the member exists; reconciliation itself
        // does not.
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM members WHERE id = $1")
            .bind(command.member_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(AppError::MemberNotFound(command.member_id.to_string()));
        }

        let due_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO assigned_dues (id, member_id, amount, period, status, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(due_id)
        .bind(command.member_id)
        .bind(amount.value())
        .bind(&command.period)
        .bind(DueStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        // Balance is recomputed wholesale after every dues change
        let outstanding_balance = self
            .reconcile
            .reconcile(command.member_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(
            due_id = %due_id,
            member_id = %command.member_id,
            amount = %amount,
            period = %command.period,
            correlation_id = ?context.correlation_id,
            "Dues assigned"
        );

        Ok(AssignDuesResult {
            due_id,
            member_id: command.member_id,
            amount: amount.value(),
            outstanding_balance,
        })
    }
}
