//! Balance reconciliation
//!
//! Recomputes a member's outstanding balance wholesale from unsettled dues
//! and recorded payments. No write path mutates the balance incrementally;
//! every change to dues or payments is followed by a full recomputation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{sum_amounts, OutstandingBalance};

/// Persistence operations reconciliation depends on.
///
/// Transactional semantics and schema are owned by the implementation.
#[async_trait]
pub trait MemberLedger: Send + Sync {
    /// Amounts of the member's dues with status PENDING or PARTIAL
    async fn unsettled_dues(&self, member_id: Uuid) -> Result<Vec<Decimal>, ReconcileError>;

    /// Amounts of all the member's recorded payments, regardless of which
    /// due they settle
    async fn payments(&self, member_id: Uuid) -> Result<Vec<Decimal>, ReconcileError>;

    /// Overwrite the member's stored outstanding balance (last write wins)
    async fn update_balance(
        &self,
        member_id: Uuid,
        balance: Decimal,
    ) -> Result<(), ReconcileError>;

    /// Ids of every member, in a stable order
    async fn member_ids(&self) -> Result<Vec<Uuid>, ReconcileError>;
}

/// Reconciliation errors
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Ledger error: {0}")]
    Ledger(String),
}

/// Outcome of a full reconciliation sweep.
///
/// Per-member failures are isolated: a failing member is recorded here and
/// the sweep continues. Members reconciled before a failure stay committed.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub reconciled: Vec<Uuid>,
    pub failed: Vec<FailedMember>,
    pub completed_at: DateTime<Utc>,
}

/// A member whose reconciliation failed, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct FailedMember {
    pub member_id: Uuid,
    pub reason: String,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Service recomputing outstanding balances over a [`MemberLedger`]
#[derive(Debug, Clone)]
pub struct ReconcileService<L> {
    ledger: L,
}

impl<L: MemberLedger> ReconcileService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Recompute and persist one member's outstanding balance.
    ///
    /// `balance = max(0, sum(unsettled dues) - sum(payments))`, summed with
    /// a decimal accumulator. The stored balance is overwritten
    /// unconditionally. The member's existence is the caller's concern: an
    /// unknown id nets to zero rather than erroring. Persistence failures
    /// propagate; there is no retry.
    pub async fn reconcile(&self, member_id: Uuid) -> Result<Decimal, ReconcileError> {
        let dues_total = sum_amounts(self.ledger.unsettled_dues(member_id).await?);
        let payments_total = sum_amounts(self.ledger.payments(member_id).await?);

        let balance = OutstandingBalance::net(dues_total, payments_total);
        self.ledger.update_balance(member_id, balance.value()).await?;

        tracing::debug!(
            member_id = %member_id,
            dues_total = %dues_total,
            payments_total = %payments_total,
            balance = %balance,
            "Reconciled member balance"
        );

        Ok(balance.value())
    }

    /// Reconcile every member, strictly sequentially.
    ///
    /// One member's failure does not halt the sweep; it is recorded in the
    /// report and the pass moves on. Balances updated before a failure
    /// remain committed, and the report makes that partial application
    /// explicit. Not safe to run concurrently with itself: overlapping
    /// sweeps race last-write-wins on the same balance fields.
    pub async fn reconcile_all(&self) -> Result<ReconcileReport, ReconcileError> {
        let ids = self.ledger.member_ids().await?;

        let mut reconciled = Vec::new();
        let mut failed = Vec::new();

        for member_id in ids {
            match self.reconcile(member_id).await {
                Ok(_) => reconciled.push(member_id),
                Err(e) => {
                    tracing::warn!(member_id = %member_id, error = %e, "Member reconciliation failed");
                    failed.push(FailedMember {
                        member_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            reconciled = reconciled.len(),
            failed = failed.len(),
            "Reconciliation sweep completed"
        );

        Ok(ReconcileReport {
            reconciled,
            failed,
            completed_at: Utc::now(),
        })
    }
}

/// Postgres-backed ledger over the members / assigned_dues / payments tables
#[derive(Debug, Clone)]
pub struct PgMemberLedger {
    pool: PgPool,
}

impl PgMemberLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberLedger for PgMemberLedger {
    async fn unsettled_dues(&self, member_id: Uuid) -> Result<Vec<Decimal>, ReconcileError> {
        let amounts: Vec<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT amount
            FROM assigned_dues
            WHERE member_id = $1 AND status IN ('PENDING', 'PARTIAL')
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(amounts.into_iter().map(|(a,)| a).collect())
    }

    async fn payments(&self, member_id: Uuid) -> Result<Vec<Decimal>, ReconcileError> {
        let amounts: Vec<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT amount
            FROM payments
            WHERE member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(amounts.into_iter().map(|(a,)| a).collect())
    }

    async fn update_balance(
        &self,
        member_id: Uuid,
        balance: Decimal,
    ) -> Result<(), ReconcileError> {
        // Unconditional overwrite; an unknown member id affects zero rows
        // and is not an error here.
        sqlx::query(
            r#"
            UPDATE members
            SET outstanding_balance = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(member_id)
        .bind(balance)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn member_ids(&self) -> Result<Vec<Uuid>, ReconcileError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM members ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
