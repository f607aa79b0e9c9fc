//! Payment Recording Handler
//!
//! Records a payment and reconciles the member's balance.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, DomainError, RequestContext};
use crate::error::AppError;
use crate::reconcile::{PgMemberLedger, ReconcileService};

use super::{RecordPaymentCommand, RecordPaymentResult};

/// Handler for payment recording
pub struct RecordPaymentHandler {
    reconcile: ReconcileService<PgMemberLedger>,
    pool: PgPool,
}

impl RecordPaymentHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reconcile: ReconcileService::new(PgMemberLedger::new(pool.clone())),
            pool,
        }
    }

    /// Execute the record payment command.
    ///
    /// Payments are recorded against the member, not against a specific
    /// due; settlement is netted out by reconciliation.
    pub async fn execute(
        &self,
        command: RecordPaymentCommand,
        context: &RequestContext,
    ) -> Result<RecordPaymentResult, AppError> {
        let amount: Amount = command
            .amount
            .parse()
            .map_err(|e: crate::domain::AmountError| AppError::Domain(DomainError::from(e)))?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM members WHERE id = $1")
            .bind(command.member_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(AppError::MemberNotFound(command.member_id.to_string()));
        }

        let payment_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO payments (id, member_id, amount, method, memo, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            "#,
        )
        .bind(payment_id)
        .bind(command.member_id)
        .bind(amount.value())
        .bind(&command.method)
        .bind(&command.memo)
        .execute(&self.pool)
        .await?;

        // Never decrement the stored balance directly; recompute it
        let outstanding_balance = self
            .reconcile
            .reconcile(command.member_id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(
            payment_id = %payment_id,
            member_id = %command.member_id,
            amount = %amount,
            method = %command.method,
            correlation_id = ?context.correlation_id,
            "Payment recorded"
        );

        Ok(RecordPaymentResult {
            payment_id,
            member_id: command.member_id,
            amount: amount.value(),
            outstanding_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_payment_command() {
        let member_id = Uuid::new_v4();
        let cmd = RecordPaymentCommand::new(member_id, "45.50".to_string(), "card".to_string())
            .with_memo("July dues".to_string());

        assert_eq!(cmd.member_id, member_id);
        assert_eq!(cmd.amount, "45.50");
        assert_eq!(cmd.memo, Some("July dues".to_string()));
    }

    #[test]
    fn test_record_payment_command_without_memo() {
        let cmd =
            RecordPaymentCommand::new(Uuid::new_v4(), "10.00".to_string(), "cash".to_string());
        assert!(cmd.memo.is_none());
    }
}
