//! Transaction negotiation
//!
//! Tracks per-party pickup logistics for a match during handoff. Creation
//! is implicit: the first details submission for a match opens the
//! transaction; later submissions merge into the caller's own key only, so
//! the two parties can never clobber each other. Completion and
//! cancellation propagate the reciprocal status change onto the linked
//! match in both participants' documents, using the counterparty id from
//! the match record (no scans, no server-side fan-out).

use chrono::Utc;
use uuid::Uuid;

use super::{write_counterparty, ExchangeError, UserSession};
use crate::shared::types::{
    MatchStatus, Transaction, TransactionPartyDetails, TransactionStatus,
};

/// Submit the caller's pickup details for a match, creating the transaction
/// when absent. The linked match transitions to `in-transaction` in both
/// documents.
pub async fn submit_details(
    session: &UserSession,
    match_id: Uuid,
    details: TransactionPartyDetails,
) -> Result<Transaction, ExchangeError> {
    details.validate()?;
    let me = session.user_id();

    let (txn, counterparty) = session
        .mutate(|state| {
            let Some(m) = state.match_by_id(match_id) else {
                return Err(ExchangeError::NotFound("match"));
            };
            if !m.status.is_open() {
                return Err(crate::shared::error::SharedError::validation(
                    "matchId",
                    "match is no longer open for a handoff",
                )
                .into());
            }
            let Some(counterparty) = m.counterparty(me) else {
                return Err(ExchangeError::NotFound("match"));
            };
            let txn = state.upsert_transaction_details(match_id, me, details.clone(), None);
            state.set_match_status(match_id, MatchStatus::InTransaction, None);
            Ok((txn, counterparty))
        })
        .await?;

    let replica = txn.clone();
    write_counterparty(session.store().as_ref(), counterparty, "replicate details", |state| {
        state.upsert_transaction_details(match_id, me, details.clone(), Some(&replica));
        state.set_match_status(match_id, MatchStatus::InTransaction, None);
    })
    .await;

    tracing::info!("[Transaction] {} submitted details for match {}", me, match_id);
    Ok(txn)
}

/// Mark the handoff done. Idempotent in observable effect: a second call
/// leaves `completed_at` at its first value.
pub async fn complete(session: &UserSession, transaction_id: Uuid) -> Result<(), ExchangeError> {
    let me = session.user_id();
    let completed_at = Utc::now();

    let outcome = session
        .mutate(|state| {
            let txn = state.transaction(transaction_id)?;
            if txn.status == TransactionStatus::Completed {
                return Some(None);
            }
            let match_id = state.set_transaction_status(transaction_id, TransactionStatus::Completed)?;
            state.set_match_status(match_id, MatchStatus::Completed, Some(completed_at));
            let counterparty = state.match_by_id(match_id).and_then(|m| m.counterparty(me));
            Some(counterparty.map(|c| (match_id, c)))
        })
        .await
        .ok_or(ExchangeError::NotFound("transaction"))?;

    // Already completed, or the match copy is missing locally: nothing to
    // propagate.
    let Some((match_id, counterparty)) = outcome else {
        return Ok(());
    };

    write_counterparty(session.store().as_ref(), counterparty, "propagate completion", |state| {
        state.set_transaction_status(transaction_id, TransactionStatus::Completed);
        state.set_match_status(match_id, MatchStatus::Completed, Some(completed_at));
    })
    .await;

    Ok(())
}

/// Abort the handoff. The transaction ends `cancelled` and the linked match
/// reverts to `active` in both documents, so negotiation can restart.
pub async fn cancel(session: &UserSession, transaction_id: Uuid) -> Result<(), ExchangeError> {
    let me = session.user_id();

    let outcome = session
        .mutate(|state| {
            let match_id = state.set_transaction_status(transaction_id, TransactionStatus::Cancelled)?;
            state.set_match_status(match_id, MatchStatus::Active, None);
            let counterparty = state.match_by_id(match_id).and_then(|m| m.counterparty(me));
            Some(counterparty.map(|c| (match_id, c)))
        })
        .await
        .ok_or(ExchangeError::NotFound("transaction"))?;

    let Some((match_id, counterparty)) = outcome else {
        return Ok(());
    };

    write_counterparty(session.store().as_ref(), counterparty, "propagate cancellation", |state| {
        state.set_transaction_status(transaction_id, TransactionStatus::Cancelled);
        state.set_match_status(match_id, MatchStatus::Active, None);
    })
    .await;

    Ok(())
}
