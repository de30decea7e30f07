//! Replica reconciliation sweep
//!
//! A match is duplicated into both participants' documents with no
//! atomicity across the two writes, so the copies can diverge: a mirror
//! write failed, or one side progressed while the other was unreachable.
//! This sweep diffs every match the session user participates in against
//! the counterparty's copy and repairs the difference by status precedence
//! (the copy that progressed further wins, see [`MatchStatus::rank`]).
//! A copy missing entirely on the counterparty side is re-replicated.

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{ExchangeError, UserSession};
use crate::backend::store::StateStore;
use crate::shared::types::{Match, MatchStatus, UserAppState};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Matches compared against their counterparty copy.
    pub examined: usize,
    /// Matches whose two copies disagreed and were repaired.
    pub repaired: Vec<Uuid>,
    /// Counterparties whose documents could not be read or written; their
    /// matches stay divergent until the next sweep.
    pub unreachable: Vec<Uuid>,
}

/// Compare and repair the session user's match copies.
pub async fn reconcile_matches(session: &UserSession) -> Result<ReconcileReport, ExchangeError> {
    let me = session.user_id();
    let mine = session.peek(|state| state.matches.clone()).await;

    // Group by counterparty so each document is read and written once.
    let mut by_counterparty: BTreeMap<Uuid, Vec<Match>> = BTreeMap::new();
    for m in mine {
        if let Some(counterparty) = m.counterparty(me) {
            by_counterparty.entry(counterparty).or_default().push(m);
        }
    }

    let mut report = ReconcileReport::default();
    for (counterparty, matches) in by_counterparty {
        let mut theirs = match session.store().get_state(counterparty).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    "[Reconcile] cannot read counterparty {} document: {}",
                    counterparty,
                    e
                );
                report.unreachable.push(counterparty);
                continue;
            }
        };

        let mut their_doc_dirty = false;
        for mine in matches {
            report.examined += 1;
            match theirs.match_by_id(mine.id) {
                None => {
                    tracing::warn!(
                        "[Reconcile] match {} missing from {} document, re-replicating",
                        mine.id,
                        counterparty
                    );
                    theirs.add_match(mine.clone());
                    their_doc_dirty = true;
                    report.repaired.push(mine.id);
                }
                Some(their_copy) => {
                    if their_copy.status == mine.status {
                        continue;
                    }
                    if their_copy.status.rank() > mine.status.rank() {
                        pull_forward(session, &mine.id, their_copy.status, their_copy.completed_at)
                            .await;
                    } else {
                        let (status, completed_at) = (mine.status, mine.completed_at);
                        theirs.set_match_status(mine.id, status, completed_at);
                        their_doc_dirty = true;
                    }
                    report.repaired.push(mine.id);
                }
            }
        }

        if their_doc_dirty {
            if let Err(e) = session.store().save_state(counterparty, &theirs).await {
                tracing::warn!(
                    "[Reconcile] repair write to {} failed: {}",
                    counterparty,
                    e
                );
                report.unreachable.push(counterparty);
            }
        }
    }

    if !report.repaired.is_empty() {
        tracing::info!(
            "[Reconcile] repaired {} diverged match copies for {}",
            report.repaired.len(),
            me
        );
    }
    Ok(report)
}

/// The counterparty's copy progressed further; adopt its status locally.
async fn pull_forward(
    session: &UserSession,
    match_id: &Uuid,
    status: MatchStatus,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
) {
    let match_id = *match_id;
    session
        .mutate(move |state: &mut UserAppState| {
            state.set_match_status(match_id, status, completed_at);
        })
        .await;
}
