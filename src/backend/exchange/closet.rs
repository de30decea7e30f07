//! Closet maintenance
//!
//! Upload, edit and delete of owned items. The owning user id is always the
//! session's; ownership is never resolved by scanning other users'
//! documents. Edits refresh the stale embedded snapshots in match records
//! on both sides. Deletion cancels any open match the item is committed to
//! and drops inbound requests for it, notifying the requesters' likes.

use uuid::Uuid;

use super::{write_counterparty, ExchangeError, UserSession};
use crate::shared::error::SharedError;
use crate::shared::types::{ClothingItem, ItemFields, LikedItemStatus, MatchStatus};

/// Add a freshly-uploaded item to the session user's closet.
pub async fn add_item(
    session: &UserSession,
    fields: ItemFields,
) -> Result<ClothingItem, ExchangeError> {
    fields.validate()?;
    let profile = session.profile().await;
    let item = fields.into_item(session.user_id(), &profile.name, &profile.avatar);
    session.mutate(|state| state.add_closet_item(item.clone())).await;
    tracing::info!("[Closet] {} uploaded item {}", session.user_id(), item.id);
    Ok(item)
}

/// Edit an owned item, refreshing the embedded snapshot in every match that
/// carries it — the owner's own copies synchronously, the counterparty
/// replicas via direct writes.
pub async fn update_item(
    session: &UserSession,
    item_id: Uuid,
    fields: ItemFields,
) -> Result<ClothingItem, ExchangeError> {
    fields.validate()?;
    let me = session.user_id();

    let (updated, affected) = session
        .mutate(|state| {
            let current = state.closet_item(item_id)?.clone();
            let updated = ClothingItem {
                id: current.id,
                user_id: current.user_id,
                user_name: current.user_name,
                user_avatar: current.user_avatar,
                image_urls: fields.image_urls.clone(),
                category: fields.category.clone(),
                color: fields.color.clone(),
                style_tags: fields.style_tags.clone(),
                description: fields.description.clone(),
                estimated_price: fields.estimated_price,
            };
            state.update_closet_item(updated.clone());

            let affected: Vec<(Uuid, Uuid)> = state
                .matches
                .iter()
                .filter(|m| m.side_of(me).is_some_and(|s| s.clothing_item.id == item_id))
                .filter_map(|m| m.counterparty(me).map(|c| (m.id, c)))
                .collect();
            for (match_id, _) in &affected {
                if let Some(side) =
                    state.match_by_id_mut(*match_id).and_then(|m| m.side_of_mut(me))
                {
                    side.clothing_item = updated.clone();
                }
            }
            Some((updated, affected))
        })
        .await
        .ok_or(ExchangeError::NotFound("item"))?;

    for (match_id, counterparty) in affected {
        let snapshot = updated.clone();
        write_counterparty(
            session.store().as_ref(),
            counterparty,
            "refresh item snapshot",
            move |state| {
                if let Some(side) = state.match_by_id_mut(match_id).and_then(|m| m.side_of_mut(me))
                {
                    side.clothing_item = snapshot;
                }
            },
        )
        .await;
    }

    Ok(updated)
}

/// Delete an owned item. Open matches committed to the item are cancelled
/// on both sides, and pending inbound requests for it are dropped with the
/// requesters' likes marked rejected.
pub async fn delete_item(session: &UserSession, item_id: Uuid) -> Result<(), ExchangeError> {
    let me = session.user_id();

    let (cancelled, dropped) = session
        .mutate(|state| {
            state.remove_closet_item(item_id)?;

            let cancelled: Vec<(Uuid, Uuid)> = state
                .matches
                .iter()
                .filter(|m| {
                    m.status.is_open()
                        && m.side_of(me).is_some_and(|s| s.clothing_item.id == item_id)
                })
                .filter_map(|m| m.counterparty(me).map(|c| (m.id, c)))
                .collect();
            for (match_id, _) in &cancelled {
                state.set_match_status(*match_id, MatchStatus::Cancelled, None);
            }

            let dropped: Vec<(Uuid, Uuid)> = state
                .remove_requests_for_item(item_id)
                .into_iter()
                .map(|r| (r.requester.id, r.item_of_interest.id))
                .collect();
            Some((cancelled, dropped))
        })
        .await
        .ok_or(ExchangeError::NotFound("item"))?;

    for (match_id, counterparty) in cancelled {
        write_counterparty(session.store().as_ref(), counterparty, "cancel match for deleted item", move |state| {
            state.set_match_status(match_id, MatchStatus::Cancelled, None);
        })
        .await;
    }
    for (requester, liked_item_id) in dropped {
        write_counterparty(session.store().as_ref(), requester, "reject like for deleted item", move |state| {
            state.set_liked_status_for_item(liked_item_id, LikedItemStatus::Rejected);
        })
        .await;
    }

    tracing::info!("[Closet] {} deleted item {}", me, item_id);
    Ok(())
}

/// Remove one of the session user's likes. Pending likes stay until the
/// other side responds.
pub async fn remove_liked_item(session: &UserSession, like_id: Uuid) -> Result<(), ExchangeError> {
    session
        .mutate(|state| {
            let Some(like) = state.liked_item(like_id) else {
                return Err(ExchangeError::NotFound("liked item"));
            };
            if like.status == LikedItemStatus::Pending {
                return Err(SharedError::validation(
                    "likeId",
                    "a pending like cannot be removed",
                )
                .into());
            }
            state.remove_liked_item(like_id);
            Ok(())
        })
        .await
}
