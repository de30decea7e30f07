//! Handoff transaction records
//!
//! A transaction is the pickup-logistics negotiation attached 1:1 to a
//! match. Each party writes only its own key in `parties`, so concurrent
//! submissions from both sides cannot clobber each other.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::shared::error::SharedError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Ongoing,
    Completed,
    Cancelled,
}

/// How the physical handoff happens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickupMethod {
    #[serde(rename = "7-11")]
    SevenEleven,
    #[serde(rename = "FamilyMart")]
    FamilyMart,
    #[serde(rename = "OK Mart")]
    OkMart,
    #[serde(rename = "Home Delivery")]
    HomeDelivery,
    /// Face-to-face meetup.
    #[serde(rename = "面交")]
    InPerson,
}

/// One party's pickup details. The meaning of `pickup_location` depends on
/// the method: store branch name, delivery address, or meeting point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPartyDetails {
    pub phone_number: String,
    pub pickup_method: PickupMethod,
    pub pickup_location: String,
}

impl TransactionPartyDetails {
    /// Validate form fields. Failures are surfaced inline and block
    /// submission.
    pub fn validate(&self) -> Result<(), SharedError> {
        let phone = self.phone_number.trim();
        if phone.is_empty() {
            return Err(SharedError::validation("phoneNumber", "phone number is required"));
        }
        if !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(SharedError::validation(
                "phoneNumber",
                "phone number may only contain digits",
            ));
        }
        if self.pickup_location.trim().is_empty() {
            return Err(SharedError::validation("pickupLocation", "pickup location is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub match_id: Uuid,
    pub status: TransactionStatus,
    /// Per-party details keyed by user id. Writes touch only the caller's
    /// own key.
    pub parties: BTreeMap<Uuid, TransactionPartyDetails>,
}

impl Transaction {
    /// Fresh ongoing transaction for `match_id` carrying only the
    /// initiating party's details.
    pub fn open(match_id: Uuid, party: Uuid, details: TransactionPartyDetails) -> Self {
        let mut parties = BTreeMap::new();
        parties.insert(party, details);
        Self { id: Uuid::new_v4(), match_id, status: TransactionStatus::Ongoing, parties }
    }
}
