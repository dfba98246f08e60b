use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{CardId, CardStatus};

/// wallet balance snapshot, only valid for the call it is passed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub amount: Money,
}

impl UserBalance {
    pub fn new(amount: Money) -> Self {
        Self { amount }
    }
}

/// saved card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: CardId,
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub status: CardStatus,
    pub is_default: bool,
}

impl PaymentMethod {
    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }

    /// "visa •••• 4242"
    pub fn masked(&self) -> String {
        format!("{} •••• {}", self.brand, self.last4)
    }
}

/// card to preselect: the default active card, else the first active one
pub fn default_card(cards: &[PaymentMethod]) -> Option<&PaymentMethod> {
    cards
        .iter()
        .filter(|c| c.is_active())
        .find(|c| c.is_default)
        .or_else(|| cards.iter().find(|c| c.is_active()))
}

/// look up a card the client picked; inactive cards are rejected, not skipped
pub fn selectable_card(cards: &[PaymentMethod], id: CardId) -> Result<&PaymentMethod> {
    let card = cards
        .iter()
        .find(|c| c.id == id)
        .ok_or(BillingError::CardNotFound { id })?;

    if !card.is_active() {
        return Err(BillingError::CardInactive { id });
    }
    Ok(card)
}
