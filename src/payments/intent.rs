use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{BillingError, Result};
use crate::payments::allocation::Allocation;
use crate::types::{CardId, OrderId};
use crate::wallet::{selectable_card, PaymentMethod};

/// everything the external submitter needs to charge an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntent {
    /// idempotency key for the submitter
    pub intent_id: Uuid,
    pub order_id: OrderId,
    pub selected_method_id: Option<CardId>,
    pub use_balance: bool,
    pub allocation: Allocation,
}

impl PaymentIntent {
    /// assemble an intent, enforcing the caller-side preconditions
    ///
    /// A selected card must exist and be active. If the allocation leaves
    /// anything for the card, a card must be selected.
    pub fn prepare(
        order_id: OrderId,
        allocation: Allocation,
        use_balance: bool,
        cards: &[PaymentMethod],
        selected: Option<CardId>,
    ) -> Result<Self> {
        if let Some(id) = selected {
            selectable_card(cards, id)?;
        }

        if allocation.card_required && selected.is_none() {
            warn!(order_id, from_card = %allocation.from_card, "card required but none selected");
            return Err(BillingError::CardRequired {
                amount: allocation.from_card,
            });
        }

        Ok(Self {
            intent_id: Uuid::new_v4(),
            order_id,
            selected_method_id: selected,
            use_balance,
            allocation,
        })
    }
}

/// result reported by the submitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// charge completed, e.g. fully covered by balance
    Completed,
    /// redirect the client to finish 3-D Secure, then re-fetch the order
    ConfirmationNeeded { confirmation_url: String },
}

impl SubmissionOutcome {
    pub fn confirmation_url(&self) -> Option<&str> {
        match self {
            SubmissionOutcome::Completed => None,
            SubmissionOutcome::ConfirmationNeeded { confirmation_url } => Some(confirmation_url),
        }
    }
}

/// outbound seam to the payment gateway client
///
/// Implementations live outside this crate. On failure callers should
/// re-fetch the order and quote again rather than retry blindly.
pub trait PaymentIntentSubmitter {
    fn submit(&self, intent: &PaymentIntent) -> Result<SubmissionOutcome>;
}

/// submit and log the outcome
pub fn submit_intent<S: PaymentIntentSubmitter + ?Sized>(
    submitter: &S,
    intent: &PaymentIntent,
) -> Result<SubmissionOutcome> {
    match submitter.submit(intent) {
        Ok(outcome) => {
            info!(
                order_id = intent.order_id,
                intent_id = %intent.intent_id,
                confirmation_needed = outcome.confirmation_url().is_some(),
                "payment intent submitted"
            );
            Ok(outcome)
        }
        Err(e) => {
            warn!(
                order_id = intent.order_id,
                intent_id = %intent.intent_id,
                error = %e,
                "payment intent rejected"
            );
            Err(e)
        }
    }
}
