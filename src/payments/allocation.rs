use serde::Serialize;
use tracing::debug;

use crate::decimal::Money;
use crate::errors::Result;

/// split of a due amount between wallet balance and a card charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub due: Money,
    pub from_balance: Money,
    pub from_card: Money,
    /// at least one minor unit must be charged to a card
    pub card_required: bool,
}

impl Allocation {
    /// nothing left for the card
    pub fn is_covered_by_balance(&self) -> bool {
        !self.card_required
    }
}

/// allocate `due` against the wallet `balance`
///
/// With `use_balance` the wallet pays as much as it can and the card covers the
/// rest; `from_balance + from_card == due` holds exactly. A negative balance is
/// treated as empty. Fails only when balance and due are in different
/// currencies and the balance would be used.
pub fn allocate(due: Money, balance: Money, use_balance: bool) -> Result<Allocation> {
    let zero = Money::zero(due.currency());

    let (from_balance, from_card) = if use_balance && due.is_positive() {
        let available = balance.clamp_non_negative();
        let from_balance = due.checked_min(available)?;
        let from_card = due.checked_sub(from_balance)?.clamp_non_negative();
        (from_balance, from_card)
    } else {
        (zero, due)
    };

    let allocation = Allocation {
        due,
        from_balance,
        from_card,
        card_required: from_card.amount_minor_units() > 0,
    };

    debug!(
        due = %due,
        from_balance = %allocation.from_balance,
        from_card = %allocation.from_card,
        card_required = allocation.card_required,
        "payment allocated"
    );
    Ok(allocation)
}
