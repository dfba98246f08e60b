use crate::errors::{BillingError, Result};
use crate::types::BillingPeriodStatus;

impl BillingPeriodStatus {
    pub fn allowed_transitions(&self) -> &'static [BillingPeriodStatus] {
        use BillingPeriodStatus::*;

        match self {
            PendingPayment => &[Paid, PaymentFailed],
            // retry, or another failed attempt
            PaymentFailed => &[PendingPayment, PaymentFailed, Paid],
            Paid => &[TasksCompleted],
            TasksCompleted => &[PayoutPending],
            PayoutPending => &[PayoutComplete],
            PayoutComplete => &[],
        }
    }

    pub fn can_transition_to(&self, next: BillingPeriodStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn transition(self, next: BillingPeriodStatus) -> Result<BillingPeriodStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BillingError::InvalidPeriodTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == BillingPeriodStatus::PayoutComplete
    }

    /// still awaiting a successful client payment
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            BillingPeriodStatus::PendingPayment | BillingPeriodStatus::PaymentFailed
        )
    }
}

pub fn is_unresolved(status: BillingPeriodStatus) -> bool {
    status.is_unresolved()
}
