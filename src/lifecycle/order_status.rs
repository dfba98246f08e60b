use crate::errors::{BillingError, Result};
use crate::types::OrderStatus;

impl OrderStatus {
    /// statuses this one may legally move to
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;

        match self {
            PendingWorker => &[
                PendingPlatformPayment,
                PendingPlatformFee,
                Confirmed,
                CanceledClient,
                CanceledAdmin,
            ],
            // entry payment gates, left only by paying or being canceled
            PendingPlatformPayment | PendingPlatformFee => {
                &[Confirmed, CanceledClient, CanceledAdmin]
            }
            Confirmed => &[
                InProgress,
                CanceledClient,
                CanceledWorker,
                CanceledAdmin,
                RecurringPaymentFailed,
            ],
            InProgress => &[
                Completed,
                Disputed,
                CanceledClient,
                CanceledAdmin,
                RecurringPaymentFailed,
            ],
            // returns to whichever state failed; see resume_after_payment
            RecurringPaymentFailed => &[Confirmed, InProgress, CanceledClient, CanceledAdmin],
            // resolved by an administrator
            Disputed => &[Completed, CanceledAdmin],
            Completed | CanceledClient | CanceledWorker | CanceledAdmin => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// validate a transition reported by the backend
    pub fn transition(self, next: OrderStatus) -> Result<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BillingError::InvalidOrderTransition {
                from: self,
                to: next,
            })
        }
    }

    /// leave `RecurringPaymentFailed` once the failed period is paid
    pub fn resume_after_payment(self, failed_from: OrderStatus) -> Result<OrderStatus> {
        match (self, failed_from) {
            (
                OrderStatus::RecurringPaymentFailed,
                OrderStatus::Confirmed | OrderStatus::InProgress,
            ) => Ok(failed_from),
            _ => Err(BillingError::InvalidOrderTransition {
                from: self,
                to: failed_from,
            }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::CanceledClient
                | OrderStatus::CanceledWorker
                | OrderStatus::CanceledAdmin
        )
    }

    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            OrderStatus::CanceledClient | OrderStatus::CanceledWorker | OrderStatus::CanceledAdmin
        )
    }

    /// disputes freeze automatic charging without closing the order
    pub fn accepts_automatic_charge(&self) -> bool {
        !self.is_terminal() && *self != OrderStatus::Disputed
    }

    /// the order cannot progress until the client pays
    pub fn is_payment_blocking(&self) -> bool {
        matches!(
            self,
            OrderStatus::PendingPlatformPayment
                | OrderStatus::PendingPlatformFee
                | OrderStatus::RecurringPaymentFailed
        )
    }

    /// display-only: an unpaid amount on an order in one of these states is labelled overdue
    pub fn is_overdue_classification(&self) -> bool {
        matches!(
            self,
            OrderStatus::InProgress | OrderStatus::Confirmed | OrderStatus::RecurringPaymentFailed
        )
    }

    pub fn is_client_cancellable(&self) -> bool {
        matches!(
            self,
            OrderStatus::PendingWorker | OrderStatus::PendingPlatformPayment
        )
    }
}

pub fn is_payment_blocking(status: OrderStatus) -> bool {
    status.is_payment_blocking()
}

pub fn is_overdue_classification(status: OrderStatus) -> bool {
    status.is_overdue_classification()
}
