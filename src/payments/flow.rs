use serde::Serialize;
use tracing::debug;

use crate::order::Order;
use crate::types::{OrderStatus, PaymentFlow};

/// decide which payment flow governs an order
///
/// An explicit `payment_flow_type` always wins. Historical orders without one
/// are classified from their status; `DirectToWorker` is never inferred.
pub fn resolve_payment_flow(order: &Order) -> PaymentFlow {
    if let Some(flow) = order.payment_flow_type {
        return flow;
    }

    let derived = match order.status {
        OrderStatus::PendingPlatformFee => PaymentFlow::PlatformFeeOnly,
        OrderStatus::PendingPlatformPayment => PaymentFlow::PlatformPrepay,
        _ => PaymentFlow::PlatformPrepay,
    };
    debug!(
        order_id = order.id,
        status = %order.status,
        flow = %derived,
        "payment flow derived from status"
    );
    derived
}

/// i18n keys for the payment dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentCopy {
    pub title_key: &'static str,
    pub button_key: &'static str,
}

impl PaymentFlow {
    pub fn copy(&self) -> PaymentCopy {
        match self {
            PaymentFlow::PlatformFeeOnly => PaymentCopy {
                title_key: "orders.prepaymentTitle",
                button_key: "orders.payBookingFeeButtonAmount",
            },
            PaymentFlow::PlatformPrepay | PaymentFlow::DirectToWorker => PaymentCopy {
                title_key: "orders.paymentTitle",
                button_key: "orders.payButtonAmount",
            },
        }
    }

    /// whether the platform collects anything from the client
    pub fn collects_through_platform(&self) -> bool {
        !matches!(self, PaymentFlow::DirectToWorker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::fixtures::order;

    #[test]
    fn test_explicit_flow_is_used_verbatim() {
        let mut o = order(OrderStatus::PendingPlatformFee);
        o.payment_flow_type = Some(PaymentFlow::DirectToWorker);
        assert_eq!(resolve_payment_flow(&o), PaymentFlow::DirectToWorker);

        o.payment_flow_type = Some(PaymentFlow::PlatformPrepay);
        assert_eq!(resolve_payment_flow(&o), PaymentFlow::PlatformPrepay);
    }

    #[test]
    fn test_flow_derived_from_status() {
        assert_eq!(
            resolve_payment_flow(&order(OrderStatus::PendingPlatformFee)),
            PaymentFlow::PlatformFeeOnly
        );
        assert_eq!(
            resolve_payment_flow(&order(OrderStatus::PendingPlatformPayment)),
            PaymentFlow::PlatformPrepay
        );
    }

    #[test]
    fn test_direct_to_worker_never_derived() {
        for status in OrderStatus::ALL {
            let flow = resolve_payment_flow(&order(status));
            assert_ne!(flow, PaymentFlow::DirectToWorker, "derived for {status}");
        }
    }

    #[test]
    fn test_copy_keys() {
        assert_eq!(PaymentFlow::PlatformFeeOnly.copy().title_key, "orders.prepaymentTitle");
        assert_eq!(PaymentFlow::PlatformPrepay.copy().button_key, "orders.payButtonAmount");
        assert!(!PaymentFlow::DirectToWorker.collects_through_platform());
    }
}
