//! order and billing-period state machines
//!
//! Both machines only classify and validate statuses reported by the backend;
//! the engine never drives a transition itself.

pub mod billing_period;
pub mod order_status;

pub use billing_period::is_unresolved;
pub use order_status::{is_overdue_classification, is_payment_blocking};
