pub mod allocation;
pub mod amounts;
pub mod flow;
pub mod intent;

pub use allocation::{allocate, Allocation};
pub use amounts::{calculate_amounts, AmountBreakdown, AmountCalculator, DueLabel};
pub use flow::{resolve_payment_flow, PaymentCopy};
pub use intent::{submit_intent, PaymentIntent, PaymentIntentSubmitter, SubmissionOutcome};
