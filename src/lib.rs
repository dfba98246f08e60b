pub mod config;
pub mod countdown;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod order;
pub mod payments;
pub mod types;
pub mod validation;
pub mod wallet;
pub mod wire;

// re-export key types
pub use config::{CountdownConfig, EngineConfig, PeriodSelection};
pub use countdown::{due_countdown, Countdown, DueCountdown};
pub use decimal::{Currency, Money};
pub use engine::{BillingEngine, PaymentQuote};
pub use errors::{BillingError, Result, ValidationError};
pub use lifecycle::{is_overdue_classification, is_payment_blocking, is_unresolved};
pub use order::{BillingPeriod, Order};
pub use payments::{
    allocate, calculate_amounts, resolve_payment_flow, Allocation, AmountBreakdown,
    AmountCalculator, DueLabel, PaymentCopy, PaymentIntent, PaymentIntentSubmitter,
    SubmissionOutcome,
};
pub use types::{
    BillingPeriodId, BillingPeriodStatus, CardId, CardStatus, OrderId, OrderStatus, PaymentFlow,
    ScheduleType,
};
pub use validation::{
    collect_violations, collect_violations_for, validate_order, validate_order_for,
};
pub use wallet::{default_card, selectable_card, PaymentMethod, UserBalance};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
