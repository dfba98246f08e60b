use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;

use crate::config::CountdownConfig;
use crate::types::OrderStatus;

/// time left before an unpaid order is auto-canceled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// "1ч 30мин", `None` when there is nothing to show
    pub display: Option<String>,
    pub is_expired: bool,
}

impl Countdown {
    pub fn hidden() -> Self {
        Self {
            display: None,
            is_expired: false,
        }
    }

    pub fn expired() -> Self {
        Self {
            display: None,
            is_expired: true,
        }
    }
}

/// payment deadline countdown
///
/// Pure in its inputs; callers pick the re-evaluation cadence.
#[derive(Debug, Clone, Default)]
pub struct DueCountdown {
    config: CountdownConfig,
}

impl DueCountdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        payment_due_at_utc: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        status: OrderStatus,
    ) -> Countdown {
        let due_at = match payment_due_at_utc {
            Some(due_at) if status.is_payment_blocking() => due_at,
            _ => return Countdown::hidden(),
        };

        let diff = due_at - now;
        if diff <= chrono::Duration::zero() {
            return Countdown::expired();
        }

        let total_minutes = diff.num_minutes();
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        let display = if hours > 0 {
            format!(
                "{}{} {}{}",
                hours, self.config.hours_suffix, minutes, self.config.minutes_suffix
            )
        } else {
            format!("{}{}", minutes, self.config.minutes_suffix)
        };

        Countdown {
            display: Some(display),
            is_expired: false,
        }
    }

    /// evaluate against a time provider's current time
    pub fn evaluate_with(
        &self,
        payment_due_at_utc: Option<DateTime<Utc>>,
        time_provider: &SafeTimeProvider,
        status: OrderStatus,
    ) -> Countdown {
        self.evaluate(payment_due_at_utc, time_provider.now(), status)
    }
}

/// countdown with the default suffixes
pub fn due_countdown(
    payment_due_at_utc: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    status: OrderStatus,
) -> Countdown {
    DueCountdown::default().evaluate(payment_due_at_utc, now, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_one_second_past_deadline_is_expired() {
        let c = due_countdown(
            Some(now() - Duration::seconds(1)),
            now(),
            OrderStatus::PendingPlatformPayment,
        );
        assert_eq!(c, Countdown::expired());
    }

    #[test]
    fn test_exact_deadline_is_expired() {
        let c = due_countdown(Some(now()), now(), OrderStatus::PendingPlatformFee);
        assert!(c.is_expired);
        assert!(c.display.is_none());
    }

    #[test]
    fn test_ninety_minutes_left() {
        let c = due_countdown(
            Some(now() + Duration::minutes(90)),
            now(),
            OrderStatus::PendingPlatformPayment,
        );
        assert_eq!(c.display.as_deref(), Some("1ч 30мин"));
        assert!(!c.is_expired);
    }

    #[test]
    fn test_under_an_hour_shows_minutes_only() {
        let c = due_countdown(
            Some(now() + Duration::minutes(45) + Duration::seconds(59)),
            now(),
            OrderStatus::RecurringPaymentFailed,
        );
        assert_eq!(c.display.as_deref(), Some("45мин"));
    }

    #[test]
    fn test_whole_hours_keep_zero_minutes() {
        let c = due_countdown(
            Some(now() + Duration::hours(26)),
            now(),
            OrderStatus::PendingPlatformPayment,
        );
        assert_eq!(c.display.as_deref(), Some("26ч 0мин"));
    }

    #[test]
    fn test_hidden_when_not_blocking_or_no_deadline() {
        let later = Some(now() + Duration::hours(2));
        assert_eq!(due_countdown(later, now(), OrderStatus::InProgress), Countdown::hidden());
        assert_eq!(
            due_countdown(None, now(), OrderStatus::PendingPlatformPayment),
            Countdown::hidden()
        );
        // a passed deadline on a non-blocking order is not "expired"
        let past = Some(now() - Duration::hours(2));
        assert!(!due_countdown(past, now(), OrderStatus::Confirmed).is_expired);
    }

    #[test]
    fn test_custom_suffixes_and_time_provider() {
        let countdown = DueCountdown::new(CountdownConfig {
            hours_suffix: "h".to_string(),
            minutes_suffix: "m".to_string(),
        });
        let time = SafeTimeProvider::new(TimeSource::Test(now()));

        let c = countdown.evaluate_with(
            Some(now() + Duration::minutes(125)),
            &time,
            OrderStatus::PendingPlatformFee,
        );
        assert_eq!(c.display.as_deref(), Some("2h 5m"));
    }
}
