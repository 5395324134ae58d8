//! Free-tier quota and premium subscription state.
//!
//! ```text
//!   Free ──activate(days)──▶ Premium ──expiry < now──▶ Free
//!    ▲                          │
//!    └────────deactivate────────┘
//! ```
//!
//! Expiry never touches `transaction_count`: quota enforcement resumes from
//! wherever the counter stands.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FREE_LIMIT: u32 = 10;

/// Days before expiry during which the subscription is reported as expiring.
pub const EXPIRY_WARNING_DAYS: i64 = 3;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub transaction_count: u32,
    pub free_limit: u32,
    pub is_premium: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub premium_expiry: Option<DateTime<Utc>>,
}

impl Default for QuotaState {
    fn default() -> Self {
        Self {
            transaction_count: 0,
            free_limit: DEFAULT_FREE_LIMIT,
            is_premium: false,
            premium_expiry: None,
        }
    }
}

/// Observable subscription state at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PremiumStatus {
    Free,
    Active {
        expires_at: Option<DateTime<Utc>>,
    },
    ExpiringSoon {
        expires_at: DateTime<Utc>,
        days_left: i64,
    },
    /// The expiry passed but the transition to free was not applied yet.
    Expired {
        expired_at: DateTime<Utc>,
    },
}

/// Transition performed by [`QuotaState::refresh`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PremiumEvent {
    Expired { expired_at: DateTime<Utc> },
}

impl QuotaState {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.premium_expiry.is_some_and(|expiry| expiry < now)
    }

    /// Premium and not past its expiry. Pure: no transition is applied.
    #[must_use]
    pub fn has_premium_at(&self, now: DateTime<Utc>) -> bool {
        self.is_premium && !self.is_expired_at(now)
    }

    /// Whether a free user already used up the quota.
    ///
    /// Only the premium flag counts here: a lapsed expiry is turned into the
    /// free tier by [`refresh`](Self::refresh), not by the gate.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        !self.is_premium && self.transaction_count >= self.free_limit
    }

    /// Free transactions left, `None` meaning unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        if self.is_premium {
            None
        } else {
            Some(self.free_limit.saturating_sub(self.transaction_count))
        }
    }

    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> PremiumStatus {
        if !self.is_premium {
            return PremiumStatus::Free;
        }
        let Some(expires_at) = self.premium_expiry else {
            return PremiumStatus::Active { expires_at: None };
        };
        if expires_at < now {
            return PremiumStatus::Expired {
                expired_at: expires_at,
            };
        }
        let left_ms = (expires_at - now).num_milliseconds();
        let days_left = (left_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
        if days_left > 0 && days_left <= EXPIRY_WARNING_DAYS {
            PremiumStatus::ExpiringSoon {
                expires_at,
                days_left,
            }
        } else {
            PremiumStatus::Active {
                expires_at: Some(expires_at),
            }
        }
    }

    pub(crate) fn activate(&mut self, duration_days: u32, now: DateTime<Utc>) {
        self.is_premium = true;
        self.premium_expiry = Some(now + Duration::days(i64::from(duration_days)));
    }

    pub(crate) fn deactivate(&mut self) {
        self.is_premium = false;
        self.premium_expiry = None;
    }

    /// Applies the Premium → Free transition once the expiry has passed.
    pub(crate) fn refresh(&mut self, now: DateTime<Utc>) -> Option<PremiumEvent> {
        if !self.is_expired_at(now) {
            return None;
        }
        let expired_at = self.premium_expiry?;
        self.deactivate();
        Some(PremiumEvent::Expired { expired_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn activation_sets_expiry_in_days() {
        let mut quota = QuotaState::default();
        quota.activate(30, at(0));
        assert!(quota.is_premium);
        assert_eq!(quota.premium_expiry, Some(at(30 * MILLIS_PER_DAY)));
    }

    #[test]
    fn refresh_expires_without_touching_counter() {
        let now = at(1_000_000);
        let mut quota = QuotaState {
            transaction_count: 42,
            free_limit: 10,
            is_premium: true,
            premium_expiry: Some(now - Duration::milliseconds(1)),
        };
        assert!(!quota.has_premium_at(now));
        assert_eq!(
            quota.refresh(now),
            Some(PremiumEvent::Expired {
                expired_at: now - Duration::milliseconds(1)
            })
        );
        assert!(!quota.is_premium);
        assert_eq!(quota.premium_expiry, None);
        assert_eq!(quota.transaction_count, 42);
        assert_eq!(quota.refresh(now), None);
    }

    #[test]
    fn expiry_equal_to_now_is_still_premium() {
        let now = at(5_000);
        let mut quota = QuotaState {
            is_premium: true,
            premium_expiry: Some(now),
            ..QuotaState::default()
        };
        assert!(quota.has_premium_at(now));
        assert_eq!(quota.refresh(now), None);
    }

    #[test]
    fn status_reports_expiring_soon() {
        let now = at(0);
        let mut quota = QuotaState::default();
        assert_eq!(quota.status(now), PremiumStatus::Free);

        quota.activate(2, now);
        assert_eq!(
            quota.status(now),
            PremiumStatus::ExpiringSoon {
                expires_at: at(2 * MILLIS_PER_DAY),
                days_left: 2
            }
        );

        quota.activate(30, now);
        assert!(matches!(quota.status(now), PremiumStatus::Active { .. }));

        assert!(matches!(
            quota.status(at(31 * MILLIS_PER_DAY)),
            PremiumStatus::Expired { .. }
        ));
    }

    #[test]
    fn remaining_saturates_and_is_unlimited_for_premium() {
        let now = at(0);
        let mut quota = QuotaState {
            transaction_count: 12,
            ..QuotaState::default()
        };
        assert_eq!(quota.remaining(), Some(0));
        assert!(quota.is_exhausted());
        quota.activate(1, now);
        assert_eq!(quota.remaining(), None);
        assert!(!quota.is_exhausted());
    }

    #[test]
    fn premium_flag_alone_lifts_the_quota() {
        let now = at(10 * MILLIS_PER_DAY);
        let quota = QuotaState {
            transaction_count: 50,
            free_limit: 10,
            is_premium: true,
            premium_expiry: Some(at(0)),
        };
        assert!(!quota.has_premium_at(now));
        assert!(!quota.is_exhausted());
        assert_eq!(quota.remaining(), None);
    }
}
