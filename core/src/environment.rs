//! Injected dependency traits shared by every environment.

use chrono::{DateTime, NaiveDate, Utc};

/// Clock trait - abstracts time operations for testability
///
/// The availability rules depend on "today"; injecting the clock keeps them
/// pure and lets tests pin the reference date.
///
/// # Examples
///
/// ```
/// use studio_booking_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let today = clock.today();
/// assert_eq!(today, clock.now().date_naive());
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// The current date on the business calendar
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Production clock backed by the system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
