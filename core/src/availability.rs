//! Booking-slot availability rules.
//!
//! A pure calculator: given a candidate date and an injected reference date
//! ("today"), it decides whether the date is bookable at all and which time
//! slots are open on it. No I/O, no hidden clock — identical inputs always
//! produce identical outputs, so every rule here is directly testable with a
//! fixed reference date.
//!
//! The business rules, reproduced exactly:
//!
//! 1. A date is unavailable if it is blacked out, strictly in the past, more
//!    than [`AvailabilityCalendar::BOOKING_WINDOW_DAYS`] days ahead, or a
//!    Sunday. Both bounds are inclusive: today and today + 60 are bookable.
//! 2. On an available Saturday only every other slot of the master catalog
//!    is offered (even catalog indices). Other weekdays get the full
//!    catalog. Sundays never get this far, but would be capped to the first
//!    four slots.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Error parsing a time slot label
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid time slot label `{label}`")]
pub struct ParseTimeSlotError {
    /// The rejected label
    pub label: String,
}

/// A fixed time-of-day label from the master catalog
///
/// Slots sit on half-hour boundaries and render as `"HH:MM"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Creates a slot at the given hour and minute
    ///
    /// Returns `None` unless the minute is on a half-hour boundary and the
    /// pair forms a valid time of day.
    #[must_use]
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if minute != 0 && minute != 30 {
            return None;
        }
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parses a `"HH:MM"` label
    ///
    /// # Errors
    ///
    /// Returns [`ParseTimeSlotError`] when the label is not a half-hour
    /// `"HH:MM"` time.
    pub fn parse(label: &str) -> Result<Self, ParseTimeSlotError> {
        let invalid = || ParseTimeSlotError {
            label: label.to_string(),
        };
        let Some((hour, minute)) = label.split_once(':') else {
            return Err(invalid());
        };
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }

    /// The underlying time of day
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ParseTimeSlotError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::parse(&label)
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// The ordered master list of every slot the business ever offers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCatalog(Vec<TimeSlot>);

impl SlotCatalog {
    /// Number of slots a Sunday would be capped to
    const SUNDAY_SLOTS: usize = 4;

    /// Creates a catalog from an ordered slot list
    #[must_use]
    pub const fn new(slots: Vec<TimeSlot>) -> Self {
        Self(slots)
    }

    /// The standard business catalog: 13 half-hour slots from 09:00 to
    /// 11:30 and 14:00 to 17:00, with the midday gap closed
    #[must_use]
    #[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
    pub fn business_default() -> Self {
        let mut slots = Vec::with_capacity(13);
        for half_hours in 0u32..6 {
            // 09:00 ..= 11:30
            slots.push(TimeSlot::new(9 + half_hours / 2, (half_hours % 2) * 30).unwrap());
        }
        for half_hours in 0u32..7 {
            // 14:00 ..= 17:00
            slots.push(TimeSlot::new(14 + half_hours / 2, (half_hours % 2) * 30).unwrap());
        }
        Self(slots)
    }

    /// All slots, in catalog order
    #[must_use]
    pub fn slots(&self) -> &[TimeSlot] {
        &self.0
    }

    /// Number of slots in the catalog
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the catalog contains `slot`
    #[must_use]
    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.0.contains(&slot)
    }

    /// The weekday-specific open subset, in catalog order
    fn weekday_slots(&self, weekday: Weekday) -> Vec<TimeSlot> {
        match weekday {
            // Unreachable through the availability check, kept for the
            // calendar widget rendering closed days.
            Weekday::Sun => self.0.iter().copied().take(Self::SUNDAY_SLOTS).collect(),
            Weekday::Sat => self.0.iter().copied().step_by(2).collect(),
            _ => self.0.clone(),
        }
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self::business_default()
    }
}

/// Availability calendar for the reservation flow
///
/// Combines the administrator-curated blackout list, the rolling booking
/// window, and the master slot catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCalendar {
    blackout: BTreeSet<NaiveDate>,
    catalog: SlotCatalog,
}

impl AvailabilityCalendar {
    /// How far ahead bookings are accepted, inclusive
    pub const BOOKING_WINDOW_DAYS: i64 = 60;

    /// Creates a calendar over the given catalog with no blackout dates
    #[must_use]
    pub const fn new(catalog: SlotCatalog) -> Self {
        Self {
            blackout: BTreeSet::new(),
            catalog,
        }
    }

    /// Adds blackout dates (builder style)
    #[must_use]
    pub fn with_blackout(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.blackout.extend(dates);
        self
    }

    /// Marks a single date as fully unavailable
    pub fn add_blackout(&mut self, date: NaiveDate) {
        self.blackout.insert(date);
    }

    /// The master slot catalog
    #[must_use]
    pub const fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Whether `date` accepts no bookings at all, relative to `today`
    ///
    /// True when the date is blacked out, strictly before `today`, more than
    /// [`Self::BOOKING_WINDOW_DAYS`] days after `today`, or a Sunday.
    #[must_use]
    pub fn is_unavailable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.blackout.contains(&date)
            || date < today
            || (date - today).num_days() > Self::BOOKING_WINDOW_DAYS
            || date.weekday() == Weekday::Sun
    }

    /// The open slots on `date`, in catalog order
    ///
    /// Empty when the date is unavailable. Saturdays offer every other
    /// catalog slot; the remaining weekdays offer the full catalog.
    #[must_use]
    pub fn open_slots(&self, date: NaiveDate, today: NaiveDate) -> Vec<TimeSlot> {
        if self.is_unavailable(date, today) {
            return Vec::new();
        }
        self.catalog.weekday_slots(date.weekday())
    }

    /// Whether `slot` is open on `date`
    #[must_use]
    pub fn is_slot_open(&self, date: NaiveDate, today: NaiveDate, slot: TimeSlot) -> bool {
        self.open_slots(date, today).contains(&slot)
    }

    /// Whether `date` is bookable and offers at least one slot
    ///
    /// With a non-empty catalog this is equivalent to
    /// `!is_unavailable(date, today)`; it exists for calendar widgets that
    /// want the combined check.
    #[must_use]
    pub fn has_open_slots(&self, date: NaiveDate, today: NaiveDate) -> bool {
        !self.open_slots(date, today).is_empty()
    }
}
