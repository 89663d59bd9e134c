//! Opening hours: conversion between the edit-form shape and the two storage shapes
//!
//! Restaurants store a day-keyed map of `"HH:MM - HH:MM"` strings (or `"Closed"`),
//! stores keep an array of `{day, closed, slots: [{open, close}]}` entries. Both
//! parsers are total: anything malformed reads back as "no hours set" for that day.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Literal written for closed days in the restaurant map
pub const CLOSED: &str = "Closed";

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// All days in storage order
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Lowercase storage key
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Parse a day key; case-insensitive, three-letter abbreviations accepted
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        if key.len() < 3 {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|day| day.key() == key || (key.len() == 3 && day.key().starts_with(&key)))
    }
}

/// Parse `H:MM` or `HH:MM` (00:00 to 23:59) into canonical `HH:MM`
#[must_use]
pub fn parse_time(input: &str) -> Option<String> {
    let (hours, minutes) = input.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u8 = hours.parse().ok()?;
    let minutes: u8 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then(|| format!("{hours:02}:{minutes:02}"))
}

/// One day as edited in the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time, `HH:MM` or empty
    #[serde(default)]
    pub open: String,
    /// Closing time, `HH:MM` or empty
    #[serde(default)]
    pub close: String,
    /// Closed all day
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    /// A day with no hours recorded
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// A day marked closed
    #[must_use]
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    /// A day open between two times; `None` if either time is invalid
    #[must_use]
    pub fn between(open: &str, close: &str) -> Option<Self> {
        Some(Self {
            open: parse_time(open)?,
            close: parse_time(close)?,
            closed: false,
        })
    }

    /// Both times present and the day not closed
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.closed && !self.open.is_empty() && !self.close.is_empty()
    }

    /// Canonicalize form input
    ///
    /// Closed days drop their times; a day with both times blank stays unset.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a time is present but malformed, or only
    /// one of the two times is given.
    pub fn normalized(&self, day: Weekday) -> crate::Result<Self> {
        if self.closed {
            return Ok(Self::closed());
        }
        let open = self.open.trim();
        let close = self.close.trim();
        match (open.is_empty(), close.is_empty()) {
            (true, true) => Ok(Self::unset()),
            (false, false) => Self::between(open, close).ok_or_else(|| {
                crate::Error::validation(day.key(), format!("invalid time range {open} - {close}"))
            }),
            _ => Err(crate::Error::validation(
                day.key(),
                "both opening and closing time are required",
            )),
        }
    }

    fn from_restaurant_entry(entry: &str) -> Self {
        let entry = entry.trim();
        if entry.eq_ignore_ascii_case(CLOSED) {
            return Self::closed();
        }
        entry
            .split_once(['-', '\u{2013}'])
            .and_then(|(open, close)| Self::between(open, close))
            .unwrap_or_default()
    }

    fn to_restaurant_entry(&self) -> Option<String> {
        if self.closed {
            Some(CLOSED.to_string())
        } else if self.is_set() {
            Some(format!("{} - {}", self.open, self.close))
        } else {
            None
        }
    }
}

/// One opening window in the store shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Opening time
    pub open: String,
    /// Closing time
    pub close: String,
}

/// One day in the store shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDay {
    /// Lowercase day key
    pub day: String,
    /// Closed all day
    #[serde(default)]
    pub closed: bool,
    /// Opening windows; only the first is edited
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

/// A full week of hours as edited in the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHours {
    /// Monday
    #[serde(default)]
    pub monday: DayHours,
    /// Tuesday
    #[serde(default)]
    pub tuesday: DayHours,
    /// Wednesday
    #[serde(default)]
    pub wednesday: DayHours,
    /// Thursday
    #[serde(default)]
    pub thursday: DayHours,
    /// Friday
    #[serde(default)]
    pub friday: DayHours,
    /// Saturday
    #[serde(default)]
    pub saturday: DayHours,
    /// Sunday
    #[serde(default)]
    pub sunday: DayHours,
}

impl WeeklyHours {
    /// Hours for one day
    #[must_use]
    pub const fn day(&self, day: Weekday) -> &DayHours {
        match day {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    /// Mutable hours for one day
    pub const fn day_mut(&mut self, day: Weekday) -> &mut DayHours {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Iterate days in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayHours)> {
        Weekday::ALL.into_iter().map(|day| (day, self.day(day)))
    }

    /// Set a day's opening window
    ///
    /// # Errors
    ///
    /// Returns a validation error if either time is malformed.
    pub fn set_day(&mut self, day: Weekday, open: &str, close: &str) -> crate::Result<()> {
        let hours = DayHours::between(open, close).ok_or_else(|| {
            crate::Error::validation(day.key(), format!("invalid time range {open} - {close}"))
        })?;
        *self.day_mut(day) = hours;
        Ok(())
    }

    /// Mark a day closed
    pub fn close_day(&mut self, day: Weekday) {
        *self.day_mut(day) = DayHours::closed();
    }

    /// Forget a day's hours
    pub fn clear_day(&mut self, day: Weekday) {
        *self.day_mut(day) = DayHours::unset();
    }

    /// Apply one day's hours to the whole week
    pub fn copy_to_all(&mut self, source: Weekday) {
        let hours = self.day(source).clone();
        for day in Weekday::ALL {
            *self.day_mut(day) = hours.clone();
        }
    }

    /// Canonicalize every day of form input
    ///
    /// # Errors
    ///
    /// Returns the first day's validation error.
    pub fn normalized(&self) -> crate::Result<Self> {
        let mut out = Self::default();
        for (day, hours) in self.iter() {
            *out.day_mut(day) = hours.normalized(day)?;
        }
        Ok(out)
    }

    /// Read the restaurant storage shape
    #[must_use]
    pub fn from_restaurant_value(value: &Value) -> Self {
        let mut hours = Self::default();
        if let Value::Object(map) = value {
            for (key, entry) in map {
                if let (Some(day), Value::String(entry)) = (Weekday::from_key(key), entry) {
                    *hours.day_mut(day) = DayHours::from_restaurant_entry(entry);
                }
            }
        }
        hours
    }

    /// Write the restaurant storage shape; days without hours are omitted
    #[must_use]
    pub fn to_restaurant_map(&self) -> IndexMap<String, String> {
        self.iter()
            .filter_map(|(day, hours)| {
                hours
                    .to_restaurant_entry()
                    .map(|entry| (day.key().to_string(), entry))
            })
            .collect()
    }

    /// Read the store storage shape
    #[must_use]
    pub fn from_store_value(value: &Value) -> Self {
        let mut hours = Self::default();
        let Value::Array(entries) = value else {
            return hours;
        };

        for entry in entries {
            let Some(day) = entry
                .get("day")
                .and_then(Value::as_str)
                .and_then(Weekday::from_key)
            else {
                continue;
            };

            let closed = entry.get("closed").and_then(Value::as_bool).unwrap_or(false);
            *hours.day_mut(day) = if closed {
                DayHours::closed()
            } else {
                entry
                    .get("slots")
                    .and_then(Value::as_array)
                    .and_then(|slots| slots.first())
                    .and_then(|slot| {
                        let open = slot.get("open").and_then(Value::as_str)?;
                        let close = slot.get("close").and_then(Value::as_str)?;
                        DayHours::between(open, close)
                    })
                    .unwrap_or_default()
            };
        }
        hours
    }

    /// Write the store storage shape, always seven entries
    #[must_use]
    pub fn to_store_days(&self) -> Vec<StoreDay> {
        self.iter()
            .map(|(day, hours)| StoreDay {
                day: day.key().to_string(),
                closed: hours.closed,
                slots: if hours.is_set() {
                    vec![TimeSlot {
                        open: hours.open.clone(),
                        close: hours.close.clone(),
                    }]
                } else {
                    Vec::new()
                },
            })
            .collect()
    }
}
