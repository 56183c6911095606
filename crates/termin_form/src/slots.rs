// --- File: crates/termin_form/src/slots.rs ---
//! Weekday-indexed table of bookable time slots.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use std::str::FromStr;
use termin_common::TerminError;
use termin_config::SlotsConfig;
use thiserror::Error;
use tracing::warn;

/// Time zone the widget's calendar runs in unless configured otherwise.
pub const DEFAULT_TIME_ZONE: Tz = Tz::Europe__Berlin;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlotError {
    #[error("invalid slot label {label:?} for {weekday}, expected HH:MM")]
    InvalidLabel { weekday: Weekday, label: String },
}

impl From<SlotError> for TerminError {
    fn from(err: SlotError) -> Self {
        TerminError::ConfigError(format!("form.slots: {}", err))
    }
}

/// Slot labels per weekday, Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    by_day: [Vec<String>; 7],
}

impl Default for SlotTable {
    fn default() -> Self {
        let day = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            by_day: [
                day(&["09:30", "11:30", "13:30"]),                   // Monday
                day(&["10:00", "14:00", "17:00"]),                   // Tuesday
                day(&["12:00", "12:30", "13:00"]),                   // Wednesday
                day(&["09:00", "09:30", "16:00", "16:30", "18:00"]), // Thursday
                day(&["10:00", "11:30", "13:30", "15:00"]),          // Friday
                Vec::new(),                                          // Saturday
                Vec::new(),                                          // Sunday
            ],
        }
    }
}

impl SlotTable {
    /// Default table with per-weekday overrides from the `form.slots` config section.
    pub fn from_config(config: Option<&SlotsConfig>) -> Result<Self, SlotError> {
        let mut table = Self::default();
        let Some(config) = config else {
            return Ok(table);
        };

        let overrides = [
            (Weekday::Mon, &config.mon),
            (Weekday::Tue, &config.tue),
            (Weekday::Wed, &config.wed),
            (Weekday::Thu, &config.thu),
            (Weekday::Fri, &config.fri),
            (Weekday::Sat, &config.sat),
            (Weekday::Sun, &config.sun),
        ];
        for (weekday, labels) in overrides {
            if let Some(labels) = labels {
                table.set(weekday, labels.clone())?;
            }
        }
        Ok(table)
    }

    /// Replaces the slots for one weekday. Every label must be `HH:MM`.
    pub fn set(&mut self, weekday: Weekday, labels: Vec<String>) -> Result<(), SlotError> {
        for label in &labels {
            if NaiveTime::parse_from_str(label, "%H:%M").is_err() {
                return Err(SlotError::InvalidLabel {
                    weekday,
                    label: label.clone(),
                });
            }
        }
        self.by_day[weekday.num_days_from_monday() as usize] = labels;
        Ok(())
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &[String] {
        &self.by_day[weekday.num_days_from_monday() as usize]
    }

    /// Slots offered on `date`, i.e. exactly those of its weekday.
    pub fn slots_for(&self, date: NaiveDate) -> &[String] {
        self.for_weekday(date.weekday())
    }

    pub fn offers(&self, date: NaiveDate, slot: &str) -> bool {
        self.slots_for(date).iter().any(|s| s == slot)
    }
}

/// The calendar refuses days before today.
pub fn is_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today
}

/// Calendar date of `now` in `tz`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Parses an IANA zone name, falling back to [`DEFAULT_TIME_ZONE`].
pub fn parse_time_zone(name: Option<&str>) -> Tz {
    match name {
        Some(name) => Tz::from_str(name).unwrap_or_else(|_| {
            warn!("Unknown time zone {:?}, using {}", name, DEFAULT_TIME_ZONE);
            DEFAULT_TIME_ZONE
        }),
        None => DEFAULT_TIME_ZONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn only_weekday_slots_are_offered() {
        let table = SlotTable::default();
        // 2026-10-19 is a Monday, 2026-10-22 a Thursday
        let monday = date(2026, 10, 19);
        let thursday = date(2026, 10, 22);

        assert_eq!(table.slots_for(monday), ["09:30", "11:30", "13:30"]);
        assert!(table.offers(monday, "11:30"));
        assert!(!table.offers(monday, "16:00"));
        assert!(table.offers(thursday, "16:00"));
        assert!(!table.offers(thursday, "11:30"));
    }

    #[test]
    fn weekends_have_no_slots() {
        let table = SlotTable::default();
        assert!(table.slots_for(date(2026, 10, 24)).is_empty());
        assert!(table.slots_for(date(2026, 10, 25)).is_empty());
    }

    #[test]
    fn config_overrides_single_days() {
        let config = SlotsConfig {
            sat: Some(vec!["10:00".into(), "10:30".into()]),
            ..SlotsConfig::default()
        };
        let table = SlotTable::from_config(Some(&config)).unwrap();
        assert_eq!(table.for_weekday(Weekday::Sat), ["10:00", "10:30"]);
        assert_eq!(table.for_weekday(Weekday::Mon), ["09:30", "11:30", "13:30"]);
    }

    #[test]
    fn config_rejects_malformed_labels() {
        let config = SlotsConfig {
            tue: Some(vec!["9 Uhr".into()]),
            ..SlotsConfig::default()
        };
        assert_eq!(
            SlotTable::from_config(Some(&config)),
            Err(SlotError::InvalidLabel {
                weekday: Weekday::Tue,
                label: "9 Uhr".into()
            })
        );
    }

    #[test]
    fn bad_label_becomes_a_config_error() {
        let err: TerminError = SlotError::InvalidLabel {
            weekday: Weekday::Fri,
            label: "25:00".into(),
        }
        .into();
        assert!(matches!(err, TerminError::ConfigError(ref m) if m.contains("25:00")));
    }

    #[test]
    fn past_days_are_not_selectable() {
        let today = date(2026, 10, 19);
        assert!(!is_selectable(date(2026, 10, 18), today));
        assert!(is_selectable(today, today));
        assert!(is_selectable(date(2026, 11, 2), today));
    }

    #[test]
    fn today_follows_the_configured_zone() {
        // 23:30 UTC is already the next day in Berlin
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        assert_eq!(today_in(DEFAULT_TIME_ZONE, now), date(2026, 10, 20));
        assert_eq!(today_in(Tz::UTC, now), date(2026, 10, 19));
    }

    #[test]
    fn unknown_zone_falls_back() {
        assert_eq!(parse_time_zone(Some("Mars/Olympus")), DEFAULT_TIME_ZONE);
        assert_eq!(parse_time_zone(Some("Europe/Zurich")), Tz::Europe__Zurich);
    }
}
