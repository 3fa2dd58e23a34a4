use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Day of week, indexed 0 = Monday through 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    pub const MONDAY: Weekday = Weekday(0);
    pub const SUNDAY: Weekday = Weekday(6);

    pub fn new(index: u8) -> Option<Self> {
        (index < 7).then_some(Self(index))
    }

    /// Converts from the Sunday-first convention (0 = Sunday) used by some clients.
    pub fn from_sunday_first(index: u8) -> Option<Self> {
        (index < 7).then(|| Self((index + 6) % 7))
    }

    pub fn to_sunday_first(self) -> u8 {
        (self.0 + 1) % 7
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][self.0 as usize]
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self(day.num_days_from_monday() as u8)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Weekday::new(value).ok_or_else(|| format!("weekday index {value} is outside 0-6"))
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    #[default]
    Daily,
    Weekly,
    Custom,
}

/// When an alarm repeats.
///
/// `days` and `custom_dates` are both kept even when the other kind is selected,
/// so flipping the kind back and forth in a form does not lose selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<BTreeSet<Weekday>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_dates"
    )]
    pub custom_dates: Option<BTreeSet<NaiveDate>>,
}

impl RecurrencePattern {
    pub fn daily() -> Self {
        Self::default()
    }

    pub fn weekly(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            kind: RecurrenceKind::Weekly,
            days: Some(days.into_iter().collect()),
            custom_dates: None,
        }
    }

    pub fn custom(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            kind: RecurrenceKind::Custom,
            days: None,
            custom_dates: Some(dates.into_iter().collect()),
        }
    }

    pub fn toggle_day(&mut self, day: Weekday, selected: bool) {
        let days = self.days.get_or_insert_with(BTreeSet::new);
        if selected {
            days.insert(day);
        } else {
            days.remove(&day);
        }
    }

    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekly => self
                .days
                .as_ref()
                .is_some_and(|days| days.contains(&Weekday::from(date.weekday()))),
            RecurrenceKind::Custom => self
                .custom_dates
                .as_ref()
                .is_some_and(|dates| dates.contains(&date)),
        }
    }

    /// First date on or after `from` matching the pattern, if any.
    pub fn next_date_on_or_after(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self.kind {
            RecurrenceKind::Daily => Some(from),
            RecurrenceKind::Weekly => from
                .iter_days()
                .take(7)
                .find(|date| self.occurs_on(*date)),
            RecurrenceKind::Custom => self
                .custom_dates
                .as_ref()
                .and_then(|dates| dates.range(from..).next().copied()),
        }
    }

    pub fn summary(&self) -> String {
        match self.kind {
            RecurrenceKind::Daily => "Daily".to_string(),
            RecurrenceKind::Weekly => {
                let days = self.days.iter().flatten().map(|day| day.label()).collect::<Vec<_>>();
                if days.is_empty() {
                    "Weekly".to_string()
                } else {
                    days.join(", ")
                }
            }
            RecurrenceKind::Custom => {
                let count = self.custom_dates.as_ref().map_or(0, BTreeSet::len);
                format!("{count} custom date{}", if count == 1 { "" } else { "s" })
            }
        }
    }
}

fn deserialize_dates<'de, D>(deserializer: D) -> Result<Option<BTreeSet<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    raw.map(|values| {
        values
            .iter()
            .map(|value| parse_date(value).map_err(serde::de::Error::custom))
            .collect::<Result<BTreeSet<_>, _>>()
    })
    .transpose()
}

/// Accepts `YYYY-MM-DD` or a full ISO-8601 timestamp, keeping the date part.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{value}': {err}"))
}
