use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeDelta,
  Utc
};
use serde::Deserialize;

use crate::error::CalendarError;

/// Earliest instant accepted when no lower
/// bound is configured.
pub const DEFAULT_MIN_BOUND: &str =
  "1900-01-01T00:01:01.001Z";

/// Latest instant accepted when no upper
/// bound is configured.
pub const DEFAULT_MAX_BOUND: &str =
  "2999-12-31T23:59:59.999Z";

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M"
];

/// Anything the calendar accepts where a
/// date is expected.
///
/// Strings are ISO-8601 / RFC 3339; numbers
/// are epoch milliseconds. Everything is
/// read in the UTC host frame: an explicit
/// offset is converted to UTC wall-clock,
/// a missing offset is taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
  Text(String),
  Millis(i64),
  Date(NaiveDateTime)
}

impl From<&str> for DateInput {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<String> for DateInput {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

impl From<i64> for DateInput {
  fn from(value: i64) -> Self {
    Self::Millis(value)
  }
}

impl From<NaiveDateTime> for DateInput {
  fn from(value: NaiveDateTime) -> Self {
    Self::Date(value)
  }
}

impl From<NaiveDate> for DateInput {
  fn from(value: NaiveDate) -> Self {
    Self::Date(
      value.and_time(NaiveTime::MIN)
    )
  }
}

impl From<DateTime<Utc>> for DateInput {
  fn from(value: DateTime<Utc>) -> Self {
    Self::Date(value.naive_utc())
  }
}

/// Inclusive `[min, max]` range of valid
/// target dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
  pub min: NaiveDateTime,
  pub max: NaiveDateTime
}

/// Unresolved bounds as supplied by a
/// caller; each side is optional.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Deserialize,
)]
pub struct RawBounds {
  pub min: Option<DateInput>,
  pub max: Option<DateInput>
}

impl RawBounds {
  #[must_use]
  pub fn new(
    min: Option<DateInput>,
    max: Option<DateInput>
  ) -> Self {
    Self {
      min,
      max
    }
  }
}

impl DateBounds {
  /// Normalizes raw bounds, filling the
  /// missing sides with the default wide
  /// range.
  #[tracing::instrument(skip(raw))]
  pub fn resolve(
    raw: &RawBounds
  ) -> Result<Self, CalendarError> {
    let min = match &raw.min {
      | Some(input) => to_date(input)?,
      | None => {
        to_date(&DEFAULT_MIN_BOUND.into())?
      }
    };
    let max = match &raw.max {
      | Some(input) => to_date(input)?,
      | None => {
        to_date(&DEFAULT_MAX_BOUND.into())?
      }
    };

    if min > max {
      return Err(
        CalendarError::InvalidDate(format!(
          "Lower bound {min} is after \
           upper bound {max}."
        ))
      );
    }

    Ok(Self {
      min,
      max
    })
  }

  #[must_use]
  pub fn contains(
    &self,
    date: &NaiveDateTime
  ) -> bool {
    is_within_bounds(date, self)
  }
}

impl Default for DateBounds {
  fn default() -> Self {
    Self::resolve(&RawBounds::default())
      .unwrap_or(Self {
        min: NaiveDateTime::MIN,
        max: NaiveDateTime::MAX
      })
  }
}

/// Converts a caller-supplied value into a
/// wall-clock date.
pub fn to_date(
  value: &DateInput
) -> Result<NaiveDateTime, CalendarError> {
  match value {
    | DateInput::Date(date) => Ok(*date),
    | DateInput::Millis(ms) => {
      DateTime::from_timestamp_millis(*ms)
        .map(|dt| dt.naive_utc())
        .ok_or_else(unconvertible)
    }
    | DateInput::Text(raw) => {
      parse_date_text(raw)
        .ok_or_else(unconvertible)
    }
  }
}

fn unconvertible() -> CalendarError {
  CalendarError::InvalidDate(
    "Could not convert to Date object."
      .to_string()
  )
}

fn parse_date_text(
  raw: &str
) -> Option<NaiveDateTime> {
  let token = raw.trim();
  if token.is_empty() {
    return None;
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(token)
  {
    return Some(
      dt.with_timezone(&Utc).naive_utc()
    );
  }

  if let Ok(date) =
    NaiveDate::parse_from_str(
      token, "%Y-%m-%d"
    )
  {
    return Some(
      date.and_time(NaiveTime::MIN)
    );
  }

  NAIVE_DATETIME_FORMATS.iter().find_map(
    |fmt| {
      NaiveDateTime::parse_from_str(
        token, fmt
      )
      .ok()
    }
  )
}

/// Builds a wall-clock date from possibly
/// out-of-range components, rolling excess
/// months into years and excess days into
/// following months.
///
/// Returns `None` when the result leaves
/// the representable range.
#[must_use]
pub fn compose_date(
  year: i64,
  month_index: i64,
  day: i64,
  time: NaiveTime
) -> Option<NaiveDateTime> {
  let total_months = year
    .checked_mul(12)?
    .checked_add(month_index)?;
  let year =
    i32::try_from(total_months.div_euclid(12))
      .ok()?;
  let month =
    u32::try_from(total_months.rem_euclid(12))
      .ok()?
      + 1;
  let first =
    NaiveDate::from_ymd_opt(year, month, 1)?;
  let shift =
    TimeDelta::try_days(day.checked_sub(1)?)?;
  let date = first.checked_add_signed(shift)?;
  Some(date.and_time(time))
}

/// Returns `date` moved to `month_index` of
/// `year` with the day clamped to the
/// month's length, so the result always
/// lands inside the requested month.
#[must_use]
pub fn with_year_month_clamped(
  date: &NaiveDateTime,
  year: i32,
  month_index: u32
) -> Option<NaiveDateTime> {
  let month = month_index + 1;
  let last_day = days_in_month(year, month)?;
  let day = date.day().min(last_day);
  NaiveDate::from_ymd_opt(year, month, day)
    .map(|d| d.and_time(date.time()))
}

fn days_in_month(
  year: i32,
  month: u32
) -> Option<u32> {
  let first =
    NaiveDate::from_ymd_opt(year, month, 1)?;
  let next = if month == 12 {
    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
  } else {
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
  };
  u32::try_from(
    next.signed_duration_since(first).num_days()
  )
  .ok()
}

/// Inclusive range check.
#[must_use]
pub fn is_within_bounds(
  date: &NaiveDateTime,
  bounds: &DateBounds
) -> bool {
  *date >= bounds.min && *date <= bounds.max
}

/// Epoch milliseconds of a wall-clock date
/// read in the UTC host frame.
#[must_use]
pub fn timestamp_millis(
  date: &NaiveDateTime
) -> i64 {
  date.and_utc().timestamp_millis()
}

/// Weekday index with Sunday as `0`.
#[must_use]
pub fn weekday_index(
  date: &NaiveDateTime
) -> u32 {
  date.weekday().num_days_from_sunday()
}

/// Zero-based month index.
#[must_use]
pub fn month_index(
  date: &NaiveDateTime
) -> u32 {
  date.month0()
}

/// `YYYY-MM-DD` key of the wall-clock day.
#[must_use]
pub fn day_key(date: &NaiveDateTime) -> String {
  date.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn is_same_day(
  a: &NaiveDateTime,
  b: &NaiveDateTime
) -> bool {
  a.date() == b.date()
}

/// Same year, same month and same
/// Sunday-anchored week-of-month index.
///
/// Weeks that straddle a month boundary are
/// split between the two months.
#[must_use]
pub fn is_same_week(
  a: &NaiveDateTime,
  b: &NaiveDateTime
) -> bool {
  let anchor = |d: &NaiveDateTime| {
    i64::from(d.day())
      - i64::from(weekday_index(d))
  };
  is_same_month(a, b) && anchor(a) == anchor(b)
}

#[must_use]
pub fn is_same_month(
  a: &NaiveDateTime,
  b: &NaiveDateTime
) -> bool {
  a.year() == b.year() && a.month() == b.month()
}

#[must_use]
pub fn is_same_year(
  a: &NaiveDateTime,
  b: &NaiveDateTime
) -> bool {
  a.year() == b.year()
}

#[must_use]
pub fn is_same_decade(
  a: &NaiveDateTime,
  b: &NaiveDateTime
) -> bool {
  decade_of(a.year()) == decade_of(b.year())
}

/// First year of the decade containing
/// `year` (`2025` -> `2020`).
#[must_use]
pub fn decade_start(year: i32) -> i32 {
  decade_of(year) * 10
}

fn decade_of(year: i32) -> i32 {
  year.div_euclid(10)
}
