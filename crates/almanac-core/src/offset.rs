//! Unit arithmetic on target dates.

use chrono::{
  Datelike,
  NaiveDateTime
};
use serde_json::Value;

use crate::datetime::compose_date;
use crate::error::CalendarError;
use crate::view::{
  Direction,
  ViewUnit
};

/// Ordered `unit -> count` offsets, applied
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOffsets {
  entries: Vec<(ViewUnit, i64)>
}

impl ViewOffsets {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Single-unit offset.
  #[must_use]
  pub fn of(
    unit: ViewUnit,
    count: i64
  ) -> Self {
    Self::new().with(unit, count)
  }

  #[must_use]
  pub fn with(
    mut self,
    unit: ViewUnit,
    count: i64
  ) -> Self {
    self.entries.push((unit, count));
    self
  }

  #[must_use]
  pub fn days(self, count: i64) -> Self {
    self.with(ViewUnit::Days, count)
  }

  #[must_use]
  pub fn weeks(self, count: i64) -> Self {
    self.with(ViewUnit::Weeks, count)
  }

  #[must_use]
  pub fn months(self, count: i64) -> Self {
    self.with(ViewUnit::Months, count)
  }

  #[must_use]
  pub fn years(self, count: i64) -> Self {
    self.with(ViewUnit::Years, count)
  }

  #[must_use]
  pub fn decades(self, count: i64) -> Self {
    self.with(ViewUnit::Decades, count)
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = &(ViewUnit, i64)>
  {
    self.entries.iter()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Reads offsets from a loosely-typed JSON
  /// mapping such as `{"months": 1, "days":
  /// -2}`. Unknown keys are skipped.
  pub fn from_json(
    value: &Value
  ) -> Result<Self, CalendarError> {
    let Some(map) = value.as_object() else {
      return Err(CalendarError::InvalidInput(
        "Invalid view offset. Expected a \
         plain object."
          .to_string()
      ));
    };

    let mut offsets = Self::new();
    for (key, raw) in map {
      let Some(unit) = ViewUnit::lookup(key)
      else {
        tracing::trace!(
          key = %key,
          "ignoring unknown offset key"
        );
        continue;
      };
      let count = integral(raw).ok_or_else(|| {
        CalendarError::InvalidDirection(format!(
          "Invalid offset direction \
           \"{raw}\". Expected an integer \
           value."
        ))
      })?;
      offsets = offsets.with(unit, count);
    }
    Ok(offsets)
  }
}

// `2.0` counts as an integer, `2.5` does not.
#[allow(clippy::cast_possible_truncation)]
fn integral(raw: &Value) -> Option<i64> {
  raw.as_i64().or_else(|| {
    raw
      .as_f64()
      .filter(|f| f.is_finite() && f.fract() == 0.0)
      .map(|f| f as i64)
  })
}

/// Moves `date` by `count` units of `unit`.
///
/// Month and year steps keep the day and
/// time and roll over when the day does not
/// exist in the destination month.
pub fn apply_unit(
  date: &NaiveDateTime,
  unit: ViewUnit,
  count: i64
) -> Result<NaiveDateTime, CalendarError> {
  let year = i64::from(date.year());
  let month = i64::from(date.month0());
  let day = i64::from(date.day());

  let shifted = match unit {
    | ViewUnit::Decades => count
      .checked_mul(10)
      .and_then(|years| year.checked_add(years))
      .and_then(|y| {
        compose_date(y, month, day, date.time())
      }),
    | ViewUnit::Years => year
      .checked_add(count)
      .and_then(|y| {
        compose_date(y, month, day, date.time())
      }),
    | ViewUnit::Months => month
      .checked_add(count)
      .and_then(|m| {
        compose_date(year, m, day, date.time())
      }),
    | ViewUnit::Weeks => count
      .checked_mul(7)
      .and_then(|days| day.checked_add(days))
      .and_then(|d| {
        compose_date(year, month, d, date.time())
      }),
    | ViewUnit::Days => day
      .checked_add(count)
      .and_then(|d| {
        compose_date(year, month, d, date.time())
      })
  };

  shifted.ok_or_else(|| {
    CalendarError::InvalidDirection(format!(
      "Offset of {count} {unit} leaves the \
       supported date range."
    ))
  })
}

/// Applies every offset in order and returns
/// the cumulative result; `date` itself is
/// never touched.
pub fn add_offset(
  date: &NaiveDateTime,
  offsets: &ViewOffsets
) -> Result<NaiveDateTime, CalendarError> {
  offsets.iter().try_fold(
    *date,
    |acc, (unit, count)| {
      apply_unit(&acc, *unit, *count)
    }
  )
}

/// Date one `unit` away from `date` in the
/// given direction.
pub fn get_adjacent_date(
  date: &NaiveDateTime,
  unit: ViewUnit,
  direction: Direction
) -> Result<NaiveDateTime, CalendarError> {
  apply_unit(date, unit, direction.step())
}
