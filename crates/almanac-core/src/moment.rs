use chrono::{
  DateTime,
  NaiveDateTime,
  Utc
};
use tracing::{
  debug,
  warn
};

use crate::datetime::{
  DateBounds,
  DateInput,
  RawBounds,
  is_within_bounds,
  to_date
};
use crate::error::CalendarError;
use crate::offset::{
  ViewOffsets,
  add_offset,
  get_adjacent_date
};
use crate::timezone::TimeZoneAdjuster;
use crate::view::{
  Direction,
  ViewUnit
};

#[derive(Debug, Clone, Default)]
pub struct MomentConfig {
  /// Initial target; defaults to `now`.
  pub target_date: Option<DateInput>,
  pub bounds:      RawBounds
}

/// Owner of the live target date and the
/// bounds it must stay within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
  date:   NaiveDateTime,
  bounds: DateBounds
}

impl Moment {
  #[tracing::instrument(skip(config, now))]
  pub fn new(
    config: MomentConfig,
    now: DateTime<Utc>
  ) -> Result<Self, CalendarError> {
    let date = match &config.target_date {
      | Some(input) => to_date(input),
      | None => Ok(now.naive_utc())
    }
    .map_err(invalid_date)?;
    let bounds = DateBounds::resolve(
      &config.bounds
    )
    .map_err(invalid_date)?;

    if !is_within_bounds(&date, &bounds) {
      return Err(CalendarError::OutOfBounds(
        "Target date is outside the \
         specified bounds."
          .to_string()
      ));
    }

    debug!(%date, min = %bounds.min, max = %bounds.max, "created moment");
    Ok(Self {
      date,
      bounds
    })
  }

  #[must_use]
  pub fn date(&self) -> NaiveDateTime {
    self.date
  }

  #[must_use]
  pub fn bounds(&self) -> &DateBounds {
    &self.bounds
  }

  /// Replaces the target with the offset
  /// date when it stays within bounds;
  /// otherwise the target is left as is.
  #[tracing::instrument(skip(self))]
  pub fn add(
    &mut self,
    offsets: &ViewOffsets
  ) -> &mut Self {
    match add_offset(&self.date, offsets) {
      | Ok(candidate)
        if is_within_bounds(
          &candidate,
          &self.bounds
        ) =>
      {
        debug!(from = %self.date, to = %candidate, "moved target date");
        self.date = candidate;
      }
      | Ok(candidate) => {
        warn!(
          candidate = %candidate,
          "attempted to shift to out-of-bounds date"
        );
      }
      | Err(err) => {
        warn!(
          error = %err,
          "attempted to shift past the representable range"
        );
      }
    }
    self
  }

  /// Moves the target to the calendar day of
  /// `input`, keeping the current time of
  /// day. Out-of-bounds days are ignored.
  #[tracing::instrument(skip(self))]
  pub fn from_date(
    &mut self,
    input: &DateInput
  ) -> Result<&mut Self, CalendarError> {
    let candidate =
      to_date(input).map_err(invalid_date)?;

    if is_within_bounds(
      &candidate,
      &self.bounds
    ) {
      self.date = candidate
        .date()
        .and_time(self.date.time());
      debug!(date = %self.date, "synced target date");
    } else {
      warn!(
        candidate = %candidate.date(),
        "the new target date is out of bounds"
      );
    }
    Ok(self)
  }

  /// Re-expresses bounds and target as
  /// wall-clock time in `time_zone`.
  #[tracing::instrument(skip(self, adjuster))]
  pub fn to_zoned_date_time(
    &mut self,
    time_zone: &str,
    adjuster: &mut TimeZoneAdjuster
  ) -> Result<&mut Self, CalendarError> {
    let zoned = |adjuster: &mut TimeZoneAdjuster,
                 date: &NaiveDateTime| {
      adjuster.adjust(date, time_zone).map_err(
        |err| {
          CalendarError::InvalidTimezone(
            format!(
              "Invalid time zone provided: \
               {}",
              message_of(&err)
            )
          )
        }
      )
    };

    let bounds = DateBounds {
      max: zoned(adjuster, &self.bounds.max)?,
      min: zoned(adjuster, &self.bounds.min)?
    };
    let date = zoned(adjuster, &self.date)?;

    self.bounds = bounds;
    self.date = date;
    debug!(time_zone, date = %self.date, "re-based moment to time zone");
    Ok(self)
  }

  /// Whether one step of `unit` in
  /// `direction` stays within bounds.
  #[must_use]
  pub fn is_adjacent_date_visible(
    &self,
    unit: ViewUnit,
    direction: Direction
  ) -> bool {
    get_adjacent_date(
      &self.date, unit, direction
    )
    .is_ok_and(|date| {
      is_within_bounds(&date, &self.bounds)
    })
  }
}

fn invalid_date(
  err: CalendarError
) -> CalendarError {
  CalendarError::InvalidDate(format!(
    "Invalid date provided: {}",
    message_of(&err)
  ))
}

/// Message of an error without its code
/// prefix.
pub(crate) fn message_of(
  err: &CalendarError
) -> String {
  let rendered = err.to_string();
  let prefix = format!("[{}] ", err.code());
  rendered
    .strip_prefix(&prefix)
    .map(str::to_string)
    .unwrap_or(rendered)
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    TimeZone
  };

  use super::*;

  fn now() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(2025, 3, 24, 12, 0, 0)
      .single()
      .expect("valid now")
  }

  fn bounded(
    target: &str,
    min: &str,
    max: &str
  ) -> Moment {
    Moment::new(
      MomentConfig {
        target_date: Some(target.into()),
        bounds:      RawBounds::new(
          Some(min.into()),
          Some(max.into())
        )
      },
      now()
    )
    .expect("moment")
  }

  #[test]
  fn defaults_to_now() {
    let moment =
      Moment::new(MomentConfig::default(), now())
        .expect("moment");
    assert_eq!(moment.date(), now().naive_utc());
  }

  #[test]
  fn rejects_invalid_target() {
    let err = Moment::new(
      MomentConfig {
        target_date: Some("invalid-date".into()),
        ..MomentConfig::default()
      },
      now()
    )
    .expect_err("invalid");
    assert_eq!(
      err.to_string(),
      "[INVALID_DATE] Invalid date provided: \
       Could not convert to Date object."
    );
  }

  #[test]
  fn rejects_target_outside_bounds() {
    let err = Moment::new(
      MomentConfig {
        target_date: Some("2030-01-01".into()),
        bounds:      RawBounds::new(
          None,
          Some("2025-12-31".into())
        )
      },
      now()
    )
    .expect_err("out of bounds");
    assert_eq!(err.code(), "OUT_OF_BOUNDS");
  }

  #[test]
  fn add_past_max_is_a_no_op() {
    let mut moment = bounded(
      "2025-12-31T00:00:00",
      "2025-01-01",
      "2025-12-31T23:59:59"
    );
    let before = moment.date();
    moment.add(&ViewOffsets::new().days(1));
    assert_eq!(moment.date(), before);
  }

  #[test]
  fn from_date_keeps_time_of_day() {
    let mut moment = bounded(
      "2025-03-24T08:45:30",
      "2025-01-01",
      "2025-12-31"
    );
    moment
      .from_date(&"2025-06-10T23:00:00".into())
      .expect("sync");
    assert_eq!(
      moment.date(),
      NaiveDate::from_ymd_opt(2025, 6, 10)
        .expect("valid")
        .and_hms_opt(8, 45, 30)
        .expect("valid")
    );

    moment
      .from_date(&"2026-06-10".into())
      .expect("ignored");
    assert_eq!(
      moment.date().date(),
      NaiveDate::from_ymd_opt(2025, 6, 10)
        .expect("valid")
    );
  }

  #[test]
  fn adjacent_visibility_respects_bounds() {
    let moment = bounded(
      "2025-12-15",
      "2025-01-01",
      "2025-12-31"
    );
    assert!(moment.is_adjacent_date_visible(
      ViewUnit::Days,
      Direction::Next
    ));
    assert!(!moment.is_adjacent_date_visible(
      ViewUnit::Months,
      Direction::Next
    ));
    assert!(moment.is_adjacent_date_visible(
      ViewUnit::Months,
      Direction::Prev
    ));
  }

  #[test]
  fn zoned_moment_rebases_everything() {
    let mut adjuster = TimeZoneAdjuster::new();
    let mut moment = bounded(
      "2025-03-24T12:00:00Z",
      "2025-01-01T00:00:00Z",
      "2025-12-31T00:00:00Z"
    );
    moment
      .to_zoned_date_time(
        "America/New_York",
        &mut adjuster
      )
      .expect("zone");
    assert_eq!(
      moment.date().to_string(),
      "2025-03-24 08:00:00"
    );
    assert_eq!(
      moment.bounds().min.to_string(),
      "2024-12-31 19:00:00"
    );

    let err = moment
      .to_zoned_date_time("Mars/Olympus", &mut adjuster)
      .expect_err("bad zone");
    assert_eq!(err.code(), "INVALID_TIMEZONE");
  }
}
