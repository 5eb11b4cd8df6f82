use std::collections::VecDeque;

use chrono::{
  NaiveDateTime,
  Offset,
  TimeZone,
  Timelike
};
use chrono_tz::Tz;
use tracing::{
  debug,
  trace
};

use crate::error::CalendarError;

/// Maximum number of resolved zones kept by
/// a [`TimeZoneAdjuster`].
pub const MAX_ZONE_CACHE_SIZE: usize = 50;

/// Re-expresses dates as wall-clock time in
/// an IANA zone.
///
/// Resolved zones are cached per instance;
/// once the cache is full the zone inserted
/// first is evicted.
#[derive(Debug, Clone, Default)]
pub struct TimeZoneAdjuster {
  zones: VecDeque<(String, Tz)>
}

impl TimeZoneAdjuster {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads the wall-clock components of
  /// `date` (a UTC-frame instant) as they
  /// appear in `time_zone` and returns them
  /// as a new date. Sub-second precision is
  /// dropped.
  pub fn adjust(
    &mut self,
    date: &NaiveDateTime,
    time_zone: &str
  ) -> Result<NaiveDateTime, CalendarError> {
    let tz = self.resolve(time_zone)?;
    let offset =
      tz.offset_from_utc_datetime(date).fix();
    date
      .checked_add_offset(offset)
      .and_then(|local| local.with_nanosecond(0))
      .ok_or_else(|| {
        CalendarError::InvalidDate(format!(
          "Could not adjust {date} to time \
           zone {time_zone}."
        ))
      })
  }

  /// Number of zones currently cached.
  #[must_use]
  pub fn len(&self) -> usize {
    self.zones.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.zones.is_empty()
  }

  #[must_use]
  pub fn is_cached(
    &self,
    time_zone: &str
  ) -> bool {
    self
      .zones
      .iter()
      .any(|(name, _)| name == time_zone)
  }

  fn resolve(
    &mut self,
    time_zone: &str
  ) -> Result<Tz, CalendarError> {
    if let Some((_, tz)) = self
      .zones
      .iter()
      .find(|(name, _)| name == time_zone)
    {
      trace!(
        time_zone,
        "time zone cache hit"
      );
      return Ok(*tz);
    }

    let tz = parse_timezone(time_zone)?;
    if self.zones.len() >= MAX_ZONE_CACHE_SIZE
      && let Some((evicted, _)) =
        self.zones.pop_front()
    {
      debug!(
        evicted = %evicted,
        "time zone cache full; evicted oldest"
      );
    }
    self
      .zones
      .push_back((time_zone.to_string(), tz));
    Ok(tz)
  }
}

fn parse_timezone(
  raw: &str
) -> Result<Tz, CalendarError> {
  raw.parse::<Tz>().map_err(|err| {
    tracing::warn!(
      timezone = %raw,
      error = %err,
      "failed to parse timezone id"
    );
    CalendarError::InvalidTimezone(format!(
      "Invalid time zone specified: {raw}"
    ))
  })
}
