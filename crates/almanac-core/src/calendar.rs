//! Facade tying the target date, the active
//! view and the grid composer together.

use std::sync::Arc;

use chrono::{
  DateTime,
  NaiveDateTime,
  Utc
};
use serde::Serialize;
use tracing::{
  debug,
  info
};

use crate::builders::ViewData;
use crate::composer::{
  Composer,
  ComposerConfig
};
use crate::datetime::{
  DateInput,
  RawBounds
};
use crate::error::CalendarError;
use crate::layout::{
  Layout,
  LayoutConfig
};
use crate::middleware::Middleware;
use crate::moment::{
  Moment,
  MomentConfig
};
use crate::offset::ViewOffsets;
use crate::timezone::TimeZoneAdjuster;
use crate::view::{
  Direction,
  NavigationMode,
  ViewType
};

#[derive(Debug, Clone, Default)]
pub struct CalendarConfig {
  /// Initial target; defaults to now.
  pub date:        Option<DateInput>,
  pub bounds:      RawBounds,
  /// Initial view; defaults to the first
  /// visible one.
  pub view:        Option<ViewType>,
  pub time_zone:   Option<String>,
  pub skip_views:  Vec<ViewType>,
  pub middlewares: Vec<Middleware>
}

/// A single calendar session.
///
/// Not meant to be shared between threads
/// without external locking; every method
/// runs to completion synchronously.
#[derive(Debug, Clone)]
pub struct Calendar {
  moment:   Moment,
  layout:   Layout,
  composer: Composer,
  adjuster: TimeZoneAdjuster
}

impl Calendar {
  pub fn new(
    config: CalendarConfig
  ) -> Result<Self, CalendarError> {
    Self::with_now(config, Utc::now())
  }

  /// Like [`Calendar::new`] with an explicit
  /// "now".
  #[tracing::instrument(skip(config))]
  pub fn with_now(
    config: CalendarConfig,
    now: DateTime<Utc>
  ) -> Result<Self, CalendarError> {
    let mut adjuster = TimeZoneAdjuster::new();

    let mut moment = Moment::new(
      MomentConfig {
        target_date: config.date,
        bounds:      config.bounds.clone()
      },
      now
    )?;
    let layout = Layout::new(LayoutConfig {
      view_target: config.view,
      skip_views:  config.skip_views
    })?;
    let composer = Composer::new(
      ComposerConfig {
        time_zone:   config.time_zone.clone(),
        bounds:      config.bounds,
        middlewares: config.middlewares
      },
      now,
      &mut adjuster
    )?;

    if let Some(zone) = config.time_zone.as_deref() {
      moment.to_zoned_date_time(zone, &mut adjuster)?;
    }

    info!(
      view = %layout.view(),
      target = %moment.date(),
      "calendar ready"
    );
    Ok(Self {
      moment,
      layout,
      composer,
      adjuster
    })
  }

  #[must_use]
  pub fn view(&self) -> ViewType {
    self.layout.view()
  }

  #[must_use]
  pub fn visible_views(&self) -> &[ViewType] {
    self.layout.visible_views()
  }

  #[must_use]
  pub fn target(&self) -> NaiveDateTime {
    self.moment.date()
  }

  #[must_use]
  pub fn today(&self) -> NaiveDateTime {
    self.composer.today()
  }

  /// Grid for the current view and target.
  pub fn data(
    &mut self
  ) -> Result<Arc<ViewData>, CalendarError> {
    self
      .composer
      .data(self.layout.view(), self.moment.date())
  }

  #[must_use]
  pub fn has_next_date(&self) -> bool {
    self.moment.is_adjacent_date_visible(
      self.layout.view().unit(),
      Direction::Next
    )
  }

  #[must_use]
  pub fn has_prev_date(&self) -> bool {
    self.moment.is_adjacent_date_visible(
      self.layout.view().unit(),
      Direction::Prev
    )
  }

  #[must_use]
  pub fn has_next_view(&self) -> bool {
    self.layout.get_adjacent_view(Direction::Next).is_some()
  }

  #[must_use]
  pub fn has_prev_view(&self) -> bool {
    self.layout.get_adjacent_view(Direction::Prev).is_some()
  }

  /// Moves the target to another day, keeping
  /// its time of day. Days outside the bounds
  /// are ignored.
  pub fn jump_to_date(
    &mut self,
    input: impl Into<DateInput>
  ) -> Result<&mut Self, CalendarError> {
    self.moment.from_date(&input.into())?;
    Ok(self)
  }

  /// One step in `mode`: a period of the
  /// current view for [`NavigationMode::Date`],
  /// the neighboring view for
  /// [`NavigationMode::View`]. Only the sign
  /// of `step` is used; a zero step leaves
  /// the calendar as it is.
  #[tracing::instrument(skip(self))]
  pub fn navigate(
    &mut self,
    mode: NavigationMode,
    step: i64
  ) -> Result<&mut Self, CalendarError> {
    if step == 0 {
      debug!("zero step; nothing to navigate");
      return Ok(self);
    }
    let direction = Direction::from_step(step)?;
    match mode {
      | NavigationMode::Date => {
        let offsets = ViewOffsets::of(
          self.layout.view().unit(),
          direction.step()
        );
        self.moment.add(&offsets);
      }
      | NavigationMode::View => {
        self.layout.shift(direction);
      }
    }
    debug!(view = %self.view(), target = %self.target(), "navigated");
    Ok(self)
  }

  /// Re-expresses the target and bounds in
  /// another zone.
  pub fn set_time_zone(
    &mut self,
    time_zone: &str
  ) -> Result<&mut Self, CalendarError> {
    self
      .moment
      .to_zoned_date_time(time_zone, &mut self.adjuster)?;
    Ok(self)
  }

  /// Serializable view of the current state.
  pub fn snapshot(
    &mut self
  ) -> Result<CalendarSnapshot, CalendarError> {
    Ok(CalendarSnapshot {
      view:          self.view(),
      target:        self.target(),
      today:         self.today(),
      has_prev_date: self.has_prev_date(),
      has_next_date: self.has_next_date(),
      has_prev_view: self.has_prev_view(),
      has_next_view: self.has_next_view(),
      data:          self.data()?
    })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSnapshot {
  pub view:          ViewType,
  pub target:        NaiveDateTime,
  pub today:         NaiveDateTime,
  pub has_prev_date: bool,
  pub has_next_date: bool,
  pub has_prev_view: bool,
  pub has_next_view: bool,
  pub data:          Arc<ViewData>
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
      .with_ymd_and_hms(2025, 7, 16, 12, 0, 0)
      .single()
      .expect("valid now")
  }

  fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
  }

  #[test]
  fn defaults_to_now_and_day_view() {
    let calendar =
      Calendar::with_now(CalendarConfig::default(), now())
        .expect("calendar");
    assert_eq!(calendar.view(), ViewType::Day);
    assert_eq!(calendar.target(), now().naive_utc());
    assert!(!calendar.has_prev_view());
    assert!(calendar.has_next_view());
  }

  #[test]
  fn date_navigation_uses_view_unit() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        date: Some("2025-01-31T08:00:00".into()),
        view: Some(ViewType::Month),
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");

    calendar
      .navigate(NavigationMode::Date, 1)
      .expect("navigate");
    // overflow rolls into March
    assert_eq!(calendar.target().date(), day(2025, 3, 3));

    calendar
      .navigate(NavigationMode::Date, -5)
      .expect("navigate");
    assert_eq!(calendar.target().date(), day(2025, 2, 3));
  }

  #[test]
  fn view_navigation_stops_at_edges() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        view: Some(ViewType::Year),
        skip_views: vec![ViewType::Day, ViewType::Week],
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");

    calendar
      .navigate(NavigationMode::View, 1)
      .expect("navigate");
    assert_eq!(calendar.view(), ViewType::Decade);
    assert!(!calendar.has_next_view());

    calendar
      .navigate(NavigationMode::View, 1)
      .expect("navigate");
    assert_eq!(calendar.view(), ViewType::Decade);
  }

  #[test]
  fn zero_step_changes_nothing() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        view: Some(ViewType::Month),
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");

    calendar
      .navigate(NavigationMode::Date, 0)
      .expect("zero date step")
      .navigate(NavigationMode::View, 0)
      .expect("zero view step");
    assert_eq!(calendar.target(), now().naive_utc());
    assert_eq!(calendar.view(), ViewType::Month);
  }

  #[test]
  fn adjacency_respects_bounds() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        date: Some("2025-07-16T10:00:00".into()),
        view: Some(ViewType::Day),
        bounds: RawBounds::new(
          Some("2025-07-15T00:00:00".into()),
          Some("2025-07-16T23:00:00".into())
        ),
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");
    assert!(calendar.has_prev_date());
    assert!(!calendar.has_next_date());

    calendar
      .navigate(NavigationMode::Date, 1)
      .expect("navigate");
    assert_eq!(calendar.target().date(), day(2025, 7, 16));
  }

  #[test]
  fn jump_keeps_time_of_day() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        date: Some("2025-07-16T10:45:00".into()),
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");
    calendar.jump_to_date("2024-02-29").expect("jump");
    assert_eq!(
      calendar.target(),
      day(2024, 2, 29)
        .and_hms_opt(10, 45, 0)
        .expect("valid time")
    );
  }

  #[test]
  fn snapshot_reflects_state() {
    let mut calendar = Calendar::with_now(
      CalendarConfig {
        date: Some("2025-07-16T10:00:00".into()),
        view: Some(ViewType::Week),
        ..CalendarConfig::default()
      },
      now()
    )
    .expect("calendar");
    let snapshot = calendar.snapshot().expect("snapshot");
    assert_eq!(snapshot.view, ViewType::Week);
    assert!(snapshot.data.is_current());
    assert!(snapshot.has_next_date && snapshot.has_prev_date);

    let json = serde_json::to_value(&snapshot).expect("json");
    assert_eq!(json["view"], "week");
    assert_eq!(json["data"]["view"], "week");
    assert_eq!(json["data"]["cells"][0].as_array().map(Vec::len), Some(7));
    assert!(json["hasNextView"].as_bool().expect("bool"));
  }
}
