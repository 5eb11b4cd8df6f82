use std::sync::Arc;

use chrono::{
  DateTime,
  NaiveDateTime,
  Utc
};
use tracing::{
  debug,
  warn
};

use crate::builders::{
  BuilderContext,
  ViewData,
  builder_for
};
use crate::datetime::{
  DateBounds,
  RawBounds,
  timestamp_millis
};
use crate::error::CalendarError;
use crate::middleware::Middleware;
use crate::moment::message_of;
use crate::timezone::TimeZoneAdjuster;
use crate::view::ViewType;

#[derive(Debug, Clone, Default)]
pub struct ComposerConfig {
  /// IANA zone "today" and the bounds are
  /// re-expressed in.
  pub time_zone:   Option<String>,
  pub bounds:      RawBounds,
  pub middlewares: Vec<Middleware>
}

#[derive(Debug, Clone)]
struct CachedView {
  view: ViewType,
  time: i64,
  data: Arc<ViewData>
}

/// Builds view grids and remembers the most
/// recent one.
#[derive(Debug, Clone)]
pub struct Composer {
  today:       NaiveDateTime,
  bounds:      DateBounds,
  middlewares: Vec<Middleware>,
  cache:       Option<CachedView>
}

impl Composer {
  #[tracing::instrument(skip(config, now, adjuster))]
  pub fn new(
    config: ComposerConfig,
    now: DateTime<Utc>,
    adjuster: &mut TimeZoneAdjuster
  ) -> Result<Self, CalendarError> {
    let (today, bounds) = resolve_frame(
      now,
      &config.bounds,
      config.time_zone.as_deref(),
      adjuster
    )
    .map_err(|err| {
      CalendarError::InvalidDate(format!(
        "Invalid date or timezone provided: {}",
        message_of(&err)
      ))
    })?;

    let (middlewares, dropped): (Vec<_>, Vec<_>) =
      config
        .middlewares
        .into_iter()
        .partition(Middleware::is_well_formed);
    if !dropped.is_empty() {
      warn!(
        dropped = dropped.len(),
        "ignoring malformed middleware entries"
      );
    }

    debug!(%today, min = %bounds.min, max = %bounds.max, middlewares = middlewares.len(), "created composer");
    Ok(Self {
      today,
      bounds,
      middlewares,
      cache: None
    })
  }

  #[must_use]
  pub fn today(&self) -> NaiveDateTime {
    self.today
  }

  #[must_use]
  pub fn bounds(&self) -> &DateBounds {
    &self.bounds
  }

  #[must_use]
  pub fn middlewares(&self) -> &[Middleware] {
    &self.middlewares
  }

  /// Grid for `view` around `target`.
  ///
  /// Asking twice in a row for the same view
  /// and instant returns the same `Arc`; any
  /// other request replaces the cached entry.
  #[tracing::instrument(skip(self))]
  pub fn data(
    &mut self,
    view: ViewType,
    target: NaiveDateTime
  ) -> Result<Arc<ViewData>, CalendarError> {
    let time = timestamp_millis(&target);

    if let Some(cached) = &self.cache
      && cached.view == view
      && cached.time == time
    {
      debug!(%view, time, "view data cache hit");
      return Ok(Arc::clone(&cached.data));
    }

    debug!(%view, time, "view data cache miss");
    let ctx = BuilderContext {
      target,
      today: self.today,
      bounds: &self.bounds,
      middlewares: &self.middlewares
    };
    let data = Arc::new(builder_for(view)(&ctx)?);

    self.cache = Some(CachedView {
      view,
      time,
      data: Arc::clone(&data)
    });
    Ok(data)
  }
}

/// "Today" and the bounds, re-expressed in
/// `time_zone` when one is given.
fn resolve_frame(
  now: DateTime<Utc>,
  raw: &RawBounds,
  time_zone: Option<&str>,
  adjuster: &mut TimeZoneAdjuster
) -> Result<(NaiveDateTime, DateBounds), CalendarError>
{
  let today = now.naive_utc();
  let bounds = DateBounds::resolve(raw)?;
  let Some(zone) = time_zone else {
    return Ok((today, bounds));
  };
  Ok((
    adjuster.adjust(&today, zone)?,
    DateBounds {
      min: adjuster.adjust(&bounds.min, zone)?,
      max: adjuster.adjust(&bounds.max, zone)?
    }
  ))
}
