pub mod builders;
pub mod calendar;
pub mod cli;
pub mod composer;
pub mod config;
pub mod datetime;
pub mod error;
pub mod layout;
pub mod middleware;
pub mod moment;
pub mod offset;
pub mod timezone;
pub mod view;

use std::ffi::OsString;
use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use crate::builders::ViewData;
pub use crate::calendar::{
  Calendar,
  CalendarConfig,
  CalendarSnapshot
};
pub use crate::composer::{
  Composer,
  ComposerConfig
};
pub use crate::datetime::{
  DateBounds,
  DateInput,
  RawBounds
};
pub use crate::error::CalendarError;
pub use crate::layout::{
  Layout,
  LayoutConfig
};
pub use crate::middleware::{
  DisableOptions,
  Middleware,
  MiddlewareOutput,
  MiddlewareRole,
  disable,
  disable_dates,
  disable_weekends
};
pub use crate::moment::{
  Moment,
  MomentConfig
};
pub use crate::offset::ViewOffsets;
pub use crate::timezone::TimeZoneAdjuster;
pub use crate::view::{
  Direction,
  NavigationMode,
  ViewType,
  ViewUnit
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli = cli::GlobalCli::parse_from(
    raw_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting almanac CLI"
  );

  let snapshot = snapshot_for(&cli)?;
  let rendered = if cli.compact {
    serde_json::to_string(&snapshot)
  } else {
    serde_json::to_string_pretty(&snapshot)
  }
  .context("failed to serialize view data")?;

  let mut out = std::io::stdout().lock();
  writeln!(out, "{rendered}")
    .context("failed to write output")?;

  info!("done");
  Ok(())
}

/// Builds the calendar described by the
/// config file and flags, applies the jump
/// and navigation steps, and returns the
/// resulting state.
#[tracing::instrument(skip_all)]
pub fn snapshot_for(
  cli: &cli::GlobalCli
) -> anyhow::Result<CalendarSnapshot> {
  let mut cfg = config::AppConfig::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(cli.config_overrides())?;
  debug!(?cfg, "effective config");

  let now = match cli.now.as_deref() {
    | Some(raw) => config::parse_now(raw)?,
    | None => Utc::now()
  };

  let mut calendar = Calendar::with_now(
    cfg.calendar_config(),
    now
  )
  .context("failed to build calendar")?;

  if let Some(day) = cli.jump.as_deref() {
    calendar
      .jump_to_date(day)
      .with_context(|| {
        format!("failed to jump to {day}")
      })?;
  }

  for step in &cli.nav {
    calendar
      .navigate(step.mode, step.step)
      .with_context(|| {
        format!(
          "failed to navigate {:?} by {}",
          step.mode, step.step
        )
      })?;
  }

  calendar
    .snapshot()
    .context("failed to compose view data")
}
