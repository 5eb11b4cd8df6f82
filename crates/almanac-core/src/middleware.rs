//! Per-cell middleware and the disablement
//! predicate built on it.
//!
//! Every middleware is invoked once per grid
//! cell, so handlers must be pure and cheap.

use std::collections::{
  BTreeMap,
  HashSet
};
use std::fmt;
use std::sync::{
  Arc,
  OnceLock
};

use chrono::{
  Datelike,
  NaiveDateTime,
  Weekday
};
use regex::Regex;
use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;

use crate::datetime::{
  DateBounds,
  day_key,
  is_within_bounds
};

/// Input handed to a middleware handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiddlewareState {
  pub date: NaiveDateTime
}

/// Per-cell data produced by a middleware.
///
/// `is_disabled` is the only field the
/// engine reads; everything in `extra` is
/// carried for downstream consumers.
#[derive(
  Debug, Clone, Default, PartialEq, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareData {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_disabled: Option<bool>,

  #[serde(flatten)]
  pub extra: BTreeMap<String, Value>
}

#[derive(
  Debug, Clone, Default, PartialEq, Serialize,
)]
pub struct MiddlewareOutput {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<MiddlewareData>
}

impl MiddlewareOutput {
  #[must_use]
  pub fn disabled(is_disabled: bool) -> Self {
    Self {
      data: Some(MiddlewareData {
        is_disabled: Some(is_disabled),
        extra:       BTreeMap::new()
      })
    }
  }

  #[must_use]
  pub fn is_disabled(&self) -> bool {
    self
      .data
      .as_ref()
      .and_then(|data| data.is_disabled)
      .unwrap_or(false)
  }
}

/// What the engine does with a middleware's
/// output.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum MiddlewareRole {
  /// Participates in cell disablement.
  Disable,
  /// Ignored by the engine.
  Annotate
}

type Handler = Arc<
  dyn Fn(&MiddlewareState) -> MiddlewareOutput
    + Send
    + Sync
>;

#[derive(Clone)]
pub struct Middleware {
  name:    String,
  options: Option<Value>,
  role:    MiddlewareRole,
  handler: Handler
}

impl fmt::Debug for Middleware {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("Middleware")
      .field("name", &self.name)
      .field("options", &self.options)
      .field("role", &self.role)
      .finish_non_exhaustive()
  }
}

impl Middleware {
  pub fn new<F>(
    name: impl Into<String>,
    role: MiddlewareRole,
    handler: F
  ) -> Self
  where
    F: Fn(&MiddlewareState) -> MiddlewareOutput
      + Send
      + Sync
      + 'static
  {
    Self {
      name: name.into(),
      options: None,
      role,
      handler: Arc::new(handler)
    }
  }

  /// Middleware whose output can disable a
  /// cell.
  pub fn disabling<F>(
    name: impl Into<String>,
    handler: F
  ) -> Self
  where
    F: Fn(&MiddlewareState) -> MiddlewareOutput
      + Send
      + Sync
      + 'static
  {
    Self::new(name, MiddlewareRole::Disable, handler)
  }

  /// Middleware that only attaches data.
  pub fn annotating<F>(
    name: impl Into<String>,
    handler: F
  ) -> Self
  where
    F: Fn(&MiddlewareState) -> MiddlewareOutput
      + Send
      + Sync
      + 'static
  {
    Self::new(name, MiddlewareRole::Annotate, handler)
  }

  #[must_use]
  pub fn with_options(
    mut self,
    options: Value
  ) -> Self {
    self.options = Some(options);
    self
  }

  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }

  #[must_use]
  pub fn options(&self) -> Option<&Value> {
    self.options.as_ref()
  }

  #[must_use]
  pub fn role(&self) -> MiddlewareRole {
    self.role
  }

  /// A middleware needs a non-blank name to
  /// be accepted by the composer.
  #[must_use]
  pub fn is_well_formed(&self) -> bool {
    !self.name.trim().is_empty()
  }

  #[must_use]
  pub fn run(
    &self,
    date: &NaiveDateTime
  ) -> MiddlewareOutput {
    (self.handler)(&MiddlewareState {
      date: *date
    })
  }

  fn disables(
    &self,
    date: &NaiveDateTime
  ) -> bool {
    self.role == MiddlewareRole::Disable
      && self.run(date).is_disabled()
  }
}

/// `true` when `date` is outside `bounds` or
/// the first disabling middleware, in list
/// order, says so.
#[must_use]
pub fn is_disabled(
  date: &NaiveDateTime,
  bounds: &DateBounds,
  middlewares: &[Middleware]
) -> bool {
  !is_within_bounds(date, bounds)
    || middlewares
      .iter()
      .any(|middleware| middleware.disables(date))
}

/// Options of the [`disable`] middleware.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize
)]
pub struct DisableOptions {
  /// Exact `YYYY-MM-DD` days to disable.
  #[serde(default)]
  pub dates:    Vec<String>,
  /// Disable Saturdays and Sundays.
  #[serde(default)]
  pub weekends: bool,
  /// Days exempt from the weekend rule.
  #[serde(default)]
  pub exclude:  Vec<String>
}

/// Disables the listed days and, when
/// `weekends` is set, every weekend day not
/// in `exclude`.
///
/// `exclude` only overrides the weekend rule;
/// a day in both `dates` and `exclude` stays
/// disabled.
#[must_use]
pub fn disable(
  options: DisableOptions
) -> Middleware {
  let dates = day_set(&options.dates);
  let weekends = options.weekends;
  let exclude = if weekends {
    day_set(&options.exclude)
  } else {
    HashSet::new()
  };
  let serialized =
    serde_json::to_value(&options)
      .unwrap_or(Value::Null);

  Middleware::disabling("disable", move |state| {
    let key = day_key(&state.date);
    if dates.contains(&key) {
      return MiddlewareOutput::disabled(true);
    }
    MiddlewareOutput::disabled(
      weekends
        && is_weekend(&state.date)
        && !exclude.contains(&key)
    )
  })
  .with_options(serialized)
}

/// Disables exactly the listed days.
#[must_use]
pub fn disable_dates(
  list_of_dates: &[String]
) -> Middleware {
  let dates = day_set(list_of_dates);
  Middleware::disabling(
    "disableDates",
    move |state| {
      MiddlewareOutput::disabled(
        dates.contains(&day_key(&state.date))
      )
    }
  )
  .with_options(serde_json::json!({
    "listOfDates": list_of_dates
  }))
}

/// Disables Saturdays and Sundays except the
/// listed days.
#[must_use]
pub fn disable_weekends(
  exclude: &[String]
) -> Middleware {
  let excluded = day_set(exclude);
  Middleware::disabling(
    "disableWeekends",
    move |state| {
      MiddlewareOutput::disabled(
        is_weekend(&state.date)
          && !excluded
            .contains(&day_key(&state.date))
      )
    }
  )
  .with_options(serde_json::json!({
    "exclude": exclude
  }))
}

fn is_weekend(date: &NaiveDateTime) -> bool {
  matches!(
    date.weekday(),
    Weekday::Sat | Weekday::Sun
  )
}

fn iso_day_regex() -> Option<&'static Regex> {
  static ISO_DAY: OnceLock<Option<Regex>> =
    OnceLock::new();
  ISO_DAY
    .get_or_init(|| {
      Regex::new(r"^\d{4}-\d{2}-\d{2}$")
        .map_err(|err| {
          tracing::error!(
            error = %err,
            "internal regex compile failure"
          );
        })
        .ok()
    })
    .as_ref()
}

/// Keeps only well-formed `YYYY-MM-DD`
/// entries; the rest are dropped silently.
fn day_set(raw: &[String]) -> HashSet<String> {
  let Some(re) = iso_day_regex() else {
    return HashSet::new();
  };
  raw
    .iter()
    .filter(|item| re.is_match(item))
    .cloned()
    .collect()
}
