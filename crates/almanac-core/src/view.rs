use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};

use crate::error::CalendarError;

/// Calendar granularity, ordered from the
/// finest to the coarsest.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
  Day,
  Week,
  Month,
  Year,
  Decade
}

impl ViewType {
  pub const ALL: [ViewType; 5] = [
    ViewType::Day,
    ViewType::Week,
    ViewType::Month,
    ViewType::Year,
    ViewType::Decade
  ];

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::Month => "month",
      | Self::Year => "year",
      | Self::Decade => "decade"
    }
  }

  /// Offset unit that moves a target date by
  /// one period of this view.
  #[must_use]
  pub fn unit(self) -> ViewUnit {
    match self {
      | Self::Day => ViewUnit::Days,
      | Self::Week => ViewUnit::Weeks,
      | Self::Month => ViewUnit::Months,
      | Self::Year => ViewUnit::Years,
      | Self::Decade => ViewUnit::Decades
    }
  }

  fn expected_keys() -> String {
    Self::ALL
      .iter()
      .map(|view| view.as_key())
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl fmt::Display for ViewType {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for ViewType {
  type Err = CalendarError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|view| {
        view.as_key()
          == s.trim().to_ascii_lowercase()
      })
      .ok_or_else(|| {
        CalendarError::InvalidView(format!(
          "Unknown view type \"{s}\". \
           Expected one of: {}.",
          Self::expected_keys()
        ))
      })
  }
}

/// Pluralized unit name used as an offset
/// key (`days`, `weeks`, ...).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize
)]
#[serde(rename_all = "lowercase")]
pub enum ViewUnit {
  Days,
  Weeks,
  Months,
  Years,
  Decades
}

impl ViewUnit {
  pub const ALL: [ViewUnit; 5] = [
    ViewUnit::Decades,
    ViewUnit::Years,
    ViewUnit::Months,
    ViewUnit::Weeks,
    ViewUnit::Days
  ];

  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Days => "days",
      | Self::Weeks => "weeks",
      | Self::Months => "months",
      | Self::Years => "years",
      | Self::Decades => "decades"
    }
  }

  /// Looks up a unit without raising; used
  /// where unknown keys are ignored.
  #[must_use]
  pub fn lookup(key: &str) -> Option<Self> {
    Self::ALL
      .into_iter()
      .find(|unit| unit.as_key() == key)
  }
}

impl fmt::Display for ViewUnit {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for ViewUnit {
  type Err = CalendarError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::lookup(s).ok_or_else(|| {
      let keys = Self::ALL
        .iter()
        .map(|unit| unit.as_key())
        .collect::<Vec<_>>()
        .join(", ");
      CalendarError::InvalidOffsetKey(format!(
        "Invalid offset strategy for key \
         \"{s}\". Expected one of: {keys}"
      ))
    })
  }
}

/// One step backward or forward.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum Direction {
  Prev,
  Next
}

impl Direction {
  /// Clamps a signed step to its direction.
  /// Only the sign matters; zero carries no
  /// direction and is rejected.
  pub fn from_step(
    step: i64
  ) -> Result<Self, CalendarError> {
    match step.signum() {
      | 1 => Ok(Self::Next),
      | -1 => Ok(Self::Prev),
      | _ => {
        Err(CalendarError::InvalidDirection(
          format!(
            "Invalid direction \"{step}\". \
             Expected an integer value of -1 \
             or 1."
          )
        ))
      }
    }
  }

  #[must_use]
  pub fn step(self) -> i64 {
    match self {
      | Self::Prev => -1,
      | Self::Next => 1
    }
  }

  #[must_use]
  pub fn name(self) -> &'static str {
    match self {
      | Self::Prev => "backward",
      | Self::Next => "forward"
    }
  }
}

/// What a navigation request moves: the
/// target date or the active view.
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
pub enum NavigationMode {
  Date,
  View
}

impl FromStr for NavigationMode {
  type Err = CalendarError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "date" => Ok(Self::Date),
      | "view" => Ok(Self::View),
      | _ => {
        Err(
          CalendarError::InvalidNavigationMode(
            "Unsupported navigation mode. \
             Expected one of: date, view."
              .to_string()
          )
        )
      }
    }
  }
}
