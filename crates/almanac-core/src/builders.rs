//! Grid builders: one pure function per view
//! turning a [`BuilderContext`] into
//! [`ViewData`].

mod day;
mod decade;
mod month;
mod week;
mod year;

use chrono::{
  Datelike,
  NaiveDateTime
};
use serde::Serialize;

pub use self::day::day;
pub use self::decade::decade;
pub use self::month::month;
pub use self::week::week;
pub use self::year::year;
use crate::datetime::{
  DateBounds,
  month_index,
  timestamp_millis,
  weekday_index
};
use crate::error::CalendarError;
use crate::middleware::Middleware;
use crate::view::ViewType;

/// Row-major, chronological grid.
pub type Grid<T> = Vec<Vec<T>>;

/// Everything a builder reads. Builders
/// never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct BuilderContext<'a> {
  pub target:      NaiveDateTime,
  pub today:       NaiveDateTime,
  pub bounds:      &'a DateBounds,
  pub middlewares: &'a [Middleware]
}

pub type Builder =
  fn(&BuilderContext<'_>) -> Result<ViewData, CalendarError>;

/// Builder responsible for `view`.
#[must_use]
pub fn builder_for(view: ViewType) -> Builder {
  match view {
    | ViewType::Day => day,
    | ViewType::Week => week,
    | ViewType::Month => month,
    | ViewType::Year => year,
    | ViewType::Decade => decade
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
  pub timestamp:    i64,
  pub day_of_month: u32,
  pub weekday:      u32,
  pub month_index:  u32,
  pub year:         i32,
  pub is_selected:  bool,
  pub is_disabled:  bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCell {
  pub timestamp:       i64,
  pub day_of_month:    u32,
  pub weekday:         u32,
  pub month_index:     u32,
  pub year:            i32,
  pub is_current_day:  bool,
  pub is_out_of_range: bool,
  pub is_selected:     bool,
  pub is_disabled:     bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCell {
  pub timestamp:       i64,
  pub day_of_month:    u32,
  pub weekday:         u32,
  pub month_index:     u32,
  pub year:            i32,
  pub is_current_day:  bool,
  pub is_current_week: bool,
  pub is_outside_view: bool,
  pub is_selected:     bool,
  pub is_disabled:     bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCell {
  pub timestamp:        i64,
  pub month_index:      u32,
  pub year:             i32,
  pub is_current_month: bool,
  pub is_out_of_range:  bool,
  pub is_selected:      bool,
  pub is_disabled:      bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecadeCell {
  pub timestamp:       i64,
  pub year:            i32,
  pub is_current_year: bool,
  pub is_outside_view: bool,
  pub is_selected:     bool,
  pub is_disabled:     bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
  pub is_current_day: bool,
  pub cells:          Grid<DayCell>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
  pub is_current_week: bool,
  pub cells:           Grid<WeekCell>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
  pub is_current_month: bool,
  pub cells:            Grid<MonthCell>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearView {
  pub is_current_year: bool,
  pub cells:           Grid<YearCell>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecadeView {
  pub is_current_decade: bool,
  pub cells:             Grid<DecadeCell>
}

/// Built grid for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewData {
  Day(DayView),
  Week(WeekView),
  Month(MonthView),
  Year(YearView),
  Decade(DecadeView)
}

impl ViewData {
  #[must_use]
  pub fn view(&self) -> ViewType {
    match self {
      | Self::Day(_) => ViewType::Day,
      | Self::Week(_) => ViewType::Week,
      | Self::Month(_) => ViewType::Month,
      | Self::Year(_) => ViewType::Year,
      | Self::Decade(_) => ViewType::Decade
    }
  }

  /// `(rows, columns)` of the cell grid.
  #[must_use]
  pub fn dimensions(&self) -> (usize, usize) {
    fn dims<T>(grid: &Grid<T>) -> (usize, usize) {
      (grid.len(), grid.first().map_or(0, Vec::len))
    }
    match self {
      | Self::Day(v) => dims(&v.cells),
      | Self::Week(v) => dims(&v.cells),
      | Self::Month(v) => dims(&v.cells),
      | Self::Year(v) => dims(&v.cells),
      | Self::Decade(v) => dims(&v.cells)
    }
  }

  /// The container-level "current period"
  /// flag of whichever view this is.
  #[must_use]
  pub fn is_current(&self) -> bool {
    match self {
      | Self::Day(v) => v.is_current_day,
      | Self::Week(v) => v.is_current_week,
      | Self::Month(v) => v.is_current_month,
      | Self::Year(v) => v.is_current_year,
      | Self::Decade(v) => v.is_current_decade
    }
  }

  #[must_use]
  pub fn as_day(&self) -> Option<&DayView> {
    match self {
      | Self::Day(v) => Some(v),
      | _ => None
    }
  }

  #[must_use]
  pub fn as_week(&self) -> Option<&WeekView> {
    match self {
      | Self::Week(v) => Some(v),
      | _ => None
    }
  }

  #[must_use]
  pub fn as_month(&self) -> Option<&MonthView> {
    match self {
      | Self::Month(v) => Some(v),
      | _ => None
    }
  }

  #[must_use]
  pub fn as_year(&self) -> Option<&YearView> {
    match self {
      | Self::Year(v) => Some(v),
      | _ => None
    }
  }

  #[must_use]
  pub fn as_decade(&self) -> Option<&DecadeView> {
    match self {
      | Self::Decade(v) => Some(v),
      | _ => None
    }
  }
}

/// Fills a `rows x cols` grid row by row.
pub(crate) fn create_grid<T, F>(
  rows: usize,
  cols: usize,
  mut build: F
) -> Result<Grid<T>, CalendarError>
where
  F: FnMut(usize, usize) -> Result<T, CalendarError>
{
  (0..rows)
    .map(|row| {
      (0..cols)
        .map(|col| build(row, col))
        .collect()
    })
    .collect()
}

/// Calendar components shared by day-based
/// cells.
pub(crate) struct DayParts {
  pub timestamp:    i64,
  pub day_of_month: u32,
  pub weekday:      u32,
  pub month_index:  u32,
  pub year:         i32
}

impl DayParts {
  pub(crate) fn of(date: &NaiveDateTime) -> Self {
    Self {
      timestamp:    timestamp_millis(date),
      day_of_month: date.day(),
      weekday:      weekday_index(date),
      month_index:  month_index(date),
      year:         date.year()
    }
  }
}

pub(crate) fn cell_out_of_range(
  context: &str
) -> CalendarError {
  CalendarError::InvalidDate(format!(
    "{context} cell leaves the supported date \
     range."
  ))
}


#[cfg(test)]
mod tests {
  use super::test_support::{
    at,
    wide_bounds
  };
  use super::*;

  #[test]
  fn grid_is_row_major() {
    let grid = create_grid(2, 3, |r, c| {
      Ok(format!("{r},{c}"))
    })
    .expect("grid");
    assert_eq!(
      grid,
      vec![
        vec!["0,0", "0,1", "0,2"],
        vec!["1,0", "1,1", "1,2"],
      ]
    );
  }

  #[test]
  fn every_builder_has_fixed_dimensions() {
    let bounds = wide_bounds();
    let ctx = BuilderContext {
      target:      at(2025, 7, 16),
      today:       at(2025, 7, 16),
      bounds:      &bounds,
      middlewares: &[]
    };
    let expected = [
      (ViewType::Day, (1, 1)),
      (ViewType::Week, (1, 7)),
      (ViewType::Month, (6, 7)),
      (ViewType::Year, (4, 3)),
      (ViewType::Decade, (4, 3))
    ];
    for (view, dims) in expected {
      let data =
        builder_for(view)(&ctx).expect("build");
      assert_eq!(data.view(), view);
      assert_eq!(data.dimensions(), dims, "{view}");
      assert!(data.is_current(), "{view}");
    }
  }
}
