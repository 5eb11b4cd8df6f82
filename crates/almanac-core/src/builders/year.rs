use chrono::Datelike;

use super::{
  BuilderContext,
  ViewData,
  YearCell,
  YearView,
  cell_out_of_range,
  create_grid
};
use crate::datetime::{
  is_same_month,
  is_same_year,
  timestamp_millis,
  with_year_month_clamped
};
use crate::error::CalendarError;
use crate::middleware::is_disabled;

/// 4x3 grid of the twelve months of the
/// target year; cell `row * 3 + col` is month
/// index `row * 3 + col`.
///
/// Each cell keeps the target's day, clamped
/// to the month's length.
pub fn year(
  ctx: &BuilderContext<'_>
) -> Result<ViewData, CalendarError> {
  let target_year = ctx.target.year();

  let cells = create_grid(4, 3, |row, col| {
    let index = (row * 3 + col) as u32;
    let current = with_year_month_clamped(
      &ctx.target,
      target_year,
      index
    )
    .ok_or_else(|| cell_out_of_range("year"))?;
    Ok(YearCell {
      timestamp:        timestamp_millis(&current),
      month_index:      index,
      year:             current.year(),
      is_current_month: is_same_month(
        &current, &ctx.today
      ),
      is_out_of_range:  !is_same_year(
        &current,
        &ctx.target
      ),
      is_selected:      is_same_month(
        &current,
        &ctx.target
      ),
      is_disabled:      is_disabled(
        &current,
        ctx.bounds,
        ctx.middlewares
      )
    })
  })?;

  Ok(ViewData::Year(YearView {
    is_current_year: is_same_year(
      &ctx.target,
      &ctx.today
    ),
    cells
  }))
}

#[cfg(test)]
mod tests {
  use super::super::test_support::{
    at,
    wide_bounds
  };
  use super::*;

  #[test]
  fn months_are_row_major() {
    let bounds = wide_bounds();
    let data = year(&BuilderContext {
      target:      at(2025, 1, 31),
      today:       at(2024, 2, 10),
      bounds:      &bounds,
      middlewares: &[]
    })
    .expect("build");
    let view = data.as_year().expect("year");
    assert!(!view.is_current_year);

    for (row, cells) in view.cells.iter().enumerate() {
      for (col, cell) in cells.iter().enumerate() {
        assert_eq!(
          cell.month_index as usize,
          row * 3 + col
        );
        assert_eq!(cell.year, 2025);
        assert!(!cell.is_out_of_range);
        assert!(!cell.is_current_month);
      }
    }
    assert!(view.cells[0][0].is_selected);
    assert_eq!(
      view
        .cells
        .iter()
        .flatten()
        .filter(|c| c.is_selected)
        .count(),
      1
    );
    // day 31 is clamped into February
    assert_eq!(
      view.cells[0][1].timestamp,
      at(2025, 2, 28).and_utc().timestamp_millis()
    );
  }

  #[test]
  fn current_month_follows_today() {
    let bounds = wide_bounds();
    let data = year(&BuilderContext {
      target:      at(2025, 3, 1),
      today:       at(2025, 11, 20),
      bounds:      &bounds,
      middlewares: &[]
    })
    .expect("build");
    let view = data.as_year().expect("year");
    assert!(view.is_current_year);
    assert!(view.cells[3][1].is_current_month);
    assert!(view.cells[0][2].is_selected);
  }
}
