use chrono::{
  Datelike,
  TimeDelta
};

use super::{
  BuilderContext,
  DayParts,
  MonthCell,
  MonthView,
  ViewData,
  cell_out_of_range,
  create_grid
};
use crate::datetime::{
  is_same_day,
  is_same_month,
  is_same_week,
  weekday_index
};
use crate::error::CalendarError;
use crate::middleware::is_disabled;

const ROWS: usize = 6;
const COLS: usize = 7;

/// 6x7 grid walking forward one day per cell
/// from the Sunday on or before the 1st of
/// the target month.
pub fn month(
  ctx: &BuilderContext<'_>
) -> Result<ViewData, CalendarError> {
  let first = ctx
    .target
    .with_day(1)
    .ok_or_else(|| cell_out_of_range("month"))?;
  let start = first
    .checked_sub_signed(TimeDelta::days(
      i64::from(weekday_index(&first))
    ))
    .ok_or_else(|| cell_out_of_range("month"))?;

  let cells = create_grid(ROWS, COLS, |row, col| {
    let offset = (row * COLS + col) as i64;
    let current = start
      .checked_add_signed(TimeDelta::days(offset))
      .ok_or_else(|| cell_out_of_range("month"))?;
    let parts = DayParts::of(&current);
    Ok(MonthCell {
      timestamp:       parts.timestamp,
      day_of_month:    parts.day_of_month,
      weekday:         parts.weekday,
      month_index:     parts.month_index,
      year:            parts.year,
      is_current_day:  is_same_day(
        &current, &ctx.today
      ),
      is_current_week: is_same_week(
        &current, &ctx.today
      ),
      is_outside_view: !is_same_month(
        &current,
        &ctx.target
      ),
      is_selected:     is_same_day(
        &current,
        &ctx.target
      ),
      is_disabled:     is_disabled(
        &current,
        ctx.bounds,
        ctx.middlewares
      )
    })
  })?;

  Ok(ViewData::Month(MonthView {
    is_current_month: is_same_month(
      &ctx.target,
      &ctx.today
    ),
    cells
  }))
}
