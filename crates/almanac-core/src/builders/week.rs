use chrono::TimeDelta;

use super::{
  BuilderContext,
  DayParts,
  ViewData,
  WeekCell,
  WeekView,
  cell_out_of_range,
  create_grid
};
use crate::datetime::{
  is_same_day,
  is_same_week,
  weekday_index
};
use crate::error::CalendarError;
use crate::middleware::is_disabled;

/// 1x7 grid of the Sunday-started week that
/// contains the target.
pub fn week(
  ctx: &BuilderContext<'_>
) -> Result<ViewData, CalendarError> {
  let sunday = ctx
    .target
    .checked_sub_signed(TimeDelta::days(
      i64::from(weekday_index(&ctx.target))
    ))
    .ok_or_else(|| cell_out_of_range("week"))?;

  let cells = create_grid(1, 7, |_, col| {
    let current = sunday
      .checked_add_signed(TimeDelta::days(
        col as i64
      ))
      .ok_or_else(|| cell_out_of_range("week"))?;
    let parts = DayParts::of(&current);
    Ok(WeekCell {
      timestamp:       parts.timestamp,
      day_of_month:    parts.day_of_month,
      weekday:         parts.weekday,
      month_index:     parts.month_index,
      year:            parts.year,
      is_current_day:  is_same_day(
        &current, &ctx.today
      ),
      is_out_of_range: !is_same_week(
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

  Ok(ViewData::Week(WeekView {
    is_current_week: is_same_week(
      &ctx.target,
      &ctx.today
    ),
    cells
  }))
}
