use super::{
  BuilderContext,
  DayCell,
  DayParts,
  DayView,
  ViewData
};
use crate::datetime::is_same_day;
use crate::error::CalendarError;
use crate::middleware::is_disabled;

/// 1x1 grid holding the target itself.
pub fn day(
  ctx: &BuilderContext<'_>
) -> Result<ViewData, CalendarError> {
  let parts = DayParts::of(&ctx.target);
  let cell = DayCell {
    timestamp:    parts.timestamp,
    day_of_month: parts.day_of_month,
    weekday:      parts.weekday,
    month_index:  parts.month_index,
    year:         parts.year,
    is_selected:  true,
    is_disabled:  is_disabled(
      &ctx.target,
      ctx.bounds,
      ctx.middlewares
    )
  };

  Ok(ViewData::Day(DayView {
    is_current_day: is_same_day(
      &ctx.target,
      &ctx.today
    ),
    cells:          vec![vec![cell]]
  }))
}
