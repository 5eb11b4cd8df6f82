use chrono::Datelike;

use super::{
  BuilderContext,
  DecadeCell,
  DecadeView,
  ViewData,
  cell_out_of_range,
  create_grid
};
use crate::datetime::{
  decade_start,
  is_same_decade,
  is_same_year,
  timestamp_millis,
  with_year_month_clamped
};
use crate::error::CalendarError;
use crate::middleware::is_disabled;

/// 4x3 grid of twelve consecutive years
/// starting at the target's decade; the last
/// two belong to the next decade and are
/// flagged out of range.
pub fn decade(
  ctx: &BuilderContext<'_>
) -> Result<ViewData, CalendarError> {
  let start_year = decade_start(ctx.target.year());

  let cells = create_grid(4, 3, |row, col| {
    let year = start_year + (row * 3 + col) as i32;
    let current = with_year_month_clamped(
      &ctx.target,
      year,
      ctx.target.month0()
    )
    .ok_or_else(|| cell_out_of_range("decade"))?;
    Ok(DecadeCell {
      timestamp: timestamp_millis(&current),
      year,
      is_current_year: is_same_year(
        &current, &ctx.today
      ),
      is_outside_view: !is_same_decade(
        &current,
        &ctx.target
      ),
      is_selected: is_same_year(
        &current,
        &ctx.target
      ),
      is_disabled: is_disabled(
        &current,
        ctx.bounds,
        ctx.middlewares
      )
    })
  })?;

  Ok(ViewData::Decade(DecadeView {
    is_current_decade: is_same_decade(
      &ctx.target,
      &ctx.today
    ),
    cells
  }))
}
