use tracing::{
  debug,
  warn
};

use crate::error::CalendarError;
use crate::view::{
  Direction,
  ViewType
};

#[derive(Debug, Clone, Default)]
pub struct LayoutConfig {
  /// Preferred initial view; falls back to
  /// the first visible one.
  pub view_target: Option<ViewType>,
  pub skip_views:  Vec<ViewType>
}

/// Active view selection among the views
/// that were not skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
  view:          ViewType,
  visible_views: Vec<ViewType>
}

impl Layout {
  #[tracing::instrument(skip(config))]
  pub fn new(
    config: LayoutConfig
  ) -> Result<Self, CalendarError> {
    let visible_views =
      visible_views(&config.skip_views);

    let Some(first) =
      visible_views.first().copied()
    else {
      return Err(
        CalendarError::InvalidSkipViews(
          "All views are excluded via \
           `skipViews`. At least one view \
           must remain available."
            .to_string()
        )
      );
    };

    let view = config
      .view_target
      .filter(|target| {
        visible_views.contains(target)
      })
      .unwrap_or(first);

    debug!(%view, ?visible_views, "created layout");
    Ok(Self {
      view,
      visible_views
    })
  }

  #[must_use]
  pub fn view(&self) -> ViewType {
    self.view
  }

  #[must_use]
  pub fn visible_views(&self) -> &[ViewType] {
    &self.visible_views
  }

  /// Neighbor of the current view in
  /// `direction`, if any.
  #[must_use]
  pub fn get_adjacent_view(
    &self,
    direction: Direction
  ) -> Option<ViewType> {
    let index = self
      .visible_views
      .iter()
      .position(|view| *view == self.view)?;
    let next = match direction {
      | Direction::Prev => index.checked_sub(1)?,
      | Direction::Next => index + 1
    };
    self.visible_views.get(next).copied()
  }

  /// Moves to the adjacent view; stays put
  /// when there is none.
  #[tracing::instrument(skip(self))]
  pub fn shift(
    &mut self,
    direction: Direction
  ) -> &mut Self {
    if let Some(adjacent) =
      self.get_adjacent_view(direction)
    {
      debug!(from = %self.view, to = %adjacent, "shifted view");
      self.view = adjacent;
      return self;
    }

    let reason = if self.visible_views.len() == 1
    {
      "Only one view is available; cannot \
       shift."
        .to_string()
    } else {
      format!(
        "No view exists in the {} direction.",
        direction.name()
      )
    };
    warn!(
      current_view = %self.view,
      ?direction,
      visible_views = ?self.visible_views,
      "view shift failed: {reason}"
    );
    self
  }
}

fn visible_views(
  skip_views: &[ViewType]
) -> Vec<ViewType> {
  ViewType::ALL
    .into_iter()
    .filter(|view| !skip_views.contains(view))
    .collect()
}
