//! Error taxonomy shared by every calendar component.

/// Validation failures raised synchronously by calendar operations.
///
/// None of these are transient. Navigation that runs into a bound is not an
/// error; it is a logged no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
  #[error("[INVALID_DATE] {0}")]
  InvalidDate(String),

  #[error("[OUT_OF_BOUNDS] {0}")]
  OutOfBounds(String),

  #[error("[INVALID_TIMEZONE] {0}")]
  InvalidTimezone(String),

  #[error("[INVALID_SKIP_VIEWS] {0}")]
  InvalidSkipViews(String),

  #[error("[INVALID_DIRECTION] {0}")]
  InvalidDirection(String),

  #[error("[INVALID_OFFSET_KEY] {0}")]
  InvalidOffsetKey(String),

  #[error("[INVALID_VIEW] {0}")]
  InvalidView(String),

  #[error("[INVALID_NAV_MODE] {0}")]
  InvalidNavigationMode(String),

  /// Offsets were not a key -> integer mapping.
  #[error("[INVALID_INPUT_OFFSET] {0}")]
  InvalidInput(String)
}

impl CalendarError {
  /// Stable machine-readable code for the variant.
  #[must_use]
  pub fn code(&self) -> &'static str {
    match self {
      | Self::InvalidDate(_) => {
        "INVALID_DATE"
      }
      | Self::OutOfBounds(_) => {
        "OUT_OF_BOUNDS"
      }
      | Self::InvalidTimezone(_) => {
        "INVALID_TIMEZONE"
      }
      | Self::InvalidSkipViews(_) => {
        "INVALID_SKIP_VIEWS"
      }
      | Self::InvalidDirection(_) => {
        "INVALID_DIRECTION"
      }
      | Self::InvalidOffsetKey(_) => {
        "INVALID_OFFSET_KEY"
      }
      | Self::InvalidView(_) => {
        "INVALID_VIEW"
      }
      | Self::InvalidNavigationMode(_) => {
        "INVALID_NAV_MODE"
      }
      | Self::InvalidInput(_) => {
        "INVALID_INPUT_OFFSET"
      }
    }
  }
}
