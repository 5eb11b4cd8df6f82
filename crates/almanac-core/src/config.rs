use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  trace
};

use crate::calendar::CalendarConfig;
use crate::datetime::{
  DateInput,
  RawBounds
};
use crate::middleware::{
  DisableOptions,
  disable
};
use crate::view::ViewType;

pub const CONFIG_ENV: &str = "ALMANAC_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str =
  "almanac.toml";

/// Settings read from `almanac.toml` and
/// command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
  pub date:        Option<DateInput>,
  pub view:        Option<ViewType>,
  pub timezone:    Option<String>,
  pub skip_views:  Vec<ViewType>,
  pub bounds:      RawBounds,
  pub disable:     Option<DisableOptions>,
  #[serde(skip)]
  pub loaded_file: Option<PathBuf>
}

impl AppConfig {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    match resolve_config_path(config_override)? {
      | Some(path) => {
        info!(config = %path.display(), "loading config");
        Self::load_file(&path)
      }
      | None => {
        info!(
          "no config file found; using \
           defaults"
        );
        Ok(Self::default())
      }
    }
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let path = expand_tilde(path);
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "invalid config file {}",
          path.display()
        )
      })?;
    cfg.loaded_file = Some(path);
    Ok(cfg)
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let cfg: Self = toml::from_str(text)?;
    trace!(?cfg, "parsed config");
    Ok(cfg)
  }

  /// Applies `key=value` overrides in order.
  /// Later pairs win.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k.trim();
      debug!(key = %key, value = %v, "applying override");
      match key {
        | "date" => {
          self.date =
            Some(DateInput::Text(v))
        }
        | "view" => {
          self.view = Some(v.parse()?)
        }
        | "timezone" | "tz" => {
          self.timezone = Some(v)
        }
        | "skip_views" => {
          self.skip_views = split_list(&v)
            .iter()
            .map(|s| s.parse::<ViewType>())
            .collect::<Result<Vec<_>, _>>()?;
        }
        | "bounds.min" => {
          self.bounds.min =
            Some(DateInput::Text(v))
        }
        | "bounds.max" => {
          self.bounds.max =
            Some(DateInput::Text(v))
        }
        | "disable.weekends" => {
          self.disable_mut().weekends =
            parse_bool(&v)
        }
        | "disable.dates" => {
          self.disable_mut().dates =
            split_list(&v)
        }
        | "disable.exclude" => {
          self.disable_mut().exclude =
            split_list(&v)
        }
        | other => {
          bail!("unknown config key: {other}")
        }
      }
    }
    Ok(())
  }

  /// Facade settings, with the `[disable]`
  /// table turned into middleware.
  #[must_use]
  pub fn calendar_config(
    &self
  ) -> CalendarConfig {
    CalendarConfig {
      date:        self.date.clone(),
      bounds:      self.bounds.clone(),
      view:        self.view,
      time_zone:   self.timezone.clone(),
      skip_views:  self.skip_views.clone(),
      middlewares: self
        .disable
        .clone()
        .map(disable)
        .into_iter()
        .collect()
    }
  }

  fn disable_mut(
    &mut self
  ) -> &mut DisableOptions {
    self
      .disable
      .get_or_insert_with(DisableOptions::default)
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(env_path) =
    std::env::var(CONFIG_ENV)
  {
    if env_path == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(env_path)));
  }

  let local = PathBuf::from(DEFAULT_CONFIG_FILE);
  if local.exists() {
    return Ok(Some(local));
  }

  if let Some(dir) = dirs::config_dir() {
    let candidate = dir
      .join("almanac")
      .join(DEFAULT_CONFIG_FILE);
    if candidate.exists() {
      return Ok(Some(candidate));
    }
  }

  Ok(None)
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn split_list(s: &str) -> Vec<String> {
  s.split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

/// Parses a `--now` value into an instant.
pub fn parse_now(
  raw: &str
) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
  crate::datetime::to_date(&DateInput::Text(
    raw.to_string()
  ))
  .map(|date| date.and_utc())
  .map_err(|err| anyhow!("invalid --now value {raw:?}: {err}"))
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use crate::middleware::MiddlewareRole;

  const SAMPLE: &str = r#"
date = "2025-07-16T09:00:00"
view = "month"
timezone = "Europe/Berlin"
skip_views = ["day", "decade"]

[bounds]
min = "2025-01-01"
max = 1767225599999

[disable]
weekends = true
exclude = ["2025-07-19"]
"#;

  #[test]
  fn loads_every_section_from_file() {
    let mut file =
      tempfile::NamedTempFile::new()
        .expect("tempfile");
    file
      .write_all(SAMPLE.as_bytes())
      .expect("write");

    let cfg = AppConfig::load(Some(
      file.path()
    ))
    .expect("load");
    assert_eq!(
      cfg.loaded_file.as_deref(),
      Some(file.path())
    );
    assert_eq!(cfg.view, Some(ViewType::Month));
    assert_eq!(
      cfg.skip_views,
      vec![ViewType::Day, ViewType::Decade]
    );
    assert_eq!(
      cfg.bounds.max,
      Some(DateInput::Millis(1_767_225_599_999))
    );
    let disable =
      cfg.disable.clone().expect("disable");
    assert!(disable.weekends);
    assert!(disable.dates.is_empty());

    let calendar = cfg.calendar_config();
    assert_eq!(calendar.middlewares.len(), 1);
    assert_eq!(
      calendar.middlewares[0].role(),
      MiddlewareRole::Disable
    );
    assert_eq!(
      calendar.time_zone.as_deref(),
      Some("Europe/Berlin")
    );
  }

  #[test]
  fn missing_file_is_an_error_when_named() {
    let dir =
      tempfile::tempdir().expect("tempdir");
    let err = AppConfig::load(Some(
      &dir.path().join("nope.toml")
    ))
    .expect_err("missing file");
    assert!(
      format!("{err:#}")
        .contains("failed to read")
    );
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(
      AppConfig::from_toml_str(
        "colour = \"red\""
      )
      .is_err()
    );
  }

  #[test]
  fn overrides_win_in_order() {
    let mut cfg =
      AppConfig::from_toml_str(SAMPLE)
        .expect("parse");
    cfg
      .apply_overrides([
        ("view".into(), "year".into()),
        ("view".into(), "week".into()),
        (
          "skip_views".into(),
          "day, month".into()
        ),
        (
          "disable.dates".into(),
          "2025-07-04,2025-12-25".into()
        ),
        ("tz".into(), "UTC".into())
      ])
      .expect("overrides");
    assert_eq!(cfg.view, Some(ViewType::Week));
    assert_eq!(
      cfg.skip_views,
      vec![ViewType::Day, ViewType::Month]
    );
    assert_eq!(cfg.timezone.as_deref(), Some("UTC"));
    assert_eq!(
      cfg.disable.expect("disable").dates,
      vec!["2025-07-04", "2025-12-25"]
    );
  }

  #[test]
  fn bad_override_fails() {
    let mut cfg = AppConfig::default();
    assert!(
      cfg
        .apply_overrides([(
          "view".into(),
          "fortnight".into()
        )])
        .is_err()
    );
    assert!(
      cfg
        .apply_overrides([(
          "color".into(),
          "on".into()
        )])
        .is_err()
    );
  }

  #[test]
  fn now_accepts_offsets() {
    let now = parse_now("2025-07-16T12:00:00+02:00")
      .expect("now");
    assert_eq!(
      now.naive_utc().to_string(),
      "2025-07-16 10:00:00"
    );
  }
}
