use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::view::{NavigationMode, ViewType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

/// One `MODE:STEP` navigation request, e.g. `date:+1` or `view:-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavStep {
    pub mode: NavigationMode,
    pub step: i64,
}

impl FromStr for NavStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mode, step) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected MODE:STEP, got: {s}"))?;
        let mode = mode.parse::<NavigationMode>()?;
        let step = step
            .trim()
            .parse::<i64>()
            .with_context(|| format!("invalid navigation step in {s:?}"))?;
        Ok(Self { mode, step })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "almanac",
    version,
    about = "Almanac: calendar view grids as JSON",
    arg_required_else_help = false
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// TOML config file; defaults to $ALMANAC_CONFIG, then ./almanac.toml.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Raw config override, e.g. `--set bounds.min=2025-01-01`.
    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub overrides: Vec<KeyVal>,

    /// Initial target date.
    #[arg(long = "date")]
    pub date: Option<String>,

    #[arg(
        long = "view",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ViewType>())
    )]
    pub view: Option<ViewType>,

    /// IANA time zone, e.g. `Europe/Berlin`.
    #[arg(long = "tz")]
    pub time_zone: Option<String>,

    #[arg(
        long = "skip",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ViewType>()),
        action = ArgAction::Append
    )]
    pub skip_views: Vec<ViewType>,

    #[arg(long = "min")]
    pub min: Option<String>,

    #[arg(long = "max")]
    pub max: Option<String>,

    /// Pin "now" instead of reading the system clock.
    #[arg(long = "now")]
    pub now: Option<String>,

    /// Day to jump to before navigating.
    #[arg(long = "jump")]
    pub jump: Option<String>,

    /// Navigation steps applied in order.
    #[arg(
        long = "nav",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<NavStep>()),
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub nav: Vec<NavStep>,

    /// Single-line JSON instead of pretty output.
    #[arg(long = "compact")]
    pub compact: bool,
}

impl GlobalCli {
    /// Flag values as config overrides, applied after `--set` pairs so the
    /// dedicated flags win.
    pub fn config_overrides(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .overrides
            .iter()
            .map(|kv| (kv.key.clone(), kv.value.clone()))
            .collect();

        let flags = [
            ("date", self.date.clone()),
            ("view", self.view.map(|v| v.to_string())),
            ("timezone", self.time_zone.clone()),
            ("bounds.min", self.min.clone()),
            ("bounds.max", self.max.clone()),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                out.push((key.to_string(), value));
            }
        }

        if !self.skip_views.is_empty() {
            let joined = self
                .skip_views
                .iter()
                .map(|v| v.as_key())
                .collect::<Vec<_>>()
                .join(",");
            out.push(("skip_views".to_string(), joined));
        }

        debug!(count = out.len(), "collected config overrides");
        out
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
