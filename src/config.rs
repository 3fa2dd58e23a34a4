use crate::curve::DEFAULT_SPLINE_SAMPLES;
use crate::editor::DEFAULT_SNAP_RADIUS;
use std::{env, path::PathBuf, str::FromStr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/alarms.json";
pub const DEFAULT_PREVIEW_STEPS: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub curves: CurveSettings,
}

/// Presentation tuning for curve previews and point editing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSettings {
    pub snap_radius: f64,
    pub spline_samples: usize,
    pub preview_steps: usize,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            snap_radius: DEFAULT_SNAP_RADIUS,
            spline_samples: DEFAULT_SPLINE_SAMPLES,
            preview_steps: DEFAULT_PREVIEW_STEPS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = CurveSettings::default();
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            data_path: lookup("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            curves: CurveSettings {
                snap_radius: parse_or(&lookup, "CURVE_SNAP_RADIUS", defaults.snap_radius).max(0.0),
                spline_samples: parse_or(&lookup, "CURVE_SPLINE_SAMPLES", defaults.spline_samples)
                    .max(2),
                preview_steps: parse_or(&lookup, "CURVE_PREVIEW_STEPS", defaults.preview_steps)
                    .max(1),
            },
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid {key}={raw}");
            default
        }),
        None => default,
    }
}
