//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{TrackError, TrackResult};
use crate::zone::Point;

/// Default per-axis search radius, in pixels.
pub const DEFAULT_SEARCH_RADIUS: u32 = 10;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the frames to track, read in file name order.
    pub frames_dir: PathBuf,

    /// Directory annotated frames are written to.
    pub results_dir: PathBuf,

    /// File extensions recognised as frames (lowercase, without dot).
    pub extensions: Vec<String>,

    /// Region to track in the first frame.
    pub selection: Option<Selection>,

    /// Search settings.
    pub tracker: TrackerConfig,

    /// Annotated output settings.
    pub annotation: AnnotationConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// What the sequence driver does when a frame has no usable match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the sequence at the failing frame.
    #[default]
    Abort,
    /// Keep the previous zone and continue with the next frame.
    Skip,
}

/// Search parameters for the frame tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How far, per axis, the zone may move between consecutive frames.
    pub search_radius: u32,

    /// Score candidates on the rayon thread pool.
    pub parallel: bool,

    pub failure_policy: FailurePolicy,

    /// Wall-clock budget for one frame's search, in milliseconds.
    pub frame_budget_ms: Option<u64>,
}

/// Annotated frame output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Rectangle colour (RGB).
    pub color: [u8; 3],

    /// TrueType/OpenType font used to print the score. No label without it.
    pub font: Option<PathBuf>,

    /// Label height in pixels.
    pub font_scale: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "zone_tracker=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

/// Two opposite corners of the region chosen in the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub first: Point,
    pub second: Point,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from("targets"),
            results_dir: PathBuf::from("results"),
            extensions: ["png", "jpg", "jpeg", "bmp", "tif", "tiff"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            selection: None,
            tracker: TrackerConfig::default(),
            annotation: AnnotationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            parallel: true,
            failure_policy: FailurePolicy::Abort,
            frame_budget_ms: None,
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            font: None,
            font_scale: 16.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> TrackResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as pretty JSON.
    pub fn save(&self, path: &Path) -> TrackResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> TrackResult<()> {
        self.tracker.validate()?;
        if same_directory(&self.frames_dir, &self.results_dir) {
            return Err(TrackError::config(format!(
                "results_dir {} is the frames directory; annotated frames would overwrite the input",
                self.results_dir.display()
            )));
        }
        if self.extensions.is_empty() {
            return Err(TrackError::config("at least one frame extension is required"));
        }
        if self.annotation.font_scale.is_nan() || self.annotation.font_scale <= 0.0 {
            return Err(TrackError::config("font_scale must be positive"));
        }
        Ok(())
    }
}

/// Equal as written, or resolving to the same directory on disk.
fn same_directory(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> TrackResult<()> {
        if self.search_radius == 0 {
            return Err(TrackError::config("search_radius must be a positive integer"));
        }
        if self.frame_budget_ms == Some(0) {
            return Err(TrackError::config("frame_budget_ms must be positive when set"));
        }
        Ok(())
    }
}

impl FromStr for Selection {
    type Err = String;

    /// Parses `"x1,y1,x2,y2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid selection '{s}': {e}"))?;
        match values.as_slice() {
            &[x1, y1, x2, y2] => Ok(Self {
                first: Point::new(x1, y1),
                second: Point::new(x2, y2),
            }),
            _ => Err(format!(
                "invalid selection '{s}': expected x1,y1,x2,y2, got {} values",
                values.len()
            )),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown failure policy '{other}' (abort|skip)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.tracker.search_radius, 10);
        assert_eq!(config.frames_dir, PathBuf::from("targets"));
        assert_eq!(config.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_zero_radius_is_rejected() {
        let config = TrackerConfig {
            search_radius: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackError::Config { .. })));
    }

    #[test]
    fn test_results_in_frames_dir_is_rejected() {
        let config = AppConfig {
            frames_dir: PathBuf::from("clip"),
            results_dir: PathBuf::from("clip"),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackError::Config { .. })));
    }

    #[test]
    fn test_results_dir_alias_is_rejected() {
        let dir = std::env::temp_dir().join(format!("zone-tracker-alias-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("frames")).unwrap();
        let config = AppConfig {
            frames_dir: dir.join("frames"),
            results_dir: dir.join("frames").join("..").join("frames"),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackError::Config { .. })));

        let separate = AppConfig {
            frames_dir: dir.join("frames"),
            results_dir: dir.join("results"),
            ..AppConfig::default()
        };
        separate.validate().unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "frames_dir": "clip",
                "tracker": { "search_radius": 7, "failure_policy": "skip" },
                "selection": { "first": { "x": 2, "y": 2 }, "second": { "x": 6, "y": 6 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.frames_dir, PathBuf::from("clip"));
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.tracker.search_radius, 7);
        assert_eq!(config.tracker.failure_policy, FailurePolicy::Skip);
        assert!(config.tracker.parallel);
        assert_eq!(config.selection.unwrap().second, Point::new(6, 6));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("zone-tracker-config-{}", std::process::id()));
        let path = dir.join("config.json");
        let mut config = AppConfig::default();
        config.tracker.search_radius = 8;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.tracker.search_radius, 8);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_parse_selection() {
        let selection: Selection = "6, 2,2,9".parse().unwrap();
        assert_eq!(selection.first, Point::new(6, 2));
        assert_eq!(selection.second, Point::new(2, 9));

        assert!("1,2,3".parse::<Selection>().is_err());
        assert!("1,2,3,x".parse::<Selection>().is_err());
        assert!("1,2,3,-4".parse::<Selection>().is_err());
    }

    #[test]
    fn test_parse_failure_policy() {
        assert_eq!("skip".parse::<FailurePolicy>(), Ok(FailurePolicy::Skip));
        assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
