use std::path::Path;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Default output width (1080p).
pub const DEFAULT_WIDTH: u32 = 1920;
/// Default output height (1080p).
pub const DEFAULT_HEIGHT: u32 = 1080;
/// Default frame rate.
pub const DEFAULT_FPS: u32 = 60;
/// Default video length in seconds.
pub const DEFAULT_DURATION_SECONDS: u64 = 7;

/// A named follower supplied by the caller.
///
/// Read-only input; the engine never mutates or persists it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    /// Display name.
    pub name: String,
    /// Optional avatar image reference (URL or path understood by the render layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether to show a verification badge next to the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl Entity {
    /// Entity with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Verification flag, defaulting to `false`.
    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false)
    }
}

/// Color scheme. Only affects palette lookup, never timing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    /// White background.
    #[default]
    Light,
    /// Dark blue-grey background.
    Dim,
    /// Pure black background.
    LightsOut,
}

impl std::str::FromStr for Theme {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dim" => Ok(Self::Dim),
            "lightsOut" | "lights-out" | "lights_out" => Ok(Self::LightsOut),
            other => Err(ReelError::validation(format!("unknown theme '{other}'"))),
        }
    }
}

/// Everything that is fixed for the lifetime of one video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelConfig {
    /// Raw follower count. Non-finite or sub-1 values are treated as 1.
    pub follower_count: f64,
    /// Palette selection.
    #[serde(default)]
    pub theme: Theme,
    /// Optional ordered followers; index 0 is the first avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<Vec<Entity>>,
    /// Output frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Output frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Timeline frame rate.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Total video length in frames.
    #[serde(default = "default_duration")]
    pub duration_in_frames: u64,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_fps() -> Fps {
    Fps {
        num: DEFAULT_FPS,
        den: 1,
    }
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_SECONDS * u64::from(DEFAULT_FPS)
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            follower_count: 1000.0,
            theme: Theme::Light,
            followers: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: default_fps(),
            duration_in_frames: default_duration(),
        }
    }
}

impl ReelConfig {
    /// Check the parts of the config that timing depends on.
    ///
    /// The follower count is deliberately not validated here; it is sanitized instead.
    pub fn validate(&self) -> ReelResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ReelError::validation("fps must be > 0"));
        }
        if self.duration_in_frames == 0 {
            return Err(ReelError::validation("durationInFrames must be > 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("canvas width and height must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&s)
    }

    /// Output frame size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Sanitized follower count (see [`sanitize_follower_count`]).
    pub fn total_count(&self) -> u64 {
        sanitize_follower_count(self.follower_count)
    }

    /// Followers as a slice, empty when none were supplied.
    pub fn followers(&self) -> &[Entity] {
        self.followers.as_deref().unwrap_or(&[])
    }
}

/// Clamp a raw count to a positive integer: non-finite or `< 1` becomes 1, fractions are floored.
pub fn sanitize_follower_count(count: f64) -> u64 {
    if !count.is_finite() || count < 1.0 {
        return 1;
    }
    count.floor().min(u64::MAX as f64) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
