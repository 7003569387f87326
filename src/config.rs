//! Author-supplied crosser settings and the JSON scene file that carries them.
//!
//! Every field is optional in JSON; omitted fields fall back to the defaults
//! in [`crate::constants`].
use std::fs;
use std::path::{Path, PathBuf};

use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_HORIZONTAL_SPEED, DEFAULT_SPRITE_SIZE, DEFAULT_VERTICAL_AMPLITUDE,
    DEFAULT_VERTICAL_FREQUENCY, DEFAULT_VERTICAL_OFFSET, DEMO_HORIZONTAL_SPEED,
    DEMO_OFFSET_STEP, DEMO_VERTICAL_AMPLITUDE,
};

/// Screen edge a crosser enters from.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StartSide {
    /// Just off the left edge, heading right.
    #[default]
    Left,
    /// Just off the right edge, heading left.
    Right,
}

impl StartSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Motion settings for one crosser. Immutable once the crosser is
/// initialized.
///
/// # Examples
///
/// ```
/// use drift::config::{CrosserConfig, StartSide};
///
/// let config = CrosserConfig {
///     start_side: StartSide::Right,
///     ..CrosserConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CrosserConfig {
    /// Horizontal speed in world units per second. Only the magnitude is
    /// used; the start side decides the sign.
    pub horizontal_speed: f32,
    /// Peak vertical displacement. Must not be negative.
    pub vertical_amplitude: f32,
    /// Multiplier applied to absolute time inside the vertical sine.
    pub vertical_frequency: f32,
    /// Phase added inside the vertical sine.
    pub vertical_offset: f32,
    /// Forces the sprite mirror flag on at initialization.
    pub flip_sprite_at_start: bool,
    /// Edge the crosser enters from.
    pub start_side: StartSide,
}

impl Default for CrosserConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: DEFAULT_HORIZONTAL_SPEED,
            vertical_amplitude: DEFAULT_VERTICAL_AMPLITUDE,
            vertical_frequency: DEFAULT_VERTICAL_FREQUENCY,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
            flip_sprite_at_start: false,
            start_side: StartSide::Left,
        }
    }
}

impl CrosserConfig {
    /// Checks that every scalar is finite and the amplitude is not negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("horizontal_speed", self.horizontal_speed),
            ("vertical_amplitude", self.vertical_amplitude),
            ("vertical_frequency", self.vertical_frequency),
            ("vertical_offset", self.vertical_offset),
        ];
        if let Some((field, _)) = scalars.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{field} must be finite")));
        }
        if self.vertical_amplitude < 0.0 {
            return Err(ConfigError::Invalid(
                "vertical_amplitude must not be negative".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading a scene file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The contents were not valid scene JSON.
    #[error("failed to parse scene config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is out of range.
    #[error("invalid scene config: {0}")]
    Invalid(String),
}

/// A scene of independent crossers sharing one placeholder sprite size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Width and height of each crosser's sprite, in world units.
    pub sprite_size: [f32; 2],
    /// One entry per crosser to spawn.
    pub crossers: Vec<CrosserConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sprite_size: DEFAULT_SPRITE_SIZE,
            crossers: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Parses and validates a scene from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Reads, parses and validates a scene file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`SceneConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let json = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json_str(&json)?;
        log::info!(
            "loaded {} crosser(s) from {}",
            scene.crossers.len(),
            path_ref.display()
        );
        Ok(scene)
    }

    /// Builds a demo scene of `count` crossers that alternate start sides
    /// and stagger their phase.
    #[must_use]
    pub fn generated(count: usize) -> Self {
        let mut side = StartSide::Left;
        let mut offset = 0.0;
        let mut crossers = Vec::with_capacity(count);
        for _ in 0..count {
            crossers.push(CrosserConfig {
                horizontal_speed: DEMO_HORIZONTAL_SPEED,
                vertical_amplitude: DEMO_VERTICAL_AMPLITUDE,
                vertical_offset: offset,
                flip_sprite_at_start: side == StartSide::Right,
                start_side: side,
                ..CrosserConfig::default()
            });
            side = side.opposite();
            offset += DEMO_OFFSET_STEP;
        }
        Self {
            sprite_size: DEFAULT_SPRITE_SIZE,
            crossers,
        }
    }

    /// Validates the sprite size and every crosser.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-positive or non-finite
    /// sprite size, or the first crosser that fails
    /// [`CrosserConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .sprite_size
            .iter()
            .any(|edge| !edge.is_finite() || *edge <= 0.0)
        {
            return Err(ConfigError::Invalid(
                "sprite_size must be positive and finite".to_owned(),
            ));
        }
        for (index, crosser) in self.crossers.iter().enumerate() {
            crosser.validate().map_err(|err| match err {
                ConfigError::Invalid(detail) => {
                    ConfigError::Invalid(format!("crossers[{index}]: {detail}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
