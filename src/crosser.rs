//! Engine-independent motion of a screen-crossing actor.
//!
//! An [`OscillatingCrosser`] drifts horizontally at a constant speed, bobs
//! vertically along `amplitude * sin(frequency * t + offset)` and reverses
//! once it has fully left the visible area. The camera and sprite are reached
//! only through the [`CameraExtent`] and [`ActorBounds`] capabilities, so the
//! same state machine drives Bevy entities and plain unit tests.
use glam::Vec3;
use log::{debug, info};
use thiserror::Error;

use crate::config::{CrosserConfig, StartSide};

/// Read access to the visible width of the active camera.
pub trait CameraExtent {
    /// Half of the visible width in world units, or `None` when no camera
    /// is available.
    fn visible_half_width(&self) -> Option<f32>;
}

/// Read access to the actor being moved.
pub trait ActorBounds {
    /// Half of the actor's rendered width in world units, or `None` when it
    /// has no visual bounds.
    fn half_width(&self) -> Option<f32>;

    /// Translation before the crosser takes over. Its y and z survive
    /// initialization.
    fn translation(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Current horizontal mirror flag of the sprite.
    fn mirrored(&self) -> bool {
        false
    }
}

/// Visible extent of an orthographic camera.
///
/// # Examples
///
/// ```
/// use drift::crosser::{CameraExtent, OrthographicExtent};
///
/// let extent = OrthographicExtent { half_height: 4.0, aspect: 2.0 };
/// assert_eq!(extent.visible_half_width(), Some(8.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicExtent {
    /// Half of the visible height in world units.
    pub half_height: f32,
    /// Width divided by height.
    pub aspect: f32,
}

impl CameraExtent for OrthographicExtent {
    fn visible_half_width(&self) -> Option<f32> {
        let half_width = self.half_height * self.aspect;
        (half_width.is_finite() && half_width > 0.0).then_some(half_width)
    }
}

impl<T: CameraExtent> CameraExtent for Option<T> {
    fn visible_half_width(&self) -> Option<f32> {
        self.as_ref().and_then(T::visible_half_width)
    }
}

impl<T: ActorBounds> ActorBounds for Option<T> {
    fn half_width(&self) -> Option<f32> {
        self.as_ref().and_then(T::half_width)
    }

    fn translation(&self) -> Vec3 {
        self.as_ref().map_or(Vec3::ZERO, T::translation)
    }

    fn mirrored(&self) -> bool {
        self.as_ref().is_some_and(T::mirrored)
    }
}

/// Actor bounds known up front, independent of any renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedBounds {
    /// Half of the actor's width.
    pub half_width: f32,
    /// Resting translation.
    pub translation: Vec3,
    /// Mirror flag before initialization.
    pub mirrored: bool,
}

impl FixedBounds {
    /// Bounds of an actor at the origin that is not mirrored.
    #[must_use]
    pub const fn with_half_width(half_width: f32) -> Self {
        Self {
            half_width,
            translation: Vec3::ZERO,
            mirrored: false,
        }
    }
}

impl ActorBounds for FixedBounds {
    fn half_width(&self) -> Option<f32> {
        (self.half_width.is_finite() && self.half_width >= 0.0).then_some(self.half_width)
    }

    fn translation(&self) -> Vec3 {
        self.translation
    }

    fn mirrored(&self) -> bool {
        self.mirrored
    }
}

/// Preconditions that stop a crosser from initializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CrosserError {
    /// There is no camera to derive the screen width from.
    #[error("no active camera to derive the screen width from")]
    MissingCamera,
    /// The actor has no visual bounds.
    #[error("actor has no visual bounds")]
    MissingActorBounds,
}

/// Horizontal travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Towards positive x.
    Right,
    /// Towards negative x.
    Left,
}

impl Heading {
    /// `1.0` for [`Heading::Right`], `-1.0` for [`Heading::Left`].
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    /// The opposite heading.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

impl From<StartSide> for Heading {
    fn from(side: StartSide) -> Self {
        match side {
            StartSide::Left => Self::Right,
            StartSide::Right => Self::Left,
        }
    }
}

/// Result of a single [`OscillatingCrosser::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Position to write to the actor's transform.
    pub position: Vec3,
    /// Whether this tick reversed the heading and toggled the mirror flag.
    pub flipped: bool,
}

/// Runtime state of one screen-crossing actor.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatingCrosser {
    config: CrosserConfig,
    position: Vec3,
    heading: Heading,
    velocity: f32,
    screen_half_width: f32,
    actor_half_width: f32,
    mirrored: bool,
}

impl OscillatingCrosser {
    /// Places the actor just off its starting edge, heading inwards.
    ///
    /// Both widths are sampled once here and never re-queried. When
    /// `flip_sprite_at_start` is set the mirror flag is forced on; otherwise
    /// the actor's current flag is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CrosserError::MissingCamera`] or
    /// [`CrosserError::MissingActorBounds`] when a capability has nothing to
    /// report.
    ///
    /// # Examples
    ///
    /// ```
    /// use drift::config::CrosserConfig;
    /// use drift::crosser::{FixedBounds, OrthographicExtent, OscillatingCrosser};
    ///
    /// let camera = OrthographicExtent { half_height: 4.0, aspect: 2.0 };
    /// let crosser = OscillatingCrosser::initialize(
    ///     CrosserConfig::default(),
    ///     &camera,
    ///     &FixedBounds::with_half_width(1.0),
    /// )?;
    /// assert_eq!(crosser.position().x, -9.0);
    /// assert!(crosser.is_moving_right());
    /// # Ok::<(), drift::crosser::CrosserError>(())
    /// ```
    pub fn initialize(
        config: CrosserConfig,
        camera: &impl CameraExtent,
        actor: &impl ActorBounds,
    ) -> Result<Self, CrosserError> {
        let screen_half_width = camera
            .visible_half_width()
            .ok_or(CrosserError::MissingCamera)?;
        let actor_half_width = actor
            .half_width()
            .ok_or(CrosserError::MissingActorBounds)?;

        let heading = Heading::from(config.start_side);
        let turn_at = screen_half_width + actor_half_width;
        let resting = actor.translation();
        let position = Vec3::new(-heading.sign() * turn_at, resting.y, resting.z);

        info!(
            "crosser entering from {:?} at x={:.2} (screen half-width {screen_half_width:.2}, actor half-width {actor_half_width:.2})",
            config.start_side, position.x
        );

        Ok(Self {
            config,
            position,
            heading,
            velocity: heading.sign() * config.horizontal_speed.abs(),
            screen_half_width,
            actor_half_width,
            mirrored: config.flip_sprite_at_start || actor.mirrored(),
        })
    }

    /// Advances the actor by one frame.
    ///
    /// `elapsed_seconds` moves x; `absolute_seconds` alone decides y, so any
    /// y written between ticks is discarded.
    pub fn tick(&mut self, elapsed_seconds: f32, absolute_seconds: f32) -> TickOutcome {
        self.position.x += self.velocity * elapsed_seconds;
        self.position.y = self.height_at(absolute_seconds);

        let turn_at = self.turn_at();
        let flipped = match self.heading {
            Heading::Right => self.position.x > turn_at,
            Heading::Left => self.position.x < -turn_at,
        };
        if flipped {
            self.flip_direction();
        }

        TickOutcome {
            position: self.position,
            flipped,
        }
    }

    /// Adopts the x, z and mirror flag the actor currently shows.
    ///
    /// Hosts call this before [`OscillatingCrosser::tick`] so moves made by
    /// other code accumulate like a transform does. y is not adopted; the
    /// next tick overwrites it.
    pub const fn track(&mut self, translation: Vec3, mirrored: bool) {
        self.position.x = translation.x;
        self.position.z = translation.z;
        self.mirrored = mirrored;
    }

    /// Reverses the heading, negates the velocity and toggles the mirror
    /// flag.
    pub fn flip_direction(&mut self) {
        self.heading = self.heading.reversed();
        self.velocity = -self.velocity;
        self.mirrored = !self.mirrored;
        debug!(
            "crosser turned {:?} at x={:.2}",
            self.heading, self.position.x
        );
    }

    /// Vertical position at absolute time `t`.
    #[must_use]
    pub fn height_at(&self, t: f32) -> f32 {
        let CrosserConfig {
            vertical_amplitude,
            vertical_frequency,
            vertical_offset,
            ..
        } = self.config;
        vertical_amplitude * vertical_frequency.mul_add(t, vertical_offset).sin()
    }

    /// Distance from the screen centre at which the actor turns around.
    #[must_use]
    pub fn turn_at(&self) -> f32 {
        self.screen_half_width + self.actor_half_width
    }

    /// Settings the crosser was initialized with.
    #[must_use]
    pub const fn config(&self) -> &CrosserConfig {
        &self.config
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Current heading.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Whether the actor is heading right.
    #[must_use]
    pub const fn is_moving_right(&self) -> bool {
        matches!(self.heading, Heading::Right)
    }

    /// Signed horizontal velocity; its sign always matches the heading.
    #[must_use]
    pub const fn horizontal_velocity(&self) -> f32 {
        self.velocity
    }

    /// Horizontal mirror flag to apply to the sprite.
    #[must_use]
    pub const fn mirrored(&self) -> bool {
        self.mirrored
    }

    /// Screen half-width captured at initialization.
    #[must_use]
    pub const fn screen_half_width(&self) -> f32 {
        self.screen_half_width
    }

    /// Actor half-width captured at initialization.
    #[must_use]
    pub const fn actor_half_width(&self) -> f32 {
        self.actor_half_width
    }
}
