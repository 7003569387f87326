//! Bevy plugin driving [`OscillatingCrosser`] state from ECS entities.
//!
//! An entity opts in by carrying a [`Crosser`] component next to its
//! `Sprite` and `Transform`. `CrosserPlugin` attaches the runtime
//! [`CrosserState`] once the active orthographic camera has been laid out,
//! then ticks it every frame from `Time`, writing the translation and the
//! sprite's `flip_x`.
//!
//! Initialization failures are not retried. The entity is tagged with
//! [`CrosserHalted`] and a [`CrosserInitFailed`] event is triggered so the
//! host application can decide whether to abort.

use bevy::prelude::*;
use log::{debug, error};
use thiserror::Error;

use crate::config::CrosserConfig;
use crate::crosser::{
    ActorBounds, CrosserError, Heading, OrthographicExtent, OscillatingCrosser,
};

/// Author-facing settings for a screen-crossing entity.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use drift::config::CrosserConfig;
/// use drift::presentation::Crosser;
///
/// fn spawn_ghost(mut commands: Commands) {
///     commands.spawn((
///         Sprite::from_color(Color::WHITE, Vec2::splat(32.0)),
///         Transform::default(),
///         Crosser(CrosserConfig::default()),
///     ));
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[require(Transform)]
pub struct Crosser(pub CrosserConfig);

/// Runtime motion state attached by [`init_crossers_system`].
///
/// Removing it makes the plugin initialize the entity again on the next
/// frame, which is the only way to restart a crosser.
#[derive(Component, Debug, Clone, PartialEq, Deref, DerefMut)]
pub struct CrosserState(pub OscillatingCrosser);

/// Marks a crosser whose initialization failed. Such entities are skipped
/// until the marker is removed.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct CrosserHalted;

/// Event triggered when a crosser cannot be initialized.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("crosser {entity} failed to initialize: {error}")]
pub struct CrosserInitFailed {
    /// Entity that stays halted.
    pub entity: Entity,
    /// Missing precondition.
    pub error: CrosserError,
}

/// Event triggered every time a crosser reverses.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrosserFlipped {
    /// Entity that turned around.
    pub entity: Entity,
    /// Heading after the flip.
    pub heading: Heading,
}

/// Derives the visible extent from an orthographic projection.
///
/// Returns `None` until Bevy's camera systems have computed a non-empty
/// `area`.
#[must_use]
pub fn orthographic_extent(projection: &OrthographicProjection) -> Option<OrthographicExtent> {
    let width = projection.area.width();
    let height = projection.area.height();
    (width > 0.0 && height > 0.0).then(|| OrthographicExtent {
        half_height: height / 2.0,
        aspect: width / height,
    })
}

/// Camera lookup result for one initialization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CameraSample {
    /// No active orthographic camera exists.
    Missing,
    /// A camera exists but its area has not been computed yet.
    Pending,
    Ready(OrthographicExtent),
}

fn sample_camera<'a>(cameras: impl IntoIterator<Item = (&'a Camera, &'a Projection)>) -> CameraSample {
    let mut sample = CameraSample::Missing;
    for (camera, projection) in cameras {
        if !camera.is_active {
            continue;
        }
        let Projection::Orthographic(ortho) = projection else {
            continue;
        };
        match orthographic_extent(ortho) {
            Some(extent) => return CameraSample::Ready(extent),
            None => sample = CameraSample::Pending,
        }
    }
    sample
}

/// [`ActorBounds`] read from a Bevy sprite and its transform.
///
/// The rendered width comes from, in order: `custom_size`, `rect`, the
/// texture atlas cell, or the image asset. It is scaled by the transform's
/// x scale. An image or atlas layout that is still loading has no width yet;
/// see [`SpriteBounds::is_loading`].
#[derive(Clone, Copy)]
pub struct SpriteBounds<'a> {
    /// Sprite being measured.
    pub sprite: &'a Sprite,
    /// Transform the sprite is rendered with.
    pub transform: &'a Transform,
    /// Loaded images, if the asset pipeline is present.
    pub images: Option<&'a Assets<Image>>,
    /// Loaded atlas layouts, if the asset pipeline is present.
    pub layouts: Option<&'a Assets<TextureAtlasLayout>>,
}

/// Outcome of measuring a sprite before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpriteSize {
    Measured(Vec2),
    /// The asset the size depends on has not been added to its store yet.
    Loading,
    Unmeasurable,
}

impl SpriteBounds<'_> {
    fn unscaled_size(&self) -> SpriteSize {
        if let Some(size) = self.sprite.custom_size {
            return SpriteSize::Measured(size);
        }
        if let Some(rect) = self.sprite.rect {
            return SpriteSize::Measured(rect.size());
        }
        if let Some(atlas) = &self.sprite.texture_atlas {
            let Some(layouts) = self.layouts else {
                return SpriteSize::Unmeasurable;
            };
            let Some(layout) = layouts.get(&atlas.layout) else {
                return SpriteSize::Loading;
            };
            return layout
                .textures
                .get(atlas.index)
                .map_or(SpriteSize::Unmeasurable, |cell| {
                    SpriteSize::Measured(cell.size().as_vec2())
                });
        }
        let Some(images) = self.images else {
            return SpriteSize::Unmeasurable;
        };
        images
            .get(&self.sprite.image)
            .map_or(SpriteSize::Loading, |image| {
                SpriteSize::Measured(image.size_f32())
            })
    }

    /// Whether the sprite's size waits on an image or atlas layout that is
    /// not loaded yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.unscaled_size() == SpriteSize::Loading
    }
}

impl ActorBounds for SpriteBounds<'_> {
    fn half_width(&self) -> Option<f32> {
        let SpriteSize::Measured(size) = self.unscaled_size() else {
            return None;
        };
        let width = size.x * self.transform.scale.x.abs();
        (width.is_finite() && width > 0.0).then_some(width / 2.0)
    }

    fn translation(&self) -> Vec3 {
        self.transform.translation
    }

    fn mirrored(&self) -> bool {
        self.sprite.flip_x
    }
}

/// Attaches [`CrosserState`] to crossers that do not have one yet.
///
/// Waits while the camera area is still empty and skips sprites whose image
/// is still loading. A missing camera or sprite halts the entity and
/// triggers [`CrosserInitFailed`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn init_crossers_system(
    mut commands: Commands,
    cameras: Query<(&Camera, &Projection)>,
    images: Option<Res<Assets<Image>>>,
    layouts: Option<Res<Assets<TextureAtlasLayout>>>,
    mut pending: Query<
        (Entity, &Crosser, &mut Transform, Option<&mut Sprite>),
        (Without<CrosserState>, Without<CrosserHalted>),
    >,
) {
    if pending.is_empty() {
        return;
    }

    let camera = match sample_camera(&cameras) {
        CameraSample::Ready(extent) => Some(extent),
        CameraSample::Missing => None,
        CameraSample::Pending => {
            debug!("camera area not laid out yet; deferring crosser initialization");
            return;
        }
    };

    for (entity, crosser, mut transform, sprite) in &mut pending {
        let bounds = sprite.as_deref().map(|sprite_ref| SpriteBounds {
            sprite: sprite_ref,
            transform: &transform,
            images: images.as_deref(),
            layouts: layouts.as_deref(),
        });
        if camera.is_some() && bounds.as_ref().is_some_and(SpriteBounds::is_loading) {
            debug!("sprite of {entity} is still loading; deferring crosser initialization");
            continue;
        }
        match OscillatingCrosser::initialize(crosser.0, &camera, &bounds) {
            Ok(state) => {
                transform.translation = state.position();
                if let Some(mut mirrored) = sprite.filter(|s| s.flip_x != state.mirrored()) {
                    mirrored.flip_x = state.mirrored();
                }
                commands.entity(entity).insert(CrosserState(state));
            }
            Err(err) => halt(&mut commands, entity, err),
        }
    }
}

fn halt(commands: &mut Commands, entity: Entity, error: CrosserError) {
    commands.entity(entity).insert(CrosserHalted);
    commands.trigger(CrosserInitFailed { entity, error });
}

/// Advances every initialized crosser by the frame's `Time`.
///
/// Starts each frame from the entity's current x, z and `flip_x`, so moves
/// and mirroring done by other systems are kept. y is always recomputed. A
/// flip toggles the sprite's `flip_x`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn drive_crossers_system(
    mut commands: Commands,
    time: Res<Time>,
    mut crossers: Query<(Entity, &mut CrosserState, &mut Transform, Option<&mut Sprite>)>,
) {
    let elapsed = time.delta_secs();
    let absolute = time.elapsed_secs();

    for (entity, mut state, mut transform, sprite) in &mut crossers {
        let mirrored = sprite.as_ref().map_or(state.mirrored(), |s| s.flip_x);
        state.track(transform.translation, mirrored);
        let outcome = state.tick(elapsed, absolute);
        transform.translation = outcome.position;
        if !outcome.flipped {
            continue;
        }
        if let Some(mut flipped_sprite) = sprite {
            flipped_sprite.flip_x = !flipped_sprite.flip_x;
        }
        commands.trigger(CrosserFlipped {
            entity,
            heading: state.heading(),
        });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_init_failure(event: On<CrosserInitFailed>) {
    error!("{}", event.event());
}

/// Plugin wiring crosser initialization and motion into `Update`.
///
/// # Responsibilities
///
/// - Registers [`Crosser`] and [`CrosserHalted`] for reflection.
/// - Logs every [`CrosserInitFailed`] at error level.
/// - Runs [`init_crossers_system`] then [`drive_crossers_system`] each frame.
///
/// The host must provide `Time` (normally through `TimePlugin`) and a camera
/// with an orthographic `Projection`.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use drift::CrosserPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(CrosserPlugin)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct CrosserPlugin;

impl Plugin for CrosserPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Crosser>();
        app.register_type::<CrosserHalted>();
        app.add_observer(log_init_failure);
        app.add_systems(
            Update,
            (init_crossers_system, drive_crossers_system).chain(),
        );
    }
}
