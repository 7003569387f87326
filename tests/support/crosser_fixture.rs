#![cfg(feature = "test-support")]
//! Headless fixture for crosser plugin behavioural tests.
//!
//! The app runs without rendering: `Time` is advanced by hand before each
//! update, and the camera's orthographic area is set directly instead of
//! being computed from a window. Suites share one fixture across examples,
//! so they must run through [`run_serial`].

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use drift::{Crosser, CrosserConfig, CrosserFlipped, CrosserInitFailed, CrosserPlugin};
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};

/// Headless app moved between rspec example closures.
#[derive(Debug, Deref, DerefMut)]
pub struct HeadlessApp(App);

// SAFETY: rspec requires `Send + Sync` fixtures. The app only ever sits
// behind the fixture's mutex and `run_serial` disables parallel examples, so
// no two threads touch it at once.
unsafe impl Send for HeadlessApp {}
unsafe impl Sync for HeadlessApp {}

/// Runs `suite` one example at a time, aborting on the first failure.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(true)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    Runner::new(config, vec![Arc::new(Logger::new(std::io::stdout()))]).run(suite);
}

/// Camera area whose visible half-width is 8.
pub const CAMERA_AREA: Rect = Rect {
    min: Vec2::new(-8.0, -4.5),
    max: Vec2::new(8.0, 4.5),
};

/// Sprite edge length; half of it is the actor half-width.
pub const SPRITE_EDGE: f32 = 2.0;

/// Depth the crosser is spawned at; ticks must preserve it.
pub const CROSSER_DEPTH: f32 = 3.0;

/// Events observed while the app ran.
#[derive(Resource, Debug, Default)]
pub struct Recorded {
    /// Every flip, in order.
    pub flips: Vec<CrosserFlipped>,
    /// Every initialization failure, in order.
    pub failures: Vec<CrosserInitFailed>,
}

fn record_flip(event: On<CrosserFlipped>, mut recorded: ResMut<Recorded>) {
    recorded.flips.push(*event.event());
}

fn record_failure(event: On<CrosserInitFailed>, mut recorded: ResMut<Recorded>) {
    recorded.failures.push(*event.event());
}

/// Which camera the fixture spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSetup {
    /// An active orthographic camera with [`CAMERA_AREA`].
    LaidOut,
    /// An orthographic camera whose area has not been computed yet.
    Unlaid,
    /// No camera at all.
    Absent,
}

/// What the crosser is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSetup {
    /// A plain colour sprite of [`SPRITE_EDGE`] units.
    Colored,
    /// No `Sprite` component.
    Missing,
    /// An image sprite whose asset has not arrived yet. The image is a
    /// 1×1 texture scaled to [`SPRITE_EDGE`].
    PendingImage,
}

/// Image reserved by [`SpriteSetup::PendingImage`].
#[derive(Resource, Debug, Clone)]
struct PendingImage(Handle<Image>);

/// Shared handle to a headless app with one crosser entity.
#[derive(Debug, Clone)]
pub struct CrosserFixture {
    app: Arc<Mutex<HeadlessApp>>,
    crosser: Arc<Mutex<Option<Entity>>>,
}

impl CrosserFixture {
    /// Creates an empty fixture; call [`CrosserFixture::reset`] before use.
    pub fn new() -> Self {
        Self {
            app: Arc::new(Mutex::new(HeadlessApp(App::new()))),
            crosser: Arc::new(Mutex::new(None)),
        }
    }

    /// Rebuilds the app with the given camera and one crosser.
    pub fn reset(&self, config: CrosserConfig, camera: CameraSetup, sprite: SpriteSetup) {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.init_resource::<Recorded>();
        app.add_plugins(CrosserPlugin);
        app.add_observer(record_flip);
        app.add_observer(record_failure);

        let area = match camera {
            CameraSetup::LaidOut => Some(CAMERA_AREA),
            CameraSetup::Unlaid => Some(Rect::default()),
            CameraSetup::Absent => None,
        };
        if let Some(camera_area) = area {
            app.world_mut().spawn((
                Camera::default(),
                Projection::Orthographic(OrthographicProjection {
                    area: camera_area,
                    ..OrthographicProjection::default_2d()
                }),
            ));
        }

        let mut transform = Transform::from_xyz(0.0, 0.0, CROSSER_DEPTH);
        let drawn = match sprite {
            SpriteSetup::Colored => Some(Sprite::from_color(
                Color::WHITE,
                Vec2::splat(SPRITE_EDGE),
            )),
            SpriteSetup::Missing => None,
            SpriteSetup::PendingImage => {
                app.init_resource::<Assets<Image>>();
                let handle = app.world().resource::<Assets<Image>>().reserve_handle();
                app.insert_resource(PendingImage(handle.clone()));
                transform.scale = Vec3::splat(SPRITE_EDGE);
                Some(Sprite::from_image(handle))
            }
        };

        let mut entity = app.world_mut().spawn((transform, Crosser(config)));
        if let Some(drawn_sprite) = drawn {
            entity.insert(drawn_sprite);
        }
        let id = entity.id();

        app.finish();
        app.cleanup();

        *self.app_guard() = HeadlessApp(app);
        *self.crosser.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    /// Locks the underlying `App`, recovering from a poisoned mutex.
    pub fn app_guard(&self) -> MutexGuard<'_, HeadlessApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds the image reserved by [`SpriteSetup::PendingImage`].
    ///
    /// # Panics
    ///
    /// Panics if the fixture was reset with another sprite setup.
    pub fn finish_loading_image(&self) {
        let mut app = self.app_guard();
        let world = app.world_mut();
        let handle = world
            .get_resource::<PendingImage>()
            .map(|pending| pending.0.clone())
            .unwrap_or_else(|| panic!("no image is pending"));
        if let Err(e) = world
            .resource_mut::<Assets<Image>>()
            .insert(handle.id(), Image::default())
        {
            panic!("image could not be inserted: {e}");
        }
    }

    /// Moves the crosser horizontally and to `depth`, as another system
    /// would.
    pub fn shift(&self, dx: f32, depth: f32) {
        let entity = self.crosser();
        let mut app = self.app_guard();
        let mut transform = app
            .world_mut()
            .get_mut::<Transform>(entity)
            .unwrap_or_else(|| panic!("crosser should have a transform"));
        transform.translation.x += dx;
        transform.translation.z = depth;
    }

    /// Sets the sprite's `flip_x` directly.
    pub fn set_sprite_flipped(&self, flipped: bool) {
        let entity = self.crosser();
        let mut app = self.app_guard();
        if let Some(mut sprite) = app.world_mut().get_mut::<Sprite>(entity) {
            sprite.flip_x = flipped;
        }
    }

    /// The crosser entity spawned by the last reset.
    ///
    /// # Panics
    ///
    /// Panics if [`CrosserFixture::reset`] has not run.
    pub fn crosser(&self) -> Entity {
        self.crosser
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or_else(|| panic!("fixture was not reset"))
    }

    /// Advances `Time` by `seconds` and runs one update.
    pub fn tick(&self, seconds: f32) {
        let mut app = self.app_guard();
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    /// Runs `frames` updates of `seconds` each.
    pub fn tick_many(&self, frames: usize, seconds: f32) {
        for _ in 0..frames {
            self.tick(seconds);
        }
    }

    /// Current translation of the crosser.
    pub fn translation(&self) -> Vec3 {
        let entity = self.crosser();
        let app = self.app_guard();
        app.world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
            .unwrap_or_else(|| panic!("crosser should have a transform"))
    }

    /// Whether the crosser's sprite is mirrored.
    pub fn sprite_flipped(&self) -> bool {
        let entity = self.crosser();
        let app = self.app_guard();
        app.world()
            .get::<Sprite>(entity)
            .is_some_and(|sprite| sprite.flip_x)
    }

    /// Whether the crosser entity carries component `C`.
    pub fn has<C: Component>(&self) -> bool {
        let entity = self.crosser();
        let app = self.app_guard();
        app.world().get::<C>(entity).is_some()
    }

    /// Removes component `C` from the crosser.
    pub fn remove<C: Component>(&self) {
        let entity = self.crosser();
        let mut app = self.app_guard();
        app.world_mut().entity_mut(entity).remove::<C>();
    }

    /// Replaces the area of every orthographic camera.
    pub fn set_camera_area(&self, area: Rect) {
        let mut app = self.app_guard();
        let world = app.world_mut();
        let mut query = world.query::<&mut Projection>();
        for mut projection in query.iter_mut(world) {
            if let Projection::Orthographic(ortho) = projection.as_mut() {
                ortho.area = area;
            }
        }
    }

    /// Snapshot of the recorded flips.
    pub fn flips(&self) -> Vec<CrosserFlipped> {
        self.app_guard().world().resource::<Recorded>().flips.clone()
    }

    /// Snapshot of the recorded failures.
    pub fn failures(&self) -> Vec<CrosserInitFailed> {
        self.app_guard()
            .world()
            .resource::<Recorded>()
            .failures
            .clone()
    }
}
