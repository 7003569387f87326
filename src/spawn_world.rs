//! Demo scene: a 2D camera and one placeholder sprite per configured crosser.
use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::presentation::Crosser;

/// Scene the demo spawns at startup.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref)]
pub struct DemoScene(pub SceneConfig);

/// Tints cycled through by consecutive crossers.
const GHOST_TINTS: [(f32, f32, f32); 3] = [(0.92, 0.95, 1.0), (0.75, 0.85, 1.0), (0.85, 1.0, 0.9)];

/// Spawns the camera and the configured crossers directly into the ECS.
///
/// Crossers start at the origin; `CrosserPlugin` moves them off-screen once
/// the camera has been laid out.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn spawn_world_system(mut commands: Commands, scene: Res<DemoScene>) {
    commands.spawn((Camera2d, Name::new("DriftCamera")));

    let size = Vec2::from(scene.sprite_size);
    for (index, (config, (r, g, b))) in scene
        .crossers
        .iter()
        .zip(GHOST_TINTS.iter().cycle())
        .enumerate()
    {
        commands.spawn((
            Sprite::from_color(Color::srgba(*r, *g, *b, 0.8), size),
            Transform::default(),
            Crosser(*config),
            Name::new(format!("Crosser{index}")),
        ));
    }
}
