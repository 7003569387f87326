//! Motion defaults and demo scene tuning.
//!
//! The `DEFAULT_*` values match the ones the ghost sprites shipped with and
//! are applied when a crosser configuration omits a field.

/// Horizontal speed in world units per second.
pub const DEFAULT_HORIZONTAL_SPEED: f32 = 3.0;
/// Peak vertical displacement from the origin line.
pub const DEFAULT_VERTICAL_AMPLITUDE: f32 = 1.0;
/// Multiplier applied to absolute time inside the vertical sine.
pub const DEFAULT_VERTICAL_FREQUENCY: f32 = 1.0;
/// Phase added inside the vertical sine.
pub const DEFAULT_VERTICAL_OFFSET: f32 = 0.0;
/// Size of the placeholder sprite used by the demo scene, in world units.
pub const DEFAULT_SPRITE_SIZE: [f32; 2] = [64.0, 64.0];
/// Phase step between consecutive crossers generated by the demo scene, so
/// their vertical paths do not coincide.
pub const DEMO_OFFSET_STEP: f32 = 0.9;
/// Vertical amplitude used by the demo scene, scaled for pixel-sized worlds.
pub const DEMO_VERTICAL_AMPLITUDE: f32 = 120.0;
/// Horizontal speed used by the demo scene, in world units per second.
pub const DEMO_HORIZONTAL_SPEED: f32 = 180.0;
