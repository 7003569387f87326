#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for screen-crossing sprites.
//!
//! [`crosser`] holds the engine-independent motion state machine,
//! [`config`] the author-facing settings, and (with the `render` feature)
//! [`presentation`] the Bevy plugin that drives entities from them.
pub mod config;
pub mod constants;
pub mod crosser;
pub mod logging;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod spawn_world;
pub use constants::*;

// Re-export commonly used items
pub use config::{ConfigError, CrosserConfig, SceneConfig, StartSide};
pub use crosser::{
    ActorBounds, CameraExtent, CrosserError, FixedBounds, Heading, OrthographicExtent,
    OscillatingCrosser, TickOutcome,
};
pub use logging::init as init_logging;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::{
    Crosser, CrosserFlipped, CrosserHalted, CrosserInitFailed, CrosserPlugin, CrosserState,
};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use spawn_world::{spawn_world_system, DemoScene};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use drift::prelude::*;
    //! ```

    pub use crate::CrosserConfig;
    pub use crate::OscillatingCrosser;
    pub use crate::StartSide;
    #[cfg(feature = "render")]
    pub use crate::{Crosser, CrosserPlugin};
}
