//! `drift` demo binary.
//!
//! Opens a window and lets ghost sprites cross it, either from a JSON scene
//! file (`--config`) or from a generated scene of `--count` crossers.
use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use drift::{
    init_logging, spawn_world_system, CrosserInitFailed, CrosserPlugin, DemoScene, SceneConfig,
};

/// Ghost sprites drifting across the screen
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene file describing the crossers to spawn
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generated crossers when no scene file is given
    #[arg(short = 'n', long, default_value_t = 4)]
    count: usize,
}

/// Ends the app when a crosser cannot start, so a broken scene is visible
/// immediately.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn exit_on_init_failure(event: On<CrosserInitFailed>, mut exit: MessageWriter<AppExit>) {
    log::error!("aborting: {}", event.event());
    exit.write(AppExit::error());
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let scene = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::generated(args.count),
    };

    let exit = App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_plugins(CrosserPlugin)
        .insert_resource(DemoScene(scene))
        .add_observer(exit_on_init_failure)
        .add_systems(Startup, spawn_world_system)
        .run();

    if let AppExit::Error(code) = exit {
        anyhow::bail!("drift exited with code {code}");
    }
    Ok(())
}
