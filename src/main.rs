use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    log::{Level, LogPlugin},
    prelude::*,
    window::WindowResolution,
};
use conway_gol_grid::{
    camera::CamPlugin,
    life::LifePlugin,
    prelude::{BORDER_WIDTH_PX, CANVAS_SIZE_PX},
    state::GameState,
};

fn main() {
    let window_size = CANVAS_SIZE_PX + Vec2::splat(4.0 * BORDER_WIDTH_PX + 40.0);
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,conway_gol_grid=debug".into(),
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Game of Life".into(),
                        resizable: true,
                        focused: true,
                        present_mode: bevy::window::PresentMode::AutoNoVsync,
                        mode: bevy::window::WindowMode::Windowed,
                        resolution: WindowResolution::new(window_size.x, window_size.y),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(MeshPickingPlugin)
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .init_state::<GameState>()
        .add_plugins((CamPlugin, LifePlugin))
        .run();
}
