use bevy::{input::common_conditions::input_just_pressed, prelude::*};
use bevy_pancam::{PanCam, PanCamPlugin};

use crate::{life::Board, prelude::BG_COLOR, state::GameState};

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PanCamPlugin)
            .insert_resource(ClearColor(BG_COLOR))
            .add_systems(OnEnter(GameState::Load), spawn_cam)
            .add_systems(Update, reset_view.run_if(input_just_pressed(KeyCode::Home)));
    }
}

// Init
fn spawn_cam(mut commands: Commands, board: Res<Board>) {
    commands.spawn((
        Camera2d,
        // left button edits cells, so panning lives on the middle button
        PanCam {
            grab_buttons: vec![MouseButton::Middle],
            ..default()
        },
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_translation(board.center.extend(0.0)),
        Msaa::Off,
    ));
}

/// recenter on the board at 1:1 zoom
fn reset_view(
    board: Res<Board>,
    mut cam_query: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    for (mut transform, mut projection) in cam_query.iter_mut() {
        transform.translation = board.center.extend(transform.translation.z);
        projection.scale = 1.0;
    }
}
