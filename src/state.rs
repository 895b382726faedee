use bevy::prelude::*;

/// `Setup` accepts edits and randomization, `Running` advances the grid.
#[derive(States, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Load,
    Setup,
    Running,
}
