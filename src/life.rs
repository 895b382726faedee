#![allow(clippy::type_complexity)]

use std::time::Duration;

use bevy::{
    ecs::system::SystemState, input::common_conditions::input_just_pressed, math::vec2,
    picking::pointer::PointerButton, prelude::*, utils::HashMap,
};

use crate::{grid::Grid, prelude::*, state::GameState};

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        let rng = match RNG_SEED {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        app.insert_resource(Board::default())
            .insert_resource(LifeRng(rng))
            .init_resource::<Generation>()
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
                UPDATE_INTERVAL_MS,
            )))
            .add_systems(
                OnEnter(GameState::Load),
                (load_meshes_and_materials, load_cell_board).chain(),
            )
            .add_systems(OnEnter(GameState::Setup), sync_cell_materials)
            .add_systems(OnEnter(GameState::Running), sync_cell_materials)
            .add_systems(
                FixedUpdate,
                advance_generation.run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Update,
                (
                    handle_setup_kbd.run_if(in_state(GameState::Setup)),
                    toggle_setup_and_running.run_if(
                        input_just_pressed(KeyCode::Enter)
                            .and(in_state(GameState::Running).or(in_state(GameState::Setup))),
                    ),
                    quit_on_escape.run_if(input_just_pressed(KeyCode::Escape)),
                    sync_cell_materials.run_if(resource_exists_and_changed::<LifeGrid>),
                ),
            );
    }
}

// ——> SYSTEMS

/// initialize meshes and materials in a resource
fn load_meshes_and_materials(
    world: &mut World,
    params: &mut SystemState<(
        ResMut<Assets<Mesh>>,
        ResMut<Assets<ColorMaterial>>,
        Res<Board>,
    )>,
) {
    let (mut meshes, mut materials, board) = params.get_mut(world);
    let cell_mesh = meshes.add(Rectangle::from_size(board.cell_size));
    let border_vert_mesh = meshes.add(Rectangle::new(
        BORDER_WIDTH_PX,
        board.pixel_size().y + 2.0 * BORDER_WIDTH_PX,
    ));
    let border_horiz_mesh = meshes.add(Rectangle::new(
        board.pixel_size().x + 2.0 * BORDER_WIDTH_PX,
        BORDER_WIDTH_PX,
    ));

    let meshes = HashMap::from([
        ("cell", cell_mesh),
        ("border_vert", border_vert_mesh),
        ("border_horiz", border_horiz_mesh),
    ]);
    let materials = HashMap::from([
        ("border", BORDER_COLOR),
        ("cell_alive", CELL_ALIVE_COLOR),
        ("cell_dead", CELL_DEAD_COLOR),
        ("cell_hovered_alive", CELL_HOVERED_ALIVE_COLOR),
        ("cell_hovered_dead", CELL_HOVERED_DEAD_COLOR),
    ])
    .into_iter()
    .map(|(name, color)| (name, materials.add(ColorMaterial::from_color(color))))
    .collect();
    world.insert_resource(MeshAndMats { meshes, materials });
}

/// build the grid and spawn one entity per cell plus the border around them
fn load_cell_board(
    world: &mut World,
    params: &mut SystemState<(Res<MeshAndMats>, ResMut<NextState<GameState>>)>,
) {
    let board = *world.resource::<Board>();
    let grid = match Grid::new(board.rows, board.cols) {
        Ok(grid) => grid,
        Err(err) => {
            error!("cannot build the board: {err}");
            world.send_event(AppExit::error());
            return;
        }
    };
    info!(rows = board.rows, cols = board.cols, "spawning board");

    let (meshes_and_mats, _) = params.get_mut(world);
    let cell_mesh = meshes_and_mats.mesh("cell");
    let dead_mat = meshes_and_mats.cell_material(false, false);
    let border_vert = meshes_and_mats.mesh("border_vert");
    let border_horiz = meshes_and_mats.mesh("border_horiz");
    let border_mat = meshes_and_mats.material("border");

    let cells_to_spawn = grid
        .cells()
        .map(|(row, col, _)| {
            (
                Cell,
                CellCoord { row, col },
                Mesh2d(cell_mesh.clone()),
                MeshMaterial2d(dead_mat.clone()),
                Transform::from_translation(board.cell_coord_to_translation(row, col))
                    .with_scale(board.cell_scale.extend(1.0)),
            )
        })
        .collect::<Vec<_>>();
    // spawned in the grid's row-major order
    let entities: Vec<_> = world.spawn_batch(cells_to_spawn).collect();
    world.insert_resource(CellEntities(entities));
    world.insert_resource(LifeGrid(grid));

    // cell picking in the setup stage
    world.add_observer(cells_set_hover_on::<Pointer<Over>>(true));
    world.add_observer(cells_set_hover_on::<Pointer<Out>>(false));
    world.add_observer(cells_toggle_on::<Pointer<Down>>());
    world.add_observer(cells_toggle_on::<Pointer<DragEnter>>());

    let half_x = board.pixel_size().x * 0.5 + BORDER_WIDTH_PX * 0.5;
    let half_y = board.pixel_size().y * 0.5 + BORDER_WIDTH_PX * 0.5;
    let borders = [
        (border_vert.clone(), vec2(-half_x, 0.0)),
        (border_vert, vec2(half_x, 0.0)),
        (border_horiz.clone(), vec2(0.0, half_y)),
        (border_horiz, vec2(0.0, -half_y)),
    ]
    .map(|(mesh, offset)| {
        (
            Border,
            MeshMaterial2d(border_mat.clone()),
            Mesh2d(mesh),
            Transform::from_translation((board.center + offset).extend(0.0)),
        )
    });
    world.spawn_batch(borders);

    let (_, mut game_state) = params.get_mut(world);
    game_state.set(GameState::Setup);
}

/// Returns an observer that tracks which cell the pointer is over and, during setup,
/// highlights it.
fn cells_set_hover_on<E>(
    hovered: bool,
) -> impl Fn(
    Trigger<E>,
    Query<(&CellCoord, &mut MeshMaterial2d<ColorMaterial>), With<Cell>>,
    Res<LifeGrid>,
    Res<MeshAndMats>,
    Res<State<GameState>>,
    Commands,
) {
    move |trigger, mut query, grid, meshes_and_mats, state, mut commands| {
        let entity = trigger.entity();
        let Ok((coord, mut material)) = query.get_mut(entity) else {
            return;
        };
        if hovered {
            commands.entity(entity).insert(Hovered);
        } else {
            commands.entity(entity).remove::<Hovered>();
        }
        if matches!(state.get(), GameState::Setup) {
            let alive = grid.get_cell(coord.row, coord.col).unwrap_or_default();
            material.0 = meshes_and_mats.cell_material(alive, hovered);
        }
    }
}

/// Pointer events that can edit a cell.
trait CellPress: Event {
    fn button(&self) -> PointerButton;
}

impl CellPress for Pointer<Down> {
    fn button(&self) -> PointerButton {
        self.event.button
    }
}

// fires once per cell entered, unlike `DragOver`
impl CellPress for Pointer<DragEnter> {
    fn button(&self) -> PointerButton {
        self.event.button
    }
}

/// Returns an observer that flips the life status of the targeted cell during setup.
/// Only the primary button edits; the middle one pans the camera.
fn cells_toggle_on<E: CellPress>() -> impl Fn(
    Trigger<E>,
    Query<&CellCoord, With<Cell>>,
    ResMut<LifeGrid>,
    Res<State<GameState>>,
) {
    move |trigger, query, mut grid, state| {
        if !matches!(state.get(), GameState::Setup)
            || trigger.event().button() != PointerButton::Primary
        {
            return;
        }
        if let Ok(coord) = query.get(trigger.entity()) {
            match grid.toggle_cell(coord.row, coord.col) {
                Ok(alive) => debug!(row = coord.row, col = coord.col, alive, "toggled cell"),
                Err(err) => warn!("rejected edit: {err}"),
            }
        }
    }
}

fn handle_setup_kbd(
    mut grid: ResMut<LifeGrid>,
    mut rng: ResMut<LifeRng>,
    mut generation: ResMut<Generation>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        grid.randomize(&mut rng);
        **generation = 0;
        info!(population = grid.population(), "randomized board");
    } else if keyboard_input.just_pressed(KeyCode::KeyC) {
        grid.clear();
        **generation = 0;
        info!("cleared board");
    }
}

fn toggle_setup_and_running(
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match state.get() {
        GameState::Setup => next_state.set(GameState::Running),
        GameState::Running => next_state.set(GameState::Setup),
        _ => unreachable!(),
    }
    info!("leaving {:?}", state.get());
}

fn quit_on_escape(mut exit: EventWriter<AppExit>) {
    exit.send(AppExit::Success);
}

fn advance_generation(mut grid: ResMut<LifeGrid>, mut generation: ResMut<Generation>) {
    grid.advance();
    **generation += 1;
    debug!(
        generation = **generation,
        population = grid.population(),
        "advanced board"
    );
}

/// Re-reads the whole grid and recolors every cell entity.
fn sync_cell_materials(
    grid: Res<LifeGrid>,
    cell_entities: Res<CellEntities>,
    state: Res<State<GameState>>,
    mut cell_query: Query<(&mut MeshMaterial2d<ColorMaterial>, Has<Hovered>), With<Cell>>,
    meshes_and_mats: Res<MeshAndMats>,
) {
    let setup = matches!(state.get(), GameState::Setup);
    for ((_, _, alive), &entity) in grid.cells().zip(cell_entities.iter()) {
        if let Ok((mut material, hovered)) = cell_query.get_mut(entity) {
            material.0 = meshes_and_mats.cell_material(alive, setup && hovered);
        }
    }
}

// ——> COMPONENTS

#[derive(Component)]
#[require(Mesh2d)]
struct Cell;

/// position of a cell entity in the grid
#[derive(Component, Clone, Copy)]
struct CellCoord {
    row: usize,
    col: usize,
}

/// marks the cell currently under the pointer
#[derive(Component)]
struct Hovered;

#[derive(Component)]
#[require(Mesh2d)]
struct Border;

// ——> RESOURCES

/// the simulated grid
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct LifeGrid(pub Grid);

/// random source used when randomizing the board
#[derive(Resource, Deref, DerefMut)]
pub struct LifeRng(pub fastrand::Rng);

/// generations advanced since the last randomize or clear
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct Generation(pub u64);

/// cell entities in row-major order, matching `Grid::cells`
#[derive(Resource, Deref)]
struct CellEntities(Vec<Entity>);

/// hold handles for meshes and materials
#[derive(Resource, Clone)]
struct MeshAndMats {
    meshes: HashMap<&'static str, Handle<Mesh>>,
    materials: HashMap<&'static str, Handle<ColorMaterial>>,
}

impl MeshAndMats {
    fn mesh(&self, name: &str) -> Handle<Mesh> {
        self.meshes.get(name).cloned().unwrap_or_default()
    }

    fn material(&self, name: &str) -> Handle<ColorMaterial> {
        self.materials.get(name).cloned().unwrap_or_default()
    }

    fn cell_material(&self, alive: bool, hovered: bool) -> Handle<ColorMaterial> {
        self.material(cell_material_name(alive, hovered))
    }
}

fn cell_material_name(alive: bool, hovered: bool) -> &'static str {
    match (alive, hovered) {
        (true, false) => "cell_alive",
        (false, false) => "cell_dead",
        (true, true) => "cell_hovered_alive",
        (false, true) => "cell_hovered_dead",
    }
}

/// Screen layout of the grid. Row 0 is the top row.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Board {
    /// the center of the board
    pub center: Vec2,
    pub rows: usize,
    pub cols: usize,
    /// the size of each individual cell
    pub cell_size: Vec2,
    /// scale of each individual cell (should be 0.0 - 1.0)
    pub cell_scale: Vec2,
}

impl Board {
    /// Lays out enough cells to cover `canvas`, rounding partial cells up.
    pub fn from_canvas(center: Vec2, canvas: Vec2, cell_size: Vec2, cell_scale: Vec2) -> Self {
        Self {
            center,
            rows: (canvas.y / cell_size.y).ceil() as usize,
            cols: (canvas.x / cell_size.x).ceil() as usize,
            cell_size,
            cell_scale,
        }
    }

    /// computes full size of the board in pixels
    #[inline]
    pub fn pixel_size(&self) -> Vec2 {
        vec2(
            self.cols as f32 * self.cell_size.x,
            self.rows as f32 * self.cell_size.y,
        )
    }

    #[inline]
    pub fn cell_coord_to_translation(&self, row: usize, col: usize) -> Vec3 {
        let top_left = self.center + vec2(-0.5, 0.5) * self.pixel_size();
        (top_left + vec2(col as f32 + 0.5, -(row as f32 + 0.5)) * self.cell_size).extend(10.0)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_canvas(BOARD_POS, CANVAS_SIZE_PX, CELL_SIZE_PX, CELL_SCALE)
    }
}
