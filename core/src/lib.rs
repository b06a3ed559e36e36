pub mod animation;
pub mod animator;
pub mod camera;
pub mod controller;
pub mod geometry;
pub mod model;
pub mod notation;
pub mod projection;
pub mod race;
pub mod rules;
pub mod scene;
pub mod scramble;
pub mod turn;

pub use animation::{ease_in_out_cubic, linear, AnimationTask, Easing, Tick};
pub use animator::{AnimatorError, CubeAnimator, FrameOutcome, TurnStart};
pub use camera::OrbitCamera;
pub use controller::{ControllerAction, ControllerState, Effect};
pub use geometry::{Aabb, Axis, Geometry, Primitive, Side, Transform};
pub use model::{CubeModel, Material, ModelError, ModelPiece};
pub use notation::{
    format_sequence, inverse_sequence, parse_algorithm, AlgorithmError, Face, Move,
    MoveParseError, Turn, ALL_MOVES, FACES, TURNS,
};
pub use projection::{css_color, to_screen, ProjectedTriangle, Projection};
pub use race::{RaceCommand, RaceError, RaceOutcome, RacePhase, RaceState};
pub use rules::CubeRules;
pub use scene::{PieceHandle, PivotError, Scene, ScenePiece};
pub use scramble::{scramble, seeded_rng, splitmix64};
pub use turn::{turn_angle, FaceSelector, TurnSpec};

/// The 26-piece cube shipped with the app.
pub const STANDARD_CUBE_JSON: &str = include_str!("../../assets/cube.json");
