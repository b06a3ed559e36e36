/// A piece belongs to a face once its center is this far out along the face axis.
pub const FACE_THRESHOLD: f32 = 115.0;
/// Frames per turn; progress advances by `1 / ANIMATION_STEPS` each frame.
pub const ANIMATION_STEPS: u32 = 10;
pub const SCRAMBLE_LENGTH: usize = 20;
pub const RACE_LENGTH_MIN: usize = 1;
pub const RACE_LENGTH_MAX: usize = 50;
pub const RACE_LENGTH_DEFAULT: usize = 5;
pub const RECENT_MOVES_LEN: usize = 10;
pub const CAMERA_MIN_DISTANCE: f32 = 700.0;
pub const CAMERA_MAX_DISTANCE: f32 = 2000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeRules {
    pub face_threshold: f32,
    pub animation_steps: u32,
    pub scramble_length: usize,
    pub race_length_min: usize,
    pub race_length_max: usize,
    pub recent_moves_len: usize,
    pub camera_min_distance: f32,
    pub camera_max_distance: f32,
}

impl Default for CubeRules {
    fn default() -> Self {
        Self {
            face_threshold: FACE_THRESHOLD,
            animation_steps: ANIMATION_STEPS,
            scramble_length: SCRAMBLE_LENGTH,
            race_length_min: RACE_LENGTH_MIN,
            race_length_max: RACE_LENGTH_MAX,
            recent_moves_len: RECENT_MOVES_LEN,
            camera_min_distance: CAMERA_MIN_DISTANCE,
            camera_max_distance: CAMERA_MAX_DISTANCE,
        }
    }
}
