use std::fmt;

use crate::animation::{ease_in_out_cubic, AnimationTask, Tick};
use crate::model::CubeModel;
use crate::notation::Move;
use crate::rules::CubeRules;
use crate::scene::{PieceHandle, PivotError, Scene};
use crate::turn::TurnSpec;

#[derive(Debug, Clone)]
struct ActiveTurn {
    mv: Move,
    target: f32,
    task: AnimationTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStart {
    Animating { pieces: usize },
    /// Nothing matched the face; the move is already complete.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorError {
    Busy { active: Move },
    Pivot(PivotError),
}

impl fmt::Display for AnimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimatorError::Busy { active } => write!(f, "turn {active} is still animating"),
            AnimatorError::Pivot(err) => write!(f, "pivot: {err}"),
        }
    }
}

impl std::error::Error for AnimatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnimatorError::Pivot(err) => Some(err),
            AnimatorError::Busy { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Idle,
    Animating,
    Completed(Move),
}

/// Owns the mounted scene and runs one face turn at a time.
#[derive(Debug, Clone)]
pub struct CubeAnimator {
    scene: Scene,
    active: Option<ActiveTurn>,
    threshold: f32,
    steps: u32,
}

impl CubeAnimator {
    pub fn new(model: &CubeModel, rules: &CubeRules) -> Self {
        Self {
            scene: model.mount(),
            active: None,
            threshold: rules.face_threshold,
            steps: rules.animation_steps,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Drops any turn in progress and starts over from the template.
    pub fn remount(&mut self, model: &CubeModel) {
        self.scene = model.mount();
        self.active = None;
    }

    pub fn begin(&mut self, mv: Move) -> Result<TurnStart, AnimatorError> {
        if let Some(active) = &self.active {
            return Err(AnimatorError::Busy { active: active.mv });
        }
        let turn = TurnSpec::for_move(mv, self.threshold);
        let members: Vec<PieceHandle> = self.scene.select(|center| turn.selector.matches(center));
        if members.is_empty() {
            return Ok(TurnStart::Skipped);
        }
        let pieces = members.len();
        self.scene
            .attach_pivot(turn.axis(), members)
            .map_err(AnimatorError::Pivot)?;
        self.active = Some(ActiveTurn {
            mv,
            target: turn.angle,
            task: AnimationTask::new(self.steps, ease_in_out_cubic),
        });
        Ok(TurnStart::Animating { pieces })
    }

    /// Advances the active turn by one frame.
    pub fn frame(&mut self) -> FrameOutcome {
        let Some(active) = self.active.as_mut() else {
            return FrameOutcome::Idle;
        };
        match active.task.tick() {
            Tick::Running(eased) => {
                let angle = active.target * eased;
                self.scene.set_pivot_angle(angle);
                FrameOutcome::Animating
            }
            Tick::Finished => {
                let target = active.target;
                let mv = active.mv;
                self.scene.set_pivot_angle(target);
                self.scene.release_pivot();
                self.active = None;
                FrameOutcome::Completed(mv)
            }
        }
    }

    /// Runs the active turn to completion without rendering the steps.
    pub fn finish(&mut self) -> Option<Move> {
        while self.active.is_some() {
            if let FrameOutcome::Completed(mv) = self.frame() {
                return Some(mv);
            }
        }
        None
    }
}
