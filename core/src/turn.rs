use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::geometry::{Axis, Side};
use crate::notation::{Face, Move, Turn};

/// Picks the pieces of one face by their world-space center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSelector {
    pub axis: Axis,
    pub side: Side,
    pub threshold: f32,
}

impl FaceSelector {
    pub fn for_face(face: Face, threshold: f32) -> Self {
        Self {
            axis: face.axis(),
            side: face.side(),
            threshold,
        }
    }

    pub fn matches(&self, center: Vec3) -> bool {
        self.axis.component(center) * self.side.sign() > self.threshold
    }
}

/// Geometric meaning of a move: which pieces turn, and by how much.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnSpec {
    pub selector: FaceSelector,
    /// Radians about the positive `selector.axis`.
    pub angle: f32,
}

impl TurnSpec {
    pub fn for_move(mv: Move, threshold: f32) -> Self {
        let selector = FaceSelector::for_face(mv.face, threshold);
        Self {
            selector,
            angle: turn_angle(mv),
        }
    }

    pub fn axis(&self) -> Axis {
        self.selector.axis
    }
}

/// Plain turns rotate by -90° about the positive axis of an R/U/F face;
/// L/D/B faces are viewed from the other side so the sign flips.
pub fn turn_angle(mv: Move) -> f32 {
    let quarter = match mv.turn {
        Turn::CounterClockwise => FRAC_PI_2,
        Turn::Clockwise | Turn::Double => -FRAC_PI_2,
    };
    let magnitude = quarter * f32::from(mv.turn.quarter_turns());
    magnitude * mv.face.side().sign()
}
