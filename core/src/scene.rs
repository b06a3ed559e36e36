use std::fmt;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::geometry::{Axis, Geometry, Transform};
use crate::model::Material;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceHandle(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    Root,
    Pivot,
}

#[derive(Debug, Clone)]
pub struct ScenePiece {
    pub name: String,
    pub geometry: Rc<Geometry>,
    pub materials: Vec<Material>,
    /// Relative to `parent`.
    pub local: Transform,
    pub parent: Parent,
}

/// Transient rotation anchor at the cube center.
#[derive(Debug, Clone)]
pub struct Pivot {
    pub axis: Axis,
    pub angle: f32,
    members: Vec<PieceHandle>,
}

impl Pivot {
    pub fn transform(&self) -> Transform {
        Transform::from_rotation(Quat::from_axis_angle(self.axis.unit(), self.angle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotError {
    AlreadyActive,
    UnknownPiece(PieceHandle),
}

impl fmt::Display for PivotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotError::AlreadyActive => write!(f, "a pivot is already attached"),
            PivotError::UnknownPiece(handle) => write!(f, "no piece with handle {}", handle.0),
        }
    }
}

impl std::error::Error for PivotError {}

/// Live piece arena for one mount.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pieces: Vec<ScenePiece>,
    pivot: Option<Pivot>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_piece(
        &mut self,
        name: String,
        geometry: Rc<Geometry>,
        materials: Vec<Material>,
        local: Transform,
    ) -> PieceHandle {
        let handle = PieceHandle(self.pieces.len());
        self.pieces.push(ScenePiece {
            name,
            geometry,
            materials,
            local,
            parent: Parent::Root,
        });
        handle
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn piece(&self, handle: PieceHandle) -> Option<&ScenePiece> {
        self.pieces.get(handle.0)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (PieceHandle, &ScenePiece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(idx, piece)| (PieceHandle(idx), piece))
    }

    pub fn pivot(&self) -> Option<&Pivot> {
        self.pivot.as_ref()
    }

    pub fn world_transform(&self, handle: PieceHandle) -> Option<Transform> {
        let piece = self.pieces.get(handle.0)?;
        Some(self.resolve_world(piece))
    }

    fn resolve_world(&self, piece: &ScenePiece) -> Transform {
        match (piece.parent, &self.pivot) {
            (Parent::Pivot, Some(pivot)) => pivot.transform() * piece.local,
            _ => piece.local,
        }
    }

    /// Center of the piece's local bounding box carried into world space.
    pub fn world_center(&self, handle: PieceHandle) -> Option<Vec3> {
        let piece = self.pieces.get(handle.0)?;
        Some(
            self.resolve_world(piece)
                .transform_point(piece.geometry.bounds.center()),
        )
    }

    /// Handles whose current world center satisfies `pred`.
    pub fn select(&self, mut pred: impl FnMut(Vec3) -> bool) -> Vec<PieceHandle> {
        self.pieces()
            .filter(|(_, piece)| {
                pred(
                    self.resolve_world(piece)
                        .transform_point(piece.geometry.bounds.center()),
                )
            })
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Reparents `members` under a new pivot without moving them.
    pub fn attach_pivot(&mut self, axis: Axis, members: Vec<PieceHandle>) -> Result<(), PivotError> {
        if self.pivot.is_some() {
            return Err(PivotError::AlreadyActive);
        }
        if let Some(&missing) = members.iter().find(|h| h.0 >= self.pieces.len()) {
            return Err(PivotError::UnknownPiece(missing));
        }
        let pivot = Pivot {
            axis,
            angle: 0.0,
            members,
        };
        let to_pivot = pivot.transform().inverse();
        for handle in &pivot.members {
            let piece = &mut self.pieces[handle.0];
            piece.local = to_pivot * piece.local;
            piece.parent = Parent::Pivot;
        }
        self.pivot = Some(pivot);
        Ok(())
    }

    pub fn set_pivot_angle(&mut self, angle: f32) {
        if let Some(pivot) = self.pivot.as_mut() {
            pivot.angle = angle;
        }
    }

    /// Bakes the pivot rotation into each member and returns them to the root.
    pub fn release_pivot(&mut self) -> Vec<PieceHandle> {
        let Some(pivot) = self.pivot.take() else {
            return Vec::new();
        };
        let baked = pivot.transform();
        for handle in &pivot.members {
            let piece = &mut self.pieces[handle.0];
            piece.local = (baked * piece.local).normalized();
            piece.parent = Parent::Root;
        }
        pivot.members
    }

    /// World center of every piece, in handle order.
    pub fn world_positions(&self) -> Vec<Vec3> {
        self.pieces
            .iter()
            .map(|piece| {
                self.resolve_world(piece)
                    .transform_point(piece.geometry.bounds.center())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, Primitive};
    use std::f32::consts::FRAC_PI_2;

    fn unit_geometry() -> Rc<Geometry> {
        let vertices = vec![Vec3::splat(-1.0), Vec3::splat(1.0), Vec3::new(1.0, -1.0, 1.0)];
        Rc::new(Geometry {
            bounds: Aabb::from_points(&vertices).expect("non-empty"),
            vertices,
            indices: vec![0, 1, 2],
            primitives: vec![Primitive {
                start: 0,
                count: 3,
                material: 0,
            }],
        })
    }

    fn scene_with(points: &[Vec3]) -> Scene {
        let geometry = unit_geometry();
        let mut scene = Scene::new();
        for (idx, p) in points.iter().enumerate() {
            scene.add_piece(
                format!("p{idx}"),
                Rc::clone(&geometry),
                Vec::new(),
                Transform::from_translation(*p),
            );
        }
        scene
    }

    #[test]
    fn attach_preserves_world_transform() {
        let mut scene = scene_with(&[Vec3::new(150.0, 0.0, 0.0)]);
        let before = scene.world_center(PieceHandle(0)).expect("piece");
        scene
            .attach_pivot(Axis::X, vec![PieceHandle(0)])
            .expect("attach");
        let after = scene.world_center(PieceHandle(0)).expect("piece");
        assert!((before - after).length() < 1e-4);
    }

    #[test]
    fn release_bakes_rotation() {
        let mut scene = scene_with(&[Vec3::new(0.0, 150.0, 0.0), Vec3::new(0.0, -150.0, 0.0)]);
        scene
            .attach_pivot(Axis::X, vec![PieceHandle(0)])
            .expect("attach");
        scene.set_pivot_angle(FRAC_PI_2);
        let released = scene.release_pivot();
        assert_eq!(released, vec![PieceHandle(0)]);
        assert!(scene.pivot().is_none());
        let moved = scene.world_center(PieceHandle(0)).expect("piece");
        assert!((moved - Vec3::new(0.0, 0.0, 150.0)).length() < 1e-3, "{moved:?}");
        let untouched = scene.world_center(PieceHandle(1)).expect("piece");
        assert!((untouched - Vec3::new(0.0, -150.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn second_pivot_is_rejected() {
        let mut scene = scene_with(&[Vec3::ZERO]);
        scene.attach_pivot(Axis::Y, Vec::new()).expect("attach");
        assert_eq!(
            scene.attach_pivot(Axis::Y, Vec::new()),
            Err(PivotError::AlreadyActive)
        );
        scene.release_pivot();
        assert_eq!(
            scene.attach_pivot(Axis::Y, vec![PieceHandle(4)]),
            Err(PivotError::UnknownPiece(PieceHandle(4)))
        );
    }
}
