use std::ops::Mul;

use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Positive,
    Negative,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Side::Positive => 1.0,
            Side::Negative => -1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Index range drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Primitive {
    pub start: usize,
    pub count: usize,
    pub material: usize,
}

/// Triangle mesh in piece-local space.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub primitives: Vec<Primitive>,
    pub bounds: Aabb,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as local-space corners together with their material slot.
    pub fn triangles(&self) -> impl Iterator<Item = ([Vec3; 3], usize)> + '_ {
        self.primitives.iter().flat_map(move |prim| {
            self.indices[prim.start..prim.start + prim.count]
                .chunks_exact(3)
                .map(move |tri| {
                    (
                        [
                            self.vertices[tri[0] as usize],
                            self.vertices[tri[1] as usize],
                            self.vertices[tri[2] as usize],
                        ],
                        prim.material,
                    )
                })
        })
    }
}

/// Rigid transform: rotation then translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            translation: Vec3::ZERO,
        }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.translation
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            rotation: self.rotation.normalize(),
            translation: self.translation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn aabb_center_is_midpoint() {
        let bounds = Aabb::from_points(&[Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 6.0)])
            .expect("non-empty");
        assert_vec_close(bounds.center(), Vec3::new(1.0, 2.0, 4.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn compose_applies_right_then_left() {
        let spin = Transform::from_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let shift = Transform::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let p = (spin * shift).transform_point(Vec3::ZERO);
        assert_vec_close(p, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn inverse_round_trips_points() {
        let t = Transform {
            rotation: Quat::from_rotation_y(0.7),
            translation: Vec3::new(5.0, -2.0, 1.0),
        };
        let p = Vec3::new(3.0, 4.0, 5.0);
        assert_vec_close(t.inverse().transform_point(t.transform_point(p)), p);
    }
}
