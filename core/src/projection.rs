use glam::{Vec2, Vec3, Vec4Swizzles};

use crate::camera::OrbitCamera;
use crate::scene::{PieceHandle, Scene};

const AMBIENT: f32 = 0.6;

struct DirectionalLight {
    direction: Vec3,
    intensity: f32,
}

fn lights() -> [DirectionalLight; 2] {
    [
        DirectionalLight {
            direction: Vec3::new(5.0, 5.0, 5.0).normalize(),
            intensity: 1.2,
        },
        DirectionalLight {
            direction: Vec3::new(-5.0, 5.0, -5.0).normalize(),
            intensity: 0.6,
        },
    ]
}

/// One visible, shaded triangle in normalized device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedTriangle {
    pub piece: PieceHandle,
    pub ndc: [Vec2; 3],
    /// sRGB with alpha.
    pub color: [f32; 4],
    /// Eye distance of the owning piece's center.
    pub depth: f32,
}

/// Triangles ordered back to front, ready for painter's-order drawing.
#[derive(Clone, Debug, Default)]
pub struct Projection {
    pub triangles: Vec<ProjectedTriangle>,
}

impl Projection {
    pub fn build(scene: &Scene, camera: &OrbitCamera, aspect: f32) -> Self {
        let view_proj = camera.view_proj(aspect);
        let eye = camera.eye();
        let lights = lights();
        let mut triangles = Vec::new();
        for (handle, piece) in scene.pieces() {
            let Some(world) = scene.world_transform(handle) else {
                continue;
            };
            let depth = world
                .transform_point(piece.geometry.bounds.center())
                .distance(eye);
            for (corners, material) in piece.geometry.triangles() {
                let [a, b, c] = corners.map(|p| world.transform_point(p));
                let normal = (b - a).cross(c - a).normalize_or_zero();
                if normal.dot(eye - a) <= 0.0 {
                    continue;
                }
                let mut ndc = [Vec2::ZERO; 3];
                let mut behind = false;
                for (slot, p) in ndc.iter_mut().zip([a, b, c]) {
                    let clip = view_proj * p.extend(1.0);
                    if clip.w <= f32::EPSILON {
                        behind = true;
                        break;
                    }
                    *slot = clip.xy() / clip.w;
                }
                if behind {
                    continue;
                }
                let base = piece
                    .materials
                    .get(material)
                    .map(|m| m.color)
                    .unwrap_or([1.0, 0.0, 1.0]);
                triangles.push(ProjectedTriangle {
                    piece: handle,
                    ndc,
                    color: shade(base, normal, &lights),
                    depth,
                });
            }
        }
        triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// NDC to pixel coordinates with y pointing down.
pub fn to_screen(ndc: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height)
}

fn shade(srgb: [f32; 3], normal: Vec3, lights: &[DirectionalLight]) -> [f32; 4] {
    let light: f32 = AMBIENT
        + lights
            .iter()
            .map(|l| l.intensity * normal.dot(l.direction).max(0.0))
            .sum::<f32>();
    let [r, g, b] = srgb.map(|c| linear_to_srgb((srgb_to_linear(c) * light).min(1.0)));
    [r, g, b, 1.0]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// `#rrggbb` for an sRGB color.
pub fn css_color(color: [f32; 4]) -> String {
    let [r, g, b, _] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_color_formats_hex() {
        assert_eq!(css_color([1.0, 0.0, 0.5, 1.0]), "#ff0080");
    }

    #[test]
    fn srgb_round_trip() {
        for c in [0.0, 0.02, 0.5, 1.0] {
            assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1e-4);
        }
    }

    #[test]
    fn screen_maps_corners() {
        assert_eq!(to_screen(Vec2::new(-1.0, 1.0), 200.0, 100.0), Vec2::ZERO);
        assert_eq!(
            to_screen(Vec2::new(1.0, -1.0), 200.0, 100.0),
            Vec2::new(200.0, 100.0)
        );
    }
}
