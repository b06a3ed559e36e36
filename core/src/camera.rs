use glam::{Mat4, Vec3};

use crate::rules::CubeRules;

/// Camera circling the cube center, looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Starts at (800, 800, 800).
    pub fn new(rules: &CubeRules) -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: (1.0f32 / 3.0f32.sqrt()).asin(),
            distance: (800.0f32 * 3.0f32.sqrt())
                .clamp(rules.camera_min_distance, rules.camera_max_distance),
            fov_y: 50f32.to_radians(),
            z_near: 0.1,
            z_far: 10_000.0,
            min_distance: rules.camera_min_distance,
            max_distance: rules.camera_max_distance,
        }
    }

    /// Drag deltas in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let k = 0.005f32;
        self.yaw -= dx * k;
        self.pitch += dy * k;
        let lim = std::f32::consts::FRAC_PI_2 - 0.017;
        self.pitch = self.pitch.clamp(-lim, lim);
    }

    /// Wheel delta in pixels; positive zooms out.
    pub fn zoom(&mut self, delta: f32) {
        let factor = (delta * 0.0015).exp();
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.yaw.cos() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.sin() * self.pitch.cos(),
        )
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.z_near, self.z_far);
        proj * view
    }
}
