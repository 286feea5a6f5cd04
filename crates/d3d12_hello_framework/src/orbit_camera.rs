use std::f32::consts::PI;

use bevy_math::Mat4;
use bevy_math::Vec3;

use crate::input::MouseButtons;

const PHI_MARGIN: f32 = 0.1;
const MIN_RADIUS: f32 = 3.0;
const MAX_RADIUS: f32 = 15.0;

/// Camera orbiting the origin, steered with the mouse.
///
/// Left drag rotates (a quarter degree per pixel), right drag zooms
/// (0.005 units per pixel).
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    theta: f32,
    phi: f32,
    radius: f32,
    last_mouse: (i32, i32),
    world: Mat4,
    view: Mat4,
    proj: Mat4,
}

impl OrbitCamera {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            theta: 1.5 * PI,
            phi: PI / 4.0,
            radius: 5.0,
            last_mouse: (0, 0),
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        camera.set_aspect_ratio(aspect_ratio);
        camera.update_view();
        camera
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.proj = Mat4::perspective_lh(0.25 * PI, aspect_ratio, 1.0, 1000.0);
    }

    pub fn on_mouse_down(&mut self, x: i32, y: i32) {
        self.last_mouse = (x, y);
    }

    pub fn on_mouse_move(&mut self, buttons: MouseButtons, x: i32, y: i32) {
        let dx_pixels = (x - self.last_mouse.0) as f32;
        let dy_pixels = (y - self.last_mouse.1) as f32;

        if buttons.left {
            self.theta += (0.25 * dx_pixels).to_radians();
            self.phi += (0.25 * dy_pixels).to_radians();
            self.phi = self.phi.clamp(PHI_MARGIN, PI - PHI_MARGIN);
        } else if buttons.right {
            self.radius += 0.005 * dx_pixels - 0.005 * dy_pixels;
            self.radius = self.radius.clamp(MIN_RADIUS, MAX_RADIUS);
        }

        self.last_mouse = (x, y);
    }

    /// Eye position from the spherical coordinates.
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.phi.sin() * self.theta.cos(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.sin(),
        )
    }

    pub fn update_view(&mut self) {
        self.view = Mat4::look_at_lh(self.eye(), Vec3::ZERO, Vec3::Y);
    }

    pub fn world_view_proj(&self) -> Mat4 {
        self.proj * self.view * self.world
    }

    /// Column-major floats, laid out the way HLSL's default `column_major`
    /// packing expects for `mul(gWorldViewProj, position)`.
    pub fn world_view_proj_columns(&self) -> [f32; 16] {
        self.world_view_proj().to_cols_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Vec4;

    const LEFT: MouseButtons = MouseButtons { left: true, right: false, middle: false };
    const RIGHT: MouseButtons = MouseButtons { left: false, right: true, middle: false };

    #[test]
    fn starts_looking_at_origin_from_front_above() {
        let camera = OrbitCamera::new(16.0 / 9.0);
        let eye = camera.eye();
        assert!((eye.length() - 5.0).abs() < 1e-4);
        assert!(eye.y > 0.0);
        assert!(eye.z < 0.0);
        assert!(eye.x.abs() < 1e-4);
    }

    #[test]
    fn left_drag_rotates_a_quarter_degree_per_pixel() {
        let mut camera = OrbitCamera::new(1.0);
        let theta = camera.theta();
        camera.on_mouse_down(100, 100);
        camera.on_mouse_move(LEFT, 140, 100);
        assert!((camera.theta() - (theta + 10f32.to_radians())).abs() < 1e-5);
    }

    #[test]
    fn phi_is_clamped_away_from_the_poles() {
        let mut camera = OrbitCamera::new(1.0);
        camera.on_mouse_down(0, 0);
        camera.on_mouse_move(LEFT, 0, 100_000);
        assert!((camera.phi() - (PI - 0.1)).abs() < 1e-5);
        camera.on_mouse_move(LEFT, 0, -100_000);
        assert!((camera.phi() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn right_drag_zooms_within_limits() {
        let mut camera = OrbitCamera::new(1.0);
        camera.on_mouse_down(0, 0);
        camera.on_mouse_move(RIGHT, 100, 0);
        assert!((camera.radius() - 5.5).abs() < 1e-5);
        camera.on_mouse_move(RIGHT, 100_000, 0);
        assert_eq!(camera.radius(), 15.0);
        // Dragging down zooms in.
        camera.on_mouse_move(RIGHT, 100_000, 100_000);
        assert_eq!(camera.radius(), 3.0);
    }

    #[test]
    fn moving_without_buttons_only_tracks_the_cursor() {
        let mut camera = OrbitCamera::new(1.0);
        let before = (camera.theta(), camera.phi(), camera.radius());
        camera.on_mouse_move(MouseButtons::default(), 500, 500);
        assert_eq!(before, (camera.theta(), camera.phi(), camera.radius()));
        camera.on_mouse_move(LEFT, 504, 500);
        assert!((camera.theta() - (before.0 + 1f32.to_radians())).abs() < 1e-5);
    }

    #[test]
    fn origin_projects_to_screen_center_in_front_of_camera() {
        let camera = OrbitCamera::new(4.0 / 3.0);
        let clip = camera.world_view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
