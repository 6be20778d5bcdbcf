//! Free-flying first-person camera.
//!
//! Orientation is a yaw/pitch pair in degrees; the orthonormal basis
//! (`front`, `right`, `up`) is derived from it and recomputed on every
//! orientation change. Movement translates along the current basis.
//!
//! # Invariants
//! - `pitch` stays in [-89, 89] degrees at all times; `yaw` is unbounded.
//! - `front`, `right`, `up` are mutually orthogonal unit vectors.
//! - The first cursor sample only seeds the baseline; it never rotates
//!   the camera.
//! - All entry points are called from one thread; there is no internal
//!   synchronization.

use glam::{Mat4, Vec3};
use meadow_input::MoveIntent;

/// Pitch is clamped short of the poles so `front` never becomes parallel
/// to the world up axis.
const PITCH_LIMIT: f32 = 89.0;

/// Cursor tracking state. The transition to `Tracking` happens on the first
/// cursor sample and is permanent for the life of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CursorTracking {
    AwaitingBaseline,
    Tracking { last_x: f64, last_y: f64 },
}

/// Free-flying camera with mouse look and WASD-style movement.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    pub speed: f32,
    pub sensitivity: f32,
    cursor: CursorTracking,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FlyCamera {
    /// Camera at (0, 0, 3) looking down negative Z.
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            speed: 2.5,
            sensitivity: 0.1,
            cursor: CursorTracking::AwaitingBaseline,
        };
        camera.update_basis();
        camera
    }

    /// Horizontal look angle in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Vertical look angle in degrees, within [-89, 89].
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit vector the camera is looking along.
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Unit vector out of the top of the camera.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Feed one absolute cursor sample in pixel space.
    ///
    /// The first sample after construction seeds the delta baseline and
    /// leaves the orientation untouched, so a captured cursor appearing at
    /// an arbitrary position cannot produce a spurious jump. Screen-space Y
    /// grows downward, so pitch increases when the cursor moves up.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let (last_x, last_y) = match self.cursor {
            CursorTracking::AwaitingBaseline => {
                self.cursor = CursorTracking::Tracking { last_x: x, last_y: y };
                return;
            }
            CursorTracking::Tracking { last_x, last_y } => (last_x, last_y),
        };
        self.cursor = CursorTracking::Tracking { last_x: x, last_y: y };

        let x_offset = (x - last_x) as f32 * self.sensitivity;
        let y_offset = (last_y - y) as f32 * self.sensitivity;

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Translate along the current basis for one frame.
    ///
    /// Each held direction contributes independently; held combinations add
    /// up without normalization, so diagonal movement covers more ground per
    /// frame than a single axis. `dt` is seconds since the previous frame
    /// and must be non-negative; the caller guards against clock jumps.
    pub fn apply_movement(&mut self, intent: MoveIntent, dt: f32) {
        let step = self.speed * dt;
        if intent.forward {
            self.position += self.front * step;
        }
        if intent.back {
            self.position -= self.front * step;
        }
        if intent.left {
            self.position -= self.right * step;
        }
        if intent.right {
            self.position += self.right * step;
        }
    }

    /// Right-handed look-at view transform for the current state.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Recompute `front`, `right`, `up` from yaw and pitch.
    ///
    /// `right` comes from `front × world_up` and `up` from `right × front`,
    /// which keeps the three mutually orthonormal even though `world_up`
    /// itself is not part of the final basis.
    fn update_basis(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    /// Seed the cursor baseline so later samples produce deltas.
    fn tracking_camera() -> FlyCamera {
        let mut camera = FlyCamera::new();
        camera.on_cursor_moved(400.0, 300.0);
        camera
    }

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < EPS,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn default_faces_negative_z() {
        let camera = FlyCamera::new();
        assert_vec3_near(camera.front(), Vec3::NEG_Z);
        assert_vec3_near(camera.right(), Vec3::X);
        assert_vec3_near(camera.up(), Vec3::Y);
    }

    #[test]
    fn first_cursor_sample_only_seeds_baseline() {
        let mut camera = FlyCamera::new();
        let yaw = camera.yaw();
        let pitch = camera.pitch();
        let position = camera.position;

        camera.on_cursor_moved(12345.0, -6789.0);

        assert_eq!(camera.yaw(), yaw);
        assert_eq!(camera.pitch(), pitch);
        assert_eq!(camera.position, position);
    }

    #[test]
    fn second_sample_rotates_from_baseline() {
        let mut camera = tracking_camera();
        camera.on_cursor_moved(410.0, 300.0);
        // 10 px right at sensitivity 0.1 -> +1 degree of yaw.
        assert!((camera.yaw() + 89.0).abs() < EPS);
        assert!(camera.pitch().abs() < EPS);
    }

    #[test]
    fn cursor_up_increases_pitch() {
        let mut camera = tracking_camera();
        camera.on_cursor_moved(400.0, 290.0);
        assert!((camera.pitch() - 1.0).abs() < EPS);
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut camera = tracking_camera();
        camera.on_cursor_moved(400.0, -100_000.0);
        assert_eq!(camera.pitch(), 89.0);

        camera.on_cursor_moved(400.0, 100_000.0);
        assert_eq!(camera.pitch(), -89.0);

        // Many small nudges past the limit stay pinned.
        let mut y = 100_000.0;
        for _ in 0..100 {
            y += 50.0;
            camera.on_cursor_moved(400.0, y);
        }
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut camera = tracking_camera();
        let samples = [
            (500.0, 250.0),
            (100.0, 900.0),
            (1e4, -1e4),
            (-3.5, 7.25),
            (0.0, 0.0),
        ];
        for (x, y) in samples {
            camera.on_cursor_moved(x, y);
            let (f, r, u) = (camera.front(), camera.right(), camera.up());
            assert!(f.dot(r).abs() < EPS);
            assert!(f.dot(u).abs() < EPS);
            assert!(r.dot(u).abs() < EPS);
            assert!((f.length() - 1.0).abs() < EPS);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!((u.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn full_yaw_turn_restores_front() {
        let mut camera = tracking_camera();
        let front = camera.front();
        // 3600 px at sensitivity 0.1 -> 360 degrees.
        camera.on_cursor_moved(400.0 + 3600.0, 300.0);
        assert_vec3_near(camera.front(), front);
    }

    #[test]
    fn view_matrix_matches_look_at() {
        let mut camera = FlyCamera::new();
        camera.position = Vec3::new(0.0, 0.0, 15.0);

        let expected = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 15.0),
            Vec3::new(0.0, 0.0, 14.0),
            Vec3::Y,
        );
        let view = camera.view_matrix();
        for (a, b) in view
            .to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
        {
            assert!((a - b).abs() < 1e-6, "expected {expected:?}, got {view:?}");
        }
    }

    #[test]
    fn view_matrix_is_pure() {
        let camera = tracking_camera();
        assert_eq!(camera.view_matrix(), camera.view_matrix());
    }

    #[test]
    fn forward_moves_along_front() {
        let mut camera = FlyCamera::new();
        let start = camera.position;
        camera.apply_movement(
            MoveIntent {
                forward: true,
                ..MoveIntent::none()
            },
            1.0,
        );
        assert_vec3_near(camera.position, start + camera.front() * camera.speed);
    }

    #[test]
    fn opposing_directions_cancel() {
        let mut camera = FlyCamera::new();
        let start = camera.position;
        camera.apply_movement(
            MoveIntent {
                forward: true,
                back: true,
                ..MoveIntent::none()
            },
            0.5,
        );
        assert_vec3_near(camera.position, start);
    }

    #[test]
    fn diagonal_movement_is_faster() {
        let dt = 0.016;

        let mut axis = FlyCamera::new();
        let axis_start = axis.position;
        axis.apply_movement(
            MoveIntent {
                forward: true,
                ..MoveIntent::none()
            },
            dt,
        );
        let axis_distance = (axis.position - axis_start).length();

        let mut diagonal = FlyCamera::new();
        let diagonal_start = diagonal.position;
        diagonal.apply_movement(
            MoveIntent {
                forward: true,
                right: true,
                ..MoveIntent::none()
            },
            dt,
        );
        let diagonal_distance = (diagonal.position - diagonal_start).length();

        assert!(
            (diagonal_distance - axis_distance * 2.0_f32.sqrt()).abs() < EPS,
            "diagonal should be sqrt(2) times an axis move"
        );
    }

    #[test]
    fn idle_intent_does_not_move() {
        let mut camera = FlyCamera::new();
        let start = camera.position;
        camera.apply_movement(MoveIntent::none(), 1.0);
        assert_eq!(camera.position, start);
    }
}
