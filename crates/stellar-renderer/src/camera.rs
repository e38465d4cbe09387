//! Orbit camera with damping and auto-rotation

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::TAU;

/// Camera uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
    /// World-space camera right vector, for billboards
    pub right: [f32; 3],
    pub _padding0: f32,
    /// World-space camera up vector, for billboards
    pub up: [f32; 3],
    pub _padding1: f32,
}

pub const DEFAULT_DISTANCE: f32 = 30.0;

/// Camera orbiting a target point
pub struct Camera {
    pub distance: f32,
    pub rotation: Quat,
    pub target: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the pending rotation applied each frame
    pub damping: f32,
    pub auto_rotate: bool,
    /// 1.0 is one full orbit every 60 seconds at 60 fps
    pub auto_rotate_speed: f32,

    pending_yaw: f32,
    pending_pitch: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            rotation: Quat::IDENTITY,
            target: Vec3::ZERO,
            aspect: width as f32 / height.max(1) as f32,
            fovy: 75.0_f32.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
            min_distance: 10.0,
            max_distance: 100.0,
            damping: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let offset = self.rotation * Vec3::new(0.0, 0.0, self.distance);
        self.target + offset
    }

    /// Queue a rotation; it is eased in by [`Camera::update`]
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.pending_yaw += delta_x;
        self.pending_pitch += delta_y;
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta).clamp(self.min_distance, self.max_distance);
    }

    /// Per-frame rotation added by auto-rotate
    pub fn auto_rotate_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.auto_rotate_speed
    }

    /// Advance damping and auto-rotation by one frame
    pub fn update(&mut self) {
        if self.auto_rotate {
            self.pending_yaw += self.auto_rotate_angle();
        }

        let yaw = self.pending_yaw * self.damping;
        let pitch = self.pending_pitch * self.damping;
        self.pending_yaw -= yaw;
        self.pending_pitch -= pitch;

        self.apply_rotation(yaw, pitch);
    }

    fn apply_rotation(&mut self, yaw: f32, pitch: f32) {
        // Yaw about world up keeps the horizon level
        let yaw_rotation = Quat::from_axis_angle(Vec3::Y, yaw);

        let right = self.rotation * Vec3::X;
        let pitch_rotation = Quat::from_axis_angle(right, -pitch);

        let mut rotation = (yaw_rotation * self.rotation).normalize();
        let pitched = (pitch_rotation * rotation).normalize();

        // Refuse to pitch over the poles
        if (pitched * Vec3::Z).y.abs() < 0.999 {
            rotation = pitched;
        } else {
            self.pending_pitch = 0.0;
        }

        self.rotation = rotation;
    }

    /// Return to the initial framing
    pub fn reset(&mut self) {
        self.rotation = Quat::IDENTITY;
        self.target = Vec3::ZERO;
        self.distance = DEFAULT_DISTANCE;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let position = self.position();
        let rotation_matrix = Mat4::from_quat(self.rotation.conjugate());
        let translation_matrix = Mat4::from_translation(-position);
        let view = rotation_matrix * translation_matrix;
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn to_uniform(&self, time: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
            position: self.position().to_array(),
            time,
            right: (self.rotation * Vec3::X).to_array(),
            _padding0: 0.0,
            up: (self.rotation * Vec3::Y).to_array(),
            _padding1: 0.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }
}
