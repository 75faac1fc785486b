// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pose interpolation between two camera keyframes.
//!
//! Camera position is not blended in a straight line. The offset from the
//! orbit pivot is converted to spherical coordinates, the polar and
//! azimuthal angles are lerped independently, and the interpolated zoom is
//! used as the radius. This keeps the orbiting feel of the controls.
//!
//! The angle lerp does not wrap: endpoints straddling the ±π azimuth seam
//! swing the long way around.

use crate::keyframe::{CameraKeyframe, Quat, Vec3};
use crate::rig::CameraPose;

/// Spherical coordinates around +Y.
///
/// `phi` is the polar angle from +Y, `theta` the azimuth around +Y
/// measured from +Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    /// Distance from the origin
    pub radius: f32,
    /// Polar angle (radians)
    pub phi: f32,
    /// Azimuthal angle (radians)
    pub theta: f32,
}

/// Result of evaluating a segment at some `t`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolatedPose {
    /// Camera pose to write into the rig
    pub pose: CameraPose,
    /// Interpolated orbit distance
    pub zoom: f32,
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Interpolate Vec4
    pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
            Self::lerp(a[3], b[3], t),
        ]
    }

    /// Spherical linear interpolation for quaternions (shortest path)
    pub fn slerp(a: Quat, b: Quat, t: f32) -> Quat {
        let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

        // q and -q are the same rotation; pick the closer one
        let mut b = b;
        if dot < 0.0 {
            b = [-b[0], -b[1], -b[2], -b[3]];
            dot = -dot;
        }

        if dot > 0.9995 {
            let result = Self::lerp_vec4(a, b, t);
            let len = (result[0] * result[0]
                + result[1] * result[1]
                + result[2] * result[2]
                + result[3] * result[3])
                .sqrt();
            if len == 0.0 {
                return a;
            }
            return [result[0] / len, result[1] / len, result[2] / len, result[3] / len];
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        [
            a[0] * s0 + b[0] * s1,
            a[1] * s0 + b[1] * s1,
            a[2] * s0 + b[2] * s1,
            a[3] * s0 + b[3] * s1,
        ]
    }

    /// Cartesian offset to spherical coordinates
    pub fn to_spherical(offset: Vec3) -> Spherical {
        let radius = length(offset);
        if radius == 0.0 {
            return Spherical::default();
        }
        Spherical {
            radius,
            theta: offset[0].atan2(offset[2]),
            phi: (offset[1] / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Spherical coordinates to a Cartesian offset
    pub fn from_spherical(s: &Spherical) -> Vec3 {
        let sin_phi_radius = s.phi.sin() * s.radius;
        [
            sin_phi_radius * s.theta.sin(),
            s.phi.cos() * s.radius,
            sin_phi_radius * s.theta.cos(),
        ]
    }

    /// Camera position on the orbit around an interpolated pivot
    pub fn orbit_position(
        start: &CameraKeyframe,
        end: &CameraKeyframe,
        target: Vec3,
        zoom: f32,
        t: f32,
    ) -> Vec3 {
        let start_sph = Self::to_spherical(sub(start.position, start.target));
        let end_sph = Self::to_spherical(sub(end.position, end.target));

        let offset = Self::from_spherical(&Spherical {
            radius: zoom,
            phi: Self::lerp(start_sph.phi, end_sph.phi, t),
            theta: Self::lerp(start_sph.theta, end_sph.theta, t),
        });

        add(target, offset)
    }

    /// Evaluate the full camera pose of the segment `start -> end` at `t`
    pub fn interpolate_pose(start: &CameraKeyframe, end: &CameraKeyframe, t: f32) -> InterpolatedPose {
        let t = t.clamp(0.0, 1.0);

        let target = Self::lerp_vec3(start.target, end.target, t);
        let zoom = Self::lerp(start.zoom, end.zoom, t);

        InterpolatedPose {
            pose: CameraPose {
                position: Self::orbit_position(start, end, target, zoom, t),
                target,
                orientation: Self::slerp(start.orientation, end.orientation, t),
                fov: Self::lerp(start.fov, end.fov, t),
                near: Self::lerp(start.near, end.near, t),
                far: Self::lerp(start.far, end.far, t),
            },
            zoom,
        }
    }
}

pub(crate) fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub(crate) fn length(v: Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::QUAT_IDENTITY;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const EPS: f32 = 1e-4;

    fn quat_close(a: Quat, b: Quat) -> bool {
        // q and -q describe the same rotation
        let same = a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS);
        let flipped = a.iter().zip(b.iter()).all(|(x, y)| (x + y).abs() < EPS);
        same || flipped
    }

    fn y_rotation(angle: f32) -> Quat {
        [0.0, (angle / 2.0).sin(), 0.0, (angle / 2.0).cos()]
    }

    #[test]
    fn test_lerp_endpoints_and_constant() {
        for &t in &[0.0, 0.25, 0.5, 1.0] {
            assert_eq!(Interpolation::lerp(3.0, 3.0, t), 3.0);
        }
        assert_eq!(Interpolation::lerp(2.0, 8.0, 0.0), 2.0);
        assert_eq!(Interpolation::lerp(2.0, 8.0, 1.0), 8.0);
        assert_eq!(Interpolation::lerp_vec3([0.0, 2.0, 4.0], [2.0, 4.0, 8.0], 0.5), [1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_slerp_identity() {
        let q = y_rotation(0.7);
        for &t in &[0.0, 0.3, 0.5, 1.0] {
            assert!(quat_close(Interpolation::slerp(q, q, t), q));
        }
    }

    #[test]
    fn test_slerp_halfway() {
        let mid = Interpolation::slerp(QUAT_IDENTITY, y_rotation(FRAC_PI_2), 0.5);
        assert!(quat_close(mid, y_rotation(FRAC_PI_4)));
    }

    #[test]
    fn test_slerp_takes_short_path() {
        let a = y_rotation(0.2);
        let b = y_rotation(0.6);
        let negated_b = [-b[0], -b[1], -b[2], -b[3]];
        let mid = Interpolation::slerp(a, negated_b, 0.5);
        assert!(quat_close(mid, y_rotation(0.4)));
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = [1.0, 2.0, -3.0];
        let back = Interpolation::from_spherical(&Interpolation::to_spherical(offset));
        for i in 0..3 {
            assert!((offset[i] - back[i]).abs() < EPS);
        }
        assert_eq!(Interpolation::to_spherical([0.0; 3]), Spherical::default());
    }

    #[test]
    fn test_orbit_radius_is_preserved() {
        let start = CameraKeyframe::looking_at([1.0, 1.0, 6.0], [1.0, 1.0, 1.0]);
        let end = CameraKeyframe::looking_at([1.0, 4.0, -3.0], [1.0, 1.0, 1.0]);
        assert!((start.zoom - 5.0).abs() < EPS);
        assert!((end.zoom - 5.0).abs() < EPS);

        for step in 0..=10 {
            let t = step as f32 / 10.0;
            let p = Interpolation::interpolate_pose(&start, &end, t);
            let distance = length(sub(p.pose.position, p.pose.target));
            assert!((distance - 5.0).abs() < EPS, "t={t} distance={distance}");
        }
    }

    #[test]
    fn test_orbit_swings_around_pivot() {
        let start = CameraKeyframe::looking_at([0.0, 0.0, 4.0], [0.0; 3]);
        let end = CameraKeyframe::looking_at([4.0, 0.0, 0.0], [0.0; 3]);
        let mid = Interpolation::interpolate_pose(&start, &end, 0.5).pose.position;
        let expected = 4.0 * FRAC_PI_4.sin();
        assert!((mid[0] - expected).abs() < EPS);
        assert!((mid[2] - expected).abs() < EPS);
        assert!(mid[1].abs() < EPS);
    }

    #[test]
    fn test_crossing_the_seam_goes_the_long_way() {
        // Just left and just right of -Z: theta is near -pi and +pi
        let start = CameraKeyframe::looking_at([-0.1, 0.0, -5.0], [0.0; 3]);
        let end = CameraKeyframe::looking_at([0.1, 0.0, -5.0], [0.0; 3]);
        let mid = Interpolation::interpolate_pose(&start, &end, 0.5).pose.position;
        assert!(mid[0].abs() < 1e-3);
        assert!(mid[1].abs() < 1e-3);
        assert!((mid[2] - start.zoom).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_and_fov_halfway() {
        let a = CameraKeyframe::looking_at([0.0, 0.0, 5.0], [0.0; 3]).with_projection(75.0, 0.01, 20000.0);
        let b = CameraKeyframe::looking_at([0.0, 0.0, 10.0], [0.0; 3])
            .with_projection(50.0, 0.01, 20000.0)
            .with_duration_ms(1000);
        let mid = Interpolation::interpolate_pose(&a, &b, 0.5);
        assert!((mid.zoom - 7.5).abs() < EPS);
        assert!((mid.pose.fov - 62.5).abs() < EPS);
        assert!((length(sub(mid.pose.position, mid.pose.target)) - 7.5).abs() < EPS);
    }

    #[test]
    fn test_t_is_clamped() {
        let a = CameraKeyframe::looking_at([0.0, 0.0, 5.0], [0.0; 3]).with_projection(75.0, 0.1, 100.0);
        let b = CameraKeyframe::looking_at([0.0, 0.0, 10.0], [0.0; 3]).with_projection(50.0, 0.1, 100.0);
        assert_eq!(Interpolation::interpolate_pose(&a, &b, 2.0).pose.fov, 50.0);
        assert_eq!(Interpolation::interpolate_pose(&a, &b, -1.0).pose.fov, 75.0);
    }
}
