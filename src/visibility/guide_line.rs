//! Vertical guide line from the ground under the ball up to the ball
//!
//! The line is only drawn where it is actually visible: both ends inside the
//! frustum, the ground end not hidden behind the ball, and the top end pulled
//! down to the ball's silhouette when the true bottom of the ball is hidden
//! by the ball itself.

use glam::Vec3;

use super::frustum::Frustum;
use crate::geometry::{Line, Plane, Sphere, safe_normalize, vector_projection, with_z};

/// Margin for the ground point, keeps the line from flickering at the screen edge
pub const GROUND_POINT_EPSILON: f32 = 5.0;
/// Margin for the ball-bottom point
pub const BALL_BOTTOM_EPSILON: f32 = 0.0;
/// How far inside the surface the tangent point sits
pub const TANGENT_INSET: f32 = 2.0;

/// Replacement top point for a guide line whose true end (`bottom`) is hidden by `ball`.
///
/// Finds the point on the ball nearest the camera's sightline to `bottom`, steps
/// just inside the surface there, and intersects the camera ray through that
/// point with the vertical plane through the ball center facing the camera.
/// Only the height of the result is meaningful; x/y stay those of `bottom`.
///
/// `None` when the geometry is degenerate (camera directly above/below the ball).
pub fn tangent_corrected_top(ball: &Sphere, bottom: Vec3, camera: Vec3) -> Option<Vec3> {
    let camera_to_center = ball.center - camera;
    let camera_to_bottom = bottom - camera;
    let projection = vector_projection(camera_to_center, camera_to_bottom) + camera;

    let toward_sightline = safe_normalize(projection - ball.center);
    if toward_sightline == Vec3::ZERO {
        return None;
    }
    let tangent = ball.center + toward_sightline * (ball.radius - TANGENT_INSET);
    let sightline = Line::new(camera, tangent);

    let facing = with_z(camera, ball.center.z) - ball.center;
    let plane = Plane::new(facing, ball.center);
    if plane.normal == Vec3::ZERO {
        return None;
    }

    let hit = plane.intersect_line(&sightline)?;
    Some(with_z(bottom, hit.z))
}

/// Visible guide line from `ground` up toward the bottom of `ball`, or `None` if nothing should be drawn.
///
/// `ground` is the point on the vehicle's ground level directly beneath the ball.
pub fn clip_guide_line(
    ball: &Sphere,
    ground: Vec3,
    camera: Vec3,
    frustum: &Frustum,
) -> Option<Line> {
    if !frustum.contains(ground, GROUND_POINT_EPSILON) {
        return None;
    }

    let bottom = ball.center - Vec3::Z * ball.radius;
    if bottom.z <= ground.z || !frustum.contains(bottom, BALL_BOTTOM_EPSILON) {
        return None;
    }

    if ball.occludes_segment(&Line::new(ground, camera)) {
        return None;
    }

    let top = if ball.occludes_segment(&Line::new(bottom, camera)) {
        tangent_corrected_top(ball, bottom, camera)?
    } else {
        bottom
    };

    Some(Line::new(top, ground))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::Camera;
    use glam::{Quat, Vec2};

    const BALL_RADIUS: f32 = 92.75;

    fn camera_looking_at(location: Vec3, target: Vec3) -> Camera {
        let dir = (target - location).normalize();
        Camera {
            location,
            rotation: Quat::from_rotation_arc(Vec3::X, dir),
            fov_degrees: 90.0,
        }
    }

    fn frustum_for(camera: &Camera) -> Frustum {
        Frustum::new(camera, Vec2::new(1920.0, 1080.0))
    }

    #[test]
    fn test_unoccluded_line_reaches_ball_bottom() {
        // Camera level with the gap under the ball, looking sideways at it
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 400.0), BALL_RADIUS);
        let ground = Vec3::new(0.0, 0.0, 17.0);
        let camera = camera_looking_at(Vec3::new(-1500.0, 0.0, 150.0), Vec3::new(0.0, 0.0, 200.0));
        let line = clip_guide_line(&ball, ground, camera.location, &frustum_for(&camera)).unwrap();
        assert!((line.start - (ball.center - Vec3::Z * BALL_RADIUS)).length() < 1e-3);
        assert_eq!(line.end, ground);
    }

    #[test]
    fn test_bottom_below_ground_suppresses_line() {
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 100.0), BALL_RADIUS);
        let ground = Vec3::new(0.0, 0.0, 17.0);
        let camera = camera_looking_at(Vec3::new(-1500.0, 0.0, 300.0), ball.center);
        assert!(clip_guide_line(&ball, ground, camera.location, &frustum_for(&camera)).is_none());
    }

    #[test]
    fn test_ground_outside_frustum_suppresses_line() {
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 400.0), BALL_RADIUS);
        let ground = Vec3::new(0.0, 0.0, 17.0);
        // Looking away from the ball
        let camera = camera_looking_at(Vec3::new(-1500.0, 0.0, 300.0), Vec3::new(-3000.0, 0.0, 300.0));
        assert!(clip_guide_line(&ball, ground, camera.location, &frustum_for(&camera)).is_none());
    }

    #[test]
    fn test_ground_hidden_behind_ball_suppresses_line() {
        // Camera high above, nearly straight over the ball: the ground point is behind it
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 400.0), BALL_RADIUS);
        let ground = Vec3::new(0.0, 0.0, 17.0);
        let camera = camera_looking_at(Vec3::new(-50.0, 0.0, 1500.0), ground);
        assert!(clip_guide_line(&ball, ground, camera.location, &frustum_for(&camera)).is_none());
    }

    #[test]
    fn test_occluded_bottom_is_pulled_to_silhouette() {
        // Camera above the ball, looking down past it at the ground point
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 300.0), BALL_RADIUS);
        let ground = Vec3::new(0.0, 0.0, 17.0);
        let camera = camera_looking_at(Vec3::new(-1200.0, 0.0, 700.0), ground);
        let bottom = ball.center - Vec3::Z * BALL_RADIUS;
        assert!(ball.occludes_segment(&Line::new(bottom, camera.location)));

        let line = clip_guide_line(&ball, ground, camera.location, &frustum_for(&camera)).unwrap();
        // Pulled below the hidden bottom, onto the visible silhouette
        assert!(line.start.z < bottom.z);
        assert!((line.start.z - 201.74).abs() < 0.05, "{}", line.start.z);
        assert_eq!(line.end, ground);
        assert!((line.start.x - bottom.x).abs() < 1e-4);
        assert!((line.start.y - bottom.y).abs() < 1e-4);
    }

    #[test]
    fn test_camera_straight_above_is_degenerate() {
        let ball = Sphere::new(Vec3::new(0.0, 0.0, 300.0), BALL_RADIUS);
        let bottom = ball.center - Vec3::Z * BALL_RADIUS;
        assert!(tangent_corrected_top(&ball, bottom, Vec3::new(0.0, 0.0, 2000.0)).is_none());
    }
}
