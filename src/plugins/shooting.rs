// Aim & fire input.
// Responsible for: projecting the pointer (mouse or touch) onto the aim plane,
// turning clicks / F / touches into queued Shots, and the R restart key.
//
// Depends on:
//  - GameCamera (camera) for the pointer ray
//  - ShotQueue (game_state), drained by the fixed-step rules
//  - ShotFiredEvent / SessionRestartEvent (events)

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::plugins::camera::GameCamera;
use crate::plugins::core_sim::SimState;
use crate::plugins::events::{SessionRestartEvent, ShotFiredEvent};
use crate::plugins::game_state::ShotQueue;
use crate::plugins::targets::Shot;
use crate::plugins::turret::muzzle_position;
use crate::plugins::tuning::GameTuning;

/// Latest world-space aim point on the aim plane.
#[derive(Resource, Debug, Clone, Copy)]
pub struct AimPoint {
    pub point: Vec3,
}
impl Default for AimPoint {
    fn default() -> Self {
        Self { point: Vec3::new(0.0, 1.5, 0.0) }
    }
}

pub struct ShootingPlugin;
impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AimPoint::default())
            .add_systems(Update, (
                update_aim_point,
                handle_fire_input.after(update_aim_point),
                handle_restart_input,
            ));
    }
}

/// Where a ray meets the plane `z = plane_z`, if it does so in front of its origin.
pub fn intersect_aim_plane(origin: Vec3, direction: Vec3, plane_z: f32) -> Option<Vec3> {
    if direction.z.abs() < 1e-6 {
        return None;
    }
    let distance = (plane_z - origin.z) / direction.z;
    if !distance.is_finite() || distance < 0.0 {
        return None;
    }
    Some(origin + direction * distance)
}

fn screen_to_aim(camera: &Camera, cam_t: &GlobalTransform, screen: Vec2, plane_z: f32) -> Option<Vec3> {
    let ray = camera.viewport_to_world(cam_t, screen)?;
    intersect_aim_plane(ray.origin, *ray.direction, plane_z)
}

/// Validate and queue a shot; returns false (and logs) when the shot is discarded.
pub fn queue_shot(
    origin: Vec3,
    aim_point: Vec3,
    timestamp: f32,
    queue: &mut ShotQueue,
    ev_shot: &mut EventWriter<ShotFiredEvent>,
) -> bool {
    match Shot::new(origin, aim_point, timestamp) {
        Ok(shot) => {
            queue.push(shot);
            ev_shot.send(ShotFiredEvent { origin, aim_point });
            true
        }
        Err(e) => {
            debug!("SHOT discarded: {e}");
            false
        }
    }
}

fn update_aim_point(
    mut aim: ResMut<AimPoint>,
    tuning: Res<GameTuning>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_cam: Query<(&Camera, &GlobalTransform), With<GameCamera>>,
    touches: Option<Res<Touches>>,
) {
    let Ok((camera, cam_t)) = q_cam.get_single() else { return; };
    let cursor = q_window.get_single().ok().and_then(|w| w.cursor_position());
    let touch = touches.as_ref().and_then(|t| t.iter().next().map(|t| t.position()));
    let Some(screen) = touch.or(cursor) else { return; };
    if let Some(p) = screen_to_aim(camera, cam_t, screen, tuning.aim_plane_z) {
        aim.point = p;
    }
}

fn handle_fire_input(
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    keys: Option<Res<ButtonInput<KeyCode>>>,
    touches: Option<Res<Touches>>,
    mut aim: ResMut<AimPoint>,
    sim: Res<SimState>,
    tuning: Res<GameTuning>,
    q_cam: Query<(&Camera, &GlobalTransform), With<GameCamera>>,
    mut queue: ResMut<ShotQueue>,
    mut ev_shot: EventWriter<ShotFiredEvent>,
) {
    let origin = muzzle_position();

    // Touch: aim where the finger lands, then fire.
    if let (Some(touches), Ok((camera, cam_t))) = (touches.as_ref(), q_cam.get_single()) {
        for touch in touches.iter_just_pressed() {
            if let Some(p) = screen_to_aim(camera, cam_t, touch.position(), tuning.aim_plane_z) {
                aim.point = p;
            }
            queue_shot(origin, aim.point, sim.elapsed_seconds, &mut queue, &mut ev_shot);
        }
    }

    let clicked = mouse.as_ref().is_some_and(|m| m.just_pressed(MouseButton::Left));
    let key = keys.as_ref().is_some_and(|k| k.just_pressed(KeyCode::KeyF));
    if clicked || key {
        queue_shot(origin, aim.point, sim.elapsed_seconds, &mut queue, &mut ev_shot);
    }
}

fn handle_restart_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut ev_restart: EventWriter<SessionRestartEvent>,
) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::KeyR)) {
        ev_restart.send(SessionRestartEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_from_camera_hits_plane() {
        let origin = Vec3::new(0.0, 0.5, 6.0);
        let dir = (Vec3::new(1.0, 1.5, 0.0) - origin).normalize();
        let p = intersect_aim_plane(origin, dir, 0.0).unwrap();
        assert!((p - Vec3::new(1.0, 1.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn parallel_or_backward_ray_misses() {
        assert!(intersect_aim_plane(Vec3::new(0.0, 0.5, 6.0), Vec3::X, 0.0).is_none());
        assert!(intersect_aim_plane(Vec3::new(0.0, 0.5, 6.0), Vec3::Z, 0.0).is_none());
    }
}
