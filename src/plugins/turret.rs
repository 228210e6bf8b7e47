// Player turret robot: model spawn and yaw tracking toward the aim point.
use bevy::prelude::*;
use bevy::math::primitives::Cylinder;

use crate::plugins::shooting::AimPoint;

pub const TURRET_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const MUZZLE_OFFSET: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Per-frame (at 60 fps) fraction of the remaining yaw error closed.
const YAW_LERP_PER_FRAME: f32 = 0.1;

pub fn muzzle_position() -> Vec3 {
    TURRET_POSITION + MUZZLE_OFFSET
}

#[derive(Component, Debug, Default)]
pub struct Turret {
    pub yaw: f32,
}

pub struct TurretPlugin;
impl Plugin for TurretPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_turret)
            .add_systems(Update, track_aim);
    }
}

fn spawn_turret(
    mut commands: Commands,
    assets: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(TURRET_POSITION)),
            Turret::default(),
            Name::new("Turret"),
        ))
        .with_children(|parent| {
            // Model faces +Z in the file; spin it to face the playfield.
            parent.spawn(SceneBundle {
                scene: assets.load("models/rayminator.glb#Scene0"),
                transform: Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
                ..default()
            });
        });

    // Pedestal
    commands.spawn(PbrBundle {
        mesh: meshes.add(Mesh::from(Cylinder::new(0.45, 1.0))),
        material: mats.add(StandardMaterial {
            base_color: Color::srgb(0.22, 0.24, 0.28),
            metallic: 0.6,
            perceptual_roughness: 0.4,
            ..default()
        }),
        transform: Transform::from_xyz(TURRET_POSITION.x, 0.5, TURRET_POSITION.z),
        ..default()
    });
}

/// Yaw that points the model's forward axis at `aim` from `from`.
pub fn yaw_toward(from: Vec3, aim: Vec3) -> f32 {
    (aim.x - from.x).atan2(aim.z - from.z) + std::f32::consts::PI
}

/// Shortest signed angle from `a` to `b`.
fn angle_delta(a: f32, b: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let d = (b - a).rem_euclid(tau);
    if d > std::f32::consts::PI { d - tau } else { d }
}

fn track_aim(
    time: Res<Time>,
    aim: Res<AimPoint>,
    mut q: Query<(&mut Transform, &mut Turret)>,
) {
    let frames = time.delta_seconds() * 60.0;
    let t = 1.0 - (1.0 - YAW_LERP_PER_FRAME).powf(frames);
    for (mut transform, mut turret) in &mut q {
        let target = yaw_toward(transform.translation, aim.point);
        turret.yaw += angle_delta(turret.yaw, target) * t;
        transform.rotation = Quat::from_rotation_y(turret.yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn shortest_turn_wraps() {
        assert!((angle_delta(0.1, -0.1) + 0.2).abs() < 1e-5);
        assert!((angle_delta(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn aim_straight_ahead() {
        // Target directly in front (toward -Z) needs no extra turn beyond the model flip.
        let yaw = yaw_toward(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0));
        assert!(angle_delta(yaw, 0.0).abs() < 1e-5, "yaw={yaw}");
        let right = yaw_toward(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        assert!((angle_delta(right, PI / 2.0 + PI)).abs() < 1e-5);
    }
}
