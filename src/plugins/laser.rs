// Laser beam visual: core + glow cylinders stretched from the muzzle to the aim point,
// shown briefly after every shot.
use bevy::prelude::*;
use bevy::math::primitives::Cylinder;

use crate::plugins::events::ShotFiredEvent;
use crate::plugins::tuning::GameTuning;

const CORE_THICKNESS: f32 = 0.05;
const GLOW_THICKNESS: f32 = 0.15;
const GLOW_LENGTH_FACTOR: f32 = 0.8;

#[derive(Component, Debug, Clone, Copy)]
pub enum LaserPart {
    Core,
    Glow,
}

#[derive(Resource, Debug, Default)]
pub struct LaserFlash {
    pub remaining: f32,
    pub start: Vec3,
    pub end: Vec3,
}

pub struct LaserPlugin;
impl Plugin for LaserPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LaserFlash>()
            .add_systems(Startup, spawn_laser)
            .add_systems(Update, (trigger_laser, update_laser).chain());
    }
}

/// Unit cylinder (radius 0.5, height 1 along +Y) placed between `start` and `end`.
pub fn beam_transform(start: Vec3, end: Vec3, thickness: f32, length_factor: f32) -> Transform {
    let delta = end - start;
    let length = delta.length();
    let dir = delta.normalize_or_zero();
    let rotation = if dir == Vec3::ZERO { Quat::IDENTITY } else { Quat::from_rotation_arc(Vec3::Y, dir) };
    Transform {
        translation: start + delta * 0.5,
        rotation,
        scale: Vec3::new(thickness, length * length_factor, thickness),
    }
}

fn spawn_laser(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Cylinder::new(0.5, 1.0));
    commands.spawn((
        PbrBundle {
            mesh: mesh.clone(),
            material: mats.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.0, 0.0),
                emissive: LinearRgba::new(8.0, 0.2, 0.2, 1.0),
                unlit: true,
                ..default()
            }),
            visibility: Visibility::Hidden,
            ..default()
        },
        LaserPart::Core,
    ));
    commands.spawn((
        PbrBundle {
            mesh,
            material: mats.add(StandardMaterial {
                base_color: Color::srgba(1.0, 0.2, 0.2, 0.35),
                unlit: true,
                alpha_mode: AlphaMode::Add,
                ..default()
            }),
            visibility: Visibility::Hidden,
            ..default()
        },
        LaserPart::Glow,
    ));
}

fn trigger_laser(
    mut ev_shot: EventReader<ShotFiredEvent>,
    mut flash: ResMut<LaserFlash>,
    tuning: Res<GameTuning>,
) {
    if let Some(e) = ev_shot.read().last() {
        flash.remaining = tuning.laser_flash_seconds;
        flash.start = e.origin;
        flash.end = e.aim_point;
    }
}

fn update_laser(
    time: Res<Time>,
    mut flash: ResMut<LaserFlash>,
    mut q: Query<(&LaserPart, &mut Transform, &mut Visibility)>,
) {
    let active = flash.remaining > 0.0;
    if active {
        flash.remaining -= time.delta_seconds();
    }
    for (part, mut t, mut vis) in &mut q {
        if !active {
            *vis = Visibility::Hidden;
            continue;
        }
        *t = match part {
            LaserPart::Core => beam_transform(flash.start, flash.end, CORE_THICKNESS, 1.0),
            LaserPart::Glow => beam_transform(flash.start, flash.end, GLOW_THICKNESS, GLOW_LENGTH_FACTOR),
        };
        *vis = Visibility::Visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beam_spans_start_to_end() {
        let start = Vec3::new(0.0, 2.0, 0.0);
        let end = Vec3::new(3.0, 2.0, -4.0);
        let t = beam_transform(start, end, 0.05, 1.0);
        assert!((t.translation - Vec3::new(1.5, 2.0, -2.0)).length() < 1e-5);
        assert!((t.scale.y - 5.0).abs() < 1e-5);
        // Local +Y maps onto the beam direction.
        let axis = t.rotation * Vec3::Y;
        assert!((axis - (end - start).normalize()).length() < 1e-4);
    }

    #[test]
    fn degenerate_beam_does_not_produce_nan() {
        let t = beam_transform(Vec3::ONE, Vec3::ONE, 0.05, 1.0);
        assert!(t.rotation.is_finite());
        assert_eq!(t.scale.y, 0.0);
    }
}
