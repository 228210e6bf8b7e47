// Bug visuals: a read-only projection of TargetSet into scene entities.
// Rebuilt on LevelStartedEvent, hidden on destruction, despawned once pruned.
use bevy::prelude::*;
use bevy::math::primitives::{Capsule3d, Cylinder, Sphere};

use crate::plugins::events::LevelStartedEvent;
use crate::plugins::shooting::AimPoint;
use crate::plugins::targets::{TargetId, TargetSet};
use crate::plugins::tuning::GameTuning;

const FLOAT_AMPLITUDE: f32 = 0.1;
const FLOAT_SPEED: f32 = 2.0;
const SPIN_PER_FRAME: f32 = 0.01;
const HOVER_SCALE: f32 = 1.2;

#[derive(Component, Debug)]
pub struct BugVisual {
    pub id: TargetId,
    pub generation: u64,
    pub base: Vec3,
    body_material: Handle<StandardMaterial>,
    color: Color,
}

/// Generation currently mirrored in the scene.
#[derive(Resource, Default, Debug)]
pub struct BugRoster {
    pub generation: u64,
}

#[derive(Resource)]
struct BugMeshes {
    body: Handle<Mesh>,
    head: Handle<Mesh>,
    eye: Handle<Mesh>,
    leg: Handle<Mesh>,
    antenna: Handle<Mesh>,
    eye_material: Handle<StandardMaterial>,
}

impl FromWorld for BugMeshes {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let body = meshes.add(Capsule3d::new(0.15, 0.3));
        let head = meshes.add(Sphere::new(0.15));
        let eye = meshes.add(Sphere::new(0.05));
        let leg = meshes.add(Cylinder::new(0.02, 0.2));
        let antenna = meshes.add(Cylinder::new(0.01, 0.2));
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let eye_material = materials.add(StandardMaterial {
            base_color: Color::BLACK,
            ..default()
        });
        Self { body, head, eye, leg, antenna, eye_material }
    }
}

pub struct BugsPlugin;
impl Plugin for BugsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BugMeshes>()
            .init_resource::<BugRoster>()
            .add_systems(Update, (sync_bug_visuals, animate_bugs).chain());
    }
}

/// Stable per-bug hue, cycling every ten ids.
pub fn bug_color(id: TargetId) -> Color {
    let hue = (id.0 % 10) as f32 * 0.1;
    Color::hsl(hue * 360.0, 0.8, 0.6)
}

fn spawn_bug(
    commands: &mut Commands,
    meshes: &BugMeshes,
    materials: &mut Assets<StandardMaterial>,
    id: TargetId,
    position: Vec3,
    generation: u64,
) {
    let color = bug_color(id);
    let body_material = materials.add(StandardMaterial {
        base_color: color,
        emissive: LinearRgba::from(color) * 0.2,
        perceptual_roughness: 0.3,
        metallic: 0.7,
        ..default()
    });
    let limb_material = materials.add(StandardMaterial { base_color: color, ..default() });

    commands
        .spawn((
            SpatialBundle::from_transform(Transform::from_translation(position)),
            BugVisual { id, generation, base: position, body_material: body_material.clone(), color },
            Name::new(format!("Bug{}", id.0)),
        ))
        .with_children(|p| {
            p.spawn(PbrBundle { mesh: meshes.body.clone(), material: body_material.clone(), ..default() });
            p.spawn(PbrBundle {
                mesh: meshes.head.clone(),
                material: body_material.clone(),
                transform: Transform::from_xyz(0.0, 0.25, 0.0),
                ..default()
            });
            for x in [0.07, -0.07] {
                p.spawn(PbrBundle {
                    mesh: meshes.eye.clone(),
                    material: meshes.eye_material.clone(),
                    transform: Transform::from_xyz(x, 0.3, 0.1),
                    ..default()
                });
            }
            for i in 0..3 {
                let y = -0.05 + i as f32 * 0.15;
                for (x, tilt) in [(0.15, std::f32::consts::FRAC_PI_2 - 0.5), (-0.15, -std::f32::consts::FRAC_PI_2 + 0.5)] {
                    p.spawn(PbrBundle {
                        mesh: meshes.leg.clone(),
                        material: limb_material.clone(),
                        transform: Transform::from_xyz(x, y, 0.0).with_rotation(Quat::from_rotation_z(tilt)),
                        ..default()
                    });
                }
            }
            for (x, tilt) in [(0.08, std::f32::consts::FRAC_PI_4), (-0.08, -std::f32::consts::FRAC_PI_4)] {
                p.spawn(PbrBundle {
                    mesh: meshes.antenna.clone(),
                    material: limb_material.clone(),
                    transform: Transform::from_xyz(x, 0.35, 0.0).with_rotation(Quat::from_rotation_z(tilt)),
                    ..default()
                });
            }
        });
}

fn sync_bug_visuals(
    mut commands: Commands,
    mut ev_started: EventReader<LevelStartedEvent>,
    set: Res<TargetSet>,
    mut roster: ResMut<BugRoster>,
    meshes: Res<BugMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q_bugs: Query<(Entity, &BugVisual, &mut Visibility)>,
) {
    // Only the newest start matters; an older generation has already been replaced.
    let rebuild = ev_started.read().last().is_some_and(|ev| ev.generation == set.generation());
    if rebuild && roster.generation != set.generation() {
        for (e, _, _) in &q_bugs {
            commands.entity(e).despawn_recursive();
        }
        for t in set.targets() {
            spawn_bug(&mut commands, &meshes, &mut materials, t.id, t.position, set.generation());
        }
        roster.generation = set.generation();
        return;
    }
    if !set.is_changed() {
        return;
    }
    for (e, bug, mut vis) in &mut q_bugs {
        match set.get(bug.id) {
            Some(t) if t.destroyed => *vis = Visibility::Hidden,
            Some(_) => {}
            None => commands.entity(e).despawn_recursive(),
        }
    }
}

fn animate_bugs(
    time: Res<Time>,
    aim: Res<AimPoint>,
    tuning: Res<GameTuning>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q: Query<(&BugVisual, &mut Transform, &Visibility)>,
) {
    let t = time.elapsed_seconds();
    let spin = SPIN_PER_FRAME * time.delta_seconds() * 60.0;
    for (bug, mut transform, vis) in &mut q {
        if *vis == Visibility::Hidden {
            continue;
        }
        transform.translation.y = bug.base.y + (t * FLOAT_SPEED + bug.id.0 as f32).sin() * FLOAT_AMPLITUDE;
        transform.rotate_local_y(spin);

        // Hover feedback mirrors the hit test: aim point within the hit radius.
        let hovered = bug.base.distance(aim.point) < tuning.hit_radius;
        let scale = if hovered { HOVER_SCALE } else { 1.0 };
        if transform.scale.x != scale {
            transform.scale = Vec3::splat(scale);
            if let Some(mat) = materials.get_mut(&bug.body_material) {
                mat.emissive = LinearRgba::from(bug.color) * if hovered { 0.5 } else { 0.2 };
            }
        }
    }
}
