// Particle & FX systems: bug explosions (sparks + fading light) and laser impact sparks.
use bevy::prelude::*;
use bevy::color::Alpha;
use bevy::math::primitives::Sphere;
use rand::prelude::*;

use crate::plugins::events::{ShotFiredEvent, TargetDestroyedEvent};
use crate::plugins::targets::TargetSet;
use crate::plugins::tuning::GameTuning;

pub struct ParticlePlugin;

const EXPLOSION_SPARKS: usize = 20;
const IMPACT_SPARKS: usize = 8;
// Peak explosion light, scaled by remaining life.
const EXPLOSION_LIGHT_LUMENS: f32 = 60_000.0;
// Velocity multiplier applied per 60 Hz frame.
const SPARK_DRAG_PER_FRAME: f32 = 0.95;

#[derive(Component)]
struct Particle {
    life: f32,
    decay: f32, // life lost per second
    vel: Vec3,
    size: f32,
    generation: u64,
    material: Handle<StandardMaterial>,
}

/// Fading light at the centre of a bug explosion. Tied to the target set generation that spawned it.
#[derive(Component)]
pub struct Explosion {
    life: f32,
    duration: f32,
    pub generation: u64,
}

#[derive(Resource)]
struct SparkMesh(Handle<Mesh>);

impl FromWorld for SparkMesh {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self(meshes.add(Sphere::new(1.0)))
    }
}

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SparkMesh>()
            .add_systems(Update, (
                despawn_stale_fx,
                spawn_explosion_on_hit,
                spawn_impact_sparks,
                update_particles,
                update_explosions,
            ).chain());
    }
}

/// Random direction on the unit sphere (angle/phi parameterisation).
fn spark_direction(rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let phi = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(angle.sin() * phi.cos(), angle.sin() * phi.sin(), angle.cos())
}

fn spawn_spark(
    commands: &mut Commands,
    mesh: &Handle<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pos: Vec3,
    particle_color: Color,
    vel: Vec3,
    size: f32,
    decay: f32,
    generation: u64,
) {
    let material = materials.add(StandardMaterial {
        base_color: particle_color.with_alpha(0.8),
        unlit: true,
        alpha_mode: AlphaMode::Add,
        ..default()
    });
    commands.spawn((
        PbrBundle {
            mesh: mesh.clone(),
            material: material.clone(),
            transform: Transform::from_translation(pos).with_scale(Vec3::splat(size)),
            ..default()
        },
        Particle { life: 1.0, decay, vel, size, generation, material },
    ));
}

fn spawn_explosion_on_hit(
    mut ev: EventReader<TargetDestroyedEvent>,
    mut commands: Commands,
    mesh: Res<SparkMesh>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tuning: Res<GameTuning>,
) {
    let duration = tuning.explosion_seconds.max(0.05);
    for e in ev.read() {
        let mut rng = thread_rng();
        for _ in 0..EXPLOSION_SPARKS {
            let speed = rng.gen_range(0.1..0.3);
            let size = rng.gen_range(0.1..0.3);
            spawn_spark(
                &mut commands,
                &mesh.0,
                &mut materials,
                e.position,
                Color::srgb_u8(0xff, 0x66, 0x00),
                spark_direction(&mut rng) * speed,
                size,
                1.5,
                e.generation,
            );
        }
        commands.spawn((
            PointLightBundle {
                point_light: PointLight {
                    color: Color::srgb_u8(0xff, 0x55, 0x00),
                    intensity: EXPLOSION_LIGHT_LUMENS,
                    range: 5.0,
                    shadows_enabled: false,
                    ..default()
                },
                transform: Transform::from_translation(e.position),
                ..default()
            },
            Explosion { life: duration, duration, generation: e.generation },
        ));
    }
}

fn spawn_impact_sparks(
    mut ev: EventReader<ShotFiredEvent>,
    mut commands: Commands,
    mesh: Res<SparkMesh>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    set: Res<TargetSet>,
) {
    for e in ev.read() {
        let mut rng = thread_rng();
        for _ in 0..IMPACT_SPARKS {
            let speed = rng.gen_range(0.05..0.15);
            let size = rng.gen_range(0.02..0.06);
            spawn_spark(
                &mut commands,
                &mesh.0,
                &mut materials,
                e.aim_point,
                Color::srgb(1.0, 0.1, 0.1),
                spark_direction(&mut rng) * speed,
                size,
                4.0,
                set.generation(),
            );
        }
    }
}

fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_seconds();
    let drag = SPARK_DRAG_PER_FRAME.powf(dt * 60.0);
    for (e, mut t, mut p) in &mut q {
        let step = p.vel * dt * 5.0;
        t.translation += step;
        p.vel *= drag;
        p.life -= dt * p.decay;
        if p.life <= 0.0 {
            materials.remove(&p.material);
            commands.entity(e).despawn_recursive();
            continue;
        }
        t.scale = Vec3::splat(p.size);
        if let Some(mat) = materials.get_mut(&p.material) {
            mat.base_color.set_alpha(p.life * 0.8);
        }
    }
}

fn update_explosions(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut PointLight, &mut Explosion)>,
) {
    let dt = time.delta_seconds();
    for (e, mut light, mut ex) in &mut q {
        ex.life -= dt;
        if ex.life <= 0.0 {
            commands.entity(e).despawn_recursive();
            continue;
        }
        light.intensity = EXPLOSION_LIGHT_LUMENS * (ex.life / ex.duration);
    }
}

/// Regenerating the target set tears down effects owned by the previous set.
fn despawn_stale_fx(
    mut commands: Commands,
    set: Res<TargetSet>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q_particles: Query<(Entity, &Particle)>,
    q_explosions: Query<(Entity, &Explosion)>,
) {
    if !set.is_changed() {
        return;
    }
    let current = set.generation();
    for (e, p) in &q_particles {
        if p.generation != current {
            materials.remove(&p.material);
            commands.entity(e).despawn_recursive();
        }
    }
    for (e, ex) in &q_explosions {
        if ex.generation != current {
            commands.entity(e).despawn_recursive();
        }
    }
}
