// "Code rain" backdrop: small green motes drifting toward the camera and recycling far away.
use bevy::prelude::*;
use bevy::math::primitives::Sphere;
use rand::prelude::*;

#[derive(Resource, Debug, Clone, Copy)]
pub struct CodeRainConfig {
    pub count: usize,
    pub depth: f32,
    pub half_width: f32,
    pub half_height: f32,
    /// Motes past this z are sent back to their start depth.
    pub recycle_z: f32,
}
impl Default for CodeRainConfig {
    fn default() -> Self {
        Self { count: 200, depth: 20.0, half_width: 20.0, half_height: 10.0, recycle_z: 5.0 }
    }
}

#[derive(Component)]
struct Mote {
    start_z: f32,
    speed: f32, // units per 60 Hz frame
}

pub struct BackgroundPlugin;
impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CodeRainConfig>()
            .add_systems(Startup, setup_code_rain)
            .add_systems(Update, drift_code_rain);
    }
}

fn setup_code_rain(
    mut commands: Commands,
    cfg: Res<CodeRainConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(1.0).mesh().uv(8, 8));
    let shades: Vec<Handle<StandardMaterial>> = (0..4)
        .map(|i| {
            mats.add(StandardMaterial {
                base_color: Color::srgba(0.0, 0.8, 0.3, 0.6 + i as f32 * 0.1),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })
        })
        .collect();
    let mut rng = thread_rng();
    for _ in 0..cfg.count {
        let x = rng.gen_range(-cfg.half_width..=cfg.half_width);
        let y = rng.gen_range(-cfg.half_height..=cfg.half_height);
        let z = -rng.gen_range(0.0..=cfg.depth) - 5.0;
        let size = rng.gen_range(0.1..0.4);
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: shades[rng.gen_range(0..shades.len())].clone(),
                transform: Transform::from_xyz(x, y, z).with_scale(Vec3::splat(size)),
                ..default()
            },
            Mote { start_z: z, speed: rng.gen_range(0.02..0.07) },
        ));
    }
}

fn drift_code_rain(
    time: Res<Time>,
    cfg: Res<CodeRainConfig>,
    mut q: Query<(&mut Transform, &Mote)>,
) {
    let frames = time.delta_seconds() * 60.0;
    for (mut t, mote) in &mut q {
        t.translation.z += mote.speed * frames;
        if t.translation.z > cfg.recycle_z {
            t.translation.z = mote.start_z;
        }
    }
}
