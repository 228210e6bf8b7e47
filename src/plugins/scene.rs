// Static world: lights and ground plane.
use bevy::prelude::*;
use bevy::math::primitives::Plane3d;

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(0x28, 0x2c, 0x34)))
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 400.0,
            })
            .add_systems(Startup, spawn_world);
    }
}

fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(20.0, 20.0)),
        material: mats.add(StandardMaterial {
            base_color: Color::srgb_u8(0x30, 0x30, 0x30),
            perceptual_roughness: 0.9,
            ..default()
        }),
        ..default()
    });
}
