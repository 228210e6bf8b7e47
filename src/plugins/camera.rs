use bevy::prelude::*;

/// Marker for the single gameplay camera used for pointer projection.
#[derive(Component)]
pub struct GameCamera;

/// Fixed framing: low camera looking at the playfield.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 6.0),
            look_at: Vec3::new(0.0, 0.5, 0.0),
            fov_degrees: 50.0,
        }
    }
}

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraConfig>()
            .add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, cfg: Res<CameraConfig>) {
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(cfg.position).looking_at(cfg.look_at, Vec3::Y),
            projection: PerspectiveProjection {
                fov: cfg.fov_degrees.to_radians(),
                near: 0.05,
                far: 200.0,
                ..default()
            }
            .into(),
            ..default()
        },
        GameCamera,
    ));
}
