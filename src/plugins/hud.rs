use bevy::prelude::*;

use crate::plugins::events::{LevelClearedEvent, LevelStartedEvent, ScoreChangedEvent};

#[derive(Component)]
pub struct Hud;
#[derive(Component)]
pub struct LevelLabel;
#[derive(Component)]
pub struct ClearedBanner;

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, (update_hud, update_level_label, update_cleared_banner));
    }
}

pub fn score_text(score: u64) -> String {
    format!("Score: {score}")
}

pub fn level_text(level: u32) -> String {
    format!("Level {level}")
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "Score: 0",
            TextStyle { font_size: 28.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        Hud,
    ));

    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Px(8.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|p| {
            p.spawn((
                TextBundle::from_section(
                    "Level 1",
                    TextStyle { font_size: 32.0, color: Color::srgba(1.0, 1.0, 1.0, 0.8), ..default() },
                ),
                LevelLabel,
            ));
        });

    // Level-complete banner, centred, hidden while the level is active.
    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(10.0),
                    ..default()
                },
                visibility: Visibility::Hidden,
                ..default()
            },
            ClearedBanner,
        ))
        .with_children(|p| {
            p.spawn(TextBundle::from_section(
                "Level Complete!",
                TextStyle { font_size: 48.0, color: Color::srgb_u8(0xff, 0xcc, 0x00), ..default() },
            ));
            p.spawn(TextBundle::from_section(
                "Preparing next level...",
                TextStyle { font_size: 26.0, color: Color::WHITE, ..default() },
            ));
        });

    commands.spawn(
        TextBundle::from_section(
            "Shoot: click or press F | Aim: mouse | Restart: R",
            TextStyle { font_size: 18.0, color: Color::srgb(0.75, 0.75, 0.80), ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(10.0),
            ..default()
        }),
    );
}

fn update_hud(mut ev_score: EventReader<ScoreChangedEvent>, mut q_text: Query<&mut Text, With<Hud>>) {
    let Some(latest) = ev_score.read().last() else { return; };
    if let Ok(mut text) = q_text.get_single_mut() {
        text.sections[0].value = score_text(latest.score);
    }
}

fn update_level_label(mut ev_started: EventReader<LevelStartedEvent>, mut q_text: Query<&mut Text, With<LevelLabel>>) {
    let Some(latest) = ev_started.read().last() else { return; };
    if let Ok(mut text) = q_text.get_single_mut() {
        text.sections[0].value = level_text(latest.level);
    }
}

// Shown from the clear until the next level starts.
fn update_cleared_banner(
    mut ev_cleared: EventReader<LevelClearedEvent>,
    mut ev_started: EventReader<LevelStartedEvent>,
    mut q: Query<&mut Visibility, With<ClearedBanner>>,
) {
    let cleared = ev_cleared.read().count() > 0;
    let started = ev_started.read().count() > 0;
    if !cleared && !started { return; }
    if let Ok(mut vis) = q.get_single_mut() {
        *vis = if started { Visibility::Hidden } else { Visibility::Visible };
    }
}
