use bevy::prelude::*;
use bevy::app::AppExit;
use bevy::time::Fixed;

pub const FIXED_HZ: u64 = 60;

// Core simulation timing & run-control configuration.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / FIXED_HZ as f32;
    }
}

/// Unattended run settings (`--autoplay`, `--runtime <secs>`).
#[derive(Resource, Debug, Clone)]
pub struct AutoConfig {
    pub autoplay: bool,
    pub run_duration_seconds: Option<f32>,
    pub fire_interval_seconds: f32,
}
impl Default for AutoConfig {
    fn default() -> Self {
        Self { autoplay: false, run_duration_seconds: None, fire_interval_seconds: 0.5 }
    }
}
impl AutoConfig {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut cfg = Self::default();
        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--autoplay" => cfg.autoplay = true,
                "--runtime" => {
                    match it.next().and_then(|v| v.parse::<f32>().ok()) {
                        Some(secs) if secs > 0.0 => cfg.run_duration_seconds = Some(secs),
                        _ => warn!("ARGS --runtime expects a positive number of seconds"),
                    }
                }
                _ => {}
            }
        }
        cfg
    }
}

#[derive(Resource, Default)]
pub struct ExitState { pub triggered: bool }

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .init_resource::<AutoConfig>() // respect pre-inserted AutoConfig (from CLI args)
            .insert_resource(ExitState::default())
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ as f64))
            .configure_sets(FixedUpdate, (SimSet::Tick, SimSet::Rules).chain())
            .add_systems(FixedUpdate, tick_state.in_set(SimSet::Tick))
            .add_systems(Update, exit_after_runtime);
    }
}

/// Ordering of the fixed gameplay step. Rules run strictly after the tick counter moves.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    Tick,
    Rules,
}

fn tick_state(mut sim: ResMut<SimState>) {
    sim.advance_fixed();
}

fn exit_after_runtime(
    sim: Res<SimState>,
    auto: Res<AutoConfig>,
    mut exit_state: ResMut<ExitState>,
    mut ev_exit: EventWriter<AppExit>,
) {
    if exit_state.triggered { return; }
    let Some(limit) = auto.run_duration_seconds else { return; };
    if sim.elapsed_seconds >= limit {
        info!("EXIT runtime reached seconds={}", sim.elapsed_seconds);
        exit_state.triggered = true;
        ev_exit.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_autoplay_and_runtime() {
        let cfg = AutoConfig::from_args(args(&["bug_blaster", "--autoplay", "--runtime", "12.5"]));
        assert!(cfg.autoplay);
        assert_eq!(cfg.run_duration_seconds, Some(12.5));
    }

    #[test]
    fn ignores_bad_runtime() {
        let cfg = AutoConfig::from_args(args(&["bug_blaster", "--runtime", "soon"]));
        assert!(!cfg.autoplay);
        assert_eq!(cfg.run_duration_seconds, None);
    }
}
