//! Highway Rush native entry point
//!
//! There is no native renderer; this runs a headless autopilot session so
//! tuning files can be smoke-tested from the command line.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use highway_rush::sim::{GameEvent, GamePhase, HandleLedger, TickInput, tick_with};
    use highway_rush::{GameState, Preset, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "highway-rush")]
    #[command(about = "Headless autopilot run of the Highway Rush simulation")]
    pub struct Args {
        /// Preset name (classic, lanesnap, campaign) or path to a tuning JSON file
        pub preset_or_file: Option<String>,
        /// Run seed
        #[arg(default_value_t = 12345)]
        pub seed: u64,
        /// Stop after this many simulated ticks
        #[arg(default_value_t = 18_000)]
        pub max_ticks: u64,
    }

    fn load_tuning(arg: Option<&str>) -> Tuning {
        let Some(arg) = arg else {
            return Tuning::default();
        };
        if let Some(preset) = Preset::from_str(arg) {
            log::info!("Using preset {}", preset.as_str());
            return Tuning::from_preset(preset);
        }
        match std::fs::read_to_string(arg) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", arg, e);
                Tuning::default()
            }
        }
    }

    pub fn run(args: Args) {
        let tuning = load_tuning(args.preset_or_file.as_deref());
        let mut state = GameState::new(args.seed, tuning);
        let mut ledger = HandleLedger::default();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let start = TickInput {
            start: true,
            advance: true,
            ..idle.clone()
        };

        tick_with(&mut state, &start, &mut ledger);
        let mut ticks = 0u64;
        let mut levels_cleared = 0u32;
        while ticks < args.max_ticks {
            let input = if state.phase == GamePhase::LevelComplete { &start } else { &idle };
            tick_with(&mut state, input, &mut ledger);
            ticks += 1;

            for event in state.drain_events() {
                match event {
                    GameEvent::LevelComplete { .. } => levels_cleared += 1,
                    GameEvent::CampaignComplete { total_score } => {
                        println!("Campaign complete, total score {}", total_score);
                    }
                    _ => {}
                }
            }
            // Cleared levels are advanced above; any other stop ends the run
            if state.phase.is_frozen() && state.phase != GamePhase::LevelComplete {
                break;
            }
        }

        let secs = ticks as f64 / f64::from(highway_rush::consts::TICK_RATE_HZ);
        println!(
            "seed {}: {:?} after {:.1}s, level {}, tier {}, score {} (total {}), levels cleared {}, cars spawned {} released {}",
            args.seed,
            state.phase,
            secs,
            state.level_number(),
            state.progress.tier,
            state.progress.score,
            state.total_score(),
            levels_cleared,
            ledger.spawned,
            ledger.despawned
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Highway Rush (native) starting...");
    cli::run(cli::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::cli::Args;
    use clap::Parser;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["highway-rush"]).expect("no args is valid");
        assert_eq!(args.preset_or_file, None);
        assert_eq!(args.seed, 12345);
        assert_eq!(args.max_ticks, 18_000);
    }

    #[test]
    fn test_args_positional() {
        let args = Args::try_parse_from(["highway-rush", "campaign", "7", "600"]).expect("valid args");
        assert_eq!(args.preset_or_file.as_deref(), Some("campaign"));
        assert_eq!(args.seed, 7);
        assert_eq!(args.max_ticks, 600);
    }

    #[test]
    fn test_args_reject_malformed_numbers() {
        assert!(Args::try_parse_from(["highway-rush", "classic", "abc"]).is_err());
        assert!(Args::try_parse_from(["highway-rush", "classic", "1", "-5"]).is_err());
    }
}
