//! Sector Runner
//!
//! Plays one sector headless: loads the mission configuration and a sector
//! file, walks the player through every trigger and clue, and logs what the
//! mission loop does frame by frame.
//!
//! Run with: cargo run -p sector_runtime -- data/sectors/camp_road.json
//!       or: cargo run --bin sector -- --strict path/to/sector.json
//!
//! Flags:
//! - `--strict` rejects sectors with malformed trigger geometry
//! - `--strings=PATH` text table (default `data/strings/en.json`)
//! - `--max-seconds=N` stop after N seconds of mission time

mod host;
mod walk;
mod world;

use host::HeadlessHost;
use sector_core::Millis;
use sector_mission::{MissionConfig, MissionLoop, MissionMode, SectorDefinition, Validation};
use std::collections::HashMap;
use walk::ScriptedWalk;

const DEFAULT_SECTOR: &str = "data/sectors/camp_road.json";
const DEFAULT_STRINGS: &str = "data/strings/en.json";
const DEFAULT_MAX_SECONDS: f64 = 300.0;
/// Fixed 60 Hz step
const FRAME_TIME: Millis = 1000.0 / 60.0;
/// How long the headless player "reads" an open screen or clue
const READ_TIME: Millis = 2000.0;

struct RunOptions {
    sector: String,
    strings: String,
    validation: Validation,
    max_time: Millis,
}

impl RunOptions {
    fn from_args(args: impl Iterator<Item = String>) -> Self {
        let mut options = Self {
            sector: DEFAULT_SECTOR.to_string(),
            strings: DEFAULT_STRINGS.to_string(),
            validation: Validation::Lenient,
            max_time: DEFAULT_MAX_SECONDS * 1000.0,
        };

        for arg in args {
            if arg == "--strict" {
                options.validation = Validation::Strict;
            } else if let Some(path) = arg.strip_prefix("--strings=") {
                options.strings = path.to_string();
            } else if let Some(value) = arg.strip_prefix("--max-seconds=") {
                match value.parse::<f64>() {
                    Ok(seconds) if seconds > 0.0 => options.max_time = seconds * 1000.0,
                    _ => log::warn!("Ignoring --max-seconds={}", value),
                }
            } else if arg.starts_with("--") {
                log::warn!("Unknown flag {}", arg);
            } else {
                options.sector = arg;
            }
        }

        options
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = RunOptions::from_args(std::env::args().skip(1));
    let config = MissionConfig::load();
    config.log_summary();

    let sector = match SectorDefinition::load_file(&options.sector, options.validation) {
        Ok(sector) => sector,
        Err(e) => {
            log::error!("Cannot load sector {}: {}", options.sector, e);
            std::process::exit(1);
        }
    };

    let strings = match host::load_strings(&options.strings) {
        Ok(strings) => strings,
        Err(e) => {
            log::warn!("No string table at {} ({}), showing raw keys", options.strings, e);
            HashMap::new()
        }
    };

    run(sector, config, HeadlessHost::new(strings), options.max_time);
}

fn run(sector: SectorDefinition, config: MissionConfig, host: HeadlessHost, max_time: Millis) {
    let mut walk = ScriptedWalk::through_sector(&sector);
    let sector_id = sector.id.clone();
    let mut mission = MissionLoop::new(sector, config, host);

    let mut now: Millis = 0.0;
    let mut reading_since: Option<Millis> = None;
    mission.start(now);

    while mission.outcome().is_none() && now < max_time {
        now += FRAME_TIME;

        let input = if mission.mode() == MissionMode::Normal {
            walk.input(mission.state().player_ground(), now)
        } else {
            Default::default()
        };
        let report = mission.tick(now, FRAME_TIME, input);

        if report.mode == MissionMode::InteractionPaused {
            let since = *reading_since.get_or_insert(now);
            if now - since >= READ_TIME {
                mission.close_interaction();
                mission.close_clue();
                reading_since = None;
            }
        } else {
            reading_since = None;
        }

        if walk.is_finished() && mission.state().enemies.is_empty() && !mission.state().boss_spawned {
            log::info!("Walk finished with nothing left to fight, leaving sector");
            mission.request_end();
        }
    }

    if mission.outcome().is_none() {
        log::warn!("Time limit reached in '{}'", sector_id);
    }
    let dropped = mission.shutdown();

    let frames = mission.host().frames();
    match mission.host().report() {
        Some(report) => log::info!(
            "Sector '{}' {:?} after {:.1}s: {} kills, {:.0} damage dealt, {:.0} taken, {} XP, clues {:?} ({} frames drawn)",
            report.sector_id,
            report.outcome,
            report.elapsed / 1000.0,
            report.counters.kills,
            report.counters.damage_dealt,
            report.counters.damage_taken,
            report.counters.xp,
            report.clues,
            frames
        ),
        None => log::info!(
            "Sector '{}' left unfinished, {} timer(s) dropped ({} frames drawn)",
            sector_id,
            dropped,
            frames
        ),
    }
}
