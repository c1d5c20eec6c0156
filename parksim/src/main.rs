use anyhow::{Context, Result};
use clap::Parser;
use parksim::{run, Schedule};
use parksim_core::observer::read_replay;
use parksim_core::{ConsoleObserver, ObserverRegistry, ReplayRecorder, ScenarioConfig, SimConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    scenario: PathBuf,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 4096)]
    ticks: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Checksum every N ticks (0 = disabled)
    #[arg(long)]
    checksum_frequency: Option<u32>,

    /// Write committed actions to this JSONL file
    #[arg(long)]
    replay_out: Option<PathBuf>,

    /// Run the actions from this replay log instead of the scenario's script
    #[arg(long)]
    replay_in: Option<PathBuf>,

    /// Log every notification through the console observer
    #[arg(long)]
    console: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("Starting parksim...");

    let config = ScenarioConfig::load(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?;

    let schedule = match &args.replay_in {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening replay log {}", path.display()))?;
            let entries = read_replay(BufReader::new(file))
                .with_context(|| format!("reading replay log {}", path.display()))?;
            log::info!("Replaying {} actions from {}", entries.len(), path.display());
            Schedule::new(entries)
        }
        None => Schedule::new(
            config
                .actions
                .iter()
                .map(|scheduled| (scheduled.tick, scheduled.action.clone())),
        ),
    };
    if let Some(last) = schedule.last_tick() {
        if last >= args.ticks {
            log::warn!(
                "Actions scheduled up to tick {} but only {} ticks will run",
                last,
                args.ticks
            );
        }
    }

    let mut sim_config = SimConfig::default();
    if let Some(frequency) = args.checksum_frequency {
        sim_config.checksum_frequency = frequency;
    }

    let mut registry = ObserverRegistry::new();
    if args.console {
        registry.register(Box::new(ConsoleObserver::new()));
    }
    if let Some(path) = &args.replay_out {
        let recorder = ReplayRecorder::file(path)
            .with_context(|| format!("creating replay log {}", path.display()))?;
        registry.register(Box::new(recorder));
    }

    let state = config.build_state();
    log::info!(
        "Initial park: size {} | rating {} | value {}",
        state.park.size,
        state.park.rating,
        state.park.value
    );

    let (_state, summary) = run(state, &schedule, args.ticks, &sim_config, &mut registry);
    drop(registry);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Tick {} (year {}, month {}, day {})",
            summary.ticks,
            summary.year,
            summary.month + 1,
            summary.day + 1
        );
        println!(
            "Park rating {} | size {} | value {}",
            summary.park_rating,
            summary.park_size,
            parksim_core::Money(summary.park_value)
        );
        println!(
            "Cash {} | guests in park {} | heading for park {}",
            parksim_core::Money(summary.cash),
            summary.guests_in_park,
            summary.guests_heading_for_park
        );
        for checkpoint in &summary.checkpoints {
            println!("Checksum @{}: {:016x}", checkpoint.tick, checkpoint.checksum);
        }
        println!("Final checksum: {:016x}", summary.checksum);
    }

    Ok(())
}
