use std::io::Write;

use clap::Subcommand;
use workout_timer_core::format::format_time;
use workout_timer_core::{
    create_cue_channel, Config, EngineState, ModeProgress, PresetDb, TimerPreset, TimerService,
};

use crate::audio::AudioService;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a preset until it completes (Ctrl-C stops it)
    Run {
        /// Preset id
        id: i64,
        /// Suppress all audio cues for this run
        #[arg(long)]
        silent: bool,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { id, silent } => {
            let db = PresetDb::open()?;
            let preset = db.get(id)?.ok_or_else(|| format!("no preset with id {id}"))?;
            let config = Config::load_or_default();

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_preset(preset, config, silent))
        }
    }
}

async fn run_preset(
    preset: TimerPreset,
    config: Config,
    silent: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cue_tx, cue_rx) = create_cue_channel();
    if !silent && config.audio.enabled {
        // Dropping the receiver otherwise is fine; cue sends are
        // fire-and-forget.
        tokio::spawn(AudioService::new(cue_rx, &config.audio).run());
    }

    let service = TimerService::new(cue_tx);
    let mut snapshots = service.subscribe();
    service.start(&preset)?;

    println!(
        "{} • {} ({})",
        preset.name,
        format_time(preset.total_seconds()),
        preset.mode.as_str()
    );

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = snapshots.borrow_and_update().clone();
                print!("\r\x1b[2K{}", status_line(&state));
                std::io::stdout().flush()?;
                if state.complete {
                    println!();
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                service.stop();
                println!("\nstopped");
                break;
            }
        }
    }
    Ok(())
}

/// Single-line progress display for the current snapshot.
fn status_line(state: &EngineState) -> String {
    if state.complete {
        return format!("Complete • {}", format_time(state.total_seconds));
    }

    let body = if state.in_initial_countdown {
        format!("Get ready: {}s", state.initial_countdown_remaining)
    } else {
        match state.progress {
            ModeProgress::Interval {
                current_minute,
                total_minutes,
            } => format!(
                "Minute {}/{} • {} remaining",
                current_minute + 1,
                total_minutes,
                format_time(state.remaining_seconds())
            ),
            ModeProgress::HoldRest {
                current_repetition,
                is_hold_phase,
                total_repetitions,
                ..
            } => {
                let phase = if is_hold_phase { "HOLD" } else { "REST" };
                let left = state.phase_remaining_seconds().unwrap_or(0);
                format!(
                    "Rep {}/{} • {phase} {left}s",
                    current_repetition + 1,
                    total_repetitions
                )
            }
        }
    };

    if state.paused {
        format!("Paused • {body}")
    } else {
        body
    }
}
