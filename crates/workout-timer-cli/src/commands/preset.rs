use clap::Subcommand;
use workout_timer_core::{Config, CueStyle, PresetDb, TimerMode, TimerPreset};

#[derive(Subcommand)]
pub enum PresetAction {
    /// Create a preset
    Add {
        /// Preset name
        name: String,
        /// Timer mode: "interval" or "hold_rest"
        #[arg(long, default_value = "interval")]
        mode: String,
        /// Interval mode: total minutes (2-120)
        #[arg(long)]
        minutes: Option<u32>,
        /// HoldRest mode: hold phase seconds (1-60)
        #[arg(long)]
        hold: Option<u32>,
        /// HoldRest mode: rest phase seconds (1-60)
        #[arg(long)]
        rest: Option<u32>,
        /// HoldRest mode: repetitions (1-100)
        #[arg(long)]
        reps: Option<u32>,
        /// Countdown cue lead seconds (1-10)
        #[arg(long)]
        lead: Option<u32>,
        /// Get-ready countdown seconds (0 disables, else 2-30)
        #[arg(long)]
        countdown: Option<u32>,
        /// Disable audio cues for this preset
        #[arg(long)]
        no_audio: bool,
        /// Speak countdown numbers instead of playing tones
        #[arg(long)]
        spoken: bool,
    },
    /// List all presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a preset
    Show {
        /// Preset id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a preset
    Edit {
        /// Preset id
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Timer mode: "interval" or "hold_rest"
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        hold: Option<u32>,
        #[arg(long)]
        rest: Option<u32>,
        #[arg(long)]
        reps: Option<u32>,
        #[arg(long)]
        lead: Option<u32>,
        #[arg(long)]
        countdown: Option<u32>,
        /// Enable or disable audio cues ("true"/"false")
        #[arg(long)]
        audio: Option<bool>,
        /// Cue style: "tone" or "spoken"
        #[arg(long)]
        style: Option<String>,
    },
    /// Delete a preset
    Delete {
        /// Preset id
        id: i64,
    },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = PresetDb::open()?;

    match action {
        PresetAction::Add {
            name,
            mode,
            minutes,
            hold,
            rest,
            reps,
            lead,
            countdown,
            no_audio,
            spoken,
        } => {
            let defaults = Config::load_or_default().preset_defaults;
            let mut preset = TimerPreset {
                name,
                mode: TimerMode::from_db(&mode),
                total_minutes: minutes.unwrap_or(defaults.total_minutes),
                audio_enabled: !no_audio,
                cue_style: if spoken { CueStyle::Spoken } else { CueStyle::Tone },
                cue_lead_seconds: lead.unwrap_or(defaults.cue_lead_seconds),
                initial_countdown_seconds: countdown.unwrap_or(defaults.initial_countdown_seconds),
                hold_seconds: hold.unwrap_or(defaults.hold_seconds),
                rest_seconds: rest.unwrap_or(defaults.rest_seconds),
                total_repetitions: reps.unwrap_or(defaults.total_repetitions),
                ..Default::default()
            };
            preset.clamp();
            let id = db.insert(&preset)?;
            println!("Preset created: {id}");
        }
        PresetAction::List { json } => {
            let presets = db.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else if presets.is_empty() {
                println!("no presets");
            } else {
                for p in &presets {
                    println!("{:>4}  {:<24}  {}", p.id, p.name, summary(p));
                }
            }
        }
        PresetAction::Show { id, json } => {
            let preset = db.get(id)?.ok_or_else(|| format!("no preset with id {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&preset)?);
            } else {
                print_details(&preset);
            }
        }
        PresetAction::Edit {
            id,
            name,
            mode,
            minutes,
            hold,
            rest,
            reps,
            lead,
            countdown,
            audio,
            style,
        } => {
            let mut preset = db.get(id)?.ok_or_else(|| format!("no preset with id {id}"))?;
            if let Some(name) = name {
                preset.name = name;
            }
            if let Some(mode) = mode {
                preset.mode = TimerMode::from_db(&mode);
            }
            if let Some(minutes) = minutes {
                preset.total_minutes = minutes;
            }
            if let Some(hold) = hold {
                preset.hold_seconds = hold;
            }
            if let Some(rest) = rest {
                preset.rest_seconds = rest;
            }
            if let Some(reps) = reps {
                preset.total_repetitions = reps;
            }
            if let Some(lead) = lead {
                preset.cue_lead_seconds = lead;
            }
            if let Some(countdown) = countdown {
                preset.initial_countdown_seconds = countdown;
            }
            if let Some(audio) = audio {
                preset.audio_enabled = audio;
            }
            if let Some(style) = style {
                preset.cue_style = CueStyle::from_db(&style);
            }
            preset.clamp();
            db.update(&preset)?;
            println!("Preset updated: {id}");
        }
        PresetAction::Delete { id } => {
            db.delete(id)?;
            println!("Preset deleted: {id}");
        }
    }
    Ok(())
}

/// One-line description for the list view.
fn summary(p: &TimerPreset) -> String {
    match p.mode {
        TimerMode::Interval => format!("interval {}m", p.total_minutes),
        TimerMode::HoldRest => format!(
            "hold/rest {}s/{}s x{}",
            p.hold_seconds, p.rest_seconds, p.total_repetitions
        ),
    }
}

fn print_details(p: &TimerPreset) {
    println!("id:        {}", p.id);
    println!("name:      {}", p.name);
    println!("mode:      {}", p.mode.as_str());
    match p.mode {
        TimerMode::Interval => {
            println!("minutes:   {}", p.total_minutes);
        }
        TimerMode::HoldRest => {
            println!("hold:      {}s", p.hold_seconds);
            println!("rest:      {}s", p.rest_seconds);
            println!("reps:      {}", p.total_repetitions);
        }
    }
    println!("audio:     {}", p.audio_enabled);
    println!("style:     {}", p.cue_style.as_str());
    println!("lead:      {}s", p.cue_lead_seconds);
    println!("countdown: {}s", p.initial_countdown_seconds);
    println!("created:   {}", p.created_at.to_rfc3339());
}
