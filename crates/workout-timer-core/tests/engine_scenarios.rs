//! End-to-end engine scenarios: whole runs ticked second by second, checking
//! cue timing, boundary handling, and completion against the documented
//! behavior.

use proptest::prelude::*;

use workout_timer_core::{Cue, ModeProgress, TimerEngine, TimerMode, TimerPreset};

fn interval(minutes: u32, lead: u32, countdown: u32) -> TimerPreset {
    TimerPreset {
        name: "interval".into(),
        mode: TimerMode::Interval,
        total_minutes: minutes,
        audio_enabled: true,
        cue_lead_seconds: lead,
        initial_countdown_seconds: countdown,
        ..Default::default()
    }
}

fn hold_rest(hold: u32, rest: u32, reps: u32, lead: u32) -> TimerPreset {
    TimerPreset {
        name: "hangboard".into(),
        mode: TimerMode::HoldRest,
        hold_seconds: hold,
        rest_seconds: rest,
        total_repetitions: reps,
        audio_enabled: true,
        cue_lead_seconds: lead,
        initial_countdown_seconds: 0,
        ..Default::default()
    }
}

/// Two-minute interval run, observed tick by tick.
#[test]
fn interval_two_minute_run_end_to_end() {
    let mut engine = TimerEngine::new();
    engine.start(&interval(2, 3, 0)).unwrap();

    let mut countdown_seconds = Vec::new();
    for tick in 1..=117 {
        for cue in engine.tick() {
            if let Cue::Countdown {
                seconds_remaining, ..
            } = cue
            {
                countdown_seconds.push((tick, seconds_remaining));
            }
        }
    }

    // Ticks 58-60 observe elapsed 57, 58, 59: the first minute's countdown.
    assert_eq!(countdown_seconds, vec![(58, 3), (59, 2), (60, 1)]);

    let state = engine.snapshot();
    assert_eq!(state.elapsed_seconds, 117);
    match state.progress {
        ModeProgress::Interval { current_minute, .. } => assert_eq!(current_minute, 1),
        _ => panic!("expected interval progress"),
    }

    // Ticks 118-120 observe elapsed 117, 118, 119: countdown 3, 2, 1.
    let mut late = Vec::new();
    for _ in 118..=120 {
        for cue in engine.tick() {
            if let Cue::Countdown {
                seconds_remaining, ..
            } = cue
            {
                late.push(seconds_remaining);
            }
        }
        assert!(!engine.state().complete);
    }
    assert_eq!(late, vec![3, 2, 1]);

    // Tick 121: elapsed reached 120, the run transitions to Complete.
    let cues = engine.tick();
    assert!(engine.state().complete);
    assert_eq!(engine.state().elapsed_seconds, 120);
    assert!(matches!(cues.as_slice(), [Cue::Speech { .. }]));
}

/// The minute-boundary cue condition mixes pre- and post-increment state and
/// is easy to get subtly wrong; this pins it down on its own.
#[test]
fn boundary_cue_fires_on_minute_rollover_only() {
    let mut engine = TimerEngine::new();
    engine.start(&interval(3, 3, 0)).unwrap();

    let mut boundary_at = Vec::new();
    for _ in 0..180 {
        let observed = engine.state().elapsed_seconds;
        if engine.tick().contains(&Cue::Boundary) {
            boundary_at.push(observed);
        }
    }
    // At the rollover seconds, never at second 0 of the run.
    assert_eq!(boundary_at, vec![60, 120]);
}

#[test]
fn hold_rest_rest_announcement_per_repetition() {
    let mut engine = TimerEngine::new();
    engine.start(&hold_rest(5, 5, 3, 3)).unwrap();

    let mut rest_at = Vec::new();
    for _ in 0..30 {
        let s = match engine.state().progress {
            ModeProgress::HoldRest {
                current_repetition,
                seconds_into_repetition,
                ..
            } => (current_repetition, seconds_into_repetition),
            _ => unreachable!(),
        };
        for cue in engine.tick() {
            if matches!(cue, Cue::Speech { ref text } if text == "Rest") {
                rest_at.push(s);
            }
        }
    }
    // Exactly once per repetition, at the hold->rest switch.
    assert_eq!(rest_at, vec![(0, 5), (1, 5), (2, 5)]);
}

#[test]
fn hold_rest_countdown_window_with_lead_three() {
    let mut engine = TimerEngine::new();
    engine.start(&hold_rest(7, 3, 1, 3)).unwrap();

    let mut window = Vec::new();
    for _ in 0..10 {
        let s = match engine.state().progress {
            ModeProgress::HoldRest {
                seconds_into_repetition,
                ..
            } => seconds_into_repetition,
            _ => unreachable!(),
        };
        for cue in engine.tick() {
            if let Cue::Countdown {
                seconds_remaining, ..
            } = cue
            {
                window.push((s, seconds_remaining));
            }
        }
    }
    // Rest-phase seconds 7, 8, 9 count 3, 2, 1; holds stay silent.
    assert_eq!(window, vec![(7, 3), (8, 2), (9, 1)]);
}

#[test]
fn initial_countdown_flows_into_active_mode() {
    let mut engine = TimerEngine::new();
    engine.start(&interval(2, 3, 5)).unwrap();

    let mut countdowns = Vec::new();
    let mut boundaries = 0;
    for _ in 0..5 {
        for cue in engine.tick() {
            match cue {
                Cue::Countdown {
                    seconds_remaining, ..
                } => countdowns.push(seconds_remaining),
                Cue::Boundary => boundaries += 1,
                Cue::Speech { .. } => {}
            }
        }
    }
    assert_eq!(countdowns, vec![3, 2, 1]);
    assert_eq!(boundaries, 1);

    let state = engine.snapshot();
    assert!(!state.in_initial_countdown);
    assert_eq!(state.elapsed_seconds, 0);
    assert!(state.running);
}

#[test]
fn pause_preserves_exact_progress() {
    let mut engine = TimerEngine::new();
    engine.start(&interval(2, 3, 0)).unwrap();
    for _ in 0..42 {
        engine.tick();
    }
    assert_eq!(engine.state().elapsed_seconds, 42);

    engine.pause();
    // Arbitrarily many cadence ticks while paused change nothing.
    for _ in 0..1000 {
        engine.tick();
    }
    assert_eq!(engine.state().elapsed_seconds, 42);

    engine.resume();
    engine.tick();
    assert_eq!(engine.state().elapsed_seconds, 43);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Interval runs last exactly total_minutes * 60 seconds: not complete
    /// after counting every second, complete on the next tick.
    #[test]
    fn interval_total_and_completion_exact(minutes in 2u32..=120) {
        let mut engine = TimerEngine::new();
        engine.start(&interval(minutes, 3, 0)).unwrap();
        let total = minutes * 60;
        prop_assert_eq!(engine.state().total_seconds, total);

        for _ in 0..total {
            engine.tick();
            prop_assert!(!engine.state().complete);
        }
        engine.tick();
        prop_assert!(engine.state().complete);
        prop_assert_eq!(engine.state().elapsed_seconds, total);
    }

    /// HoldRest runs last (hold + rest) * reps seconds and complete exactly
    /// when the final repetition index is reached.
    #[test]
    fn hold_rest_total_and_completion_exact(
        hold in 1u32..=60,
        rest in 1u32..=60,
        reps in 1u32..=20,
    ) {
        let mut engine = TimerEngine::new();
        engine.start(&hold_rest(hold, rest, reps, 3)).unwrap();
        let total = (hold + rest) * reps;
        prop_assert_eq!(engine.state().total_seconds, total);

        for _ in 0..total {
            engine.tick();
            prop_assert!(!engine.state().complete);
        }
        engine.tick();
        prop_assert!(engine.state().complete);
        match engine.state().progress {
            ModeProgress::HoldRest { current_repetition, .. } => {
                prop_assert_eq!(current_repetition, reps);
            }
            _ => prop_assert!(false, "expected hold/rest progress"),
        }
    }

    /// Countdown cues never report more seconds than the configured lead.
    #[test]
    fn countdown_cues_bounded_by_lead(minutes in 2u32..=5, lead in 1u32..=10) {
        let mut engine = TimerEngine::new();
        engine.start(&interval(minutes, lead, 0)).unwrap();
        for _ in 0..(minutes * 60 + 1) {
            for cue in engine.tick() {
                if let Cue::Countdown { seconds_remaining, lead_seconds, .. } = cue {
                    prop_assert!(seconds_remaining >= 1);
                    prop_assert!(seconds_remaining <= lead);
                    prop_assert_eq!(lead_seconds, lead);
                }
            }
        }
    }
}
