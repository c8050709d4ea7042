//! Heartbound headless shell.
//!
//! Stands in for the menu, customizer and HUD around the game core:
//!
//!   1. load an optional session config and replay from argv
//!      (`heartbound [replay.json] [config.json]`)
//!   2. walk the session through START -> CUSTOMIZE -> PLAY
//!   3. on a fixed-step clock, feed one replay frame per tick and perform its
//!      shell action
//!   4. log what the session reports; on game over, restart and play on
//!
//! Without a replay file the built-in demo script runs.

use std::path::Path;
use std::process::ExitCode;

use hb_core::{InputState, TimeState};
use hb_game::{
    load_replay_from_path, load_session_config_from_path, parse_replay, EndingChoice,
    ReplayAction, ReplayFrame, ReplaySequence, Session, SessionConfig, SessionEvent,
};

const DEMO_REPLAY: &str = r#"{
  "frames": [
    { "held": ["Right"], "repeat": 90 },
    { "held": ["Right", "Up"], "repeat": 25 },
    { "held": ["Right"], "repeat": 60 },
    { "action": "pause", "repeat": 30 },
    { "action": "pause", "repeat": 1 },
    { "held": ["Right", "Space"], "repeat": 40 },
    { "held": ["Right"], "repeat": 180 },
    { "action": "activate_chest", "repeat": 10 },
    { "held": ["Left"], "repeat": 60 }
  ]
}"#;

/// Shell-side bookkeeping that outlives a single session run.
#[derive(Debug, Default)]
struct ShellStats {
    ticks: u64,
    restarts: u32,
    hearts: u32,
    flowers: u32,
    keys: u32,
}

fn load_inputs(args: &[String]) -> Result<(ReplaySequence, SessionConfig), String> {
    let replay = match args.first() {
        Some(path) => load_replay_from_path(Path::new(path))?,
        None => {
            log::info!("No replay given; running the demo script");
            parse_replay(DEMO_REPLAY)?
        }
    };
    let config = match args.get(1) {
        Some(path) => load_session_config_from_path(Path::new(path))?,
        None => SessionConfig::default(),
    };
    Ok((replay, config))
}

fn enter_play(session: &mut Session) {
    session.open_customizer();
    session.start();
}

fn perform(session: &mut Session, action: ReplayAction) {
    log::debug!("Shell action: {:?}", action);
    match action {
        ReplayAction::ActivateChest => {
            if !session.activate_chest() {
                log::debug!("No chest to open");
            }
        }
        ReplayAction::Pause => {
            session.toggle_pause();
        }
        ReplayAction::ChooseYes => {
            session.choose_ending(EndingChoice::Affirmative);
        }
        ReplayAction::ChooseNo => {
            session.choose_ending(EndingChoice::Negative);
        }
        ReplayAction::Restart => {
            session.restart();
            enter_play(session);
        }
    }
}

/// Log what the session reported. Returns true on game over.
fn handle_events(events: &[SessionEvent], stats: &mut ShellStats) -> bool {
    let mut game_over = false;
    for event in events {
        match *event {
            SessionEvent::CountsChanged {
                hearts,
                flowers,
                keys,
            } => {
                stats.hearts = hearts;
                stats.flowers = flowers;
                stats.keys = keys;
                log::info!("HUD: {hearts} hearts, {flowers} flowers, {keys} keys");
            }
            SessionEvent::LivesChanged(0) => {
                log::info!("Game over");
                game_over = true;
            }
            SessionEvent::LivesChanged(lives) => log::info!("HUD: {lives} lives"),
            SessionEvent::PhaseChanged(phase) => log::info!("Screen: {phase}"),
            SessionEvent::Audio(cue) => log::debug!("Audio: {:?}", cue),
        }
    }
    game_over
}

fn run(replay: &ReplaySequence, config: SessionConfig) -> ShellStats {
    let mut session = Session::new(config);
    let mut input = InputState::new();
    let mut time = TimeState::new();
    let mut stats = ShellStats::default();
    let mut frames = replay.expanded_frames().into_iter();

    enter_play(&mut session);
    handle_events(&session.drain_events(), &mut stats);

    // Headless: every frame is exactly one fixed step of wall time.
    'frames: loop {
        time.advance(time.fixed_dt);
        while time.should_step() {
            let Some(frame) = frames.next() else {
                break 'frames;
            };
            step(&mut session, &mut input, &frame, &mut stats);
        }
    }

    log::info!(
        "Replay finished after {} ticks in {} ({} hearts, {} flowers, {} keys, {} lives, {} restarts)",
        stats.ticks,
        session.phase(),
        stats.hearts,
        stats.flowers,
        stats.keys,
        session.player().lives,
        stats.restarts
    );
    stats
}

fn step(session: &mut Session, input: &mut InputState, frame: &ReplayFrame, stats: &mut ShellStats) {
    frame.apply_to(input);
    if let Some(action) = frame.action {
        perform(session, action);
    }
    let events = session.tick(input);
    input.end_frame();
    stats.ticks += 1;

    if handle_events(&events, stats) {
        stats.restarts += 1;
        session.restart();
        enter_play(session);
        handle_events(&session.drain_events(), stats);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Heartbound starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (replay, config) = match load_inputs(&args) {
        Ok(inputs) => inputs,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Loaded replay with {} frames ({} ticks)",
        replay.frames.len(),
        replay.tick_count()
    );

    run(&replay, config);
    ExitCode::SUCCESS
}
