use glam::Vec2;
use hb_core::{InputState, Key};
use hb_game::entity::ParticleKind;
use hb_game::{
    AudioCue, BgmMode, CutsceneStep, EndingChoice, GamePhase, Session, SessionConfig,
    SessionEvent,
};

const CHEST_INDEX: usize = 6;

fn playing() -> Session {
    let mut session = Session::new(SessionConfig::default());
    session.open_customizer();
    session.start();
    session.drain_events();
    session
}

/// Put the player next to the partner carrying five of each gift.
fn ready_at_partner(session: &mut Session) {
    let player = session.player_mut();
    player.body.pos = Vec2::new(4330.0, 300.0);
    player.hearts = 5;
    player.flowers = 5;
}

fn has_confetti(session: &Session) -> bool {
    session
        .world()
        .particles
        .iter()
        .any(|p| p.kind == ParticleKind::Confetti)
}

/// Tap confirm every other tick until the session reaches END.
fn drive_to_end(session: &mut Session) {
    ready_at_partner(session);
    let mut input = InputState::new();
    for tick in 0..5000 {
        if session.phase() == GamePhase::End {
            return;
        }
        if tick % 2 == 0 {
            input.key_down(Key::Enter);
        } else {
            input.key_up(Key::Enter);
        }
        session.tick(&input);
        input.end_frame();
    }
    panic!("never reached END (stuck in {})", session.phase());
}

// ── play ──────────────────────────────────────────────────────────────────────

#[test]
fn reaching_partner_with_gifts_starts_cutscene() {
    let mut session = playing();
    ready_at_partner(&mut session);
    let mut input = InputState::new();
    input.key_down(Key::Right);

    let events = session.tick(&input);
    assert_eq!(session.phase(), GamePhase::Cutscene);
    assert_eq!(session.player().body.vel.x, 0.0);
    assert!(events.contains(&SessionEvent::PhaseChanged(GamePhase::Cutscene)));
    assert!(session.sequencer().dialogue.is_active());
}

#[test]
fn reaching_partner_short_of_gifts_keeps_playing() {
    let mut session = playing();
    ready_at_partner(&mut session);
    session.player_mut().flowers = 4;
    session.tick(&InputState::new());
    assert_eq!(session.phase(), GamePhase::Play);
}

#[test]
fn fall_on_last_life_reports_zero_and_stays_down() {
    let mut session = playing();
    let player = session.player_mut();
    player.lives = 1;
    player.has_balloon = false;
    player.body.pos = Vec2::new(950.0, 460.0);

    let events = session.tick(&InputState::new());
    assert!(events.contains(&SessionEvent::LivesChanged(0)));
    assert_eq!(session.player().lives, 0);
    assert!(session.player().body.pos.y > session.level().height);

    let events = session.tick(&InputState::new());
    assert!(!events
        .iter()
        .any(|e| matches!(e, SessionEvent::LivesChanged(_))));
}

#[test]
fn fall_with_lives_left_keeps_gift_counts() {
    let mut session = playing();
    let player = session.player_mut();
    player.hearts = 2;
    player.flowers = 3;
    player.body.pos = Vec2::new(1500.0, 460.0);

    session.tick(&InputState::new());
    let player = session.player();
    assert_eq!(player.lives, 2);
    assert_eq!((player.hearts, player.flowers), (2, 3));
    assert_eq!(player.body.pos, Vec2::new(1200.0, 250.0));
}

#[test]
fn chest_with_two_keys_spawns_nothing() {
    let mut session = playing();
    let chest = session.world().items[CHEST_INDEX].pos;
    let player = session.player_mut();
    player.body.pos = chest + Vec2::new(-40.0, 0.0);
    player.keys = 2;

    assert!(!session.chest_available());
    assert!(!session.activate_chest());
    assert!(session.world().spawned.is_empty());
    assert!(!session.world().items[CHEST_INDEX].is_collected());

    session.player_mut().keys = 3;
    assert!(session.chest_available());
    assert!(session.activate_chest());
    assert_eq!(session.world().spawned.len(), 4);
    assert!(session.world().items[CHEST_INDEX].is_collected());
}

#[test]
fn physics_does_nothing_outside_play() {
    let mut session = Session::new(SessionConfig::default());
    let mut input = InputState::new();
    input.key_down(Key::Right);
    input.key_down(Key::Up);
    let start = session.player().pos();

    for _ in 0..60 {
        session.tick(&input);
    }
    assert_eq!(session.phase(), GamePhase::Start);
    assert_eq!(session.player().pos(), start);

    session.open_customizer();
    for _ in 0..60 {
        session.tick(&input);
    }
    assert_eq!(session.player().pos(), start);

    session.start();
    session.tick(&input);
    assert_ne!(session.player().pos(), start);

    session.toggle_pause();
    let paused_at = session.player().pos();
    for _ in 0..60 {
        session.tick(&input);
    }
    assert_eq!(session.player().pos(), paused_at);
}

#[test]
fn collected_flags_never_revert() {
    let mut session = playing();
    let mut input = InputState::new();
    input.key_down(Key::Right);
    let mut seen = vec![false; session.world().items.len()];

    for tick in 0..1500 {
        if tick % 50 == 0 {
            input.key_down(Key::Up);
        } else if tick % 50 == 30 {
            input.key_up(Key::Up);
        }
        if tick == 10 {
            // Drop the player onto the first heart.
            let heart = session.world().items[0].pos;
            session.player_mut().body.pos = heart;
        }
        session.tick(&input);
        input.end_frame();

        for (was, item) in seen.iter_mut().zip(&session.world().items) {
            assert!(!*was || item.is_collected(), "{} reverted", item.id);
            *was = item.is_collected();
        }
    }
    assert!(seen[0]);
    assert!(session.player().hearts >= 1);
}

// ── narrative ─────────────────────────────────────────────────────────────────

#[test]
fn cutscene_runs_through_to_end() {
    let mut session = playing();
    drive_to_end(&mut session);
    assert_eq!(session.sequencer().step, CutsceneStep::RingArrived);

    let view = session.view();
    assert_eq!(view.phase, GamePhase::End);
    assert!(view.ring.is_some());
    assert!(view.dialogue.is_none());
}

#[test]
fn affirmative_ending_shows_confetti_within_two_seconds() {
    let mut session = playing();
    drive_to_end(&mut session);
    assert!(session.choose_ending(EndingChoice::Affirmative));
    assert!(!session.choose_ending(EndingChoice::Negative));
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::Audio(AudioCue::Bgm(BgmMode::Celebration))));

    let input = InputState::new();
    let mut confetti_at = None;
    for tick in 1..=120 {
        session.tick(&input);
        if has_confetti(&session) {
            confetti_at = Some(tick);
            break;
        }
    }
    assert!(confetti_at.is_some());
}

#[test]
fn negative_ending_never_shows_confetti() {
    let mut session = playing();
    drive_to_end(&mut session);
    assert!(session.choose_ending(EndingChoice::Negative));

    let input = InputState::new();
    let mut cries = 0;
    for _ in 0..600 {
        let events = session.tick(&input);
        assert!(!has_confetti(&session));
        cries += events
            .iter()
            .filter(|e| **e == SessionEvent::Audio(AudioCue::Crying))
            .count();
    }
    assert_eq!(cries, 15);
}

#[test]
fn restart_after_ending_returns_to_a_fresh_start() {
    let mut session = playing();
    drive_to_end(&mut session);
    session.choose_ending(EndingChoice::Affirmative);
    session.tick(&InputState::new());

    session.restart();
    assert_eq!(session.phase(), GamePhase::Start);
    assert_eq!(session.pending_effects(), 0);
    assert_eq!(session.sequencer().ending, EndingChoice::Undecided);
    assert!(session.world().items.iter().all(|item| !item.is_collected()));
    assert_eq!(session.player().lives, 3);
}
