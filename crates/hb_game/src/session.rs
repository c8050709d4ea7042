//! Game loop driver.
//!
//! A [`Session`] owns every piece of mutable game state and advances it one
//! fixed step at a time through [`Session::tick`]. The shell drives phase
//! changes through the trigger methods, feeds input, and collects the
//! [`SessionEvent`]s each tick produces. Renderers read a [`FrameView`].
//!
//! Tick order:
//!   1. advance the tick clock and apply deferred effects that came due
//!   2. ease the camera toward this phase's target
//!   3. age particles, run ending/sparkle effects
//!   4. phase work: player physics and pickups in PLAY, dialogue and ring in
//!      CUTSCENE
//!
//! PAUSE skips all of it, including the clock, so queued effects hold their
//! place until play resumes.

use glam::Vec2;
use hb_core::{Control, InputState, Schedule};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::CameraController;
use crate::config::{Customization, GameConfig, SessionConfig};
use crate::cutscene::{CutsceneStep, Deferred, EndingChoice, NarrativeCtx, Sequencer};
use crate::dialogue::DialogueQueue;
use crate::entity::{Particle, Player, SpawnedItem, WorldObject};
use crate::events::{AudioCue, BgmMode, EventSink, SessionEvent};
use crate::items;
use crate::level::Level;
use crate::phase::{GamePhase, PhaseTrigger};
use crate::physics::{self, PlayerInput};
use crate::world::World;

const END_STAGE_PLAYER_OFFSET: f32 = -75.0;
const END_STAGE_PARTNER_OFFSET: f32 = 45.0;
const END_STAGE_RING_OFFSET: Vec2 = Vec2::new(-55.0, 15.0);

pub struct Session {
    config: SessionConfig,
    game: GameConfig,
    level: Level,
    phase: GamePhase,
    player: Player,
    world: World,
    camera: CameraController,
    sequencer: Sequencer,
    schedule: Schedule<Deferred>,
    rng: StdRng,
    now: u64,
    events: EventSink,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_game_config(config, GameConfig::default())
    }

    pub fn with_game_config(config: SessionConfig, game: GameConfig) -> Self {
        let level = Level::valentine();
        log::info!(
            "New session: {} and {} (seed {:#x})",
            config.player.name,
            config.partner.name,
            config.seed
        );
        Self {
            player: Player::new(&game, config.start_with_balloon),
            world: World::from_level(&level),
            camera: CameraController::new(game.viewport_width, game.viewport_height),
            sequencer: Sequencer::new(level.destination),
            schedule: Schedule::new(),
            rng: StdRng::seed_from_u64(config.seed),
            now: 0,
            events: EventSink::default(),
            phase: GamePhase::Start,
            config,
            game,
            level,
        }
    }

    // ---- Shell triggers -------------------------------------------------------

    pub fn open_customizer(&mut self) -> bool {
        self.fire(PhaseTrigger::OpenCustomizer)
    }

    /// Leave the customizer and begin play.
    pub fn start(&mut self) -> bool {
        if !self.fire(PhaseTrigger::BeginPlay) {
            return false;
        }
        self.events.audio(AudioCue::Bgm(BgmMode::Valentine));
        self.report_status();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.fire(PhaseTrigger::TogglePause)
    }

    /// Tear the session down to START. Everything queued for later is
    /// dropped, and the run restarts from the configured seed.
    pub fn restart(&mut self) {
        if !self.fire(PhaseTrigger::Restart) {
            return;
        }
        self.player = Player::new(&self.game, self.config.start_with_balloon);
        self.world = World::from_level(&self.level);
        self.camera = CameraController::new(self.game.viewport_width, self.game.viewport_height);
        self.sequencer = Sequencer::new(self.level.destination);
        self.schedule.reset();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.now = 0;
        self.events.audio(AudioCue::Bgm(BgmMode::Stop));
        self.report_status();
    }

    /// Explicit chest activation. Only meaningful during PLAY.
    pub fn activate_chest(&mut self) -> bool {
        if self.phase != GamePhase::Play {
            log::debug!("Chest activation ignored in {}", self.phase);
            return false;
        }
        items::open_chest(&self.player, &mut self.world, &self.game, &mut self.events)
    }

    /// Accepted once, and only on the END screen.
    pub fn choose_ending(&mut self, choice: EndingChoice) -> bool {
        if self.phase != GamePhase::End {
            log::debug!("Ending choice ignored in {}", self.phase);
            return false;
        }
        self.with_narrative(|sequencer, ctx| sequencer.choose(choice, ctx))
    }

    // ---- Tick -----------------------------------------------------------------

    /// Advance one fixed step and return what happened.
    pub fn tick(&mut self, input: &InputState) -> Vec<SessionEvent> {
        if !self.phase.is_running() {
            return self.events.take();
        }
        self.now += 1;

        let due = self.schedule.drain_due(self.now);
        let mut ending_requested = false;
        for deferred in due {
            ending_requested |= self.with_narrative(|sequencer, ctx| sequencer.apply(deferred, ctx));
        }
        if ending_requested {
            self.fire(PhaseTrigger::RingDelivered);
        }

        self.camera.update(
            self.phase,
            self.player.pos(),
            self.level.destination,
            self.sequencer.ending,
            &self.level,
        );
        self.world.update_particles(self.game.particle_gravity);
        self.with_narrative(|sequencer, ctx| sequencer.tick_effects(ctx));

        match self.phase {
            GamePhase::Play => self.tick_play(input),
            GamePhase::Cutscene => self.tick_cutscene(input),
            _ => {}
        }

        log::trace!("tick {} ({})", self.now, self.phase);
        self.events.take()
    }

    fn tick_play(&mut self, input: &InputState) {
        let struck = physics::step_player(
            &mut self.player,
            PlayerInput::from_input(input),
            &self.level,
            &self.world,
            &self.game,
            &mut self.events,
        );
        items::break_boxes(&mut self.world, &struck, &mut self.rng, &mut self.events);
        items::collect_static_gifts(&mut self.player, &mut self.world, &mut self.events);
        items::update_spawned(
            &mut self.player,
            &mut self.world,
            &self.level,
            &self.game,
            &mut self.events,
        );
        items::collect_balloons(&mut self.player, &mut self.world, &mut self.events);
        items::collect_keys(&mut self.player, &mut self.world, &mut self.events);
        physics::handle_fall(&mut self.player, &self.level, &self.game, &mut self.events);

        if physics::reached_partner(&self.player, &self.level, &self.game)
            && self.fire(PhaseTrigger::ReachPartner)
        {
            self.player.body.vel.x = 0.0;
            self.sequencer.begin();
        }
    }

    fn tick_cutscene(&mut self, input: &InputState) {
        let confirm = input.control_just_pressed(Control::Confirm);
        self.with_narrative(|sequencer, ctx| {
            if confirm {
                sequencer.confirm(ctx);
            }
            sequencer.tick_cutscene(ctx);
        });
    }

    // ---- Helpers --------------------------------------------------------------

    fn fire(&mut self, trigger: PhaseTrigger) -> bool {
        match self.phase.on(trigger) {
            Some(next) => {
                log::info!("Phase {} -> {} ({:?})", self.phase, next, trigger);
                self.phase = next;
                self.events.push(SessionEvent::PhaseChanged(next));
                true
            }
            None => {
                log::warn!("Rejected {:?} in phase {}", trigger, self.phase);
                false
            }
        }
    }

    fn report_status(&mut self) {
        self.events
            .counts(self.player.hearts, self.player.flowers, self.player.keys);
        self.events.push(SessionEvent::LivesChanged(self.player.lives));
    }

    fn with_narrative<R>(
        &mut self,
        f: impl FnOnce(&mut Sequencer, &mut NarrativeCtx<'_>) -> R,
    ) -> R {
        let mut ctx = NarrativeCtx {
            now: self.now,
            player: &self.player,
            partner: self.level.destination,
            player_look: &self.config.player,
            partner_look: &self.config.partner,
            world: &mut self.world,
            camera: &self.camera,
            rng: &mut self.rng,
            schedule: &mut self.schedule,
            events: &mut self.events,
        };
        f(&mut self.sequencer, &mut ctx)
    }

    /// Events raised by trigger calls since the last tick.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.take()
    }

    // ---- Accessors ------------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct player access for debug shells and test drivers.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn pending_effects(&self) -> usize {
        self.schedule.len()
    }

    pub fn chest_available(&self) -> bool {
        self.phase == GamePhase::Play
            && items::reachable_chest(&self.player, &self.world, &self.game).is_some()
    }

    pub fn view(&self) -> FrameView<'_> {
        let mut player_pos = self.player.pos();
        let mut partner_pos = self.level.destination;
        let mut ring_pos = self.sequencer.ring_pos;
        if self.phase == GamePhase::End {
            let focus = self.camera.focus();
            let stage_y = self.level.destination.y;
            player_pos = Vec2::new(focus.x + END_STAGE_PLAYER_OFFSET, stage_y);
            partner_pos = Vec2::new(focus.x + END_STAGE_PARTNER_OFFSET, stage_y);
            ring_pos = partner_pos + END_STAGE_RING_OFFSET;
        }
        let dialogue = (self.phase == GamePhase::Cutscene && self.sequencer.dialogue.is_active())
            .then_some(&self.sequencer.dialogue);

        FrameView {
            phase: self.phase,
            level: &self.level,
            player: &self.player,
            player_pos,
            partner_pos,
            player_look: &self.config.player,
            partner_look: &self.config.partner,
            items: &self.world.items,
            balloons: &self.world.balloons,
            keys: &self.world.keys,
            spawned: &self.world.spawned,
            particles: &self.world.particles,
            camera: &self.camera,
            dialogue,
            cutscene_step: self.sequencer.step,
            ring: self.sequencer.ring_visible.then_some(ring_pos),
            ending: self.sequencer.ending,
            chest_available: self.chest_available(),
        }
    }
}

/// Read-only snapshot of one frame for the renderer.
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub level: &'a Level,
    pub player: &'a Player,
    /// Where to draw the player. Differs from the simulated position on the
    /// END screen, where the couple is staged at the camera centre.
    pub player_pos: Vec2,
    pub partner_pos: Vec2,
    pub player_look: &'a Customization,
    pub partner_look: &'a Customization,
    pub items: &'a [WorldObject],
    pub balloons: &'a [WorldObject],
    pub keys: &'a [WorldObject],
    pub spawned: &'a [SpawnedItem],
    pub particles: &'a [Particle],
    pub camera: &'a CameraController,
    pub dialogue: Option<&'a DialogueQueue>,
    pub cutscene_step: CutsceneStep,
    pub ring: Option<Vec2>,
    pub ending: EndingChoice,
    pub chest_available: bool,
}
