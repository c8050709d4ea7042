//! Narrative sequencer for the CUTSCENE and END phases.
//!
//! Steps run `Dialogue -> GiftTransfer -> Dialogue -> RingApproach ->
//! RingArrived`, after which the session moves to END and waits for the
//! ending choice. Anything that happens "later" (staggered gift particles,
//! firework volleys, the hand-over pause) is queued on the session schedule
//! as a [`Deferred`] and applied when its tick comes up.

use std::f32::consts::TAU;

use glam::Vec2;
use hb_core::{ms_to_ticks, Schedule};
use rand::rngs::StdRng;
use rand::Rng;

use crate::camera::CameraController;
use crate::config::Customization;
use crate::dialogue::{ConfirmOutcome, DialogueQueue, Speaker};
use crate::entity::{Color, GiftKind, Particle, ParticleKind, Player};
use crate::events::{AudioCue, BgmMode, EventSink};
use crate::world::World;

/// Dialogue index whose arrival hands the gifts over.
const GIFT_LINE: usize = 2;
const GIFT_STAGGER_MS: u32 = 110;
const GIFT_SETTLE_MS: u32 = 800;
const RING_HANDOVER_MS: u32 = 1500;
const RING_EASE: f32 = 0.06;
const RING_ARRIVE_DISTANCE: f32 = 4.0;
const RING_HOLD_OFFSET: Vec2 = Vec2::new(22.0, 12.0);
const RING_START_OFFSET: Vec2 = Vec2::new(0.0, 10.0);
const OPENING_VOLLEYS: u32 = 18;
const CRY_INTERVAL: u32 = 40;

const FIREWORK_COLORS: [u32; 7] = [
    0xffeb3b, 0xf48fb1, 0x00e676, 0x29b6f6, 0xff1744, 0xffffff, 0xff4081,
];
const PETAL_COLORS: [u32; 5] = [0xf48fb1, 0xce93d8, 0x90caf9, 0xa5d6a7, 0xff80ab];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutsceneStep {
    Dialogue,
    GiftTransfer,
    RingApproach,
    RingArrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndingChoice {
    #[default]
    Undecided,
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingOwner {
    Partner,
    Player,
}

/// Effects queued for a later tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    GiftParticle(GiftKind),
    GiftsSettled,
    /// Ask the session to move CUTSCENE -> END.
    RequestEnding,
    OpeningVolley,
}

/// Borrowed slices of session state the sequencer works on.
pub struct NarrativeCtx<'a> {
    pub now: u64,
    pub player: &'a Player,
    pub partner: Vec2,
    pub player_look: &'a Customization,
    pub partner_look: &'a Customization,
    pub world: &'a mut World,
    pub camera: &'a CameraController,
    pub rng: &'a mut StdRng,
    pub schedule: &'a mut Schedule<Deferred>,
    pub events: &'a mut EventSink,
}

impl NarrativeCtx<'_> {
    fn blip(&mut self, speaker: Speaker) {
        let female = speaker.is_female(self.player_look, self.partner_look);
        self.events.audio(AudioCue::DialogueBlip { female });
    }

    fn after_ms(&mut self, ms: u32, deferred: Deferred) {
        self.schedule.push_at(self.now + ms_to_ticks(ms), deferred);
    }

    fn rand(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Radial burst centred on a viewport-relative point.
    fn firework(&mut self, screen: Vec2, count: u32, speed: (f32, f32), size: f32, life: u32) {
        let center = self.camera.screen_to_world(screen);
        self.events.audio(AudioCue::Firework);
        for i in 0..count {
            let angle = TAU / count as f32 * i as f32;
            let magnitude = speed.0 + self.rand() * speed.1;
            let color = FIREWORK_COLORS[self.rng.gen_range(0..FIREWORK_COLORS.len())];
            self.world.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * magnitude,
                color: Color(color),
                size,
                life,
                kind: ParticleKind::Confetti,
            });
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    pub step: CutsceneStep,
    pub dialogue: DialogueQueue,
    pub ring_pos: Vec2,
    pub ring_visible: bool,
    pub ring_owner: RingOwner,
    pub ending: EndingChoice,
    cry_timer: u32,
}

impl Sequencer {
    pub fn new(partner: Vec2) -> Self {
        Self {
            step: CutsceneStep::Dialogue,
            dialogue: DialogueQueue::proposal_script(),
            ring_pos: partner + RING_START_OFFSET,
            ring_visible: false,
            ring_owner: RingOwner::Partner,
            ending: EndingChoice::Undecided,
            cry_timer: 0,
        }
    }

    pub fn begin(&mut self) {
        log::info!("Cutscene started");
        self.dialogue.activate();
    }

    /// Confirm input during the cutscene. Only the dialogue step listens.
    pub fn confirm(&mut self, ctx: &mut NarrativeCtx<'_>) {
        if self.step != CutsceneStep::Dialogue {
            return;
        }
        match self.dialogue.confirm() {
            ConfirmOutcome::Revealed => {}
            ConfirmOutcome::Advanced(index) => {
                if let Some(line) = self.dialogue.current() {
                    ctx.blip(line.speaker);
                }
                if index == GIFT_LINE {
                    self.start_gift_transfer(ctx);
                }
            }
            ConfirmOutcome::Finished => {
                log::debug!("Dialogue finished; ring revealed");
                self.step = CutsceneStep::RingApproach;
                self.ring_visible = true;
                ctx.blip(Speaker::Partner);
            }
        }
    }

    fn start_gift_transfer(&mut self, ctx: &mut NarrativeCtx<'_>) {
        self.step = CutsceneStep::GiftTransfer;
        let hearts = ctx.player.hearts;
        let total = ctx.player.gifts();
        log::debug!("Handing over {total} gifts");
        for i in 0..total {
            let gift = if i < hearts {
                GiftKind::Heart
            } else {
                GiftKind::Flower
            };
            ctx.after_ms(i * GIFT_STAGGER_MS, Deferred::GiftParticle(gift));
        }
        ctx.after_ms(total * GIFT_STAGGER_MS + GIFT_SETTLE_MS, Deferred::GiftsSettled);
    }

    /// One CUTSCENE tick: reveal text and move the ring.
    pub fn tick_cutscene(&mut self, ctx: &mut NarrativeCtx<'_>) {
        if self.dialogue.tick() {
            if let Some(line) = self.dialogue.current() {
                ctx.blip(line.speaker);
            }
        }

        if self.step == CutsceneStep::RingApproach {
            let target = ctx.player.pos() + RING_HOLD_OFFSET;
            self.ring_pos += (target - self.ring_pos) * RING_EASE;
            if self.ring_pos.distance(target) < RING_ARRIVE_DISTANCE {
                log::debug!("Ring handed over");
                self.ring_owner = RingOwner::Player;
                self.step = CutsceneStep::RingArrived;
                ctx.after_ms(RING_HANDOVER_MS, Deferred::RequestEnding);
            }
        }
    }

    /// Apply a due deferred effect. Returns true when the session should
    /// move on to the END phase.
    pub fn apply(&mut self, deferred: Deferred, ctx: &mut NarrativeCtx<'_>) -> bool {
        match deferred {
            Deferred::GiftParticle(gift) => {
                let from = ctx.player.pos();
                let (color, kind) = match gift {
                    GiftKind::Heart => (Color::HEART, ParticleKind::Heart),
                    GiftKind::Flower => (Color::FLOWER, ParticleKind::Flower),
                };
                let vx = (ctx.partner.x - from.x) / 40.0 + (ctx.rand() - 0.5) * 6.0;
                let vy = -5.0 - ctx.rand() * 5.0;
                ctx.world.particles.push(Particle {
                    pos: from + Vec2::new(14.0, 10.0),
                    vel: Vec2::new(vx, vy),
                    color,
                    size: 6.0,
                    life: 75,
                    kind,
                });
                ctx.events.audio(AudioCue::Collect);
                false
            }
            Deferred::GiftsSettled => {
                if self.step == CutsceneStep::GiftTransfer {
                    self.step = CutsceneStep::Dialogue;
                }
                false
            }
            Deferred::RequestEnding => true,
            Deferred::OpeningVolley => {
                let viewport = ctx.camera.viewport;
                let screen = Vec2::new(
                    viewport.x * 0.1 + ctx.rand() * viewport.x * 0.8,
                    viewport.y * 0.1 + ctx.rand() * viewport.y * 0.4,
                );
                ctx.firework(screen, 60, (7.0, 11.0), 5.0, 120);
                false
            }
        }
    }

    /// Record the ending choice. Only the first call counts.
    pub fn choose(&mut self, choice: EndingChoice, ctx: &mut NarrativeCtx<'_>) -> bool {
        if self.ending != EndingChoice::Undecided || choice == EndingChoice::Undecided {
            return false;
        }
        self.ending = choice;
        log::info!("Ending chosen: {:?}", choice);
        match choice {
            EndingChoice::Affirmative => {
                ctx.events.audio(AudioCue::Bgm(BgmMode::Celebration));
                ctx.events.audio(AudioCue::Victory);
                ctx.events.audio(AudioCue::Dramatic);
                for volley in 0..OPENING_VOLLEYS {
                    ctx.after_ms(volley * GIFT_STAGGER_MS, Deferred::OpeningVolley);
                }
            }
            EndingChoice::Negative => {
                ctx.events.audio(AudioCue::Bgm(BgmMode::Sad));
                ctx.events.audio(AudioCue::Dramatic);
            }
            EndingChoice::Undecided => {}
        }
        true
    }

    /// Ambient effects that run in every ticking phase: ring sparkle,
    /// celebration, crying.
    pub fn tick_effects(&mut self, ctx: &mut NarrativeCtx<'_>) {
        match self.ending {
            EndingChoice::Negative => {
                self.cry_timer += 1;
                if self.cry_timer % CRY_INTERVAL == 0 {
                    ctx.events.audio(AudioCue::Crying);
                }
            }
            EndingChoice::Affirmative => {
                let viewport = ctx.camera.viewport;
                if ctx.rand() < 0.4 {
                    let screen = Vec2::new(ctx.rand() * viewport.x, ctx.rand() * viewport.y * 0.5);
                    ctx.firework(screen, 45, (8.0, 6.0), 4.0, 90);
                }
                if ctx.rand() < 0.75 {
                    let screen = Vec2::new(ctx.rand() * viewport.x, -20.0);
                    let vel = Vec2::new((ctx.rand() - 0.5) * 6.0, 4.0 + ctx.rand() * 5.0);
                    let color = PETAL_COLORS[ctx.rng.gen_range(0..PETAL_COLORS.len())];
                    ctx.world.particles.push(Particle {
                        pos: ctx.camera.screen_to_world(screen),
                        vel,
                        color: Color(color),
                        size: 7.0,
                        life: 200,
                        kind: ParticleKind::Petal,
                    });
                }
            }
            EndingChoice::Undecided => {
                if self.ring_visible && ctx.rand() < 0.15 {
                    let offset = Vec2::new(ctx.rand() * 25.0, ctx.rand() * 25.0);
                    let vel = Vec2::new(ctx.rand() - 0.5, ctx.rand() - 0.5);
                    ctx.world.particles.push(Particle {
                        pos: self.ring_pos + offset,
                        vel,
                        color: Color::WHITE,
                        size: 3.0,
                        life: 35,
                        kind: ParticleKind::Sparkle,
                    });
                }
            }
        }
    }
}
