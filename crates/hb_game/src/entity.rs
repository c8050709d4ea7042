use glam::Vec2;
use hb_core::{Body, Rect};

use crate::config::GameConfig;

pub const PLAYER_SIZE: Vec2 = Vec2::new(28.0, 36.0);
pub const PLAYER_START: Vec2 = Vec2::new(50.0, 350.0);
pub const ITEM_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const BALLOON_SIZE: Vec2 = Vec2::new(24.0, 32.0);
pub const KEY_SIZE: Vec2 = Vec2::new(24.0, 24.0);
pub const SPAWNED_SIZE: Vec2 = Vec2::new(24.0, 24.0);

/// Packed 0xRRGGBB color. Particles only carry it through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const HEART: Color = Color(0xff1744);
    pub const FLOWER: Color = Color(0xba68c8);

    pub fn rgb(self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub anim_phase: f32,
    pub has_balloon: bool,
    pub hearts: u32,
    pub flowers: u32,
    pub keys: u32,
    pub lives: u32,
}

impl Player {
    pub fn new(config: &GameConfig, has_balloon: bool) -> Self {
        Self {
            body: Body::new(PLAYER_START, PLAYER_SIZE),
            facing: 1.0,
            anim_phase: 0.0,
            has_balloon,
            hearts: 0,
            flowers: 0,
            keys: 0,
            lives: config.starting_lives,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn add_gift(&mut self, gift: GiftKind) {
        match gift {
            GiftKind::Heart => self.hearts += 1,
            GiftKind::Flower => self.flowers += 1,
        }
    }

    pub fn gifts(&self) -> u32 {
        self.hearts + self.flowers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftKind {
    Heart,
    Flower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Heart,
    Flower,
    Box,
    Chest,
    Key,
    Balloon,
}

impl ObjectKind {
    /// Boxes and chests block movement until they are used up.
    pub fn is_solid(self) -> bool {
        matches!(self, ObjectKind::Box | ObjectKind::Chest)
    }

    pub fn gift(self) -> Option<GiftKind> {
        match self {
            ObjectKind::Heart => Some(GiftKind::Heart),
            ObjectKind::Flower => Some(GiftKind::Flower),
            _ => None,
        }
    }
}

/// A statically placed level object.
///
/// `collected` only ever goes false -> true and `active` only true -> false;
/// the setters enforce that, so a second pickup of the same object is a no-op.
#[derive(Debug, Clone)]
pub struct WorldObject {
    pub id: String,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    collected: bool,
    active: bool,
}

impl WorldObject {
    pub fn new(id: String, kind: ObjectKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            size,
            collected: false,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true only on the first call.
    pub fn mark_collected(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    /// Returns true only on the first call.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// A reward thrown out of a box or chest. Falls under gravity and bounces
/// until the player picks it up.
#[derive(Debug, Clone)]
pub struct SpawnedItem {
    pub id: String,
    pub gift: GiftKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl SpawnedItem {
    pub fn new(id: String, gift: GiftKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            gift,
            pos,
            vel,
            size: SPAWNED_SIZE,
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Heart,
    Flower,
    Confetti,
    Broken,
    Petal,
    Sparkle,
}

impl ParticleKind {
    pub fn falls(self) -> bool {
        matches!(self, ParticleKind::Confetti | ParticleKind::Petal)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    pub life: u32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Advance one tick. Returns false once the particle has expired.
    pub fn update(&mut self, gravity: f32) -> bool {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        if self.kind.falls() {
            self.vel.y += gravity;
        }
        self.life > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collected_flag_is_set_once() {
        let mut heart = WorldObject::new(
            "item-0".to_string(),
            ObjectKind::Heart,
            Vec2::ZERO,
            ITEM_SIZE,
        );
        assert!(heart.mark_collected());
        assert!(!heart.mark_collected());
        assert!(heart.is_collected());

        assert!(heart.deactivate());
        assert!(!heart.deactivate());
        assert!(!heart.is_active());
    }

    #[test]
    fn particles_expire_and_only_some_fall() {
        let mut confetti = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            color: Color::WHITE,
            size: 4.0,
            life: 2,
            kind: ParticleKind::Confetti,
        };
        assert!(confetti.update(0.04));
        assert_eq!(confetti.pos, Vec2::new(1.0, 0.0));
        assert!((confetti.vel.y - 0.04).abs() < 1e-6);
        assert!(!confetti.update(0.04));

        let mut sparkle = Particle {
            kind: ParticleKind::Sparkle,
            life: 5,
            ..confetti
        };
        sparkle.vel = Vec2::ZERO;
        sparkle.update(0.04);
        assert_eq!(sparkle.vel, Vec2::ZERO);
    }

    #[test]
    fn color_unpacks_channels() {
        assert_eq!(Color(0xff4081).rgb(), [0xff, 0x40, 0x81]);
    }
}
