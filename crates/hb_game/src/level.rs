//! Static level layout. Loaded once per process and never mutated; the world
//! state copies what it needs out of it at session start.

use glam::Vec2;
use hb_core::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Ground,
    Platform,
}

#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
}

/// Item types that can be placed in the level's item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedItem {
    Heart,
    Flower,
    Box,
    Chest,
}

#[derive(Debug, Clone, Copy)]
pub struct ItemSpawn {
    pub pos: Vec2,
    pub kind: PlacedItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Hill,
    Garden,
}

#[derive(Debug, Clone, Copy)]
pub struct Decoration {
    pub pos: Vec2,
    pub kind: DecorationKind,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub platforms: Vec<Platform>,
    pub items: Vec<ItemSpawn>,
    pub balloons: Vec<Vec2>,
    pub keys: Vec<Vec2>,
    pub decorations: Vec<Decoration>,
    /// Where the partner waits; the traversal objective.
    pub destination: Vec2,
}

impl Level {
    /// The single built-in level.
    pub fn valentine() -> Self {
        let ground = |x: f32, w: f32| Platform {
            rect: Rect::new(x, 400.0, w, 50.0),
            kind: PlatformKind::Ground,
        };
        let ledge = |x: f32, y: f32, w: f32| Platform {
            rect: Rect::new(x, y, w, 20.0),
            kind: PlatformKind::Platform,
        };
        let item = |x: f32, y: f32, kind: PlacedItem| ItemSpawn {
            pos: Vec2::new(x, y),
            kind,
        };
        let decoration = |x: f32, kind: DecorationKind| Decoration {
            pos: Vec2::new(x, 400.0),
            kind,
        };

        Self {
            width: 4600.0,
            height: 450.0,
            platforms: vec![
                ground(0.0, 900.0),
                ground(1000.0, 800.0),
                ground(1950.0, 1000.0),
                ground(3100.0, 1500.0),
                ledge(400.0, 280.0, 120.0),
                ledge(650.0, 190.0, 100.0),
                ledge(1250.0, 300.0, 80.0),
                ledge(2100.0, 260.0, 120.0),
                ledge(2400.0, 160.0, 120.0),
                ledge(2700.0, 250.0, 100.0),
                ledge(3200.0, 280.0, 150.0),
                ledge(3800.0, 220.0, 120.0),
            ],
            items: vec![
                item(440.0, 210.0, PlacedItem::Heart),
                item(2750.0, 180.0, PlacedItem::Heart),
                item(680.0, 120.0, PlacedItem::Flower),
                item(3250.0, 210.0, PlacedItem::Flower),
                // Boxes float high enough to be struck from below.
                item(250.0, 240.0, PlacedItem::Box),
                item(1100.0, 240.0, PlacedItem::Box),
                item(4100.0, 368.0, PlacedItem::Chest),
            ],
            balloons: vec![Vec2::new(800.0, 360.0)],
            keys: vec![
                Vec2::new(700.0, 360.0),
                Vec2::new(2500.0, 100.0),
                Vec2::new(3500.0, 360.0),
            ],
            decorations: vec![
                decoration(150.0, DecorationKind::Hill),
                decoration(500.0, DecorationKind::Garden),
                decoration(1300.0, DecorationKind::Hill),
                decoration(2200.0, DecorationKind::Garden),
                decoration(2800.0, DecorationKind::Garden),
                decoration(3300.0, DecorationKind::Hill),
                decoration(3700.0, DecorationKind::Garden),
                decoration(4200.0, DecorationKind::Garden),
            ],
            destination: Vec2::new(4400.0, 352.0),
        }
    }

    pub fn platform_rects(&self) -> impl Iterator<Item = &Rect> {
        self.platforms.iter().map(|platform| &platform.rect)
    }

    /// Sanity checks for hand-built levels; the built-in one always passes.
    pub fn validate(&self) -> Result<(), String> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err("Level validation failed: width and height must be > 0".to_string());
        }
        if self.platforms.is_empty() {
            return Err("Level validation failed: no platforms".to_string());
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            if platform.rect.w <= 0.0 || platform.rect.h <= 0.0 {
                return Err(format!(
                    "Level validation failed: platform {index} has non-positive size"
                ));
            }
        }
        let inside = |p: Vec2| p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height;
        if !inside(self.destination) {
            return Err("Level validation failed: destination outside level bounds".to_string());
        }
        Ok(())
    }
}
