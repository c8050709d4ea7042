use glam::Vec2;

use crate::entity::{
    GiftKind, ObjectKind, Particle, SpawnedItem, WorldObject, BALLOON_SIZE, ITEM_SIZE, KEY_SIZE,
};
use crate::level::{Level, PlacedItem};

/// Mutable per-session world contents. Rebuilt from the level on restart.
#[derive(Debug, Clone)]
pub struct World {
    pub items: Vec<WorldObject>,
    pub balloons: Vec<WorldObject>,
    pub keys: Vec<WorldObject>,
    pub spawned: Vec<SpawnedItem>,
    pub particles: Vec<Particle>,
    next_spawn_id: u32,
}

impl World {
    pub fn from_level(level: &Level) -> Self {
        let items = level
            .items
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let kind = match spawn.kind {
                    PlacedItem::Heart => ObjectKind::Heart,
                    PlacedItem::Flower => ObjectKind::Flower,
                    PlacedItem::Box => ObjectKind::Box,
                    PlacedItem::Chest => ObjectKind::Chest,
                };
                WorldObject::new(format!("item-{i}"), kind, spawn.pos, ITEM_SIZE)
            })
            .collect();
        let balloons = level
            .balloons
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                WorldObject::new(format!("balloon-{i}"), ObjectKind::Balloon, *pos, BALLOON_SIZE)
            })
            .collect();
        let keys = level
            .keys
            .iter()
            .enumerate()
            .map(|(i, pos)| WorldObject::new(format!("key-{i}"), ObjectKind::Key, *pos, KEY_SIZE))
            .collect();

        Self {
            items,
            balloons,
            keys,
            spawned: Vec::new(),
            particles: Vec::new(),
            next_spawn_id: 0,
        }
    }

    pub fn spawn_item(&mut self, prefix: &str, gift: GiftKind, pos: Vec2, vel: Vec2) {
        let id = format!("{prefix}-{}", self.next_spawn_id);
        self.next_spawn_id += 1;
        self.spawned.push(SpawnedItem::new(id, gift, pos, vel));
    }

    /// Position of `item_index` among the level's boxes, in level order.
    pub fn box_ordinal(&self, item_index: usize) -> Option<usize> {
        if self.items.get(item_index)?.kind != ObjectKind::Box {
            return None;
        }
        Some(
            self.items[..item_index]
                .iter()
                .filter(|item| item.kind == ObjectKind::Box)
                .count(),
        )
    }

    pub fn update_particles(&mut self, gravity: f32) {
        self.particles.retain_mut(|particle| particle.update(gravity));
    }

    pub fn active_spawned(&self) -> impl Iterator<Item = &SpawnedItem> {
        self.spawned.iter().filter(|item| !item.collected)
    }
}
