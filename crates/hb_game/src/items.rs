//! Pickups and rewards: static collectibles, box breaking, chest opening, and
//! the physics of items thrown out of boxes and chests.
//!
//! Every pickup goes through a monotone flag, so re-running a pass over the
//! same overlap is a no-op and counters move exactly once per object.

use glam::Vec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::entity::{GiftKind, ObjectKind, Player};
use crate::events::{AudioCue, EventSink};
use crate::level::Level;
use crate::world::World;

const BOX_REWARD_OFFSET: Vec2 = Vec2::new(0.0, -40.0);
const BOX_REWARD_LAUNCH: f32 = -7.0;
const CHEST_REWARD_OFFSET: Vec2 = Vec2::new(10.0, -30.0);

fn report_counts(player: &Player, events: &mut EventSink) {
    events.counts(player.hearts, player.flowers, player.keys);
}

/// Hearts and flowers placed in the level.
pub fn collect_static_gifts(player: &mut Player, world: &mut World, events: &mut EventSink) {
    let player_rect = player.rect();
    for item in world.items.iter_mut() {
        let Some(gift) = item.kind.gift() else {
            continue;
        };
        if item.is_collected() || !player_rect.intersects(&item.rect()) {
            continue;
        }
        if item.mark_collected() {
            player.add_gift(gift);
            log::debug!("Collected {} ({:?})", item.id, gift);
            events.audio(AudioCue::Collect);
            report_counts(player, events);
        }
    }
}

pub fn collect_keys(player: &mut Player, world: &mut World, events: &mut EventSink) {
    let player_rect = player.rect();
    for key in world.keys.iter_mut() {
        if key.is_collected() || !player_rect.intersects(&key.rect()) {
            continue;
        }
        if key.mark_collected() {
            player.keys += 1;
            log::debug!("Collected {} ({} keys)", key.id, player.keys);
            events.audio(AudioCue::Collect);
            report_counts(player, events);
        }
    }
}

/// Balloons are only grabbed when the player isn't already holding one.
pub fn collect_balloons(player: &mut Player, world: &mut World, events: &mut EventSink) {
    if player.has_balloon {
        return;
    }
    let player_rect = player.rect();
    for balloon in world.balloons.iter_mut() {
        if !balloon.is_active() || !player_rect.intersects(&balloon.rect()) {
            continue;
        }
        if balloon.deactivate() {
            player.has_balloon = true;
            log::debug!("Grabbed {}", balloon.id);
            events.audio(AudioCue::BalloonGrab);
            return;
        }
    }
}

/// Break every box in `struck` and throw out its reward. The first box in
/// level order always yields a heart, every other box a flower.
pub fn break_boxes<R: Rng>(world: &mut World, struck: &[usize], rng: &mut R, events: &mut EventSink) {
    for &index in struck {
        let Some(ordinal) = world.box_ordinal(index) else {
            continue;
        };
        let item = &mut world.items[index];
        if !item.mark_collected() {
            continue;
        }
        let pos = item.pos + BOX_REWARD_OFFSET;
        let gift = if ordinal == 0 {
            GiftKind::Heart
        } else {
            GiftKind::Flower
        };
        log::debug!("Broke {} -> {:?}", item.id, gift);
        events.audio(AudioCue::BoxHit);

        let vel = Vec2::new((rng.gen::<f32>() - 0.5) * 3.0, BOX_REWARD_LAUNCH);
        world.spawn_item("boxspawn", gift, pos, vel);
    }
}

/// Index of the first unopened chest within reach, if the player carries
/// enough keys to open it.
pub fn reachable_chest(player: &Player, world: &World, config: &GameConfig) -> Option<usize> {
    if player.keys < config.keys_for_chest {
        return None;
    }
    world.items.iter().position(|item| {
        item.kind == ObjectKind::Chest
            && !item.is_collected()
            && player.pos().distance(item.pos) < config.chest_reach
    })
}

/// Explicit activation. Opens the reachable chest and throws out two hearts
/// and two flowers; does nothing when no chest qualifies.
pub fn open_chest(
    player: &Player,
    world: &mut World,
    config: &GameConfig,
    events: &mut EventSink,
) -> bool {
    let Some(index) = reachable_chest(player, world, config) else {
        log::debug!(
            "Chest activation ignored ({} keys, need {})",
            player.keys,
            config.keys_for_chest
        );
        return false;
    };
    let chest = &mut world.items[index];
    if !chest.mark_collected() {
        return false;
    }
    let origin = chest.pos + CHEST_REWARD_OFFSET;
    log::debug!("Opened {}", chest.id);
    events.audio(AudioCue::BoxHit);

    for i in 0..2 {
        let spread = i as f32;
        world.spawn_item(
            "chest-h",
            GiftKind::Heart,
            origin,
            Vec2::new(2.0 - spread * 4.0, -8.0),
        );
        world.spawn_item(
            "chest-f",
            GiftKind::Flower,
            origin,
            Vec2::new(4.0 - spread * 8.0, -7.0),
        );
    }
    true
}

/// Gravity, damping and platform bounce for thrown items, then pickup.
pub fn update_spawned(
    player: &mut Player,
    world: &mut World,
    level: &Level,
    config: &GameConfig,
    events: &mut EventSink,
) {
    let player_rect = player.rect();
    for item in world.spawned.iter_mut().filter(|item| !item.collected) {
        item.vel.y += config.gravity;
        item.pos += item.vel;
        item.vel.x *= config.spawned_damping;

        for platform in level.platform_rects() {
            if item.rect().intersects(platform) && item.vel.y > 0.0 {
                item.pos.y = platform.y - item.size.y;
                item.vel.y = -item.vel.y * config.spawned_bounce;
            }
        }

        if player_rect.intersects(&item.rect()) {
            item.collected = true;
            player.add_gift(item.gift);
            log::debug!("Collected {} ({:?})", item.id, item.gift);
            events.audio(AudioCue::Collect);
            report_counts(player, events);
        }
    }
    world.spawned.retain(|item| !item.collected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SessionEvent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Player, World, Level, GameConfig) {
        let config = GameConfig::default();
        let level = Level::valentine();
        let world = World::from_level(&level);
        (Player::new(&config, true), world, level, config)
    }

    #[test]
    fn static_gift_counts_once() {
        let (mut player, mut world, _level, _config) = setup();
        let mut events = EventSink::default();
        player.body.pos = world.items[0].pos;

        collect_static_gifts(&mut player, &mut world, &mut events);
        collect_static_gifts(&mut player, &mut world, &mut events);
        assert_eq!(player.hearts, 1);
        assert!(world.items[0].is_collected());
        let reports = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::CountsChanged { .. }))
            .count();
        assert_eq!(reports, 1);
    }

    #[test]
    fn boxes_and_chests_are_not_picked_up_by_touch() {
        let (mut player, mut world, _level, _config) = setup();
        let mut events = EventSink::default();
        player.body.pos = world.items[4].pos;
        collect_static_gifts(&mut player, &mut world, &mut events);
        assert!(!world.items[4].is_collected());
        assert_eq!(player.gifts(), 0);
    }

    #[test]
    fn balloon_ignored_while_holding_one() {
        let (mut player, mut world, _level, _config) = setup();
        let mut events = EventSink::default();
        player.body.pos = world.balloons[0].pos;

        collect_balloons(&mut player, &mut world, &mut events);
        assert!(world.balloons[0].is_active());

        player.has_balloon = false;
        collect_balloons(&mut player, &mut world, &mut events);
        assert!(player.has_balloon);
        assert!(!world.balloons[0].is_active());
        assert!(events
            .iter()
            .any(|e| *e == SessionEvent::Audio(AudioCue::BalloonGrab)));
    }

    #[test]
    fn keys_increment_counter() {
        let (mut player, mut world, _level, _config) = setup();
        let mut events = EventSink::default();
        player.body.pos = world.keys[1].pos;
        collect_keys(&mut player, &mut world, &mut events);
        assert_eq!(player.keys, 1);
        assert!(world.keys[1].is_collected());
    }

    #[test]
    fn box_rewards_follow_box_order() {
        let (_player, mut world, _level, _config) = setup();
        let mut events = EventSink::default();
        let mut rng = StdRng::seed_from_u64(42);

        break_boxes(&mut world, &[5, 4], &mut rng, &mut events);
        assert!(world.items[4].is_collected());
        assert!(world.items[5].is_collected());
        assert_eq!(world.spawned.len(), 2);
        assert_eq!(world.spawned[0].gift, GiftKind::Flower);
        assert_eq!(world.spawned[1].gift, GiftKind::Heart);
        for item in &world.spawned {
            assert_eq!(item.vel.y, -7.0);
            assert!(item.vel.x.abs() <= 1.5);
        }

        // Already broken: nothing more comes out.
        break_boxes(&mut world, &[4], &mut rng, &mut events);
        assert_eq!(world.spawned.len(), 2);
    }

    #[test]
    fn chest_needs_three_keys() {
        let (mut player, mut world, _level, config) = setup();
        let mut events = EventSink::default();
        player.body.pos = world.items[6].pos + Vec2::new(-40.0, 0.0);
        player.keys = 2;

        assert!(!open_chest(&player, &mut world, &config, &mut events));
        assert!(world.spawned.is_empty());
        assert!(!world.items[6].is_collected());

        player.keys = 3;
        assert!(open_chest(&player, &mut world, &config, &mut events));
        assert!(world.items[6].is_collected());
        assert_eq!(world.spawned.len(), 4);
        let hearts = world
            .spawned
            .iter()
            .filter(|item| item.gift == GiftKind::Heart)
            .count();
        assert_eq!(hearts, 2);

        assert!(!open_chest(&player, &mut world, &config, &mut events));
        assert_eq!(world.spawned.len(), 4);
    }

    #[test]
    fn chest_out_of_reach_stays_closed() {
        let (mut player, mut world, _level, config) = setup();
        let mut events = EventSink::default();
        player.keys = 3;
        player.body.pos = world.items[6].pos + Vec2::new(-200.0, 0.0);
        assert!(reachable_chest(&player, &world, &config).is_none());
        assert!(!open_chest(&player, &mut world, &config, &mut events));
    }

    #[test]
    fn spawned_item_bounces_then_settles_and_is_collectable() {
        let (mut player, mut world, level, config) = setup();
        let mut events = EventSink::default();
        player.body.pos = Vec2::new(0.0, 0.0);
        world.spawn_item("test", GiftKind::Flower, Vec2::new(300.0, 340.0), Vec2::new(2.0, 0.0));

        let mut bounced = false;
        for _ in 0..40 {
            update_spawned(&mut player, &mut world, &level, &config, &mut events);
            if world.spawned[0].vel.y < 0.0 {
                bounced = true;
            }
        }
        assert!(bounced);
        let item = &world.spawned[0];
        assert!(item.pos.y <= 400.0 - item.size.y + 1.0);
        assert!(item.vel.x.abs() < 2.0);

        player.body.pos = world.spawned[0].pos;
        update_spawned(&mut player, &mut world, &level, &config, &mut events);
        assert!(world.spawned.is_empty());
        assert_eq!(player.flowers, 1);
    }
}
