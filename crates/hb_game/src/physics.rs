//! Player movement for one PLAY tick: input, gravity, integration, and
//! collision against platforms and intact boxes/chests.
//!
//! All quantities are per tick. Collision is resolved after integration by
//! pushing the player out of each overlapping rectangle in level order, so a
//! later platform can override an earlier one's correction on the same tick.

use hb_core::{resolve_collision, CollisionSide, Control, InputState};

use crate::config::GameConfig;
use crate::entity::Player;
use crate::events::{AudioCue, EventSink, SessionEvent};
use crate::level::Level;
use crate::world::World;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// -1, 0 or +1.
    pub move_x: f32,
    pub jump_held: bool,
}

impl PlayerInput {
    /// Right wins when both directions are held.
    pub fn from_input(input: &InputState) -> Self {
        let move_x = if input.control_held(Control::MoveRight) {
            1.0
        } else if input.control_held(Control::MoveLeft) {
            -1.0
        } else {
            0.0
        };
        Self {
            move_x,
            jump_held: input.control_held(Control::Jump),
        }
    }
}

/// Move the player one tick. Returns the indices of world items struck from
/// below this tick; the caller decides what striking them does.
pub fn step_player(
    player: &mut Player,
    input: PlayerInput,
    level: &Level,
    world: &World,
    config: &GameConfig,
    events: &mut EventSink,
) -> Vec<usize> {
    let body = &mut player.body;

    if input.move_x != 0.0 {
        body.vel.x = input.move_x * config.move_speed;
        player.facing = input.move_x.signum();
    } else {
        body.vel.x *= config.idle_damping;
    }

    if input.jump_held && body.grounded {
        body.vel.y = config.jump_force;
        body.grounded = false;
        events.audio(AudioCue::Jump);
    }

    let gravity = if player.has_balloon {
        config.balloon_gravity
    } else {
        config.gravity
    };
    if player.has_balloon && input.jump_held {
        body.vel.y = config.balloon_lift;
    }
    body.vel.y += gravity;

    body.pos += body.vel;
    // Grounded is driven from this tick's contacts only.
    body.grounded = false;
    for rect in level.platform_rects() {
        resolve_collision(body, rect);
    }

    let mut struck = Vec::new();
    for (index, item) in world.items.iter().enumerate() {
        if item.is_collected() || !item.kind.is_solid() {
            continue;
        }
        if resolve_collision(body, &item.rect()) == Some(CollisionSide::Bottom) {
            struck.push(index);
        }
    }

    if body.vel.x.abs() > 0.5 {
        player.anim_phase += config.anim_rate;
    }

    struck
}

/// Handle the player dropping out of the bottom of the level. Lives never go
/// below zero; once they hit zero the player is left where they are.
pub fn handle_fall(player: &mut Player, level: &Level, config: &GameConfig, events: &mut EventSink) {
    if player.body.pos.y <= level.height || player.lives == 0 {
        return;
    }

    player.lives -= 1;
    events.push(SessionEvent::LivesChanged(player.lives));
    if player.lives == 0 {
        log::info!("Player fell with no lives left");
        return;
    }

    let x = (player.body.pos.x - config.respawn_rewind).max(0.0);
    log::debug!(
        "Player fell at x={:.0}; respawning at x={:.0} with {} lives",
        player.body.pos.x,
        x,
        player.lives
    );
    player.body.pos.x = x;
    player.body.pos.y = config.respawn_y;
    player.body.vel = glam::Vec2::ZERO;
    player.has_balloon = true;
    events.audio(AudioCue::BoxHit);
}

/// True once the player is close enough to the partner carrying enough gifts.
pub fn reached_partner(player: &Player, level: &Level, config: &GameConfig) -> bool {
    player.body.pos.x > level.destination.x - config.partner_reach
        && player.hearts >= config.gifts_required
        && player.flowers >= config.gifts_required
}
