pub mod geometry;
pub mod input;
pub mod schedule;
pub mod time;

pub use geometry::{resolve_collision, Body, CollisionSide, Rect};
pub use input::{Control, InputState, Key};
pub use schedule::Schedule;
pub use time::{ms_to_ticks, TimeState, TICKS_PER_SECOND};
