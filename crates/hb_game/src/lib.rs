pub mod camera;
pub mod config;
pub mod cutscene;
pub mod dialogue;
pub mod entity;
pub mod events;
pub mod items;
pub mod level;
pub mod phase;
pub mod physics;
pub mod replay;
pub mod session;
pub mod world;

pub use config::{load_session_config_from_path, GameConfig, SessionConfig};
pub use cutscene::{CutsceneStep, EndingChoice};
pub use events::{AudioCue, BgmMode, SessionEvent};
pub use phase::GamePhase;
pub use replay::{load_replay_from_path, parse_replay, ReplayAction, ReplayFrame, ReplaySequence};
pub use session::{FrameView, Session};
