use hb_core::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

/// Shell-level requests a replay can make in addition to key input.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplayAction {
    ActivateChest,
    Pause,
    ChooseYes,
    ChooseNo,
    Restart,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReplayFrame {
    /// Keys held for every tick of the frame.
    #[serde(default)]
    pub held: Vec<Key>,
    /// Keys pressed on the first tick only.
    #[serde(default)]
    pub pressed: Vec<Key>,
    #[serde(default)]
    pub action: Option<ReplayAction>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplayFrame {
    /// Load this frame's keys into `input`, producing press and release
    /// edges against whatever the previous frame held.
    pub fn apply_to(&self, input: &mut InputState) {
        input.set_held(self.held.iter().copied());
        for key in &self.pressed {
            input.key_up(*key);
            input.key_down(*key);
        }
    }
}

impl ReplaySequence {
    /// One frame per tick. Presses and actions stay on the first tick of a
    /// repeated frame.
    pub fn expanded_frames(&self) -> Vec<ReplayFrame> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                let first = i == 0;
                out.push(ReplayFrame {
                    held: frame.held.clone(),
                    pressed: if first { frame.pressed.clone() } else { Vec::new() },
                    action: if first { frame.action } else { None },
                    repeat: 1,
                });
            }
        }
        out
    }

    pub fn tick_count(&self) -> u64 {
        self.frames.iter().map(|f| f.repeat.max(1) as u64).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("{} ({})", e, path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplaySequence, String> {
    let replay: ReplaySequence =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    if let Some(index) = replay.frames.iter().position(|f| f.repeat == 0) {
        return Err(format!(
            "Replay validation failed: frame {index} has repeat 0"
        ));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
