//! Typewriter-style dialogue queue.

use crate::config::Customization;

pub const REVEAL_RATE: f32 = 0.45;
const BLIP_EVERY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Partner,
}

impl Speaker {
    /// Picks the blip voice.
    pub fn is_female(self, player: &Customization, partner: &Customization) -> bool {
        match self {
            Speaker::Player => player.is_female(),
            Speaker::Partner => partner.is_female(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueLine {
    fn new(speaker: Speaker, text: &str) -> Self {
        Self {
            speaker,
            text: text.to_string(),
        }
    }
}

/// What a confirm press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The rest of the current line was revealed at once.
    Revealed,
    /// Moved on to the line at this index.
    Advanced(usize),
    /// Confirm on the fully revealed last line.
    Finished,
}

#[derive(Debug, Clone)]
pub struct DialogueQueue {
    lines: Vec<DialogueLine>,
    index: usize,
    progress: f32,
    active: bool,
}

impl DialogueQueue {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self {
            lines,
            index: 0,
            progress: 0.0,
            active: false,
        }
    }

    /// The proposal scene.
    pub fn proposal_script() -> Self {
        Self::new(vec![
            DialogueLine::new(Speaker::Partner, "Ohh you're finally here"),
            DialogueLine::new(Speaker::Partner, "I've been waiting for you"),
            DialogueLine::new(
                Speaker::Player,
                "I've collected all these gifts with utmost love",
            ),
            DialogueLine::new(
                Speaker::Partner,
                "I'm so happy with your efforts, I need to ask you something...",
            ),
        ])
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current(&self) -> Option<&DialogueLine> {
        self.lines.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.lines.len()
    }

    fn line_len(&self) -> usize {
        self.current().map_or(0, |line| line.text.chars().count())
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.progress >= self.line_len() as f32
    }

    /// The revealed prefix of the current line.
    pub fn visible_text(&self) -> &str {
        let Some(line) = self.current() else {
            return "";
        };
        let shown = self.progress.floor() as usize;
        match line.text.char_indices().nth(shown) {
            Some((byte, _)) => &line.text[..byte],
            None => &line.text,
        }
    }

    /// Reveal more of the current line. Returns true when the revealed
    /// character count crossed onto a new multiple of five, the cadence of
    /// the talking blip.
    pub fn tick(&mut self) -> bool {
        if !self.active || self.is_fully_revealed() {
            return false;
        }
        let before = self.progress.floor() as usize;
        self.progress = (self.progress + REVEAL_RATE).min(self.line_len() as f32);
        let after = self.progress.floor() as usize;
        after != before && after % BLIP_EVERY == 0
    }

    pub fn confirm(&mut self) -> ConfirmOutcome {
        if !self.is_fully_revealed() {
            self.progress = self.line_len() as f32;
            return ConfirmOutcome::Revealed;
        }
        if self.is_last() {
            return ConfirmOutcome::Finished;
        }
        self.index += 1;
        self.progress = 0.0;
        ConfirmOutcome::Advanced(self.index)
    }
}
