//! Top-level game phase and its transition table.
//!
//! Every phase change in the session goes through [`GamePhase::on`]; call
//! sites never assign a phase directly. A trigger that has no row for the
//! current phase is rejected, which is how out-of-phase requests (pausing a
//! cutscene, opening the ending twice) become no-ops.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Start,
    Customize,
    Play,
    Pause,
    Cutscene,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    /// Shell leaves the title screen.
    OpenCustomizer,
    /// Shell finishes customization.
    BeginPlay,
    TogglePause,
    /// Player reached the partner with enough gifts.
    ReachPartner,
    /// Ring hand-over delay elapsed.
    RingDelivered,
    Restart,
}

impl GamePhase {
    pub fn on(self, trigger: PhaseTrigger) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseTrigger::*;
        match (self, trigger) {
            (_, Restart) => Some(Start),
            (Start, OpenCustomizer) => Some(Customize),
            (Customize, BeginPlay) => Some(Play),
            (Play, TogglePause) => Some(Pause),
            (Pause, TogglePause) => Some(Play),
            (Play, ReachPartner) => Some(Cutscene),
            (Cutscene, RingDelivered) => Some(End),
            _ => None,
        }
    }

    /// Phases in which the frame loop keeps ticking.
    pub fn is_running(self) -> bool {
        !matches!(self, GamePhase::Pause)
    }

    /// Phases in which the camera frames the couple instead of following the player.
    pub fn is_narrative(self) -> bool {
        matches!(self, GamePhase::Cutscene | GamePhase::End)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Customize => "CUSTOMIZE",
            Self::Play => "PLAY",
            Self::Pause => "PAUSE",
            Self::Cutscene => "CUTSCENE",
            Self::End => "END",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
