use crate::phase::GamePhase;

/// Background music selection forwarded to the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BgmMode {
    Valentine,
    Celebration,
    Sad,
    Stop,
}

/// Fire-and-forget sound requests. The core never waits on playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    Collect,
    BoxHit,
    BalloonGrab,
    DialogueBlip { female: bool },
    Victory,
    Firework,
    Crying,
    Dramatic,
    Bgm(BgmMode),
}

/// Everything the shell and audio collaborators hear from one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    CountsChanged { hearts: u32, flowers: u32, keys: u32 },
    LivesChanged(u32),
    PhaseChanged(GamePhase),
    Audio(AudioCue),
}

/// Per-tick outbox. Subsystems push into it; the driver hands it to the shell
/// when the tick ends.
#[derive(Debug, Default)]
pub struct EventSink {
    events: Vec<SessionEvent>,
}

impl EventSink {
    pub fn push(&mut self, event: SessionEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    pub fn audio(&mut self, cue: AudioCue) {
        self.push(SessionEvent::Audio(cue));
    }

    pub fn counts(&mut self, hearts: u32, flowers: u32, keys: u32) {
        self.push(SessionEvent::CountsChanged {
            hearts,
            flowers,
            keys,
        });
    }

    pub fn take(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events.iter()
    }
}
