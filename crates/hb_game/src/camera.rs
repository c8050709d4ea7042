use glam::Vec2;

use crate::cutscene::EndingChoice;
use crate::level::Level;
use crate::phase::GamePhase;

const FOLLOW_RATE: f32 = 0.08;
const ZOOM_RATE: f32 = 0.03;
const CUTSCENE_ZOOM: f32 = 1.15;
const ENDING_ZOOM_YES: f32 = 1.7;
const ENDING_ZOOM_DEFAULT: f32 = 1.3;

/// Smoothed follow camera. `position` is the top-left scroll offset of the
/// unzoomed viewport; zoom scales around the viewport centre.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub position: Vec2,
    pub target: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    pub viewport: Vec2,
}

impl CameraController {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Pick this tick's target from the phase, then ease toward it.
    pub fn update(
        &mut self,
        phase: GamePhase,
        player: Vec2,
        partner: Vec2,
        ending: EndingChoice,
        level: &Level,
    ) {
        if phase.is_narrative() {
            let mid = (player + partner) * 0.5;
            self.target = mid - (self.viewport * 0.5) / self.zoom;
            self.target_zoom = match (phase, ending) {
                (GamePhase::End, EndingChoice::Affirmative) => ENDING_ZOOM_YES,
                (GamePhase::End, _) => ENDING_ZOOM_DEFAULT,
                _ => CUTSCENE_ZOOM,
            };
        } else {
            let max = (Vec2::new(level.width, level.height) - self.viewport).max(Vec2::ZERO);
            self.target = (player - self.viewport * 0.5).clamp(Vec2::ZERO, max);
            self.target_zoom = 1.0;
        }
        self.ease();
    }

    fn ease(&mut self) {
        self.position += (self.target - self.position) * FOLLOW_RATE;
        self.zoom += (self.target_zoom - self.zoom) * ZOOM_RATE;
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        (world - self.position - half) * self.zoom + half
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let half = self.viewport * 0.5;
        (screen - half) / self.zoom + half + self.position
    }

    /// Screen-space centre of the viewport in world coordinates.
    pub fn focus(&self) -> Vec2 {
        self.position + self.viewport * 0.5
    }
}
