//! Frame clock
//!
//! Measures the time between frames and hands it to the scene, capped so a
//! stall (first frame, window drag, lost focus) does not arrive as one huge
//! step. The physics accumulator further limits how much of it is simulated.

use std::time::{Duration, Instant};

use crate::scene::SceneController;

/// Longest frame passed to the scene
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Drives the scene once per redraw
pub struct SimulationSystem {
    last_frame: Instant,
}

impl SimulationSystem {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Time since the previous call, capped
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = (now - self.last_frame).min(MAX_FRAME);
        self.last_frame = now;
        dt
    }

    /// Run one scene frame
    pub fn update(&mut self, scene: &mut SceneController) -> Duration {
        let dt = self.tick();
        scene.frame(dt);
        dt
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_delta_time_capped() {
        let mut sim = SimulationSystem::new();
        sim.last_frame = Instant::now() - Duration::from_secs(5);
        assert_eq!(sim.tick(), MAX_FRAME);
    }

    #[test]
    fn test_tick_resets_clock() {
        let mut sim = SimulationSystem::default();
        std::thread::sleep(Duration::from_millis(20));
        assert!(sim.tick() >= Duration::from_millis(20));
        assert!(sim.tick() < Duration::from_millis(20));
    }

    #[test]
    fn test_update_drives_scene_clock() {
        let mut sim = SimulationSystem::new();
        let mut scene = SceneController::new(AppConfig::default());
        sim.last_frame = Instant::now() - Duration::from_secs(1);
        // Capped frame is still past the placeholder delay
        sim.update(&mut scene);
        assert!(!scene.is_placeholder_visible());
    }
}
