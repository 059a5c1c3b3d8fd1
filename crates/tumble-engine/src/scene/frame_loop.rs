use std::time::Duration;

use super::frame::FrameOutput;
use super::scene::Scene;

/// Render loop state. There is no terminal state; the loop ends when the
/// host stops delivering frame callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// Constructed, first frame not yet scheduled.
    Idle,
    /// Self-rescheduling steady state.
    Running,
}

/// Drives a [`Scene`] one frame at a time.
#[derive(Debug)]
pub struct FrameLoop {
    scene: Scene,
    state: LoopState,
    frames: u64,
}

impl FrameLoop {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            state: LoopState::Idle,
            frames: 0,
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames produced since `start`.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves `Idle -> Running`. Returns `false` if the loop was already running.
    pub fn start(&mut self) -> bool {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                log::info!("render loop started");
                true
            }
            LoopState::Running => false,
        }
    }

    /// Produces the output for one frame; `None` until the loop has started.
    pub fn step(&mut self, elapsed: Duration) -> Option<FrameOutput> {
        if self.state != LoopState::Running {
            return None;
        }
        self.frames = self.frames.wrapping_add(1);
        Some(self.scene.render_frame(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VertexLayout;
    use crate::scene::{DrawKind, SceneConfig};

    fn twin_loop() -> FrameLoop {
        FrameLoop::new(Scene::new(SceneConfig::twin_cubes(VertexLayout::Interleaved).with_side(2.0)))
    }

    #[test]
    fn idle_loop_produces_nothing() {
        let mut lp = twin_loop();
        assert_eq!(lp.state(), LoopState::Idle);
        assert!(lp.step(Duration::ZERO).is_none());
        assert_eq!(lp.frames(), 0);
    }

    #[test]
    fn start_happens_once() {
        let mut lp = twin_loop();
        assert!(lp.start());
        assert!(!lp.start());
        assert_eq!(lp.state(), LoopState::Running);
    }

    #[test]
    fn first_iteration_draws_both_cubes() {
        let mut lp = twin_loop();
        lp.start();

        let frame = lp.step(Duration::ZERO).unwrap();
        let indexed: Vec<_> = frame
            .draws
            .iter()
            .filter(|d| d.kind == DrawKind::Indexed { index_count: 36 })
            .collect();
        assert_eq!(indexed.len(), 2);
        assert_eq!(lp.frames(), 1);
    }

    #[test]
    fn successive_frames_advance_rotation() {
        let mut lp = twin_loop();
        lp.start();
        let a = lp.step(Duration::from_millis(0)).unwrap();
        let b = lp.step(Duration::from_millis(500)).unwrap();
        assert_ne!(a.draws[0].world, b.draws[0].world);
        assert_eq!(lp.frames(), 2);
    }
}
