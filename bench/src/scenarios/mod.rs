//! Realistic frame-loop scenarios.
//!
//! Each scenario builds a fixed-capacity world and then runs frames in the order the ECS is
//! designed around: input, update, flush, render. Entities die by being marked during update and
//! leave storage at the flush.
//!
//! # Scenarios
//!
//! - **Particles**: high entity count, simple components, short lifetimes and constant respawn
//! - **Game World**: mixed component sets, combat, projectiles that live for a few frames

pub mod game_world;
pub mod particles;

pub use game_world::{GameWorldConfig, GameWorldScenario};
pub use particles::{ParticleConfig, ParticleScenario};

use crate::frame_timer::Phase;

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of entities the scenario keeps alive.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (spawn entities, initialize state).
    fn setup(&mut self);

    /// Run a single phase of the current frame.
    fn run_phase(&mut self, phase: Phase);

    /// Run one whole frame.
    fn update(&mut self) {
        for phase in Phase::ALL {
            self.run_phase(phase);
        }
    }

    /// Mark every entity and flush.
    fn teardown(&mut self);
}
