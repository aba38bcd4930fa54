//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Components: Position, Velocity, Lifetime, Color, Size
//! - Per frame: respawn, movement, lifetime decay, fade, mark expired, flush, render
//!
//! This scenario tests:
//! - Dense iteration over large tables
//! - Signature query throughput
//! - Steady spawn, mark and flush churn with id reuse

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sparse_engine::ecs::{Entity, World};

use crate::components::{Color, Lifetime, Position, Size, Velocity, bench_world};
use crate::frame_timer::Phase;
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn spawn(&mut self, world: &mut World) -> Entity {
        let rng = &mut self.0;
        let entity = world.spawn();
        world.add_component(
            entity,
            Position {
                x: rng.gen_range(-100.0..100.0),
                y: rng.gen_range(-100.0..100.0),
                z: rng.gen_range(-100.0..100.0),
            },
        );
        world.add_component(
            entity,
            Velocity {
                x: rng.gen_range(-10.0..10.0),
                y: rng.gen_range(-10.0..10.0),
                z: rng.gen_range(-10.0..10.0),
            },
        );
        world.add_component(
            entity,
            Lifetime {
                remaining: rng.gen_range(0.1..2.0),
                total: 2.0,
            },
        );
        world.add_component(
            entity,
            Color {
                r: rng.gen_range(0.0..1.0),
                g: rng.gen_range(0.0..1.0),
                b: rng.gen_range(0.0..1.0),
                a: 1.0,
            },
        );
        world.add_component(
            entity,
            Size {
                width: rng.gen_range(0.1..2.0),
                height: rng.gen_range(0.1..2.0),
            },
        );
        entity
    }
}

const SCREEN_WIDTH: usize = 64;
const SCREEN_HEIGHT: usize = 64;
const HALF_EXTENT: f32 = 32.0;

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
    factory: ParticleFactory,
    /// Reused entity buffer so frames do not allocate.
    scratch: Vec<Entity>,
    /// Visible particle count per screen cell, rebuilt each render.
    screen: Vec<u16>,
    /// Particles flushed over the scenario's lifetime.
    expired: usize,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            world: bench_world(config.particle_count),
            factory: ParticleFactory(ChaCha8Rng::seed_from_u64(config.seed)),
            scratch: Vec::with_capacity(config.particle_count),
            screen: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            expired: 0,
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.world.len()
    }

    /// The number of particles that have expired so far.
    pub fn expired(&self) -> usize {
        self.expired
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Top up to the configured particle count.
    fn respawn(&mut self) {
        while self.world.len() < self.config.particle_count {
            self.factory.spawn(&mut self.world);
        }
    }

    /// Apply velocity to position.
    pub fn system_movement(&mut self) {
        let dt = self.config.delta_time;
        self.scratch.clear();
        self.scratch
            .extend(self.world.query::<(Position, Velocity)>().iter());

        for &entity in &self.scratch {
            let vel = *self.world.get::<Velocity>(entity);
            let pos = self.world.get_mut::<Position>(entity);
            pos.x += vel.x * dt;
            pos.y += vel.y * dt;
            pos.z += vel.z * dt;
        }
    }

    /// Decay every lifetime in dense order.
    pub fn system_lifetime_decay(&mut self) {
        let dt = self.config.delta_time;
        for lifetime in self.world.iter_mut::<Lifetime>() {
            lifetime.remaining -= dt;
        }
    }

    /// Fade color by remaining lifetime.
    pub fn system_fade(&mut self) {
        self.scratch.clear();
        self.scratch
            .extend(self.world.query::<(Lifetime, Color)>().iter());

        for &entity in &self.scratch {
            let lifetime = *self.world.get::<Lifetime>(entity);
            self.world.get_mut::<Color>(entity).a =
                (lifetime.remaining / lifetime.total).max(0.0);
        }
    }

    /// Mark expired particles for deletion.
    pub fn system_expire(&mut self) {
        self.scratch.clear();
        let table = self.world.table::<Lifetime>();
        self.scratch.extend(
            table
                .iter()
                .filter(|(_, lifetime)| lifetime.remaining <= 0.0)
                .map(|(entity, _)| entity),
        );

        for &entity in &self.scratch {
            self.world.mark_for_deletion(entity);
        }
    }

    /// Bin visible particles into screen cells.
    pub fn system_render(&mut self) {
        self.screen.fill(0);
        for pos in self.world.iter::<Position>() {
            let x = pos.x + HALF_EXTENT;
            let y = pos.y + HALF_EXTENT;
            if (0.0..SCREEN_WIDTH as f32).contains(&x) && (0.0..SCREEN_HEIGHT as f32).contains(&y)
            {
                let cell = y as usize * SCREEN_WIDTH + x as usize;
                self.screen[cell] = self.screen[cell].saturating_add(1);
            }
        }
    }

    /// The number of screen cells holding at least one particle after the last render.
    pub fn lit_cells(&self) -> usize {
        self.screen.iter().filter(|count| **count > 0).count()
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High-volume particle system with movement, lifetime, and respawn"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        self.respawn();
    }

    fn run_phase(&mut self, phase: Phase) {
        match phase {
            Phase::Input => self.respawn(),
            Phase::Update => {
                self.system_movement();
                self.system_lifetime_decay();
                self.system_fade();
                self.system_expire();
            }
            Phase::Flush => self.expired += self.world.flush(),
            Phase::Render => self.system_render(),
        }
    }

    fn teardown(&mut self) {
        self.scratch.clear();
        self.scratch.extend(self.world.query::<()>().iter());
        for &entity in &self.scratch {
            self.world.mark_for_deletion(entity);
        }
        self.world.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ParticleScenario {
        ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        })
    }

    #[test]
    fn particle_scenario_setup() {
        // Given
        let mut scenario = small();

        // When
        scenario.setup();

        // Then
        assert_eq!(scenario.current_count(), 100);
        assert_eq!(scenario.world().table::<Color>().len(), 100);

        // When
        scenario.teardown();

        // Then
        assert_eq!(scenario.current_count(), 0);
        assert_eq!(scenario.world().table::<Position>().len(), 0);
    }

    #[test]
    fn particles_expire_and_respawn() {
        // Given
        let mut scenario = small();
        scenario.setup();

        // When - lifetimes are at most two seconds
        for _ in 0..150 {
            scenario.update();
        }

        // Then
        assert!(scenario.expired() > 0);
        assert_eq!(scenario.world().marked_len(), 0);
        assert!(scenario.current_count() <= 100);
        assert_eq!(
            scenario.world().table::<Lifetime>().len(),
            scenario.current_count()
        );
        // Every id ever handed out stays under the capacity
        assert!(scenario.world().allocator().minted() <= 100);
    }

    #[test]
    fn render_bins_particles() {
        // Given
        let mut scenario = small();
        scenario.setup();

        // When
        scenario.run_phase(Phase::Render);

        // Then
        assert!(scenario.lit_cells() > 0);
    }
}
