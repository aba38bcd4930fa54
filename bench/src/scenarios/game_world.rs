//! Game world benchmark scenario.
//!
//! Simulates a mixed game world with:
//! - NPCs with health and a team
//! - Projectiles with short lifetimes that damage an NPC of the other team on impact
//! - Static props that never move
//!
//! This scenario tests:
//! - Queries over overlapping component sets
//! - Random access through the sparse index
//! - Deaths of two different kinds of entity flushed in one batch

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sparse_engine::ecs::{Entity, World};

use crate::components::{
    Damage, Health, Lifetime, Position, Projectile, Team, Transform, Velocity, bench_world,
};
use crate::frame_timer::Phase;
use crate::scenarios::Scenario;

/// Configuration for the game world benchmark.
#[derive(Clone)]
pub struct GameWorldConfig {
    /// Number of NPCs kept alive.
    pub npc_count: usize,
    /// Projectiles fired per frame.
    pub fire_rate: usize,
    /// Number of static props.
    pub static_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl GameWorldConfig {
    /// An entity capacity that fits every NPC, prop and in-flight projectile.
    pub fn max_entities(&self) -> usize {
        // Projectiles live at most one second.
        let in_flight = self.fire_rate * (1.0 / self.delta_time).ceil() as usize;
        self.npc_count + self.static_count + in_flight + self.fire_rate
    }
}

impl Default for GameWorldConfig {
    fn default() -> Self {
        Self {
            npc_count: 5_000,
            fire_rate: 50,
            static_count: 3_000,
            delta_time: 1.0 / 60.0,
            seed: 54321,
        }
    }
}

/// Game world benchmark scenario.
pub struct GameWorldScenario {
    config: GameWorldConfig,
    world: World,
    rng: ChaCha8Rng,
    /// Reused entity buffers so frames do not allocate.
    scratch: Vec<Entity>,
    targets: Vec<Entity>,
    kills: usize,
    visible: usize,
}

impl GameWorldScenario {
    /// Create a new game world scenario with default config.
    pub fn new() -> Self {
        Self::with_config(GameWorldConfig::default())
    }

    /// Create a new game world scenario with custom config.
    pub fn with_config(config: GameWorldConfig) -> Self {
        let max_entities = config.max_entities();
        Self {
            world: bench_world(max_entities),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            scratch: Vec::with_capacity(max_entities),
            targets: Vec::with_capacity(max_entities),
            kills: 0,
            visible: 0,
            config,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// NPCs killed so far.
    pub fn kills(&self) -> usize {
        self.kills
    }

    /// Entities inside the view bounds at the last render.
    pub fn visible(&self) -> usize {
        self.visible
    }

    fn random_position(&mut self) -> Position {
        Position {
            x: self.rng.gen_range(-500.0..500.0),
            y: self.rng.gen_range(-500.0..500.0),
            z: 0.0,
        }
    }

    fn spawn_npc(&mut self) -> Entity {
        let position = self.random_position();
        let team = Team {
            id: self.rng.gen_range(0..2),
        };
        let velocity = Velocity {
            x: self.rng.gen_range(-5.0..5.0),
            y: self.rng.gen_range(-5.0..5.0),
            z: 0.0,
        };

        let entity = self.world.spawn();
        self.world.add_component(entity, position);
        self.world.add_component(entity, velocity);
        self.world.add_component(entity, team);
        self.world.add_component(
            entity,
            Health {
                current: 100.0,
                max: 100.0,
            },
        );
        entity
    }

    fn spawn_prop(&mut self) -> Entity {
        let position = self.random_position();
        let entity = self.world.spawn();
        self.world.add_component(entity, position);
        self.world.add_component(entity, Transform::default());
        entity
    }

    /// Input: top up NPCs and fire this frame's projectiles from random shooters.
    pub fn system_input(&mut self) {
        let npcs = self.world.table::<Health>().len();
        for _ in npcs..self.config.npc_count {
            self.spawn_npc();
        }

        let shooters = self.world.entities_with::<Health>().len();
        if shooters == 0 {
            return;
        }
        for _ in 0..self.config.fire_rate {
            let index = self.rng.gen_range(0..shooters);
            let shooter = self.world.entities_with::<Health>()[index];
            let origin = *self.world.get::<Position>(shooter);
            let team = *self.world.get::<Team>(shooter);
            let velocity = Velocity {
                x: self.rng.gen_range(-50.0..50.0),
                y: self.rng.gen_range(-50.0..50.0),
                z: 0.0,
            };
            let lifetime = self.rng.gen_range(0.1..1.0);

            let Ok(projectile) = self.world.try_spawn() else {
                break;
            };
            self.world.add_component(projectile, origin);
            self.world.add_component(projectile, velocity);
            self.world.add_component(projectile, team);
            self.world.add_component(projectile, Projectile);
            self.world.add_component(projectile, Damage { amount: 40.0 });
            self.world.add_component(
                projectile,
                Lifetime {
                    remaining: lifetime,
                    total: 1.0,
                },
            );
        }
    }

    /// Apply velocity to position for everything that moves.
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
        }
    }

    /// Age projectiles. An expired projectile hits a random NPC of the other team and is marked.
    pub fn system_projectiles(&mut self) {
        let dt = self.config.delta_time;
        self.targets.clear();
        self.targets.extend(self.world.query::<(Health, Team)>().iter());

        self.scratch.clear();
        self.scratch
            .extend(self.world.query::<(Projectile, Lifetime)>().iter());

        for &projectile in &self.scratch {
            let lifetime = self.world.get_mut::<Lifetime>(projectile);
            lifetime.remaining -= dt;
            if lifetime.remaining > 0.0 {
                continue;
            }

            self.world.mark_for_deletion(projectile);
            if self.targets.is_empty() {
                continue;
            }
            let target = self.targets[self.rng.gen_range(0..self.targets.len())];
            if self.world.get::<Team>(target) == self.world.get::<Team>(projectile) {
                continue;
            }
            let damage = self.world.get::<Damage>(projectile).amount;
            self.world.get_mut::<Health>(target).current -= damage;
        }
    }

    /// Mark NPCs that ran out of health.
    pub fn system_deaths(&mut self) {
        self.scratch.clear();
        let table = self.world.table::<Health>();
        self.scratch.extend(
            table
                .iter()
                .filter(|(_, health)| health.current <= 0.0)
                .map(|(entity, _)| entity),
        );

        for &entity in &self.scratch {
            if self.world.mark_for_deletion(entity) {
                self.kills += 1;
            }
        }
    }

    /// Count everything inside the view.
    pub fn system_render(&mut self) {
        self.visible = self
            .world
            .iter::<Position>()
            .filter(|pos| pos.x.abs() < 250.0 && pos.y.abs() < 250.0)
            .count();
    }
}

impl Default for GameWorldScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for GameWorldScenario {
    fn name(&self) -> &'static str {
        "game_world"
    }

    fn description(&self) -> &'static str {
        "Mixed NPCs, props and projectiles with combat deaths flushed each frame"
    }

    fn entity_count(&self) -> usize {
        self.config.npc_count + self.config.static_count
    }

    fn setup(&mut self) {
        for _ in 0..self.config.static_count {
            self.spawn_prop();
        }
        for _ in 0..self.config.npc_count {
            self.spawn_npc();
        }
    }

    fn run_phase(&mut self, phase: Phase) {
        match phase {
            Phase::Input => self.system_input(),
            Phase::Update => {
                self.system_movement();
                self.system_projectiles();
                self.system_deaths();
            }
            Phase::Flush => {
                self.world.flush();
            }
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
