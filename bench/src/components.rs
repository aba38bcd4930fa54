//! Common component types used across benchmarks.
//!
//! Sized like typical game components so that dense iteration numbers are representative.

use sparse_engine::ecs::World;
use sparse_macros::Component;

// =============================================================================
// Transform Components
// =============================================================================

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4x4 transformation matrix (64 bytes).
#[derive(Component, Clone, Copy, Debug)]
pub struct Transform {
    pub matrix: [[f32; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

// =============================================================================
// Game Entity Components
// =============================================================================

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Team/faction identifier.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
}

/// Damage dealt on contact.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Damage {
    pub amount: f32,
}

/// A projectile marker.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Projectile;

// =============================================================================
// Particle Components
// =============================================================================

/// Particle lifetime tracking.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

/// RGBA color (16 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Sprite size.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Shared data component for sparse-membership tests.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Data {
    pub value: f64,
}

/// Build a world with every benchmark component registered.
pub fn bench_world(max_entities: usize) -> World {
    World::builder()
        .max_entities(max_entities)
        .register::<(Position, Velocity, Transform)>()
        .register::<(Health, Team, Damage, Projectile)>()
        .register::<(Lifetime, Color, Size, Data)>()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn document_component_sizes() {
        assert_eq!(size_of::<Position>(), 12);
        assert_eq!(size_of::<Velocity>(), 12);
        assert_eq!(size_of::<Transform>(), 64);
        assert_eq!(size_of::<Health>(), 8);
        assert_eq!(size_of::<Team>(), 4);
        assert_eq!(size_of::<Lifetime>(), 8);
        assert_eq!(size_of::<Color>(), 16);
        assert_eq!(size_of::<Size>(), 8);
        assert_eq!(size_of::<Data>(), 8);
        assert_eq!(size_of::<Projectile>(), 0);
    }

    #[test]
    fn bench_world_registers_everything() {
        let world = bench_world(16);
        assert_eq!(world.components().len(), 11);
        assert_eq!(world.capacity(), 16);
    }
}
