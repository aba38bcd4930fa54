//! A fixed-capacity, sparse-set entity component system for a single-threaded frame loop.
//!
//! All storage is sized once, when a [`ecs::World`] is built, from a maximum entity count and a
//! fixed list of component types. After that nothing grows: entity ids are recycled through a
//! free list, components live in dense per-type tables, and every live entity carries a bitset
//! [`ecs::Signature`] that queries filter against.
//!
//! ```ignore
//! use sparse_engine::ecs::World;
//! use sparse_macros::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component)]
//! struct Velocity { x: f32, y: f32 }
//!
//! let mut world = World::builder().register::<(Position, Velocity)>().build();
//! let entity = world.spawn();
//! world.add_component(entity, Position { x: 0.0, y: 0.0 });
//! world.add_component(entity, Velocity { x: 1.0, y: 0.0 });
//!
//! for entity in world.query::<(Position, Velocity)>() {
//!     // ...
//! }
//! ```

// Allow this crate to reference itself as ::sparse_engine:: so the derive macros work both inside
// and outside the crate.
extern crate self as sparse_engine;

pub mod ecs;
