//! Component storage for the ECS.
//!
//! Components are plain values attached to entities. Each component type gets its own sparse-set
//! [`Table`], and the [`Registry`] maps every type in the world's fixed type list to its table and
//! to a small dense [`Id`] used as the type's bit in entity signatures.
//!
//! ## Architecture
//!
//! - [`Component`]: The trait that all component types must implement
//! - [`Id`]: The bit index of a registered component type
//! - [`Table`]: Dense values with a sparse entity-to-slot redirection array
//! - [`Registry`]: The fixed, type-erased collection of tables
//! - [`Set`]: A compile-time list of component types (a single type or a tuple)
//!
//! ## Usage
//!
//! ```ignore
//! use sparse_engine::ecs::component::{Component, Registry};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new(1024);
//! let pos_id = registry.register::<Position>();
//! ```

mod registry;
mod set;
mod table;

pub use registry::Registry;
pub use set::Set;
pub use table::Table;

/// A component identifier. Ids are dense, assigned from zero in registration order, and double as
/// the component's bit index in a [`Signature`](crate::ecs::Signature).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS (Entity Component System).
///
/// At present this only sets the required trait bounds for a type to be used as a component.
/// Derive it with `#[derive(Component)]`.
pub trait Component: 'static + Sized {}
