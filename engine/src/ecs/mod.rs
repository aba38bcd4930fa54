pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod signature;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::Error;
pub use query::Query;
pub use signature::{Mask, Signature};
pub use world::{Config, World};
