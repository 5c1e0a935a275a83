//! Resource domain entities.

pub mod model;
pub mod resource_type;

pub use model::{CreateResource, Resource, UpdateResource};
pub use resource_type::ResourceType;
