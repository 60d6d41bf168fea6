//! Entities holding named components, and systems run by named signals.
//!
//! ```
//! use signalex_core::World;
//!
//! let world = World::new();
//! let entity = world.create_entity();
//! entity.add_component("health", 100);
//!
//! world
//!     .create_system("heal", ["rest"], |trigger| {
//!         trigger.entity.update_component::<i32>("health", |it| it + 10)?;
//!         Ok(())
//!     })
//!     .unwrap();
//! world.signal("rest", &entity).unwrap();
//!
//! assert_eq!(entity.get_component::<i32>("health").as_deref(), Some(&110));
//! ```

pub(crate) mod component;
pub(crate) mod entity;
pub(crate) mod entity_manager;
pub(crate) mod module;
pub(crate) mod pubsub;
pub(crate) mod system;
pub(crate) mod system_manager;
pub(crate) mod unwind;
pub(crate) mod world;
pub(crate) mod world_result;

pub use signalex_macro::EcsComponent;

pub use component::*;
pub use entity::*;
pub use entity_manager::*;
pub use module::*;
pub use pubsub::*;
pub use system::*;
pub use system_manager::*;
pub use world::*;
pub use world_result::*;
