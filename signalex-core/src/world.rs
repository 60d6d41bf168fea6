use crate::entity::Entity;
use crate::entity_manager::EntityManager;
use crate::module::Module;
use crate::pubsub::HandlerResult;
use crate::system::SignalName;
use crate::system::System;
use crate::system::SystemName;
use crate::system::Trigger;
use crate::system_manager::SystemManager;
use crate::world_result::DispatchResult;
use crate::world_result::SystemResult;
use crate::world_result::WorldResult;
use log::debug;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Entities and systems of one simulation.
#[derive(Default)]
pub struct World {
    entities: EntityManager,
    systems: SystemManager,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&self) -> Entity {
        self.entities.create_entity()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn create_system<S: Into<SignalName>>(
        &self,
        name: impl Into<SystemName>,
        signals: impl IntoIterator<Item = S>,
        handler: impl Fn(&Trigger) -> HandlerResult + 'static,
    ) -> SystemResult<System> {
        self.systems.create_system(name, signals, handler)
    }

    pub fn add_system(&self, system: System) -> SystemResult<System> {
        self.systems.add_system(system)
    }

    pub fn delete_system(&self, name: &str) -> SystemResult<System> {
        self.systems.delete_system(name)
    }

    pub fn signal(&self, name: &str, entity: &Entity) -> DispatchResult {
        self.systems.signal(name, entity)
    }

    pub fn system(&self, name: &str) -> Option<System> {
        self.systems.system(name)
    }

    pub fn systems(&self) -> Vec<System> {
        self.systems.systems()
    }

    /// Runs the module's configurators in order, stopping at the first failure.
    pub fn install(&self, module: &Module) -> WorldResult {
        debug!("installing module {}", module.name());
        for task in module.tasks.iter() {
            (task.action)(self)?;
        }
        Ok(())
    }

    /// Like [`World::install`], for modules declared with [`ecs_module!`](crate::ecs_module).
    pub fn add_module(&self, module: &RwLock<Module>) -> WorldResult {
        let module = module.read().unwrap_or_else(PoisonError::into_inner);
        self.install(&module)
    }
}
