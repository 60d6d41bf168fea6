use crate::entity::Entity;
use crate::pubsub::Unsubscribe;
use crate::world_result::ComponentResult;
use std::cell::Ref;

/// Binds a Rust type to the component name it is stored under.
///
/// Usually derived: `#[derive(EcsComponent)]` uses the type name, and
/// `#[ecs(name = "health")]` overrides it.
pub trait EcsComponent: 'static {
    const NAME: &'static str;
}

/// Typed accessors, keyed by [`EcsComponent::NAME`].
impl Entity {
    pub fn add<T: EcsComponent>(&self, value: T) {
        self.add_component(T::NAME, value);
    }

    pub fn has<T: EcsComponent>(&self) -> bool {
        self.has_component(T::NAME)
    }

    pub fn get<T: EcsComponent>(&self) -> Option<Ref<'_, T>> {
        self.get_component::<T>(T::NAME)
    }

    pub fn update<T: EcsComponent>(&self, updater: impl FnOnce(&T) -> T) -> ComponentResult {
        self.update_component::<T>(T::NAME, updater)
    }

    pub fn on_update<T: EcsComponent>(&self, callback: impl Fn() + 'static) -> Unsubscribe {
        self.on_component_update(T::NAME, callback)
    }
}
