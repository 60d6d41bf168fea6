use crate::pubsub::PubSub;
use crate::pubsub::Unsubscribe;
use crate::world_result::ComponentError;
use crate::world_result::ComponentResult;
use log::trace;
use log::warn;
use std::any::type_name;
use std::any::Any;
use std::borrow::Cow;
use std::cell::Ref;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::panic::catch_unwind;
use std::panic::resume_unwind;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::rc::Weak;

pub type ComponentName = Cow<'static, str>;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct EntityKey {
    pub(crate) index: u64,
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.index)
    }
}

struct EntityData {
    key: EntityKey,
    components: RefCell<HashMap<ComponentName, Box<dyn Any>>>,
    observers: PubSub<ComponentName, ()>,
}

/// Handle to an entity. Clones refer to the same entity; equality is identity.
#[derive(Clone)]
pub struct Entity {
    inner: Rc<EntityData>,
}

/// Non-owning handle, for observers that must not keep their entity alive.
#[derive(Clone)]
pub struct WeakEntity {
    inner: Weak<EntityData>,
}

impl Entity {
    pub(crate) fn new(key: EntityKey) -> Entity {
        trace!("creating {}", key);
        Entity {
            inner: Rc::new(EntityData {
                key,
                components: RefCell::new(HashMap::new()),
                observers: PubSub::new(),
            }),
        }
    }

    pub fn key(&self) -> EntityKey {
        self.inner.key
    }

    pub fn downgrade(&self) -> WeakEntity {
        WeakEntity {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Stores `value` under `name`, replacing any previous value. Observers are not notified.
    pub fn add_component<T: 'static>(&self, name: impl Into<ComponentName>, value: T) {
        let name = name.into();
        trace!("add component '{}' to {}", name, self.inner.key);
        let replaced = self
            .inner
            .components
            .borrow_mut()
            .insert(name, Box::new(value));
        drop(replaced);
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.inner.components.borrow().contains_key(name)
    }

    /// Returns the component stored under `name`, or `None` if it was never added.
    ///
    /// A value of a type other than `T` is also reported as `None`.
    pub fn get_component<T: 'static>(&self, name: &str) -> Option<Ref<'_, T>> {
        let components = self.inner.components.borrow();
        match components.get(name) {
            None => return None,
            Some(value) if !value.is::<T>() => {
                warn!(
                    "component '{}' on {} read as {}, which is not its type",
                    name,
                    self.inner.key,
                    type_name::<T>()
                );
                return None;
            }
            Some(_) => {}
        }
        Ref::filter_map(components, |it| {
            it.get(name).and_then(|value| value.downcast_ref::<T>())
        })
        .ok()
    }

    /// Replaces the component with `updater(&previous)` and notifies its observers.
    ///
    /// The component is taken out of the entity while `updater` runs, so it reads as absent
    /// from inside `updater`; every other component may be read or changed. A panicking
    /// `updater` puts the previous value back.
    pub fn update_component<T: 'static>(
        &self,
        name: impl Into<ComponentName>,
        updater: impl FnOnce(&T) -> T,
    ) -> ComponentResult {
        let name = name.into();
        let previous = {
            let mut components = self.inner.components.borrow_mut();
            let Some(previous) = components.remove(&*name) else {
                return Err(ComponentError::NotFound {
                    entity: self.inner.key,
                    component: name,
                });
            };
            match previous.downcast::<T>() {
                Ok(previous) => previous,
                Err(previous) => {
                    components.insert(name.clone(), previous);
                    return Err(ComponentError::TypeMismatch {
                        entity: self.inner.key,
                        component: name,
                        expected: type_name::<T>(),
                    });
                }
            }
        };

        let next = match catch_unwind(AssertUnwindSafe(|| updater(&previous))) {
            Ok(next) => next,
            Err(payload) => {
                let previous: Box<dyn Any> = previous;
                self.inner
                    .components
                    .borrow_mut()
                    .entry(name)
                    .or_insert(previous);
                resume_unwind(payload);
            }
        };

        trace!("update component '{}' on {}", name, self.inner.key);
        let replaced = self
            .inner
            .components
            .borrow_mut()
            .insert(name.clone(), Box::new(next));
        drop((previous, replaced));

        self.inner
            .observers
            .emit(&*name, &())
            .map_err(|source| ComponentError::ObserverFailed {
                entity: self.inner.key,
                component: name,
                source,
            })
    }

    /// Calls `callback` after every successful [`Entity::update_component`] of `name`.
    pub fn on_component_update(
        &self,
        name: impl Into<ComponentName>,
        callback: impl Fn() + 'static,
    ) -> Unsubscribe {
        self.inner.observers.subscribe(name, move |_: &()| {
            callback();
            Ok(())
        })
    }
}

impl WeakEntity {
    pub fn upgrade(&self) -> Option<Entity> {
        self.inner.upgrade().map(|inner| Entity { inner })
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.key.hash(state);
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner.key, f)
    }
}

impl Debug for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = match self.inner.components.try_borrow() {
            Ok(components) => components.keys().map(|it| it.to_string()).collect(),
            Err(_) => vec!["<borrowed>".to_owned()],
        };
        names.sort();
        f.debug_struct("Entity")
            .field("key", &self.inner.key)
            .field("components", &names)
            .finish()
    }
}
