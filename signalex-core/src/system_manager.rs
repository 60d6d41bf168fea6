use crate::entity::Entity;
use crate::pubsub::HandlerResult;
use crate::pubsub::Unsubscribe;
use crate::system::dispatch;
use crate::system::Dispatcher;
use crate::system::SignalName;
use crate::system::System;
use crate::system::SystemName;
use crate::system::Trigger;
use crate::world_result::DispatchResult;
use crate::world_result::SystemError;
use crate::world_result::SystemResult;
use log::debug;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tinyvec::TinyVec;

type Unsubscribers = TinyVec<[Unsubscribe; 2]>;

/// Live systems and their wiring to the shared signal registry.
#[derive(Default)]
pub struct SystemManager {
    dispatcher: Dispatcher,
    systems: RefCell<Vec<System>>,
    unsubscribers: RefCell<HashMap<SystemName, Unsubscribers>>,
}

impl SystemManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_system<S: Into<SignalName>>(
        &self,
        name: impl Into<SystemName>,
        signals: impl IntoIterator<Item = S>,
        handler: impl Fn(&Trigger) -> HandlerResult + 'static,
    ) -> SystemResult<System> {
        self.add_system(System::new(name, signals, handler))
    }

    /// Wires `system` to each of its signals. A live system with the same name is an error.
    pub fn add_system(&self, system: System) -> SystemResult<System> {
        if self.contains(system.name()) {
            return Err(SystemError::AlreadyExists {
                name: system.name.clone(),
            });
        }

        let mut unsubscribers = Unsubscribers::new();
        for signal in system.signals() {
            let handler = system.handler();
            let name = system.name.clone();
            let callback = move |trigger: &Trigger| {
                let _scope = MdcScope::enter(&name, &trigger.signal);
                handler(trigger)
            };
            unsubscribers.push(self.dispatcher.subscribe_with(
                signal.clone(),
                Some(system.name.clone()),
                Rc::new(callback),
            ));
        }
        debug!(
            "system '{}' registered for {:?}",
            system.name(),
            system.signals()
        );

        self.unsubscribers
            .borrow_mut()
            .insert(system.name.clone(), unsubscribers);
        self.systems.borrow_mut().push(system.clone());
        Ok(system)
    }

    /// Detaches the system from all of its signals and removes its record.
    pub fn delete_system(&self, name: &str) -> SystemResult<System> {
        let unsubscribers = self.unsubscribers.borrow_mut().remove(name);
        let removed = {
            let mut systems = self.systems.borrow_mut();
            systems
                .iter()
                .position(|it| it.name() == name)
                .map(|index| systems.remove(index))
        };
        if let Some(unsubscribers) = unsubscribers {
            for unsubscribe in unsubscribers.iter() {
                unsubscribe.unsubscribe();
            }
        }
        match removed {
            Some(system) => {
                debug!("system '{}' deleted", name);
                Ok(system)
            }
            None => Err(SystemError::NotFound {
                name: Cow::Owned(name.to_owned()),
            }),
        }
    }

    /// Runs every system subscribed to `name` with `entity`, in registration order.
    pub fn signal(&self, name: &str, entity: &Entity) -> DispatchResult {
        dispatch(&self.dispatcher, name, entity)
    }

    pub fn system(&self, name: &str) -> Option<System> {
        self.systems
            .borrow()
            .iter()
            .find(|it| it.name() == name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.systems.borrow().iter().any(|it| it.name() == name)
    }

    /// Live systems in registration order.
    pub fn systems(&self) -> Vec<System> {
        self.systems.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.systems.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of systems currently wired to `signal`.
    pub fn subscriber_count(&self, signal: &str) -> usize {
        self.dispatcher.subscriber_count(signal)
    }
}

const MDC_SYSTEM: &str = "system";
const MDC_SIGNAL: &str = "signal";

/// Publishes the running system and signal to the logging MDC, restoring the outer
/// values on drop so nested dispatch leaves them intact.
struct MdcScope {
    system: Option<String>,
    signal: Option<String>,
}

impl MdcScope {
    fn enter(system: &str, signal: &str) -> MdcScope {
        MdcScope {
            system: log_mdc::insert(MDC_SYSTEM, system),
            signal: log_mdc::insert(MDC_SIGNAL, signal),
        }
    }
}

impl Drop for MdcScope {
    fn drop(&mut self) {
        let previous = [
            (MDC_SYSTEM, self.system.take()),
            (MDC_SIGNAL, self.signal.take()),
        ];
        for (key, previous) in previous {
            match previous {
                Some(value) => {
                    log_mdc::insert(key, value);
                }
                None => {
                    log_mdc::remove(key);
                }
            }
        }
    }
}
