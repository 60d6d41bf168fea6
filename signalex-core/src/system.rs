use crate::entity::Entity;
use crate::pubsub::HandlerResult;
use crate::pubsub::PubSub;
use crate::world_result::DispatchResult;
use log::trace;
use std::borrow::Cow;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::rc::Rc;

pub type SystemName = Cow<'static, str>;
pub type SignalName = Cow<'static, str>;
pub type SystemFn = dyn Fn(&Trigger) -> HandlerResult;

pub(crate) type Dispatcher = PubSub<SignalName, Trigger>;

/// Immutable record of a system: its unique name, the signals it reacts to and its handler.
#[derive(Clone)]
pub struct System {
    pub(crate) name: SystemName,
    signals: Rc<[SignalName]>,
    handler: Rc<SystemFn>,
}

impl System {
    /// Repeated signal names are kept once, so a system runs at most once per dispatch.
    pub fn new<S: Into<SignalName>>(
        name: impl Into<SystemName>,
        signals: impl IntoIterator<Item = S>,
        handler: impl Fn(&Trigger) -> HandlerResult + 'static,
    ) -> System {
        let mut unique: Vec<SignalName> = vec![];
        for signal in signals {
            let signal = signal.into();
            if !unique.contains(&signal) {
                unique.push(signal);
            }
        }
        System {
            name: name.into(),
            signals: unique.into(),
            handler: Rc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signals(&self) -> &[SignalName] {
        &self.signals
    }

    pub fn subscribes_to(&self, signal: &str) -> bool {
        self.signals.iter().any(|it| it == signal)
    }

    /// Invokes the handler directly, bypassing signal dispatch.
    pub fn run(&self, trigger: &Trigger) -> HandlerResult {
        (self.handler)(trigger)
    }

    pub(crate) fn handler(&self) -> Rc<SystemFn> {
        self.handler.clone()
    }
}

impl Debug for System {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("name", &self.name)
            .field("signals", &self.signals)
            .finish()
    }
}

/// What a system receives when one of its signals is dispatched.
pub struct Trigger {
    pub entity: Entity,
    pub signal: SignalName,
    dispatcher: Dispatcher,
}

impl Trigger {
    /// A trigger outside of any registry. Signals sent through it reach no system.
    pub fn new(entity: Entity, signal: impl Into<SignalName>) -> Trigger {
        Trigger {
            entity,
            signal: signal.into(),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Dispatches `name` from inside a handler, to the registry this trigger came from.
    ///
    /// Runs to completion before returning, like any other dispatch.
    pub fn signal(&self, name: &str, entity: &Entity) -> DispatchResult {
        dispatch(&self.dispatcher, name, entity)
    }
}

impl Debug for Trigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("entity", &self.entity)
            .field("signal", &self.signal)
            .finish()
    }
}

pub(crate) fn dispatch(dispatcher: &Dispatcher, name: &str, entity: &Entity) -> DispatchResult {
    trace!("signal '{}' on {}", name, entity);
    let trigger = Trigger {
        entity: entity.clone(),
        signal: Cow::Owned(name.to_owned()),
        dispatcher: dispatcher.clone(),
    };
    dispatcher.emit(name, &trigger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKey;

    #[test]
    fn repeated_signals_are_kept_once() {
        let system = System::new("s", ["tick", "click", "tick"], |_| Ok(()));

        assert_eq!(system.signals(), &["tick", "click"]);
        assert!(system.subscribes_to("click"));
        assert!(!system.subscribes_to("hover"));
    }

    #[test]
    fn debug_omits_handler() {
        let system = System::new("mover", ["tick"], |_| Ok(()));

        assert_eq!(
            format!("{:?}", system),
            "System { name: \"mover\", signals: [\"tick\"] }"
        );
    }

    #[test]
    fn detached_trigger_signals_nobody() {
        let entity = Entity::new(EntityKey { index: 0 });
        let trigger = Trigger::new(entity.clone(), "tick");

        assert!(trigger.signal("tick", &entity).is_ok());
    }
}
