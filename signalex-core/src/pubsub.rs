//! Generic key-to-callbacks registry with synchronous fan-out.
//!
//! The same primitive backs both component change notification on an [`Entity`](crate::Entity)
//! and signal-to-system dispatch in the [`SystemManager`](crate::SystemManager).

use crate::unwind::catch_unwind_detailed;
use crate::world_result::DispatchError;
use crate::world_result::DispatchResult;
use crate::world_result::FailureCause;
use crate::world_result::HandlerFailure;
use log::error;
use log::trace;
use std::borrow::Cow;
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::rc::Rc;
use std::rc::Weak;

pub type BoxError = Box<dyn std::error::Error>;
pub type HandlerResult = Result<(), BoxError>;
pub type Callback<P> = dyn Fn(&P) -> HandlerResult;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
struct SubscriptionId(u64);

struct Subscriber<P> {
    id: SubscriptionId,
    label: Option<Cow<'static, str>>,
    active: Rc<Cell<bool>>,
    callback: Rc<Callback<P>>,
}

impl<P> Clone for Subscriber<P> {
    fn clone(&self) -> Self {
        Subscriber {
            id: self.id,
            label: self.label.clone(),
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<P> Subscriber<P> {
    fn describe(&self) -> String {
        match &self.label {
            Some(label) => label.to_string(),
            None => format!("subscriber#{}", self.id.0),
        }
    }
}

struct Registry<K, P> {
    subscribers: HashMap<K, Vec<Subscriber<P>>>,
    next_id: u64,
}

impl<K: Eq + Hash, P> Registry<K, P> {
    /// The removed subscriber is handed back so the caller can drop it, and whatever its
    /// callback captured, after releasing the registry.
    fn remove(&mut self, key: &K, id: SubscriptionId) -> Option<Subscriber<P>> {
        let list = self.subscribers.get_mut(key)?;
        let position = list.iter().position(|it| it.id == id)?;
        let removed = list.remove(position);
        removed.active.set(false);
        if list.is_empty() {
            self.subscribers.remove(key);
        }
        Some(removed)
    }
}

/// Shared handle to a publish/subscribe registry. Clones see the same subscriptions.
pub struct PubSub<K, P> {
    inner: Rc<RefCell<Registry<K, P>>>,
}

impl<K, P> Clone for PubSub<K, P> {
    fn clone(&self) -> Self {
        PubSub {
            inner: self.inner.clone(),
        }
    }
}

impl<K, P> Default for PubSub<K, P> {
    fn default() -> Self {
        PubSub {
            inner: Rc::new(RefCell::new(Registry {
                subscribers: HashMap::new(),
                next_id: 0,
            })),
        }
    }
}

impl<K, P> PubSub<K, P>
where
    K: Eq + Hash + Clone + Display + 'static,
    P: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        key: impl Into<K>,
        callback: impl Fn(&P) -> HandlerResult + 'static,
    ) -> Unsubscribe {
        self.subscribe_with(key.into(), None, Rc::new(callback))
    }

    /// Like [`PubSub::subscribe`], but failures and logs refer to the subscriber by `label`.
    pub fn subscribe_named(
        &self,
        key: impl Into<K>,
        label: impl Into<Cow<'static, str>>,
        callback: impl Fn(&P) -> HandlerResult + 'static,
    ) -> Unsubscribe {
        self.subscribe_with(key.into(), Some(label.into()), Rc::new(callback))
    }

    pub(crate) fn subscribe_with(
        &self,
        key: K,
        label: Option<Cow<'static, str>>,
        callback: Rc<Callback<P>>,
    ) -> Unsubscribe {
        let mut registry = self.inner.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        let active = Rc::new(Cell::new(true));
        let subscriber = Subscriber {
            id,
            label,
            active: active.clone(),
            callback,
        };
        trace!("subscribe {} to '{}'", subscriber.describe(), key);
        registry
            .subscribers
            .entry(key.clone())
            .or_default()
            .push(subscriber);

        let weak: Weak<RefCell<Registry<K, P>>> = Rc::downgrade(&self.inner);
        Unsubscribe::new(active, move || {
            let Some(registry) = weak.upgrade() else {
                return;
            };
            let removed = registry.borrow_mut().remove(&key, id);
            if removed.is_some() {
                trace!("unsubscribe subscriber#{} from '{}'", id.0, key);
            }
            drop(removed);
        })
    }

    /// Invokes every callback currently registered under `key` with `payload`.
    ///
    /// The subscriber list is snapshotted before the first callback runs: callbacks added
    /// during dispatch wait for the next emit, callbacks revoked during dispatch are skipped.
    /// A failing callback does not stop the others; all failures are returned together.
    pub fn emit<Q>(&self, key: &Q, payload: &P) -> DispatchResult
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + Display + ?Sized,
    {
        let snapshot = match self.inner.borrow().subscribers.get(key) {
            Some(list) => list.clone(),
            None => {
                trace!("emit '{}': no subscribers", key);
                return Ok(());
            }
        };
        trace!("emit '{}' to {} subscriber(s)", key, snapshot.len());

        let mut failures = vec![];
        for subscriber in snapshot {
            if !subscriber.active.get() {
                continue;
            }
            let cause = match catch_unwind_detailed(|| (subscriber.callback)(payload)) {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => FailureCause::Error(err),
                Err(panic) => FailureCause::Panic(panic),
            };
            let failure = HandlerFailure {
                subscriber: subscriber.describe(),
                cause,
            };
            error!("emit '{}': {}", key, failure);
            failures.push(failure);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError {
                key: key.to_string(),
                failures,
            })
        }
    }

    pub fn subscriber_count<Q>(&self, key: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.inner
            .borrow()
            .subscribers
            .get(key)
            .map_or(0, |list| list.len())
    }
}

/// Revocation capability returned by every subscribe call.
///
/// Calling [`Unsubscribe::unsubscribe`] more than once is a no-op, and so is calling it on a
/// clone of an already used capability. Dropping it keeps the subscription alive.
#[derive(Clone, Default)]
pub struct Unsubscribe {
    active: Rc<Cell<bool>>,
    action: Rc<Cell<Option<Box<dyn FnOnce()>>>>,
}

impl Unsubscribe {
    fn new(active: Rc<Cell<bool>>, action: impl FnOnce() + 'static) -> Unsubscribe {
        Unsubscribe {
            active,
            action: Rc::new(Cell::new(Some(Box::new(action)))),
        }
    }

    pub fn unsubscribe(&self) {
        self.active.set(false);
        if let Some(action) = self.action.take() {
            action();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Debug for Unsubscribe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}
