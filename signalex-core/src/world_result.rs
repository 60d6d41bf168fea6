use crate::entity::EntityKey;
use crate::pubsub::BoxError;
use justerror::Error;
use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;

pub type WorldResult<T = ()> = Result<T, WorldError>;
pub type ComponentResult<T = ()> = Result<T, ComponentError>;
pub type SystemResult<T> = Result<T, SystemError>;
pub type DispatchResult = Result<(), DispatchError>;

#[Error]
pub enum WorldError {
    Component(#[from] ComponentError),
    System(#[from] SystemError),
    Dispatch(#[from] DispatchError),
}

#[derive(thiserror::Error, Debug)]
pub enum ComponentError {
    #[error("component '{component}' does not exist on {entity}")]
    NotFound {
        entity: EntityKey,
        component: Cow<'static, str>,
    },
    #[error("component '{component}' on {entity} is not of type {expected}")]
    TypeMismatch {
        entity: EntityKey,
        component: Cow<'static, str>,
        expected: &'static str,
    },
    #[error("component '{component}' on {entity} was updated, but its observers failed")]
    ObserverFailed {
        entity: EntityKey,
        component: Cow<'static, str>,
        #[source]
        source: DispatchError,
    },
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum SystemError {
    #[error("system '{name}' already exists")]
    AlreadyExists { name: Cow<'static, str> },
    #[error("system '{name}' does not exist")]
    NotFound { name: Cow<'static, str> },
}

/// Every handler that failed during one `emit`, in the order they ran.
#[derive(thiserror::Error, Debug)]
#[error("{} handler(s) failed while dispatching '{key}'", .failures.len())]
pub struct DispatchError {
    pub key: String,
    pub failures: Vec<HandlerFailure>,
}

#[derive(Debug)]
pub struct HandlerFailure {
    pub subscriber: String,
    pub cause: FailureCause,
}

impl Display for HandlerFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subscriber, self.cause)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FailureCause {
    #[error("returned error: {0}")]
    Error(BoxError),
    #[error("panicked: {0}")]
    Panic(String),
}

impl DispatchError {
    pub fn subscribers(&self) -> impl Iterator<Item = &str> + '_ {
        self.failures.iter().map(|it| it.subscriber.as_str())
    }
}
