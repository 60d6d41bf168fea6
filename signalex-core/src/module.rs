use crate::world::World;
use crate::world_result::WorldResult;

/// A named bundle of configurators, installed into a [`World`] in the order they were added.
pub struct Module {
    name: &'static str,
    pub(crate) tasks: Vec<Task>,
}

pub(crate) struct Task {
    pub(crate) action: fn(&World) -> WorldResult,
}

impl Module {
    pub const fn new(name: &'static str) -> Module {
        Module {
            name,
            tasks: vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add_configurator(&mut self, action: fn(&World) -> WorldResult) {
        self.tasks.push(Task { action });
    }
}

#[macro_export]
macro_rules! __ecs_module {
    ($ident:ident) => {
        static $ident: std::sync::RwLock<$crate::Module> =
            std::sync::RwLock::new($crate::Module::new(stringify!($ident)));
    };
}

pub use crate::__ecs_module as ecs_module;
