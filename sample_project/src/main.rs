use log::error;
use log::info;
use signalex_core::ecs_module;
use signalex_core::EcsComponent;
use signalex_core::Entity;
use signalex_core::Unsubscribe;
use signalex_core::World;
use signalex_core::WorldResult;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

ecs_module!(DEMO);

#[derive(EcsComponent, Debug, Clone, Copy)]
#[ecs(name = "counter")]
struct Counter(i32);

#[derive(EcsComponent, Debug, Clone, Copy)]
#[ecs(name = "hovered")]
struct Hovered(bool);

/// Mirrors one component of an entity, re-reading it on every update until dropped.
struct ComponentView<T: EcsComponent + Clone + Debug> {
    shown: Rc<RefCell<Option<T>>>,
    unsubscribe: Unsubscribe,
}

impl<T: EcsComponent + Clone + Debug> ComponentView<T> {
    fn mount(entity: &Entity) -> ComponentView<T> {
        let shown = Rc::new(RefCell::new(entity.get::<T>().map(|it| it.clone())));
        let unsubscribe = {
            let shown = shown.clone();
            let weak = entity.downgrade();
            entity.on_update::<T>(move || {
                let Some(entity) = weak.upgrade() else {
                    return;
                };
                let value = entity.get::<T>().map(|it| it.clone());
                info!("view of '{}' now shows {:?}", T::NAME, value);
                *shown.borrow_mut() = value;
            })
        };
        ComponentView { shown, unsubscribe }
    }

    fn render(&self) -> String {
        format!("{}: {:?}", T::NAME, self.shown.borrow())
    }
}

impl<T: EcsComponent + Clone + Debug> Drop for ComponentView<T> {
    fn drop(&mut self) {
        self.unsubscribe.unsubscribe();
    }
}

fn configure_counter(world: &World) -> WorldResult {
    world.create_system("increment", ["click"], |trigger| {
        trigger.entity.update::<Counter>(|it| Counter(it.0 + 1))?;
        Ok(())
    })?;
    world.create_system("highlight", ["hover", "leave"], |trigger| {
        let hovered = trigger.signal == "hover";
        trigger.entity.update::<Hovered>(|_| Hovered(hovered))?;
        Ok(())
    })?;
    world.create_system("reset", ["double_click"], |trigger| {
        trigger.entity.update::<Counter>(|_| Counter(0))?;
        trigger.signal("leave", &trigger.entity)?;
        Ok(())
    })?;
    Ok(())
}

fn run() -> WorldResult {
    DEMO.write()
        .unwrap_or_else(|it| it.into_inner())
        .add_configurator(configure_counter);

    let world = World::new();
    world.add_module(&DEMO)?;

    let button = world.create_entity();
    button.add(Counter(0));
    button.add(Hovered(false));

    let counter_view = ComponentView::<Counter>::mount(&button);
    let hover_view = ComponentView::<Hovered>::mount(&button);

    for signal in ["hover", "click", "click", "double_click", "click"] {
        world.signal(signal, &button)?;
        info!("{} | {}", counter_view.render(), hover_view.render());
    }

    drop(hover_view);
    world.signal("hover", &button)?;
    world.delete_system("increment")?;
    world.signal("click", &button)?;
    info!("{} after unmount", counter_view.render());

    Ok(())
}

fn main() {
    if let Err(err) = log4rs::init_file("log4rs.yaml", Default::default()) {
        eprintln!("logging is not configured: {}", err);
    }
    if let Err(err) = run() {
        error!("demo failed: {}", err);
    }
}
