use ctor::ctor;
use signalex_core::ecs_module;
use signalex_core::ComponentError;
use signalex_core::EcsComponent;
use signalex_core::Module;
use signalex_core::World;
use signalex_core::WorldError;
use signalex_core::WorldResult;

#[ctor]
fn init_logging() {
    let _ = log4rs::init_file("tests/log4rs.test.yaml", Default::default());
}

#[derive(Debug, Clone, Copy, PartialEq, EcsComponent)]
#[ecs(name = "health")]
struct Health(i32);

#[test]
fn entities_are_distinct() {
    let world = World::new();

    let first = world.create_entity();
    let second = world.create_entity();

    assert_ne!(first, second);
    assert_ne!(first.key(), second.key());
    assert_eq!(first, first.clone());
    assert_eq!(world.entity_count(), 2);
}

#[test]
fn world_keeps_created_entities_alive() {
    let world = World::new();
    let entity = world.create_entity();
    let weak = entity.downgrade();

    assert_eq!(weak.upgrade().as_ref(), Some(&entity));
    drop(entity);

    assert!(weak.upgrade().is_some());
    assert_eq!(world.entity_count(), 1);
}

#[test]
fn world_runs_systems_over_its_entities() {
    let world = World::new();
    let player = world.create_entity();
    let monster = world.create_entity();
    player.add(Health(100));
    monster.add(Health(40));
    world
        .create_system("damage", ["hit"], |trigger| {
            trigger.entity.update::<Health>(|it| Health(it.0 - 30))?;
            Ok(())
        })
        .unwrap();

    world.signal("hit", &monster).unwrap();
    world.signal("hit", &monster).unwrap();
    world.signal("hit", &player).unwrap();

    assert_eq!(player.get::<Health>().as_deref(), Some(&Health(70)));
    assert_eq!(monster.get::<Health>().as_deref(), Some(&Health(-20)));
}

ecs_module!(COMBAT);

fn spawn_damage(world: &World) -> WorldResult {
    world.create_system("damage", ["hit"], |trigger| {
        trigger.entity.update::<Health>(|it| Health(it.0 - 10))?;
        Ok(())
    })?;
    Ok(())
}

fn spawn_regeneration(world: &World) -> WorldResult {
    world.create_system("regeneration", ["tick"], |trigger| {
        trigger.entity.update::<Health>(|it| Health(it.0 + 1))?;
        Ok(())
    })?;
    Ok(())
}

#[test]
fn module_configures_world() {
    {
        let mut module = COMBAT.write().unwrap();
        module.add_configurator(spawn_damage);
        module.add_configurator(spawn_regeneration);
    }
    let world = World::new();

    world.add_module(&COMBAT).unwrap();
    let entity = world.create_entity();
    entity.add(Health(50));
    world.signal("hit", &entity).unwrap();
    world.signal("tick", &entity).unwrap();

    assert_eq!(COMBAT.read().unwrap().name(), "COMBAT");
    assert_eq!(
        world
            .systems()
            .iter()
            .map(|it| it.name().to_owned())
            .collect::<Vec<_>>(),
        vec!["damage", "regeneration"]
    );
    assert_eq!(entity.get::<Health>().as_deref(), Some(&Health(41)));
}

#[test]
fn installing_module_twice_fails_on_duplicate_system() {
    let mut module = Module::new("twice");
    module.add_configurator(spawn_damage);
    let world = World::new();

    world.install(&module).unwrap();
    let err = world.install(&module).unwrap_err();

    assert!(matches!(err, WorldError::System(_)));
    assert_eq!(world.systems().len(), 1);
}

#[test]
fn failing_configurator_stops_installation() {
    let mut module = Module::new("broken");
    module.add_configurator(|world| {
        world.create_system("first", ["a"], |_| Ok(()))?;
        Ok(())
    });
    module.add_configurator(|world| {
        let entity = world.create_entity();
        entity.update::<Health>(|it| *it)?;
        Ok(())
    });
    module.add_configurator(|world| {
        world.create_system("never", ["a"], |_| Ok(()))?;
        Ok(())
    });
    let world = World::new();

    let err = world.install(&module).unwrap_err();

    assert!(matches!(
        err,
        WorldError::Component(ComponentError::NotFound { .. })
    ));
    assert!(world.system("first").is_some());
    assert!(world.system("never").is_none());
}

#[test]
fn dispatch_failure_converts_into_world_error() {
    let world = World::new();
    let entity = world.create_entity();
    world
        .create_system("broken", ["tick"], |_| Err("no fuel".into()))
        .unwrap();

    let run = || -> WorldResult {
        world.signal("tick", &entity)?;
        Ok(())
    };

    match run().unwrap_err() {
        WorldError::Dispatch(err) => {
            assert_eq!(err.subscribers().collect::<Vec<_>>(), vec!["broken"]);
        }
        other => panic!("unexpected error: {}", other),
    }
}
