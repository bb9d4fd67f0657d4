/// Tests for the World entity/component store

use super::*;

#[derive(Debug, Default, PartialEq)]
struct Health(u32);

#[derive(Debug, Default)]
struct Tag;

#[test]
fn test_spawn_and_despawn() {
    let world = World::new();
    let entity = world.spawn();

    assert!(world.is_alive(entity));
    assert_eq!(world.entity_count(), 1);

    world.despawn(entity);
    assert!(!world.is_alive(entity));
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn test_stale_key_does_not_observe_recycled_slot() {
    let world = World::new();
    let first = world.spawn();
    world.despawn(first);

    // Force slot reuse
    let second = world.spawn();

    assert!(!world.is_alive(first));
    assert!(world.is_alive(second));
    assert!(world.get::<Health>(first).is_none());
}

#[test]
fn test_set_get_component() {
    let world = World::new();
    let entity = world.spawn();

    world.set(entity, Health(42));
    assert!(world.has::<Health>(entity));
    assert_eq!(world.get::<Health>(entity).unwrap().0, 42);

    // Replace
    world.set(entity, Health(7));
    assert_eq!(world.get::<Health>(entity).unwrap().0, 7);
}

#[test]
fn test_get_mut_component() {
    let world = World::new();
    let entity = world.spawn();
    world.set(entity, Health(1));

    world.get_mut::<Health>(entity).unwrap().0 = 99;
    assert_eq!(world.get::<Health>(entity).unwrap().0, 99);
}

#[test]
fn test_add_default_component() {
    let world = World::new();
    let entity = world.spawn();
    world.add::<Tag>(entity);
    assert!(world.has::<Tag>(entity));
}

#[test]
fn test_missing_component_returns_none() {
    let world = World::new();
    let entity = world.spawn();

    assert!(!world.has::<Health>(entity));
    assert!(world.get::<Health>(entity).is_none());
    assert!(world.get_mut::<Health>(entity).is_none());
}

#[test]
fn test_component_access_on_dead_entity() {
    let world = World::new();
    let entity = world.spawn();
    world.set(entity, Health(5));
    world.despawn(entity);

    assert!(!world.has::<Health>(entity));
    assert!(world.get::<Health>(entity).is_none());
}

#[test]
fn test_concurrent_shared_borrows() {
    let world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    world.set(a, Health(1));
    world.set(b, Health(2));

    // Two shared component borrows may coexist
    let ha = world.get::<Health>(a).unwrap();
    let hb = world.get::<Health>(b).unwrap();
    assert_eq!(ha.0 + hb.0, 3);
}

#[test]
fn test_entities_with_filters_by_component() {
    let world = World::new();
    let a = world.spawn();
    let b = world.spawn();
    let c = world.spawn();
    world.set(a, Health(1));
    world.set(c, Health(3));
    world.add::<Tag>(b);

    let mut found = world.entities_with::<Health>();
    found.sort();
    let mut expected = vec![a, c];
    expected.sort();
    assert_eq!(found, expected);
}

#[test]
fn test_world_clones_share_store() {
    let world = World::new();
    let other = world.clone();

    let entity = other.spawn();
    other.set(entity, Health(10));

    assert!(world.is_alive(entity));
    assert_eq!(world.get::<Health>(entity).unwrap().0, 10);
}
