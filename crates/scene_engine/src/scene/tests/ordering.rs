//! Update phases, update order and draw order

use std::cell::Cell;
use std::rc::Rc;

use super::{entries, Log, Recorder, Tracker};
use crate::render::{DrawList, Graphic};
use crate::scene::{Component, Entity, EntityContext, EntityScript, FrameContext, Scene, SceneScript};

struct Director {
    log: Log,
}

impl SceneScript for Director {
    fn update_first(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {
        self.log.borrow_mut().push("scene first".to_string());
    }

    fn update(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {
        self.log.borrow_mut().push("scene update".to_string());
    }

    fn update_last(&mut self, _scene: &mut Scene, _frame: &mut FrameContext) {
        self.log.borrow_mut().push("scene last".to_string());
    }
}

#[test]
fn test_phase_order() {
    let log = Log::default();
    let animated = log.clone();
    let mut scene = Scene::new()
        .with_script(Director { log: log.clone() })
        .with_animator(move |_dt: f32| animated.borrow_mut().push("animate".to_string()));
    let mut frame = FrameContext::with_delta_time(0.25);

    for (name, order) in [("low", 0), ("high", 2)] {
        let animated = log.clone();
        let mut entity = Entity::new()
            .with_order(order)
            .with_script(Tracker::new(name, &log))
            .with_animator(move |_dt: f32| animated.borrow_mut().push(format!("{name} animate")));
        entity.add_component(Component::script(Recorder::new(name, &log))).unwrap();
        scene.add(entity).unwrap();
    }
    scene.begin(&mut frame);
    log.borrow_mut().clear();

    scene.update(&mut frame);
    assert_eq!(
        entries(&log),
        vec![
            "high first",
            "low first",
            "scene first",
            "animate",
            "high animate",
            "high update",
            "high update",
            "low animate",
            "low update",
            "low update",
            "scene update",
            "high last",
            "low last",
            "scene last",
        ]
    );
}

#[test]
fn test_equal_orders_keep_insertion_order() {
    let log = Log::default();
    let mut scene = Scene::new();
    let mut frame = FrameContext::with_delta_time(0.25);

    for (name, order) in [("a", 1), ("b", 5), ("c", 1), ("d", 3)] {
        scene
            .add(Entity::new().with_order(order).with_script(Tracker::new(name, &log)))
            .unwrap();
    }
    scene.sync(&mut frame);
    log.borrow_mut().clear();

    scene.update(&mut frame);
    let updates: Vec<String> = entries(&log)
        .into_iter()
        .filter(|line| line.ends_with(" update"))
        .collect();
    assert_eq!(updates, vec!["b update", "d update", "a update", "c update"]);
}

/// Jumps to the front of the update order and the top layer once
struct Jumper {
    log: Log,
}

impl EntityScript for Jumper {
    fn update(&mut self, ctx: &mut EntityContext<'_>) {
        self.log.borrow_mut().push("jumper update".to_string());
        if let Some(entity) = ctx.this_mut() {
            entity.order = 10;
            entity.layer = 10;
        }
    }
}

#[test]
fn test_key_changes_apply_next_frame() {
    let log = Log::default();
    let mut scene = Scene::new();
    let mut frame = FrameContext::with_delta_time(0.25);

    let first = scene
        .add(Entity::new().with_order(5).with_layer(5).with_script(Tracker::new("first", &log)))
        .unwrap();
    let jumper = scene.add(Entity::new().with_script(Jumper { log: log.clone() })).unwrap();
    scene.sync(&mut frame);
    log.borrow_mut().clear();

    scene.update(&mut frame);
    assert_eq!(
        entries(&log).into_iter().filter(|line| line.ends_with(" update")).collect::<Vec<_>>(),
        vec!["first update", "jumper update"]
    );
    assert_eq!(scene.update_order(), vec![jumper, first]);
    assert_eq!(scene.render_order(), vec![jumper, first]);

    log.borrow_mut().clear();
    scene.update(&mut frame);
    assert_eq!(
        entries(&log).into_iter().filter(|line| line.ends_with(" update")).collect::<Vec<_>>(),
        vec!["jumper update", "first update"]
    );
}

#[test]
fn test_draw_order_within_layer() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::new();

    let mut ids = Vec::new();
    for (source, layer) in [("a", 0), ("b", 0), ("c", 0), ("top", 1)] {
        let mut entity = Entity::new().with_layer(layer);
        entity.add_component(Graphic::new(source, 1.0, 1.0)).unwrap();
        ids.push(scene.add(entity).unwrap());
    }
    let (a, b, c, top) = (ids[0], ids[1], ids[2], ids[3]);
    scene.sync(&mut frame);
    assert_eq!(scene.render_order(), vec![top, a, b, c]);

    assert!(scene.bring_to_front(a));
    assert_eq!(scene.render_order(), vec![top, b, c, a]);

    assert!(scene.send_to_back(c));
    assert_eq!(scene.render_order(), vec![top, c, b, a]);

    assert!(scene.bring_forward(c));
    assert!(scene.send_backward(a));
    assert_eq!(scene.render_order(), vec![top, b, a, c]);

    let mut draw = DrawList::new();
    scene.render(&frame, &mut draw);
    assert_eq!(draw.sources(), vec!["top", "b", "a", "c"]);
}

#[test]
fn test_entity_animator_follows_enabled_state() {
    let elapsed = Rc::new(Cell::new(0.0_f32));
    let mut scene = Scene::new();
    let mut frame = FrameContext::with_delta_time(0.25);

    let advanced = elapsed.clone();
    let id = scene
        .add(Entity::new().with_animator(move |dt: f32| advanced.set(advanced.get() + dt)))
        .unwrap();
    scene.sync(&mut frame);

    scene.update(&mut frame);
    scene.update(&mut frame);
    assert_eq!(elapsed.get(), 0.5);

    scene.entity_mut(id).unwrap().set_enabled(false);
    scene.update(&mut frame);
    assert_eq!(elapsed.get(), 0.5);

    scene.entity_mut(id).unwrap().set_animator(None);
    scene.entity_mut(id).unwrap().set_enabled(true);
    scene.update(&mut frame);
    assert_eq!(elapsed.get(), 0.5);
}
