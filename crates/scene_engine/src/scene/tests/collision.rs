//! Tag index upkeep and collision queries driven through scene updates

use crate::physics::{Collider, ColliderRef, GridShape, Tag};
use crate::scene::{ComponentContext, Component, Entity, FrameContext, Scene, Script};

const WALL: Tag = Tag::new("wall");
const SOLID: Tag = Tag::new("solid");

#[test]
fn test_tag_index_tracks_membership() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::new();

    let mut entity = Entity::new();
    let component = entity.add_component(Collider::rectangle(10.0, 10.0).with_tag(WALL)).unwrap();
    let id = scene.add(entity).unwrap();
    let collider = ColliderRef::new(id, component);
    assert!(scene.tag_index().get(WALL).is_empty());

    scene.sync(&mut frame);
    assert_eq!(scene.tag_index().get(WALL), &[collider]);

    assert!(scene.add_tag(collider, SOLID).unwrap());
    assert!(!scene.add_tag(collider, SOLID).unwrap());
    assert_eq!(scene.tag_index().get(SOLID), &[collider]);

    assert!(scene.remove_tag(collider, WALL).unwrap());
    assert!(scene.tag_index().get(WALL).is_empty());

    scene.entity_mut(id).unwrap().remove_component(component).unwrap();
    scene.update(&mut frame);
    assert!(scene.tag_index().is_empty());
    assert!(!scene.is_live(collider));

    // Tagging a detached collider files it only once it is live again
    assert!(scene.add_tag(collider, WALL).unwrap());
    assert!(scene.tag_index().get(WALL).is_empty());
    scene.entity_mut(id).unwrap().reattach_component(component).unwrap();
    scene.update(&mut frame);
    assert_eq!(scene.tag_index().get(WALL), &[collider]);
    assert_eq!(scene.tag_index().get(SOLID), &[collider]);

    scene.remove(id).unwrap();
    scene.sync(&mut frame);
    assert!(scene.tag_index().is_empty());
}

#[test]
fn test_hypothetical_queries_leave_scene_unchanged() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::new();

    let mut wall = Entity::at(0.0, 90.0);
    wall.add_component(Collider::rectangle(100.0, 10.0).with_tag(WALL)).unwrap();
    let wall_id = scene.add(wall).unwrap();

    let mut ball = Entity::at(50.0, 50.0);
    let shape = ball.add_component(Collider::circle(5.0)).unwrap();
    let ball_id = scene.add(ball).unwrap();
    scene.sync(&mut frame);
    let ball = ColliderRef::new(ball_id, shape);

    let wall_collider = scene.entity(wall_id).unwrap().first_collider().unwrap();
    let hit = Some(ColliderRef::new(wall_id, wall_collider));

    for _ in 0..2 {
        assert_eq!(scene.collide_at(ball, 50.0, 82.0, WALL).unwrap(), hit);
        assert_eq!(scene.collide_at(ball, 50.0, 74.0, WALL).unwrap(), None);
        assert_eq!(scene.query_first(ball, WALL).unwrap(), None);
        assert_eq!(scene.entity(ball_id).unwrap().position.y, 50.0);
    }
    assert_eq!(scene.collide_all_at(ball, 50.0, 82.0, wall_id).unwrap(), vec![hit.unwrap()]);
}

#[test]
fn test_circle_tests_against_wall_at_another_position() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::with_delta_time(0.25);

    let mut wall = Entity::at(0.0, 0.0);
    let wall_shape = wall.add_component(Collider::rectangle(10.0, 10.0).with_tag(WALL)).unwrap();
    let wall_id = scene.add(wall).unwrap();

    let mut ball = Entity::at(20.0, 20.0);
    let ball_shape = ball.add_component(Collider::circle(3.0)).unwrap();
    let ball_id = scene.add(ball).unwrap();
    scene.update(&mut frame);
    let ball = ColliderRef::new(ball_id, ball_shape);

    assert_eq!(scene.query_first(ball, WALL).unwrap(), None);
    assert!(scene.overlaps_at(ball, 5.0, 5.0, WALL).unwrap());
    assert_eq!(
        scene.collide_at(ball, 5.0, 5.0, WALL).unwrap(),
        Some(ColliderRef::new(wall_id, wall_shape))
    );

    let position = scene.entity(ball_id).unwrap().position;
    assert_eq!((position.x, position.y), (20.0, 20.0));
    assert_eq!(scene.query_first(ball, WALL).unwrap(), None);
}

/// Falls by `speed` each update unless the move would hit a wall
struct Faller {
    collider: Option<ColliderRef>,
    speed: f32,
}

impl Script for Faller {
    fn attached(&mut self, ctx: &mut ComponentContext<'_>) {
        self.collider = ctx
            .entity()
            .and_then(Entity::first_collider)
            .map(|component| ctx.collider(component));
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let (Some(collider), Some(entity)) = (self.collider, ctx.entity()) else {
            return;
        };
        let (x, y) = (entity.position.x, entity.position.y + self.speed);
        if !ctx.scene.overlaps_at(collider, x, y, WALL).unwrap_or(true) {
            if let Some(entity) = ctx.entity_mut() {
                entity.position.y = y;
            }
        }
    }
}

#[test]
fn test_ball_comes_to_rest_on_wall() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::with_delta_time(0.25);

    let mut wall = Entity::at(0.0, 90.0);
    wall.add_component(Collider::rectangle(100.0, 10.0).with_tag(WALL)).unwrap();
    scene.add(wall).unwrap();

    let mut ball = Entity::at(50.0, 50.0);
    ball.add_component(Collider::circle(5.0)).unwrap();
    ball.add_component(Component::script(Faller {
        collider: None,
        speed: 8.0,
    }))
    .unwrap();
    let ball_id = scene.add(ball).unwrap();
    scene.begin(&mut frame);

    for _ in 0..10 {
        scene.update(&mut frame);
    }
    assert_eq!(scene.entity(ball_id).unwrap().position.y, 74.0);
    assert_eq!(scene.timer(), 2.5);
}

#[test]
fn test_circle_against_grid_floor() {
    let mut scene = Scene::new();
    let mut frame = FrameContext::new();

    let mut floor = GridShape::new(4, 1, 16.0, 16.0);
    floor.set_tile(0, 0, true);
    floor.set_tile(3, 0, true);
    let mut level = Entity::at(0.0, 64.0);
    level.add_component(Collider::grid(floor).with_tag(SOLID)).unwrap();
    scene.add(level).unwrap();

    let mut ball = Entity::new();
    let shape = ball.add_component(Collider::circle(4.0)).unwrap();
    let ball_id = scene.add(ball).unwrap();
    scene.sync(&mut frame);
    let ball = ColliderRef::new(ball_id, shape);

    // Over a solid tile, then over a gap in the floor
    assert!(scene.overlaps_at(ball, 4.0, 60.0, SOLID).unwrap());
    assert!(!scene.overlaps_at(ball, 20.0, 60.0, SOLID).unwrap());
    assert!(scene.overlaps_at(ball, 52.0, 60.0, SOLID).unwrap());
}
