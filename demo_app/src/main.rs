//! Falling balls demo
//!
//! Runs the scene engine headless: a handful of balls fall under gravity,
//! bounce on a floor using hypothetical-position queries, and the draw list
//! of every rendered frame is summarised in the log.

use rand::Rng;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;

const FLOOR: Tag = Tag::new("floor");
const GRAVITY: f32 = 480.0;
const RESTITUTION: f32 = 0.6;
const FRAMES: u32 = 240;

/// Falls under gravity and bounces off anything tagged as floor
struct Ball {
    collider: Option<ColliderRef>,
    velocity: f32,
    resting: bool,
}

impl Ball {
    const fn new() -> Self {
        Self {
            collider: None,
            velocity: 0.0,
            resting: false,
        }
    }
}

impl Script for Ball {
    fn attached(&mut self, ctx: &mut ComponentContext<'_>) {
        self.collider = ctx
            .entity()
            .and_then(Entity::first_collider)
            .map(|component| ctx.collider(component));
    }

    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let Some(collider) = self.collider else {
            return;
        };
        if self.resting {
            return;
        }
        let delta_time = ctx.delta_time();
        let Some(position) = ctx.entity().map(|entity| entity.position) else {
            return;
        };

        self.velocity += GRAVITY * delta_time;
        let target = position.y + self.velocity * delta_time;
        match ctx.scene.overlaps_at(collider, position.x, target, FLOOR) {
            Ok(false) => {
                if let Some(entity) = ctx.entity_mut() {
                    entity.position.y = target;
                }
            }
            Ok(true) => {
                self.velocity = -self.velocity * RESTITUTION;
                if self.velocity.abs() < GRAVITY * delta_time {
                    self.resting = true;
                    log::debug!("Ball {:?} came to rest at y = {:.1}", ctx.entity, position.y);
                }
            }
            Err(error) => log::error!("Ball query failed: {}", error),
        }
    }
}

/// Logs a summary of the scene once per simulated second
struct DemoApp {
    steps: u32,
    last_draws: usize,
}

impl Application for DemoApp {
    fn post_update(&mut self, scene: Option<&mut Scene>, _frame: &mut FrameContext) {
        self.steps += 1;
        let Some(scene) = scene else {
            return;
        };
        if self.steps % 60 == 0 {
            log::info!(
                "t = {:.2}s: {} entities, {} floor collider(s), {} draw call(s) last frame",
                scene.timer(),
                scene.entity_count(),
                scene.tag_index().get(FLOOR).len(),
                self.last_draws
            );
        }
    }

    fn cleanup(&mut self) {
        log::info!("Demo finished after {} update sequence(s)", self.steps);
    }
}

fn build_scene(ball_count: usize) -> Result<Scene, SceneError> {
    let mut rng = rand::thread_rng();
    let mut scene = Scene::new();

    let mut floor = Entity::at(0.0, 400.0).with_layer(-1);
    floor.add_component(Collider::rectangle(640.0, 16.0).with_tag(FLOOR))?;
    floor.add_component(Graphic::new("floor", 640.0, 16.0).with_color(Color::rgb(0.3, 0.3, 0.3)))?;
    scene.add(floor)?;

    for _ in 0..ball_count {
        let radius = rng.gen_range(4.0..12.0);
        let mut ball = Entity::at(rng.gen_range(0.0..600.0), rng.gen_range(0.0..200.0));
        ball.add_component(Collider::circle(radius))?;
        ball.add_component(Graphic::new("ball", radius * 2.0, radius * 2.0).with_color(Color::RED))?;
        ball.add_component(Component::script(Ball::new()))?;
        scene.add(ball)?;
    }

    Ok(scene)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");
    log::info!("Starting falling balls demo");

    let config = EngineConfig::load_or_default("demo_app.toml")?;
    let real_delta = config.step();
    let mut scheduler = FrameScheduler::new(config)?;
    scheduler.switch_scene(build_scene(8)?);
    scheduler.start();

    let mut app = DemoApp {
        steps: 0,
        last_draws: 0,
    };
    let mut draw = DrawList::new();
    for _ in 0..FRAMES {
        draw.clear();
        scheduler.run_frame(real_delta, &mut app, &NoInput, &mut draw)?;
        app.last_draws = draw.len();
    }

    if let Some(scene) = scheduler.shutdown(&mut app) {
        for id in scene.render_order() {
            if let Some(entity) = scene.entity(id) {
                log::info!("Entity at ({:.1}, {:.1})", entity.position.x, entity.position.y);
            }
        }
    }
    Ok(())
}
