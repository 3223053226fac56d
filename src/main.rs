use gg_collide::core::prelude::*;
use gg_collide::info_every_seconds;
use gg_collide::util::setup_log;
use rand::{Rng, SeedableRng, rngs::StdRng};

const FRAMES: usize = 600;
const OBSTACLES: usize = 24;
const SEED: u64 = 0x5eed;
const ARENA_HALF_WIDTH: f32 = 20.;
const PLAYER_SPEED: f32 = 0.4;

fn add_walls(scene: &mut SceneGraph, collision: &mut CollisionService, layer: LayerId) -> Result<()> {
    let thickness = 0.5;
    for (centre, half_widths) in [
        (Vec2::up(), Vec2 { x: ARENA_HALF_WIDTH, y: thickness }),
        (Vec2::down(), Vec2 { x: ARENA_HALF_WIDTH, y: thickness }),
        (Vec2::left(), Vec2 { x: thickness, y: ARENA_HALF_WIDTH }),
        (Vec2::right(), Vec2 { x: thickness, y: ARENA_HALF_WIDTH }),
    ] {
        let wall = scene.add_node(layer, Transform::with_centre(centre * ARENA_HALF_WIDTH));
        scene.set_nickname(wall, "wall");
        collision.register_collidable(&*scene, PolygonShape::rect(wall, half_widths)?);
    }
    Ok(())
}

fn add_obstacles(
    scene: &mut SceneGraph,
    collision: &mut CollisionService,
    layer: LayerId,
    player: ObjectId,
    rng: &mut StdRng,
) -> Result<usize> {
    let mut added = 0;
    for i in 0..OBSTACLES {
        let sides = rng.gen_range(3..8);
        let radius = rng.gen_range(0.5_f32..2.5);
        let vertices = (0..sides)
            .map(|side| Vec2::right().rotated(360. * side as f32 / sides as f32) * radius)
            .collect_vec();
        let limit = ARENA_HALF_WIDTH - 3.;
        let transform = Transform {
            centre: Vec2 {
                x: rng.gen_range(-limit..limit),
                y: rng.gen_range(-limit..limit),
            },
            rotation: rng.gen_range(0.0..360.0),
            scale: Vec2::one(),
        };
        let obstacle = scene.add_node(layer, transform);
        scene.set_nickname(obstacle, format!("obstacle {i}"));
        scene.set_collision_shape(collision, obstacle, &vertices)?;

        let (Some(obstacle_shape), Some(player_shape)) =
            (collision.shape(obstacle), collision.shape(player))
        else {
            bail!("obstacle {i} was not registered");
        };
        if collision.intersect(&*scene, obstacle_shape, player_shape) {
            debug!("obstacle {i} spawned on top of the player, removing");
            scene.remove_node(collision, obstacle);
        } else {
            added += 1;
        }
    }
    Ok(added)
}

fn main() -> Result<()> {
    setup_log()?;
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut scene = SceneGraph::new();
    let mut collision = CollisionService::new();
    let layer = scene.add_layer("world");

    let player = scene.add_node(layer, Transform::default());
    scene.set_nickname(player, "player");
    collision.register_collidable(&scene, PolygonShape::square(player, 1.)?);

    add_walls(&mut scene, &mut collision, layer)?;
    let obstacles = add_obstacles(&mut scene, &mut collision, layer, player, &mut rng)?;
    info!(
        "{obstacles} obstacles, {} overlapping pair(s) at start",
        collision.intersecting_pairs(&scene, layer).len()
    );

    let mut velocity = Vec2::right().rotated(rng.gen_range(0.0..360.0)) * PLAYER_SPEED;
    let mut bounces = 0;
    for frame in 0..FRAMES {
        let old = scene.world_position(player);
        let resolved = collision.resolve_movement(&scene, player, old, old + velocity);
        scene.set_position(player, resolved.position);
        match resolved.outcome {
            MovementOutcome::Unobstructed => {}
            MovementOutcome::Blocked(contact) => {
                bounces += 1;
                velocity -= contact.axis * (2. * velocity.dot(contact.axis));
                debug!(
                    "frame {frame}: bounced off {} at {}",
                    scene.nickname_or_id(contact.other),
                    resolved.position
                );
            }
            MovementOutcome::Refused { other } => {
                warn!(
                    "frame {frame}: player is stuck inside {}",
                    scene.nickname_or_id(other)
                );
                break;
            }
        }
        info_every_seconds!(1, "frame {}: player at {}", frame, resolved.position);
    }

    info!(
        "finished at {} after {bounces} bounce(s)",
        scene.world_position(player)
    );
    Ok(())
}
