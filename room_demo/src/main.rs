//! Headless room demo
//!
//! Loads a world configuration (or uses a built-in one), drops a handful of
//! random bodies into a room and runs it in real time on a tick thread while
//! a second thread reads the published snapshots, the way a renderer would.
//!
//! ```text
//! room_demo [world.toml|world.ron] [seconds]
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use room_physics::foundation::logging;
use room_physics::foundation::time::{FixedTimestep, Timer};
use room_physics::prelude::*;

const TICK_RATE: f32 = 60.0;
const BODY_COUNT: usize = 12;

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("Room error: {0}")]
    Room(#[from] RoomError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("World has no 2D rooms")]
    NoRoom,

    #[error("Invalid duration: {0}")]
    Duration(String),
}

fn default_world() -> WorldConfig {
    WorldConfig::default()
        .with_material(Material::new("stone", 0.8, 0.0))
        .with_material(Material::new("ice", 0.05, 0.0))
        .with_material(Material::new("rubber", 1.2, 0.9))
        .with_tile_type(TileTypeConfig::new("block", TileHitboxShape::Full, "stone"))
        .with_tile_type(TileTypeConfig::new("slab", TileHitboxShape::BottomSlab, "ice"))
        .with_tile_type(TileTypeConfig::new("ledge", TileHitboxShape::TopSlab, "stone"))
        .with_tile_type(TileTypeConfig::new("bumper", TileHitboxShape::Circle, "rubber"))
        .with_room(
            RoomConfig::new("cavern", 20, 12)
                .with_boundary(BoundaryConfig::closed().with_material("stone"))
                .with_legend('#', "block")
                .with_legend('=', "slab")
                .with_legend('-', "ledge")
                .with_legend('o', "bumper")
                .with_rows([
                    "....................",
                    "....................",
                    "....................",
                    "......o......o......",
                    "....................",
                    "...----......====...",
                    "....................",
                    "..........o.........",
                    "........#####.......",
                    "....................",
                    "==..............==..",
                    "####################",
                ]),
        )
}

/// Random body somewhere in the upper part of the room, sized to its tiles.
/// Every range is inclusive and clamped so tiny rooms still get a body.
fn random_body(rng: &mut impl Rng, room: &Room<Body2>) -> Body2 {
    let tile = room.tile_size();
    let (width, height) = (room.world_width(), room.world_height());
    let mut size = || (rng.gen_range(0.4_f32..=0.9) * tile).min(width).min(height);
    let (w, h) = (size(), size());

    let x = rng.gen_range(0.0..=(width - w).max(0.0));
    let y = rng.gen_range(0.0..=(height * 0.3 - h).max(0.0));
    let velocity = Vec2::new(rng.gen_range(-4.0..=4.0) * tile, rng.gen_range(-1.0..=1.0) * tile);
    let body = if rng.gen_bool(0.5) {
        Body2::new(Rect::rect(x, y, w, h))
    } else {
        let radius = w.min(h) * 0.5;
        Body2::new(Circle::new(x + radius, y + radius, radius))
    };
    body.with_velocity(velocity).with_gravity(30.0 * tile)
}

fn main() -> Result<(), DemoError> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let world = match args.next() {
        Some(path) => WorldConfig::load_from_file(path)?,
        None => default_world(),
    };
    let seconds: f32 = match args.next() {
        Some(text) => text.parse().map_err(|_| DemoError::Duration(text))?,
        None => 3.0,
    };
    world.validate().map_err(RoomError::InvalidDimensions)?;

    let materials = world.material_library();
    let tile_types = world.tile_type_table(&materials)?;
    let room_config = world.rooms.first().ok_or(DemoError::NoRoom)?;
    let mut room: Room<Body2> = Room::from_config(room_config, &materials, &tile_types)?;

    let mut rng = rand::thread_rng();
    for _ in 0..BODY_COUNT {
        let body = random_body(&mut rng, &room);
        room.add_entity(body);
    }
    log::info!("Spawned {} bodies in '{}'", room.entity_count(), room.name());

    let buffer = SnapshotBuffer::new();
    let running = Arc::new(AtomicBool::new(true));

    let reader = {
        let buffer = buffer.clone();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                buffer.read(|snapshot| {
                    let grounded = snapshot
                        .entities
                        .iter()
                        .filter(|entity| entity.contact.is_touching(Contact::Floor))
                        .count();
                    log::info!(
                        "tick {:>4}: {}/{} bodies grounded",
                        snapshot.tick,
                        grounded,
                        snapshot.entities.len()
                    );
                });
                thread::sleep(Duration::from_millis(250));
            }
        })
    };

    let simulation = {
        let buffer = buffer.clone();
        thread::spawn(move || {
            let mut timer = Timer::new();
            let mut timestep = FixedTimestep::new(1.0 / TICK_RATE);
            while timer.total_time() < seconds {
                timer.update();
                for _ in 0..timestep.advance(timer.delta_time()) {
                    room.tick(timestep.step());
                }
                room.publish(&buffer);
                thread::sleep(Duration::from_millis(4));
            }
            room
        })
    };

    let room = match simulation.join() {
        Ok(room) => room,
        Err(_) => {
            log::error!("Simulation thread panicked");
            running.store(false, Ordering::Relaxed);
            return Ok(());
        }
    };
    running.store(false, Ordering::Relaxed);
    if reader.join().is_err() {
        log::warn!("Snapshot reader panicked");
    }

    log::info!("Ran {} ticks", room.ticks());
    for (id, body) in room.entities() {
        log::info!(
            "{:?}: {} floor / {} wall / {} ceiling touches, on ground: {}",
            id,
            body.touch_count(Contact::Floor),
            body.touch_count(Contact::Wall),
            body.touch_count(Contact::Ceiling),
            body.is_on_ground()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn room(width: usize, height: usize, tile_size: f32) -> Room<Body2> {
        Room::new("spawn", width, height, tile_size, TileTypeTable::new()).expect("valid room")
    }

    fn assert_inside(body: &Body2, room: &Room<Body2>) {
        let bounds = body.bounds().bounding_box();
        assert!(bounds.x() >= 0.0 && bounds.y() >= 0.0);
        assert!(bounds.x() + bounds.w() <= room.world_width() + 1e-3);
        assert!(bounds.y() + bounds.h() <= room.world_height() + 1e-3);
    }

    #[test]
    fn test_spawns_fit_tiny_rooms() {
        let mut rng = StdRng::seed_from_u64(7);
        for (width, height, tile_size) in [(4, 4, 4.0), (1, 1, 1.0), (1, 3, 0.5), (20, 12, 16.0)] {
            let room = room(width, height, tile_size);
            for _ in 0..200 {
                let body = random_body(&mut rng, &room);
                assert_inside(&body, &room);
            }
        }
    }

    #[test]
    fn test_default_world_builds() {
        let world = default_world();
        assert!(world.validate().is_ok());
        let materials = world.material_library();
        let tile_types = world.tile_type_table(&materials).expect("tile types");
        let config = world.rooms.first().expect("cavern");
        let room: Room<Body2> = Room::from_config(config, &materials, &tile_types).expect("room");
        assert_eq!(room.width(), 20);
    }
}
