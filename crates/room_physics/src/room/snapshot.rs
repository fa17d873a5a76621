//! Tick-complete snapshots for reader threads
//!
//! The room is only ever touched by the thread that ticks it. Anything that
//! wants to look at it from elsewhere (a renderer, a debug overlay) reads a
//! [`RoomSnapshot`] published through a shared [`SnapshotBuffer`] once the
//! tick has finished, so it never observes half a pass.

use std::sync::{Arc, PoisonError, RwLock};

use crate::physics::collision::{Shape2, Shape3};
use crate::physics::hitbox::ContactState;

use super::EntityId;

/// One entity as of the end of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot<S> {
    /// Key of the entity in its room
    pub id: EntityId,
    /// Bounds after collision
    pub shape: S,
    /// Contact flags after collision
    pub contact: ContactState,
}

/// All entities of a room at the end of tick `tick`
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot<S> {
    /// Number of completed ticks
    pub tick: u64,
    /// Every entity, in storage order
    pub entities: Vec<EntitySnapshot<S>>,
}

/// Snapshot of a 2D room
pub type RoomSnapshot2 = RoomSnapshot<Shape2>;

/// Snapshot of a 3D room
pub type RoomSnapshot3 = RoomSnapshot<Shape3>;

impl<S> Default for RoomSnapshot<S> {
    fn default() -> Self {
        Self {
            tick: 0,
            entities: Vec::new(),
        }
    }
}

impl<S> RoomSnapshot<S> {
    /// Look up one entity
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot<S>> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

/// Shared slot holding the latest published snapshot
#[derive(Debug)]
pub struct SnapshotBuffer<S> {
    latest: Arc<RwLock<RoomSnapshot<S>>>,
}

impl<S> Clone for SnapshotBuffer<S> {
    fn clone(&self) -> Self {
        Self {
            latest: Arc::clone(&self.latest),
        }
    }
}

impl<S> Default for SnapshotBuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SnapshotBuffer<S> {
    /// Buffer holding an empty snapshot at tick 0
    pub fn new() -> Self {
        Self {
            latest: Arc::new(RwLock::new(RoomSnapshot::default())),
        }
    }

    /// Replace the published snapshot.
    ///
    /// Snapshots older than the one already published are dropped, so the
    /// tick seen by readers never goes backwards.
    pub fn publish(&self, snapshot: RoomSnapshot<S>) -> bool {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        if snapshot.tick < latest.tick {
            log::warn!("Dropping stale snapshot for tick {} (have {})", snapshot.tick, latest.tick);
            return false;
        }
        *latest = snapshot;
        true
    }

    /// Tick of the published snapshot
    pub fn tick(&self) -> u64 {
        self.latest.read().unwrap_or_else(PoisonError::into_inner).tick
    }

    /// Run `f` against the published snapshot without copying it
    pub fn read<R>(&self, f: impl FnOnce(&RoomSnapshot<S>) -> R) -> R {
        let latest = self.latest.read().unwrap_or_else(PoisonError::into_inner);
        f(&latest)
    }
}

impl<S: Clone> SnapshotBuffer<S> {
    /// Copy of the published snapshot
    pub fn latest(&self) -> RoomSnapshot<S> {
        self.read(RoomSnapshot::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{Bounds, Rect};
    use slotmap::SlotMap;
    use std::thread;

    fn snapshot(tick: u64, id: EntityId, y: f32) -> RoomSnapshot2 {
        RoomSnapshot {
            tick,
            entities: vec![EntitySnapshot {
                id,
                shape: Shape2::Rect(Rect::rect(0.0, y, 1.0, 1.0)),
                contact: ContactState::default(),
            }],
        }
    }

    #[test]
    fn test_publish_replaces_and_rejects_stale() {
        let mut keys: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = keys.insert(());
        let buffer: SnapshotBuffer<Shape2> = SnapshotBuffer::new();

        assert!(buffer.publish(snapshot(2, id, 5.0)));
        assert!(!buffer.publish(snapshot(1, id, 9.0)));
        assert_eq!(buffer.tick(), 2);
        assert_eq!(
            buffer.latest().entity(id).map(|e| e.shape),
            Some(Shape2::Rect(Rect::rect(0.0, 5.0, 1.0, 1.0)))
        );
    }

    #[test]
    fn test_reader_thread_sees_whole_ticks() {
        let mut keys: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = keys.insert(());
        let buffer: SnapshotBuffer<Shape2> = SnapshotBuffer::new();
        let reader_buffer = buffer.clone();

        let reader = thread::spawn(move || {
            let mut last_tick = 0;
            for _ in 0..1000 {
                reader_buffer.read(|snap| {
                    assert!(snap.tick >= last_tick);
                    // Each tick places the entity at y == tick
                    if let Some(entity) = snap.entity(id) {
                        assert_eq!(entity.shape.bounding_box().y(), snap.tick as f32);
                    }
                    last_tick = snap.tick;
                });
            }
            last_tick
        });

        for tick in 1..=200 {
            buffer.publish(snapshot(tick, id, tick as f32));
        }
        let seen = reader.join().expect("reader thread");
        assert!(seen <= 200);
        assert_eq!(buffer.tick(), 200);
    }
}
