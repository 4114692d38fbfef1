//! # Chunk Manager Module
//!
//! The `ChunkManager` owns every resident chunk, keyed by grid coordinate, and
//! tells interested parties when chunks come and go.
//!
//! ## Notifications
//!
//! Producers (typically the terrain generator, through the world) call
//! [`ChunkManager::subscribe`] to obtain a channel receiver. Each time a chunk is
//! created a [`ChunkEvent::Loaded`] is sent; unloads, evictions and clears send
//! their own events. Delivery is ordered and explicit: the receiver drains events
//! when it chooses to, so population errors surface at the call site instead of
//! inside a callback.
//!
//! ## Residency
//!
//! By default every loaded chunk stays resident until it is unloaded or the
//! manager is cleared. When constructed with a capacity, the least recently
//! loaded or accessed chunk is evicted to make room for a new one.

use std::num::NonZeroUsize;
use std::sync::mpsc::{channel, Receiver, Sender};

use cgmath::Point3;
use log::{debug, info};
use lru::LruCache;

use super::chunk::Chunk;

/// A change in the set of resident chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkEvent {
    /// A new, uninitialized chunk was created at this grid position.
    Loaded(Point3<i32>),
    /// The chunk at this grid position was removed (explicitly or by eviction).
    Unloaded(Point3<i32>),
    /// Every chunk was removed.
    Cleared,
}

/// Allocates chunks on an integer grid and tracks them by position.
///
/// No two chunks ever occupy the same grid coordinate.
pub struct ChunkManager {
    chunks: LruCache<Point3<i32>, Chunk>,
    chunk_size: usize,
    voxel_size: f32,
    next_id: u64,
    subscribers: Vec<Sender<ChunkEvent>>,
}

impl ChunkManager {
    /// Creates an empty manager that keeps every chunk resident until cleared.
    ///
    /// # Arguments
    /// * `chunk_size` - The edge length of every chunk in voxels
    /// * `voxel_size` - The world-space size of a single voxel
    pub fn new(chunk_size: usize, voxel_size: f32) -> Self {
        Self::with_chunks(LruCache::unbounded(), chunk_size, voxel_size)
    }

    /// Creates an empty manager that holds at most `capacity` chunks, evicting
    /// the least recently used one when a new chunk is loaded at capacity.
    pub fn with_capacity(chunk_size: usize, voxel_size: f32, capacity: NonZeroUsize) -> Self {
        Self::with_chunks(LruCache::new(capacity), chunk_size, voxel_size)
    }

    fn with_chunks(chunks: LruCache<Point3<i32>, Chunk>, chunk_size: usize, voxel_size: f32) -> Self {
        ChunkManager {
            chunks,
            chunk_size,
            voxel_size,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Edge length of every chunk in voxels.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// World-space size of one voxel.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Registers a new listener for chunk events.
    ///
    /// Listeners whose receiver has been dropped are forgotten on the next event.
    pub fn subscribe(&mut self) -> Receiver<ChunkEvent> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    fn notify(&mut self, event: ChunkEvent) {
        self.subscribers.retain(|sender| sender.send(event).is_ok());
    }

    /// Loads the chunk at the given grid position, creating it if necessary.
    ///
    /// Loading a position that is already resident is a no-op: the existing
    /// chunk (same identity) is returned and no event is sent.
    ///
    /// # Returns
    /// The chunk at `position`.
    pub fn load_chunk(&mut self, position: Point3<i32>) -> &mut Chunk {
        if !self.chunks.contains(&position) {
            if self.chunks.len() >= self.chunks.cap().get() {
                if let Some((evicted, _)) = self.chunks.pop_lru() {
                    debug!("Evicted chunk {:?}", evicted);
                    self.notify(ChunkEvent::Unloaded(evicted));
                }
            }
            self.notify(ChunkEvent::Loaded(position));
        }

        let (id, size, voxel_size) = (self.next_id, self.chunk_size, self.voxel_size);
        let next_id = &mut self.next_id;
        self.chunks.get_or_insert_mut(position, || {
            *next_id += 1;
            Chunk::new(id, position, size, voxel_size)
        })
    }

    /// Loads every chunk within `radius` of `center` on each axis.
    ///
    /// # Returns
    /// The positions that were not resident before this call, in load order.
    pub fn load_radius(&mut self, center: Point3<i32>, radius: i32) -> Vec<Point3<i32>> {
        let mut loaded = Vec::new();
        for z in -radius..=radius {
            for y in -radius..=radius {
                for x in -radius..=radius {
                    let position = Point3::new(center.x + x, center.y + y, center.z + z);
                    if !self.is_loaded(position) {
                        loaded.push(position);
                    }
                    self.load_chunk(position);
                }
            }
        }
        info!(
            "Loaded {} new chunks around {:?} (radius {})",
            loaded.len(),
            center,
            radius
        );
        loaded
    }

    /// Removes the chunk at `position`, returning it if it was resident.
    pub fn unload_chunk(&mut self, position: Point3<i32>) -> Option<Chunk> {
        let chunk = self.chunks.pop(&position)?;
        self.notify(ChunkEvent::Unloaded(position));
        Some(chunk)
    }

    /// Destroys every tracked chunk and empties the registry.
    pub fn clear_all(&mut self) {
        let count = self.chunks.len();
        self.chunks.clear();
        self.notify(ChunkEvent::Cleared);
        info!("Cleared {} chunks", count);
    }

    /// Whether a chunk is resident at `position`.
    pub fn is_loaded(&self, position: Point3<i32>) -> bool {
        self.chunks.contains(&position)
    }

    /// Looks up a chunk without affecting eviction order.
    pub fn get(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.peek(&position)
    }

    /// Looks up a chunk for modification, marking it as recently used.
    pub fn get_mut(&mut self, position: Point3<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunks are resident.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates over resident chunks, most recently used first.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().map(|(_, chunk)| chunk)
    }

    /// Iterates mutably over resident chunks, most recently used first.
    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.iter_mut().map(|(_, chunk)| chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_chunk_is_idempotent() {
        let mut manager = ChunkManager::new(16, 1.0);
        let events = manager.subscribe();
        let position = Point3::new(1, 0, -1);

        let first_id = manager.load_chunk(position).id();
        let second_id = manager.load_chunk(position).id();

        assert_eq!(first_id, second_id);
        assert_eq!(manager.len(), 1);
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![ChunkEvent::Loaded(position)]);
    }

    #[test]
    fn test_chunks_are_placed_in_world_space() {
        let mut manager = ChunkManager::new(8, 2.0);
        let chunk = manager.load_chunk(Point3::new(2, 0, -1));
        assert_eq!(chunk.world_position(), cgmath::Vector3::new(32.0, 0.0, -16.0));
        assert_eq!(chunk.size(), 8);
    }

    #[test]
    fn test_clear_all_empties_registry() {
        let mut manager = ChunkManager::new(4, 1.0);
        let events = manager.subscribe();
        manager.load_radius(Point3::new(0, 0, 0), 1);
        assert_eq!(manager.len(), 27);

        manager.clear_all();
        assert!(manager.is_empty());
        assert_eq!(events.try_iter().last(), Some(ChunkEvent::Cleared));
    }

    #[test]
    fn test_load_radius_reports_only_new_positions() {
        let mut manager = ChunkManager::new(4, 1.0);
        manager.load_chunk(Point3::new(0, 0, 0));
        let loaded = manager.load_radius(Point3::new(0, 0, 0), 1);
        assert_eq!(loaded.len(), 26);
        assert!(!loaded.contains(&Point3::new(0, 0, 0)));
    }

    #[test]
    fn test_unload_sends_event() {
        let mut manager = ChunkManager::new(4, 1.0);
        let position = Point3::new(3, 3, 3);
        manager.load_chunk(position);
        let events = manager.subscribe();

        assert!(manager.unload_chunk(position).is_some());
        assert!(manager.unload_chunk(position).is_none());
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![ChunkEvent::Unloaded(position)]);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let capacity = NonZeroUsize::new(2).unwrap();
        let mut manager = ChunkManager::with_capacity(4, 1.0, capacity);
        let events = manager.subscribe();
        let (a, b, c) = (Point3::new(0, 0, 0), Point3::new(1, 0, 0), Point3::new(2, 0, 0));

        manager.load_chunk(a);
        manager.load_chunk(b);
        // touch `a` so `b` becomes the eviction candidate
        manager.load_chunk(a);
        manager.load_chunk(c);

        assert_eq!(manager.len(), 2);
        assert!(manager.is_loaded(a));
        assert!(!manager.is_loaded(b));
        assert!(events.try_iter().any(|e| e == ChunkEvent::Unloaded(b)));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut manager = ChunkManager::new(4, 1.0);
        let a = manager.load_chunk(Point3::new(0, 0, 0)).id();
        let b = manager.load_chunk(Point3::new(0, 1, 0)).id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut manager = ChunkManager::new(4, 1.0);
        drop(manager.subscribe());
        manager.load_chunk(Point3::new(0, 0, 0));
        assert!(manager.subscribers.is_empty());
    }
}
