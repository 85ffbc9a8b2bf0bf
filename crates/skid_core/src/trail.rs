//! Skid-mark trail recording
//!
//! A trail is a chain of segments. Each wheel remembers the handle of the
//! last segment it appended and passes it back on the next append so the
//! recorder can connect them; `None` starts a fresh, unconnected chain.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::physics_constants::trail::{MAX_MARKS, MIN_SQR_DISTANCE};

/// Opaque reference to a recorded segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrailHandle {
    slot: u32,
    generation: u32,
}

impl TrailHandle {
    pub fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }
}

/// One skid-mark point to append
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSegment {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Opacity in [0, 1]
    pub intensity: f32,
}

/// Skid-mark storage shared by every wheel in the scene
pub trait TrailRecorder {
    /// Append `segment`, chained from `previous` when given, and return the
    /// handle to pass as `previous` next time.
    fn append_segment(&mut self, segment: TrailSegment, previous: Option<TrailHandle>)
        -> TrailHandle;
}

/// A stored segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkidMark {
    pub segment: TrailSegment,
    /// Predecessor in the same chain, if it is still stored
    pub previous: Option<TrailHandle>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    mark: Option<SkidMark>,
}

/// Ring-buffer recorder. When full, the oldest segment is overwritten and
/// handles to it stop resolving.
#[derive(Debug, Clone)]
pub struct MemoryTrailRecorder {
    slots: Vec<Slot>,
    capacity: usize,
    next: usize,
    min_sqr_distance: f32,
}

impl Default for MemoryTrailRecorder {
    fn default() -> Self {
        Self::with_capacity(MAX_MARKS)
    }
}

impl MemoryTrailRecorder {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            min_sqr_distance: MIN_SQR_DISTANCE,
        }
    }

    /// Segments closer than `distance` to their predecessor are dropped
    pub fn with_min_distance(mut self, distance: f32) -> Self {
        self.min_sqr_distance = distance * distance;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.mark.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, handle: TrailHandle) -> Option<&SkidMark> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.mark.as_ref()
    }

    /// Walk a chain backwards from `handle` to its first surviving segment
    pub fn chain(&self, handle: TrailHandle) -> Vec<SkidMark> {
        let mut out = Vec::new();
        let mut cursor = Some(handle);
        while let Some(h) = cursor {
            match self.get(h) {
                Some(mark) => {
                    out.push(*mark);
                    cursor = mark.previous;
                }
                None => break,
            }
            if out.len() >= self.capacity {
                break;
            }
        }
        out
    }

    pub fn marks(&self) -> impl Iterator<Item = &SkidMark> {
        self.slots.iter().filter_map(|s| s.mark.as_ref())
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.mark = None;
            slot.generation = slot.generation.wrapping_add(1);
        }
        self.next = 0;
    }
}

impl TrailRecorder for MemoryTrailRecorder {
    fn append_segment(
        &mut self,
        segment: TrailSegment,
        previous: Option<TrailHandle>,
    ) -> TrailHandle {
        // A stale handle (overwritten slot) starts a new chain
        let previous = previous.filter(|h| self.get(*h).is_some());

        if let Some(prev) = previous {
            if let Some(mark) = self.get(prev) {
                if (segment.point - mark.segment.point).norm_squared() < self.min_sqr_distance {
                    return prev;
                }
            }
        }

        let index = self.next;
        self.next = (self.next + 1) % self.capacity;

        let mark = SkidMark { segment, previous };
        let generation = if index < self.slots.len() {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.mark = Some(mark);
            slot.generation
        } else {
            self.slots.push(Slot {
                generation: 0,
                mark: Some(mark),
            });
            0
        };

        TrailHandle::new(index as u32, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x: f32) -> TrailSegment {
        TrailSegment {
            point: Vector3::new(x, 0.0, 0.0),
            normal: Vector3::y(),
            intensity: 0.5,
        }
    }

    #[test]
    fn test_chain_links_segments() {
        let mut rec = MemoryTrailRecorder::default();
        let a = rec.append_segment(seg(0.0), None);
        let b = rec.append_segment(seg(1.0), Some(a));
        let c = rec.append_segment(seg(2.0), Some(b));

        let chain = rec.chain(c);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].previous, Some(b));
        assert_eq!(chain[2].previous, None);
    }

    #[test]
    fn test_independent_chains_interleave() {
        let mut rec = MemoryTrailRecorder::default();
        let left = rec.append_segment(seg(0.0), None);
        let right = rec.append_segment(seg(100.0), None);
        let left2 = rec.append_segment(seg(1.0), Some(left));
        let right2 = rec.append_segment(seg(101.0), Some(right));

        assert_eq!(rec.get(left2).unwrap().previous, Some(left));
        assert_eq!(rec.get(right2).unwrap().previous, Some(right));
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn test_close_segments_coalesce() {
        let mut rec = MemoryTrailRecorder::default();
        let a = rec.append_segment(seg(0.0), None);
        let b = rec.append_segment(seg(0.1), Some(a));
        assert_eq!(a, b);
        assert_eq!(rec.len(), 1);

        // Without a predecessor the distance check does not apply
        let c = rec.append_segment(seg(0.1), None);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ring_wrap_invalidates_old_handles() {
        let mut rec = MemoryTrailRecorder::with_capacity(2);
        let a = rec.append_segment(seg(0.0), None);
        let b = rec.append_segment(seg(1.0), Some(a));
        let c = rec.append_segment(seg(2.0), Some(b));

        assert!(rec.get(a).is_none());
        assert_eq!(rec.len(), 2);
        // c overwrote a's slot; the chain stops at b
        assert_eq!(c.slot(), a.slot());
        assert_eq!(rec.chain(c).len(), 2);

        // Chaining from the stale handle starts fresh
        let d = rec.append_segment(seg(10.0), Some(a));
        assert_eq!(rec.get(d).unwrap().previous, None);
    }

    #[test]
    fn test_clear() {
        let mut rec = MemoryTrailRecorder::default();
        let a = rec.append_segment(seg(0.0), None);
        rec.clear();
        assert!(rec.is_empty());
        assert!(rec.get(a).is_none());
    }
}
