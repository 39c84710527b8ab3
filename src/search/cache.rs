//! Bounded score cache keyed by position hash.
//!
//! A hit is authoritative for its hash: two positions with the same hash
//! are assumed identical, so a collision silently returns the other
//! position's score. Accepted for the lifetime of a single game.
//!
//! Capacity is fixed at construction. Within a four-way bucket, a full
//! insert evicts the entry from the oldest generation; the driver bumps
//! the generation once per deepening iteration, which approximates
//! least-recently-used at iteration granularity.

const WAYS: usize = 4;

#[derive(Clone, Copy, Debug)]
struct Entry {
    key: u64,
    score: i32,
    gen: u32,
}

#[derive(Default, Clone, Copy)]
struct Slot(Option<Entry>);

#[derive(Default, Clone)]
struct Bucket {
    slots: [Slot; WAYS],
}

pub struct EvalCache {
    buckets: Vec<Bucket>,
    gen: u32,
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::with_capacity_entries(1 << 16)
    }
}

impl EvalCache {
    pub fn with_capacity_entries(cap: usize) -> Self {
        let entries = cap.max(WAYS);
        let buckets = (entries + WAYS - 1) / WAYS;
        Self {
            buckets: vec![Bucket::default(); buckets],
            gen: 0,
        }
    }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len()
    }

    pub fn get(&self, key: u64) -> Option<i32> {
        let idx = self.bucket_index(key);
        for slot in &self.buckets[idx].slots {
            if let Some(e) = slot.0 {
                if e.key == key {
                    return Some(e.score);
                }
            }
        }
        None
    }

    /// Insert or overwrite. Re-evaluating a position yields the same score,
    /// so overwriting an existing key is idempotent.
    pub fn put(&mut self, key: u64, score: i32) {
        let idx = self.bucket_index(key);
        let entry = Entry {
            key,
            score,
            gen: self.gen,
        };
        let bucket = &mut self.buckets[idx];
        for slot in &mut bucket.slots {
            if let Some(cur) = slot.0 {
                if cur.key == key {
                    slot.0 = Some(entry);
                    return;
                }
            }
        }
        for slot in &mut bucket.slots {
            if slot.0.is_none() {
                slot.0 = Some(entry);
                return;
            }
        }
        // All ways full: evict the oldest generation.
        let mut victim = 0usize;
        let mut oldest = u32::MAX;
        for (i, slot) in bucket.slots.iter().enumerate() {
            if let Some(cur) = slot.0 {
                if cur.gen < oldest {
                    oldest = cur.gen;
                    victim = i;
                }
            }
        }
        bucket.slots[victim].0 = Some(entry);
    }

    pub fn bump_generation(&mut self) {
        self.gen = self.gen.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.slots.iter().filter(|s| s.0.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for b in &mut self.buckets {
            *b = Bucket::default();
        }
    }
}
