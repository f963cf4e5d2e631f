//! Fixed-capacity ring buffer of children held back by the population cap.

use crate::bloons::BloonSeed;

/// FIFO of deferred children that never grows past its capacity.
#[derive(Clone, Debug)]
pub(crate) struct SpawnQueue {
    slots: Vec<Option<BloonSeed>>,
    head: usize,
    len: usize,
}

impl SpawnQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Enqueues a child, handing it back when the buffer is full.
    pub(crate) fn push(&mut self, seed: BloonSeed) -> Result<(), BloonSeed> {
        let capacity = self.slots.len();
        if self.len == capacity {
            return Err(seed);
        }

        let tail = (self.head + self.len) % capacity;
        self.slots[tail] = Some(seed);
        self.len += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<BloonSeed> {
        if self.len == 0 {
            return None;
        }

        let seed = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        seed
    }

    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }
}
