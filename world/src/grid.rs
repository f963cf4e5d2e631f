//! Uniform spatial grid whose buckets are lists threaded through one arena.
//!
//! Positions outside the playfield share a single sentinel bucket, so every
//! insert and remove is valid regardless of where an entity wandered.
//! Buckets are created lazily and registered in an active list that is the
//! only path used for enumeration.

use bloon_defence_core::{Position, SimulationConfig};

use crate::list::{ListHead, NodeArena, NodeHandle};

/// Spatial index over entities of type `T`.
#[derive(Clone, Debug)]
pub struct SpatialGrid<T> {
    arena: NodeArena<T>,
    buckets: Vec<Option<ListHead>>,
    active: Vec<usize>,
    total: usize,
    columns: i32,
    rows: i32,
    cell_size: i32,
    width: i32,
    height: i32,
}

impl<T> SpatialGrid<T> {
    /// Creates an empty grid covering the configured playfield.
    #[must_use]
    pub fn new(config: &SimulationConfig, slots: usize) -> Self {
        let columns = to_i32(config.columns());
        let rows = to_i32(config.rows());
        let cells = usize::try_from(columns)
            .unwrap_or_default()
            .saturating_mul(usize::try_from(rows).unwrap_or_default());
        Self {
            arena: NodeArena::new(slots),
            buckets: vec![None; cells + 1],
            active: Vec::new(),
            total: 0,
            columns,
            rows,
            cell_size: to_i32(config.cell_size).max(1),
            width: to_i32(config.width),
            height: to_i32(config.height),
        }
    }

    /// Index of the sentinel bucket that holds out-of-range positions.
    #[must_use]
    pub fn sentinel(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Bucket index for a position.
    #[must_use]
    pub fn cell_of(&self, position: Position) -> usize {
        let (x, y) = (position.x(), position.y());
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return self.sentinel();
        }

        let column = x / self.cell_size;
        let row = y / self.cell_size;
        usize::try_from(row * self.columns + column).unwrap_or_else(|_| self.sentinel())
    }

    /// Bucket for `position`, created and registered on first use.
    pub fn get_or_create(&mut self, position: Position) -> usize {
        let cell = self.cell_of(position);
        if self.buckets[cell].is_none() {
            self.buckets[cell] = Some(ListHead::default());
            self.active.push(cell);
        }
        cell
    }

    /// Bucket for `position` if it was already created.
    #[must_use]
    pub fn get_existing(&self, position: Position) -> Option<usize> {
        let cell = self.cell_of(position);
        self.buckets[cell].as_ref().map(|_| cell)
    }

    /// Pushes `value` to the head of its bucket.
    ///
    /// Returns `None` when every slot is in use; the grid is left unchanged.
    pub fn insert(&mut self, position: Position, value: T) -> Option<NodeHandle> {
        if self.arena.is_exhausted() {
            return None;
        }

        let cell = self.get_or_create(position);
        let list = self.buckets[cell].as_mut()?;
        let handle = self.arena.insert_head(list, value)?;
        self.total += 1;
        Some(handle)
    }

    /// Removes an entity from the bucket `position` maps to.
    ///
    /// Does nothing when that bucket was never created.
    pub fn remove(&mut self, position: Position, handle: NodeHandle) -> Option<T> {
        let cell = self.get_existing(position)?;
        let list = self.buckets[cell].as_mut()?;
        let before = list.len();
        let value = self.arena.remove(list, handle);
        self.total -= before - list.len();
        value
    }

    /// Moves an entity from `old_cell` to the bucket of `new_position`.
    ///
    /// The handle stays valid and the running total is unchanged. Returns
    /// the entity's bucket after the move.
    pub fn fix(&mut self, old_cell: usize, handle: NodeHandle, new_position: Position) -> usize {
        let new_cell = self.cell_of(new_position);
        if new_cell == old_cell {
            return old_cell;
        }

        let new_cell = self.get_or_create(new_position);
        let Some(old_list) = self.buckets.get_mut(old_cell).and_then(Option::as_mut) else {
            return old_cell;
        };
        if !self.arena.unlink(old_list, handle) {
            return old_cell;
        }
        if let Some(new_list) = self.buckets[new_cell].as_mut() {
            let _ = self.arena.relink_head(new_list, handle);
        }
        new_cell
    }

    /// Entity behind a live handle.
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.arena.get(handle)
    }

    /// Mutable entity behind a live handle.
    ///
    /// Callers that change the entity's position must [`fix`](Self::fix) it.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.arena.get_mut(handle)
    }

    /// Running count of entities across all buckets.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Reports whether no further entity fits.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.arena.is_exhausted()
    }

    /// Created buckets in creation order.
    #[must_use]
    pub fn active_buckets(&self) -> &[usize] {
        &self.active
    }

    /// Number of entities in a bucket, zero for uncreated buckets.
    #[must_use]
    pub fn bucket_len(&self, cell: usize) -> usize {
        self.buckets
            .get(cell)
            .and_then(Option::as_ref)
            .map_or(0, ListHead::len)
    }

    /// First entity of a bucket.
    #[must_use]
    pub fn first_in(&self, cell: usize) -> Option<NodeHandle> {
        let list = self.buckets.get(cell)?.as_ref()?;
        self.arena.first(list)
    }

    /// Entity following `handle` in its bucket.
    ///
    /// Capture this before removing `handle`.
    #[must_use]
    pub fn next_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.arena.next_of(handle)
    }

    /// Entities of one bucket, head to tail.
    pub fn bucket(&self, cell: usize) -> impl Iterator<Item = (NodeHandle, &T)> + '_ {
        self.buckets
            .get(cell)
            .and_then(Option::as_ref)
            .map(|list| self.arena.iter(list))
            .into_iter()
            .flatten()
    }

    /// Every entity, bucket by bucket in active order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &T)> + '_ {
        self.active.iter().flat_map(move |&cell| self.bucket(cell))
    }

    /// Replaces `out` with every live handle in enumeration order.
    pub fn handles_into(&self, out: &mut Vec<NodeHandle>) {
        out.clear();
        out.extend(self.iter().map(|(handle, _)| handle));
    }

    /// Existing buckets within `radius` cells of the cell holding `position`.
    ///
    /// Positions in the sentinel bucket only see the sentinel.
    pub fn neighborhood(&self, position: Position, radius: i32, out: &mut Vec<usize>) {
        out.clear();
        let cell = self.cell_of(position);
        if cell == self.sentinel() {
            if self.buckets[cell].is_some() {
                out.push(cell);
            }
            return;
        }

        let column = position.x() / self.cell_size;
        let row = position.y() / self.cell_size;
        self.collect_block(column - radius, row - radius, column + radius, row + radius, out);
    }

    /// Existing buckets overlapping the square of half-side `range` around `position`.
    ///
    /// The sentinel is included when the square leaves the playfield.
    pub fn buckets_in_range(&self, position: Position, range: i32, out: &mut Vec<usize>) {
        out.clear();
        let range = range.max(0);
        let (left, top) = (position.x() - range, position.y() - range);
        let (right, bottom) = (position.x() + range, position.y() + range);

        self.collect_block(
            left.div_euclid(self.cell_size),
            top.div_euclid(self.cell_size),
            right.div_euclid(self.cell_size),
            bottom.div_euclid(self.cell_size),
            out,
        );

        let leaves = left < 0 || top < 0 || right >= self.width || bottom >= self.height;
        let sentinel = self.sentinel();
        if leaves && self.buckets[sentinel].is_some() {
            out.push(sentinel);
        }
    }

    fn collect_block(&self, left: i32, top: i32, right: i32, bottom: i32, out: &mut Vec<usize>) {
        for row in top.max(0)..=bottom.min(self.rows - 1) {
            for column in left.max(0)..=right.min(self.columns - 1) {
                let Ok(cell) = usize::try_from(row * self.columns + column) else {
                    continue;
                };
                if self.buckets[cell].is_some() {
                    out.push(cell);
                }
            }
        }
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
