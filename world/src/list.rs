//! Doubly linked lists threaded through a shared, bounded node arena.
//!
//! Several [`ListHead`]s may share one [`NodeArena`]; every node belongs to
//! at most one list at a time. Handles carry a generation so a handle to a
//! freed slot never aliases the slot's next occupant.

/// Stable, generation-checked reference to a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

impl NodeHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the arena.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    fn slot(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug)]
struct Node<T> {
    value: Option<T>,
    prev: Option<u32>,
    next: Option<u32>,
    generation: u32,
}

/// Head, tail and cached length of one list threaded through an arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListHead {
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl ListHead {
    /// Number of nodes in the list.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the list holds no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Slab of list nodes with a hard slot limit.
#[derive(Clone, Debug)]
pub struct NodeArena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<u32>,
    limit: usize,
    live: usize,
}

impl<T> NodeArena<T> {
    /// Creates an empty arena holding at most `limit` live nodes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            limit,
            live: 0,
        }
    }

    /// Number of live nodes across every list.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Reports whether every slot is in use.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.live >= self.limit
    }

    /// Value behind a live handle.
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        let node = self.nodes.get(handle.slot())?;
        if node.generation != handle.generation {
            return None;
        }
        node.value.as_ref()
    }

    /// Mutable value behind a live handle.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        let node = self.nodes.get_mut(handle.slot())?;
        if node.generation != handle.generation {
            return None;
        }
        node.value.as_mut()
    }

    /// Reports whether the handle refers to a live node.
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Stores `value` at the head of `list`. Returns `None` when the arena is full.
    pub fn insert_head(&mut self, list: &mut ListHead, value: T) -> Option<NodeHandle> {
        let handle = self.allocate(value)?;
        self.link_head(list, handle.index);
        Some(handle)
    }

    /// Stores `value` at the tail of `list`. Returns `None` when the arena is full.
    pub fn insert_tail(&mut self, list: &mut ListHead, value: T) -> Option<NodeHandle> {
        let handle = self.allocate(value)?;
        let index = handle.index;
        let node = &mut self.nodes[index as usize];
        node.prev = list.tail;
        node.next = None;
        match list.tail {
            Some(tail) => self.nodes[tail as usize].next = Some(index),
            None => list.head = Some(index),
        }
        list.tail = Some(index);
        list.len += 1;
        Some(handle)
    }

    /// Frees the first node of `list` and returns its value.
    pub fn remove_head(&mut self, list: &mut ListHead) -> Option<T> {
        let handle = self.handle_at(list.head?)?;
        self.remove(list, handle)
    }

    /// Frees the last node of `list` and returns its value.
    pub fn remove_tail(&mut self, list: &mut ListHead) -> Option<T> {
        let handle = self.handle_at(list.tail?)?;
        self.remove(list, handle)
    }

    /// Unlinks and frees a node of `list`. Stale handles yield `None`.
    ///
    /// The handle must belong to `list`; passing a node of another list
    /// corrupts both lists' links.
    pub fn remove(&mut self, list: &mut ListHead, handle: NodeHandle) -> Option<T> {
        if !self.unlink(list, handle) {
            return None;
        }

        let node = &mut self.nodes[handle.slot()];
        let value = node.value.take();
        node.generation = node.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        value
    }

    /// Detaches a live node from `list` without freeing it.
    pub fn unlink(&mut self, list: &mut ListHead, handle: NodeHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }

        let (prev, next) = {
            let node = &self.nodes[handle.slot()];
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.nodes[prev as usize].next = next,
            None => list.head = next,
        }
        match next {
            Some(next) => self.nodes[next as usize].prev = prev,
            None => list.tail = prev,
        }

        let node = &mut self.nodes[handle.slot()];
        node.prev = None;
        node.next = None;
        list.len -= 1;
        true
    }

    /// Attaches a detached live node to the head of `list`.
    pub fn relink_head(&mut self, list: &mut ListHead, handle: NodeHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.link_head(list, handle.index);
        true
    }

    /// Handle of the first node of `list`.
    #[must_use]
    pub fn first(&self, list: &ListHead) -> Option<NodeHandle> {
        self.handle_at(list.head?)
    }

    /// Handle following `handle` in its list.
    #[must_use]
    pub fn next_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let node = self.nodes.get(handle.slot())?;
        if node.generation != handle.generation {
            return None;
        }
        self.handle_at(node.next?)
    }

    /// Iterates `list` from head to tail.
    pub fn iter<'a>(&'a self, list: &ListHead) -> ListIter<'a, T> {
        ListIter {
            arena: self,
            cursor: self.first(list),
        }
    }

    fn handle_at(&self, index: u32) -> Option<NodeHandle> {
        let node = self.nodes.get(index as usize)?;
        Some(NodeHandle::new(index, node.generation))
    }

    fn allocate(&mut self, value: T) -> Option<NodeHandle> {
        if self.is_exhausted() {
            return None;
        }

        let index = match self.free.pop() {
            Some(index) => {
                self.nodes[index as usize].value = Some(value);
                index
            }
            None => {
                let index = u32::try_from(self.nodes.len()).ok()?;
                self.nodes.push(Node {
                    value: Some(value),
                    prev: None,
                    next: None,
                    generation: 0,
                });
                index
            }
        };
        self.live += 1;
        self.handle_at(index)
    }

    fn link_head(&mut self, list: &mut ListHead, index: u32) {
        let node = &mut self.nodes[index as usize];
        node.prev = None;
        node.next = list.head;
        match list.head {
            Some(head) => self.nodes[head as usize].prev = Some(index),
            None => list.tail = Some(index),
        }
        list.head = Some(index);
        list.len += 1;
    }
}

/// Iterator over the handles and values of one list, head to tail.
#[derive(Debug)]
pub struct ListIter<'a, T> {
    arena: &'a NodeArena<T>,
    cursor: Option<NodeHandle>,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = (NodeHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        self.cursor = self.arena.next_of(handle);
        self.arena.get(handle).map(|value| (handle, value))
    }
}

/// Self-contained list owning its own arena, used for towers.
#[derive(Clone, Debug)]
pub struct IntrusiveList<T> {
    arena: NodeArena<T>,
    head: ListHead,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list holding at most `limit` values.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            arena: NodeArena::new(limit),
            head: ListHead::default(),
        }
    }

    /// Number of stored values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.head.len()
    }

    /// Reports whether no further value fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.arena.is_exhausted()
    }

    /// Prepends a value. Returns `None` when the list is full.
    pub fn insert_head(&mut self, value: T) -> Option<NodeHandle> {
        self.arena.insert_head(&mut self.head, value)
    }

    /// Appends a value. Returns `None` when the list is full.
    pub fn insert_tail(&mut self, value: T) -> Option<NodeHandle> {
        self.arena.insert_tail(&mut self.head, value)
    }

    /// Removes and returns the first value.
    pub fn remove_head(&mut self) -> Option<T> {
        self.arena.remove_head(&mut self.head)
    }

    /// Removes and returns the last value.
    pub fn remove_tail(&mut self) -> Option<T> {
        self.arena.remove_tail(&mut self.head)
    }

    /// Removes a value by handle. Stale handles yield `None`.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<T> {
        self.arena.remove(&mut self.head, handle)
    }

    /// Value behind a live handle.
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        self.arena.get(handle)
    }

    /// Mutable value behind a live handle.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.arena.get_mut(handle)
    }

    /// Iterates values in insertion order.
    pub fn iter(&self) -> ListIter<'_, T> {
        self.arena.iter(&self.head)
    }

    /// Replaces the contents of `out` with every live handle in order.
    pub fn handles_into(&self, out: &mut Vec<NodeHandle>) {
        out.clear();
        out.extend(self.iter().map(|(handle, _)| handle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Copy>(arena: &NodeArena<T>, list: &ListHead) -> Vec<T> {
        arena.iter(list).map(|(_, value)| *value).collect()
    }

    #[test]
    fn head_and_tail_inserts_keep_order() {
        let mut arena = NodeArena::new(8);
        let mut list = ListHead::default();
        let _ = arena.insert_tail(&mut list, 2);
        let _ = arena.insert_head(&mut list, 1);
        let _ = arena.insert_tail(&mut list, 3);
        assert_eq!(values(&arena, &list), vec![1, 2, 3]);
        assert_eq!(list.len(), 3);

        assert_eq!(arena.remove_head(&mut list), Some(1));
        assert_eq!(arena.remove_tail(&mut list), Some(3));
        assert_eq!(values(&arena, &list), vec![2]);
    }

    #[test]
    fn removing_from_an_empty_list_reports_nothing() {
        let mut arena: NodeArena<u8> = NodeArena::new(2);
        let mut list = ListHead::default();
        assert_eq!(arena.remove_head(&mut list), None);
        assert_eq!(arena.remove_tail(&mut list), None);
    }

    #[test]
    fn arbitrary_removal_relinks_neighbours() {
        let mut arena = NodeArena::new(8);
        let mut list = ListHead::default();
        let handles: Vec<NodeHandle> = (0..4)
            .filter_map(|value| arena.insert_tail(&mut list, value))
            .collect();

        assert_eq!(arena.remove(&mut list, handles[1]), Some(1));
        assert_eq!(arena.remove(&mut list, handles[3]), Some(3));
        assert_eq!(values(&arena, &list), vec![0, 2]);
        assert_eq!(arena.next_of(handles[0]), Some(handles[2]));
        assert_eq!(arena.next_of(handles[2]), None);
    }

    #[test]
    fn stale_handles_are_rejected_after_reuse() {
        let mut arena = NodeArena::new(1);
        let mut list = ListHead::default();
        let first = arena.insert_head(&mut list, 'a').expect("slot");
        assert_eq!(arena.remove(&mut list, first), Some('a'));

        let second = arena.insert_head(&mut list, 'b').expect("slot");
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.remove(&mut list, first), None);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn exhausted_arena_leaves_the_list_unchanged() {
        let mut arena = NodeArena::new(2);
        let mut list = ListHead::default();
        assert!(arena.insert_head(&mut list, 1).is_some());
        assert!(arena.insert_head(&mut list, 2).is_some());
        assert!(arena.insert_head(&mut list, 3).is_none());
        assert_eq!(list.len(), 2);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn lists_sharing_an_arena_stay_disjoint() {
        let mut arena = NodeArena::new(8);
        let mut left = ListHead::default();
        let mut right = ListHead::default();
        let moved = arena.insert_head(&mut left, 10).expect("slot");
        let _ = arena.insert_head(&mut left, 11);
        let _ = arena.insert_head(&mut right, 20);

        assert!(arena.unlink(&mut left, moved));
        assert!(arena.relink_head(&mut right, moved));
        assert_eq!(values(&arena, &left), vec![11]);
        assert_eq!(values(&arena, &right), vec![10, 20]);
        assert_eq!(arena.get(moved), Some(&10));
    }

    #[test]
    fn intrusive_list_capturing_next_survives_removal() {
        let mut list = IntrusiveList::new(8);
        for value in 0..5 {
            let _ = list.insert_tail(value);
        }

        let mut handles = Vec::new();
        list.handles_into(&mut handles);
        for handle in handles {
            if list.get(handle).is_some_and(|value| value % 2 == 1) {
                let _ = list.remove(handle);
            }
        }
        let remaining: Vec<i32> = list.iter().map(|(_, value)| *value).collect();
        assert_eq!(remaining, vec![0, 2, 4]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn intrusive_list_works_from_both_ends() {
        let mut list = IntrusiveList::new(3);
        let _ = list.insert_tail('b');
        let _ = list.insert_head('a');
        let _ = list.insert_tail('c');
        assert!(list.is_full());
        assert_eq!(list.insert_head('z'), None);

        assert_eq!(list.remove_head(), Some('a'));
        assert_eq!(list.remove_tail(), Some('c'));
        assert_eq!(list.remove_tail(), Some('b'));
        assert_eq!(list.remove_head(), None);
        assert_eq!(list.len(), 0);
    }
}
