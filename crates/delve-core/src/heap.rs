//! Binary min-heap priority queue for the path search.

/// Binary min-heap of `(item, priority)` pairs.
///
/// `push` sifts up, `pop` swaps the last element into the root and sifts
/// down; both are O(log n). Ordering among equal priorities is NOT
/// first-in-first-out and callers must not rely on it: that looseness is
/// deliberate, it is one of the sources of run-to-run corridor shape
/// variance when the search enqueues tied candidates.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    heap: Vec<(T, i32)>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert an item with the given priority.
    pub fn push(&mut self, item: T, priority: i32) {
        self.heap.push((item, priority));
        let mut i = self.heap.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].1 <= self.heap[i].1 {
                break;
            }
            self.heap.swap(parent, i);
            i = parent;
        }
    }

    /// Remove and return the item with the smallest priority.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let (item, _) = self.heap.pop()?;
        self.sift_down(0);
        Some(item)
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = i * 2 + 1;
            let r = l + 1;
            let mut smallest = i;
            if l < self.heap.len() && self.heap[l].1 < self.heap[smallest].1 {
                smallest = l;
            }
            if r < self.heap.len() && self.heap[r].1 < self.heap[smallest].1 {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
