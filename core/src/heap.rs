//! 4-ary min-heap stored in one buffer, plus the bounded top-k selection built on it.

use crate::{Error, Result};

const NUM_CHILDREN: usize = 4;
pub const DEFAULT_CAPACITY: usize = 20;

/// Min-heap over a complete 4-ary tree.
///
/// Positions are 1-based: the root is position 1, the parent of `i` is `(i + 2) / 4` and its
/// children are `4i - 2 ..= 4i + 1`. Position `i` lives at `items[i - 1]`.
#[derive(Debug, Clone)]
pub struct ArrayHeap<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Ord> ArrayHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::with_capacity(DEFAULT_CAPACITY), capacity: DEFAULT_CAPACITY }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, item: T) {
        if self.items.len() == self.capacity {
            let grown = self.capacity * NUM_CHILDREN;
            self.items.reserve_exact(grown - self.items.len());
            self.capacity = grown;
        }
        self.items.push(item);
        self.percolate_up(self.items.len());
    }

    /// Inserts a possibly absent item; `None` is rejected with `InvalidArgument`.
    pub fn try_insert(&mut self, item: Option<T>) -> Result<()> {
        let item = item.ok_or_else(|| Error::invalid("cannot insert an absent item into a heap"))?;
        self.insert(item);
        Ok(())
    }

    pub fn peek_min(&self) -> Result<&T> {
        self.items.first().ok_or(Error::EmptyContainer)
    }

    pub fn remove_min(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(Error::EmptyContainer);
        }
        let min = self.items.swap_remove(0);
        self.percolate_down(1);
        Ok(min)
    }

    fn value(&self, pos: usize) -> &T {
        &self.items[pos - 1]
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a - 1, b - 1);
    }

    fn percolate_up(&mut self, mut pos: usize) {
        while pos > 1 {
            let parent = (pos + 2) / NUM_CHILDREN;
            if self.value(pos) >= self.value(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn percolate_down(&mut self, mut pos: usize) {
        let size = self.items.len();
        loop {
            let first = NUM_CHILDREN * pos - 2;
            if first > size {
                break;
            }
            let last = (NUM_CHILDREN * pos + 1).min(size);
            let mut smallest = first;
            for child in first + 1..=last {
                if self.value(child) < self.value(smallest) {
                    smallest = child;
                }
            }
            if self.value(pos) <= self.value(smallest) {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

impl<T: Ord> Default for ArrayHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the `k` largest items in ascending order.
///
/// Keeps at most `k` items in a min-heap, so memory stays `O(k)` however long `items` is.
pub fn top_k_sort<T, I>(k: usize, items: I) -> Vec<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    if k == 0 {
        return Vec::new();
    }
    let mut heap: ArrayHeap<T> = ArrayHeap::new();
    for item in items {
        if heap.len() < k {
            heap.insert(item);
        } else if heap.peek_min().is_ok_and(|min| item > *min) {
            let _ = heap.remove_min();
            heap.insert(item);
        }
    }
    let mut sorted = Vec::with_capacity(heap.len());
    while let Ok(item) = heap.remove_min() {
        sorted.push(item);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_in_ascending_order() {
        let mut heap: ArrayHeap<i32> = ArrayHeap::new();
        for v in [5, 3, 9, 1, 7, 3, 0, 12, 8, 2, 6] {
            heap.insert(v);
        }
        assert_eq!(heap.len(), 11);
        assert_eq!(heap.peek_min(), Ok(&0));
        let mut out = Vec::new();
        while let Ok(v) = heap.remove_min() {
            out.push(v);
        }
        assert_eq!(out, vec![0, 1, 2, 3, 3, 5, 6, 7, 8, 9, 12]);
        assert!(heap.is_empty());
    }

    #[test]
    fn empty_heap_errors() {
        let mut heap: ArrayHeap<u32> = ArrayHeap::new();
        assert_eq!(heap.peek_min(), Err(Error::EmptyContainer));
        assert_eq!(heap.remove_min(), Err(Error::EmptyContainer));
    }

    #[test]
    fn absent_item_is_rejected() {
        let mut heap: ArrayHeap<u32> = ArrayHeap::new();
        assert!(matches!(heap.try_insert(None), Err(Error::InvalidArgument(_))));
        assert!(heap.is_empty());
        heap.try_insert(Some(4)).unwrap();
        assert_eq!(heap.peek_min(), Ok(&4));
    }

    #[test]
    fn grows_by_four_and_keeps_order() {
        let mut heap: ArrayHeap<usize> = ArrayHeap::new();
        for v in (0..DEFAULT_CAPACITY + 1).rev() {
            heap.insert(v);
        }
        assert_eq!(heap.capacity(), DEFAULT_CAPACITY * 4);
        for expected in 0..=DEFAULT_CAPACITY {
            assert_eq!(heap.remove_min(), Ok(expected));
        }
    }

    #[test]
    fn top_k_picks_largest() {
        let top = top_k_sort(5, 0..20);
        assert_eq!(top, vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn top_k_with_k_at_or_above_len() {
        assert_eq!(top_k_sort(20, (0..20).rev()), (0..20).collect::<Vec<_>>());
        assert_eq!(top_k_sort(25, vec![3, 1, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn top_k_zero_is_empty() {
        assert!(top_k_sort(0, vec![1, 2, 3]).is_empty());
    }
}
