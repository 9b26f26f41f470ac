use common::config::MAX_QUEUE_SIZE;

/// Bounded FIFO. Enqueueing into a full queue drops the element.
pub struct Queue<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_QUEUE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Queue {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn enqueue(&mut self, item: T) {
        if self.items.len() >= self.capacity {
            return;
        }
        self.items.push(item);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0))
    }

    pub fn empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}
