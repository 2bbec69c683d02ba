// ring buffer of Option<DroneId>: Dead tombstones every occurrence of a
// drone id in O(capacity) instead of a Vec retain-based O(n) compaction,
// and dequeue skips tombstones as it walks

use crate::message::DroneId;

pub struct WaitQueue {
    slots: Vec<Option<DroneId>>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl WaitQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity + 1],
            head: 0,
            tail: 0,
            capacity: capacity + 1,
        }
    }

    pub fn enqueue(&mut self, id: DroneId) -> bool {
        let next = (self.tail + 1) % self.capacity;
        if next == self.head {
            return false;
        }
        self.slots[self.tail] = Some(id);
        self.tail = next;
        true
    }

    pub fn dequeue(&mut self) -> Option<DroneId> {
        while self.head != self.tail {
            let slot = self.slots[self.head].take();
            self.head = (self.head + 1) % self.capacity;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    pub fn invalidate(&mut self, id: DroneId) {
        let mut i = self.head;
        while i != self.tail {
            if self.slots[i] == Some(id) {
                self.slots[i] = None;
            }
            i = (i + 1) % self.capacity;
        }
    }

    pub fn is_empty(&self) -> bool {
        let mut i = self.head;
        while i != self.tail {
            if self.slots[i].is_some() {
                return false;
            }
            i = (i + 1) % self.capacity;
        }
        true
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WaitKind {
    Landing,
    Takeoff,
}

pub struct WaitQueues {
    landing: WaitQueue,
    takeoff: WaitQueue,
}

impl WaitQueues {
    pub fn new(capacity: usize) -> Self {
        Self {
            landing: WaitQueue::new(capacity),
            takeoff: WaitQueue::new(capacity),
        }
    }

    pub fn enqueue(&mut self, kind: WaitKind, id: DroneId) -> bool {
        self.queue_mut(kind).enqueue(id)
    }

    pub fn dequeue(&mut self, kind: WaitKind) -> Option<DroneId> {
        self.queue_mut(kind).dequeue()
    }

    pub fn is_empty(&self, kind: WaitKind) -> bool {
        match kind {
            WaitKind::Landing => self.landing.is_empty(),
            WaitKind::Takeoff => self.takeoff.is_empty(),
        }
    }

    pub fn invalidate(&mut self, id: DroneId) {
        self.landing.invalidate(id);
        self.takeoff.invalidate(id);
    }

    fn queue_mut(&mut self, kind: WaitKind) -> &mut WaitQueue {
        match kind {
            WaitKind::Landing => &mut self.landing,
            WaitKind::Takeoff => &mut self.takeoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mut q = WaitQueue::new(4);
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn invalidate_skips_tombstones_on_dequeue() {
        let mut q = WaitQueue::new(4);
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);
        q.invalidate(2);
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn full_queue_rejects_enqueue() {
        let mut q = WaitQueue::new(2);
        assert!(q.enqueue(1));
        assert!(q.enqueue(2));
        assert!(!q.enqueue(3));
    }

    #[test]
    fn invalidate_across_both_queues() {
        let mut qs = WaitQueues::new(4);
        qs.enqueue(WaitKind::Landing, 7);
        qs.enqueue(WaitKind::Takeoff, 7);
        qs.invalidate(7);
        assert_eq!(qs.dequeue(WaitKind::Landing), None);
        assert_eq!(qs.dequeue(WaitKind::Takeoff), None);
    }
}
