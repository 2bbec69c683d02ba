// `pending_removal` tracks slots that are logically destroyed but still
// physically occupied, consumed preferentially by future `release()` calls.
#[derive(Debug, Clone, Copy)]
pub struct Hangar {
    free: u32,
    capacity: u32,
    pending_removal: u32,
}

impl Hangar {
    pub fn new(capacity: u32) -> Self {
        Self {
            free: capacity,
            capacity,
            pending_removal: 0,
        }
    }

    pub fn try_reserve(&mut self) -> bool {
        if self.free > 0 {
            self.free -= 1;
            true
        } else {
            false
        }
    }

    // if a removal is owed, the slot is destroyed instead of becoming
    // available ("platform dismantled")
    pub fn release(&mut self) {
        if self.pending_removal > 0 {
            self.pending_removal -= 1;
        } else {
            self.free += 1;
        }
    }

    // bypasses pending-removal accounting for a reservation that never had
    // a removal owed against it (a failed grant send)
    pub fn release_bypass(&mut self) {
        self.free += 1;
    }

    pub fn free_slots(&self) -> u32 {
        self.free
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn pending_removal(&self) -> u32 {
        self.pending_removal
    }

    pub fn grow(&mut self, k: u32) {
        self.free += k;
        self.capacity += k;
    }

    // capacity drops by k immediately; free slots absorb what they can
    // right away and the remainder is owed against future release() calls
    pub fn request_shrink(&mut self, k: u32) {
        let immediate = k.min(self.free);
        self.free -= immediate;
        self.capacity -= k;
        self.pending_removal += k - immediate;
    }

    pub fn reset_free(&mut self, to: u32) {
        self.free = to;
    }
}
