use crate::aggregator::SeriesAggregator;
use crate::Symbol;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to one symbol's aggregator. Each series has its own lock so folds on
/// unrelated symbols never contend.
pub(crate) type SeriesHandle = Arc<RwLock<SeriesAggregator>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(pub u32);

#[derive(Debug)]
pub(crate) struct SeriesSlot {
    pub symbol: Symbol,
    pub series: SeriesHandle,
}

/// Fixed-capacity slot arena. Capacity is the symbol budget: `alloc` fails once every
/// slot is taken, and `free` returns the slot for reuse.
#[derive(Debug)]
pub(crate) struct SeriesArena {
    slots: Box<[Option<SeriesSlot>]>,
    free: Vec<u32>,
}

impl SeriesArena {
    pub fn with_capacity(capacity: u32) -> Self {
        assert!(capacity > 0, "arena capacity must be > 0");
        let cap = capacity as usize;
        let mut free = Vec::with_capacity(cap);
        for i in (0..cap).rev() {
            free.push(i as u32);
        }
        Self { slots: (0..cap).map(|_| None).collect(), free }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn alloc(&mut self, symbol: Symbol, series: SeriesAggregator) -> Option<SlotId> {
        let idx = self.free.pop()?;
        let slot = &mut self.slots[idx as usize];
        debug_assert!(slot.is_none(), "allocating an in-use slot");
        *slot = Some(SeriesSlot { symbol, series: Arc::new(RwLock::new(series)) });
        Some(SlotId(idx))
    }

    pub fn free(&mut self, id: SlotId) -> Option<SeriesSlot> {
        let taken = self.slots.get_mut(id.0 as usize)?.take()?;
        self.free.push(id.0);
        Some(taken)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&SeriesSlot> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.len();
        let cap = self.slots.len();
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.free.clear();
        self.free.extend((0..cap as u32).rev());
        removed
    }
}
