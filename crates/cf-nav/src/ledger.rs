use cf_core::TabKey;

/// Per-tab unread counters. Every canonical tab always has an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationLedger {
    counts: [u32; TabKey::ALL.len()],
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tab: TabKey) -> u32 {
        self.counts[tab.ordinal()]
    }

    /// Adds `delta` (which may be negative) and clamps the result at zero.
    pub fn increment(&mut self, tab: TabKey, delta: i64) -> u32 {
        let next = i64::from(self.get(tab)) + delta;
        self.set_value(tab, next)
    }

    pub fn bump(&mut self, tab: TabKey) -> u32 {
        self.increment(tab, 1)
    }

    pub fn set_value(&mut self, tab: TabKey, value: i64) -> u32 {
        let clamped = value.clamp(0, i64::from(u32::MAX)) as u32;
        self.counts[tab.ordinal()] = clamped;
        clamped
    }

    pub fn clear(&mut self, tab: TabKey) {
        self.set_value(tab, 0);
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|count| u64::from(*count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TabKey, u32)> + '_ {
        TabKey::ALL.iter().map(|tab| (*tab, self.get(*tab)))
    }
}
