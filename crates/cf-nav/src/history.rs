use cf_core::TabKey;

/// Append-only record of the tabs visited during one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabHistory {
    entries: Vec<TabKey>,
}

impl TabHistory {
    pub fn new(initial: TabKey) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn push(&mut self, tab: TabKey) -> &[TabKey] {
        self.entries.push(tab);
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent `n` entries, oldest first.
    pub fn last_n(&self, n: usize) -> &[TabKey] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<TabKey> {
        self.entries.last().copied()
    }

    pub fn previous(&self) -> Option<TabKey> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        self.entries.get(len - 2).copied()
    }

    pub fn as_slice(&self) -> &[TabKey] {
        &self.entries
    }
}
