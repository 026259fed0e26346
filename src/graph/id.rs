/// Issues unique, monotonically increasing node identifiers.
///
/// Prefixed and bare ids draw from the same counter, so `"voice-7"` and a
/// later bare `"8"` can never collide. The counter is only reset by the
/// explicit workspace-clear operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start above pre-seeded node ids (the stock editor seeds two demo
    /// nodes and starts counting at 3).
    pub fn with_seed(seed: u64) -> Self {
        Self { next: seed.max(1) }
    }

    pub fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_id(&mut self) -> String {
        self.next().to_string()
    }

    pub fn next_prefixed(&mut self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next())
    }

    /// Only the workspace-clear operation calls this, together with
    /// clearing the graph store and scene registry.
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
