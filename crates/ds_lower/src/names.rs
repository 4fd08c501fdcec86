//! Unique temporary names (`var$0`, `arg$1`, ...).

/// Hands out `prefix$N` names from one counter shared by every prefix.
///
/// Uniqueness holds for the lifetime of the allocator, or until [`reset`]
/// starts a new compilation unit.
///
/// [`reset`]: NameAllocator::reset
#[derive(Debug, Default)]
pub struct NameAllocator {
    next: usize,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}${}", self.next);
        self.next += 1;
        tracing::trace!(%name, "allocated temporary");
        name
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
