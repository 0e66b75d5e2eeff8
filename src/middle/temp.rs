use crate::index::{Index, simple_index};

simple_index! {
    /// Name of a compiler generated intermediate value, printed as `%N`
    pub struct TempId;
}

impl core::fmt::Display for TempId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.index())
    }
}

/// Hands out unique temporaries for one compilation unit.
///
/// Numbering is monotonic for the lifetime of the allocator: lowering several
/// programs with the same allocator continues the sequence instead of
/// restarting it. Call [`TempAllocator::reset`] (or make a new allocator) to
/// start again from `%0`.
#[derive(Debug, Default)]
pub struct TempAllocator {
    next: TempId,
}

impl Default for TempId {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TempAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh temporary. The instruction that defines it must be
    /// emitted before the next call so definition order matches numbering.
    pub fn allocate(&mut self) -> TempId {
        let temp = self.next;
        self.next.increment_by(1);
        temp
    }

    /// The temporary the next call to `allocate` will return
    pub fn peek(&self) -> TempId {
        self.next
    }

    pub fn allocated(&self) -> usize {
        self.next.index()
    }

    pub fn reset(&mut self) {
        self.next = TempId::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_increasing_names() {
        let mut temps = TempAllocator::new();

        assert_eq!(temps.allocate().to_string(), "%0");
        assert_eq!(temps.allocate().to_string(), "%1");
        assert_eq!(temps.peek().to_string(), "%2");
        assert_eq!(temps.allocated(), 2);
    }

    #[test]
    fn reset_restarts_numbering() {
        let mut temps = TempAllocator::new();
        temps.allocate();
        temps.allocate();

        temps.reset();

        assert_eq!(temps.allocated(), 0);
        assert_eq!(temps.allocate(), TempId::new(0));
    }
}
