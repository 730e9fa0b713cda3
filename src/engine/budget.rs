//! Per-drop file budget.

/// Harvested-file counter for one drop event, threaded by `&mut` through the coordinator.
///
/// Walkers never see this directly: they get [`remaining`](Self::remaining) as a limit and the
/// coordinator [`admit`](Self::admit)s what they return. Execution is sequential, so a plain
/// counter is enough; parallel walkers would need an atomic check-and-decrement instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalBudget {
    max: usize,
    used: usize,
}

impl TraversalBudget {
    pub fn new(max: usize) -> Self {
        Self { max, used: 0 }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        self.max - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Truncate `items` to what remains and charge the kept count. Returns how many were dropped.
    pub fn admit<T>(&mut self, items: &mut Vec<T>) -> usize {
        let keep = items.len().min(self.remaining());
        let dropped = items.len() - keep;
        items.truncate(keep);
        self.used += keep;
        dropped
    }
}
