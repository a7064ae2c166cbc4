/// Sequential politeness throttle: pause after every `every`-th item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    every: usize,
}

impl PacingPolicy {
    pub const DEFAULT_EVERY: usize = 3;

    /// `every == 0` never pauses.
    pub fn new(every: usize) -> Self {
        Self { every }
    }

    /// `index` is 1-based: the number of items processed so far.
    pub fn pauses_after(&self, index: usize) -> bool {
        self.every != 0 && index != 0 && index % self.every == 0
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EVERY)
    }
}
