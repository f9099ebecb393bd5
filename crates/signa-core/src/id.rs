//! Request generation tokens
//!
//! Every outbound request carries the generation it was issued under.
//! A response is only applied if its generation is still the newest one,
//! so a slow response can never overwrite a fresher result.

use std::fmt;

/// Generation token attached to one request
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    #[inline]
    pub fn new(value: u64) -> Self {
        Generation(value)
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen({})", self.0)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of generations.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation; it becomes the only current one.
    pub fn advance(&mut self) -> Generation {
        self.current = Generation(self.current.0 + 1);
        self.current
    }

    /// The newest generation issued so far
    pub fn current(&self) -> Generation {
        self.current
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_advances() {
        let mut counter = GenerationCounter::new();
        assert_eq!(counter.current(), Generation::ZERO);

        let first = counter.advance();
        let second = counter.advance();

        assert!(second > first);
        assert!(counter.is_current(second));
        assert!(!counter.is_current(first));
    }
}
