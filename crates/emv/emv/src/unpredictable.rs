//! Sources for the terminal unpredictable number (9F37)

/// Largest bound an unpredictable number is drawn under: the 32-bit range
pub const MAX_UNPREDICTABLE_BOUND: u64 = 1 << 32;

/// Supplies the unpredictable number sent with GET PROCESSING OPTIONS
pub trait UnpredictableNumberSource {
    /// Produce the next value, uniformly distributed in `0..bound`
    ///
    /// `bound` is between 1 and [`MAX_UNPREDICTABLE_BOUND`].
    fn next_below(&mut self, bound: u64) -> u64;
}

/// Draws from the thread-local random generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl UnpredictableNumberSource for ThreadRandom {
    fn next_below(&mut self, bound: u64) -> u64 {
        rand::random_range(0..bound)
    }
}

/// Always returns the same value, whatever the bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub u32);

impl UnpredictableNumberSource for Fixed {
    fn next_below(&mut self, _bound: u64) -> u64 {
        u64::from(self.0)
    }
}

impl<S: UnpredictableNumberSource + ?Sized> UnpredictableNumberSource for &mut S {
    fn next_below(&mut self, bound: u64) -> u64 {
        (**self).next_below(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_below_bound() {
        let mut source = ThreadRandom;
        for bound in [1, 2, 100, 10_000, MAX_UNPREDICTABLE_BOUND] {
            for _ in 0..64 {
                assert!(source.next_below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_fixed_ignores_bound() {
        let mut source = Fixed(87_654_321);
        assert_eq!(source.next_below(100), 87_654_321);
        assert_eq!((&mut source).next_below(MAX_UNPREDICTABLE_BOUND), 87_654_321);
    }
}
