// random source used by every layout stage
// any rand::Rng works, tests can plug in scripted draws

use rand::Rng;

pub trait LayoutRng {
    /// Uniform integer in `[low, high]`, both ends inclusive.
    fn rand_int(&mut self, low: i32, high: i32) -> i32;

    /// Uniform float in `[-spread / 2, spread / 2)`.
    fn rand_spread(&mut self, spread: f32) -> f32;
}

impl<R: Rng + ?Sized> LayoutRng for R {
    fn rand_int(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.random_range(low..=high)
    }

    fn rand_spread(&mut self, spread: f32) -> f32 {
        let half = spread * 0.5;
        if !(half > 0.0) {
            return 0.0;
        }
        self.random_range(-half..half)
    }
}

#[cfg(test)]
pub mod scripted {
    use std::collections::VecDeque;

    use super::LayoutRng;

    /// Replays fixed draws in order, falling back to the range start when empty.
    #[derive(Default)]
    pub struct ScriptedRng {
        pub ints: VecDeque<i32>,
        pub spreads: VecDeque<f32>,
    }

    impl ScriptedRng {
        pub fn new(ints: &[i32], spreads: &[f32]) -> Self {
            Self {
                ints: ints.iter().copied().collect(),
                spreads: spreads.iter().copied().collect(),
            }
        }
    }

    impl LayoutRng for ScriptedRng {
        fn rand_int(&mut self, low: i32, high: i32) -> i32 {
            self.ints.pop_front().unwrap_or(low).clamp(low, high)
        }

        fn rand_spread(&mut self, spread: f32) -> f32 {
            let half = spread * 0.5;
            self.spreads.pop_front().unwrap_or(-half)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn int_draws_stay_inclusive() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let value = rng.rand_int(0, 3);
            assert!((0..=3).contains(&value));
            seen[value as usize] = true;
        }
        // upper bound is reachable
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn degenerate_int_range_returns_low() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(rng.rand_int(2, 2), 2);
        assert_eq!(rng.rand_int(5, 1), 5);
    }

    #[test]
    fn spread_is_half_open_and_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let value = rng.rand_spread(200.0);
            assert!((-100.0..100.0).contains(&value));
        }
        assert_eq!(rng.rand_spread(0.0), 0.0);
    }
}
