use rand::Rng;
use rand::rngs::{SmallRng, StdRng};
use std::collections::VecDeque;

/// Source of the two kinds of draws the engine needs.
///
/// Both bounds are inclusive. Sessions own their source, so a seeded generator
/// (or a [`ScriptedSource`]) replays a game exactly.
pub trait RandomSource {
    fn uniform_real(&mut self, low: f64, high: f64) -> f64;

    fn uniform_int(&mut self, low: u32, high: u32) -> u32;

    /// Uniform index in `0..len`.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick an index from an empty range");
        self.uniform_int(0, len as u32 - 1) as usize
    }
}

macro_rules! rng_source {
    ($($rng:ty),+ $(,)?) => {
        $(
            impl RandomSource for $rng {
                fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
                    if low >= high {
                        return low;
                    }
                    self.gen_range(low..=high)
                }

                fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
                    if low >= high {
                        return low;
                    }
                    self.gen_range(low..=high)
                }
            }
        )+
    };
}

rng_source!(StdRng, SmallRng);

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform_real(low, high)
    }

    fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        (**self).uniform_int(low, high)
    }
}

/// Replays fixed draws in order; used to pin exact hands and quotes in tests.
///
/// Panics when a queue runs dry or a scripted value falls outside the
/// requested bounds, since either means the script no longer matches the
/// sequence of draws the engine makes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    reals: VecDeque<f64>,
    ints: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reals(mut self, reals: impl IntoIterator<Item = f64>) -> Self {
        self.reals.extend(reals);
        self
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = u32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn push_reals(&mut self, reals: impl IntoIterator<Item = f64>) {
        self.reals.extend(reals);
    }

    pub fn push_ints(&mut self, ints: impl IntoIterator<Item = u32>) {
        self.ints.extend(ints);
    }

    pub fn is_exhausted(&self) -> bool {
        self.reals.is_empty() && self.ints.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_real(&mut self, low: f64, high: f64) -> f64 {
        let value = self
            .reals
            .pop_front()
            .unwrap_or_else(|| panic!("scripted source ran out of real draws for [{low}, {high}]"));
        assert!(
            (low..=high).contains(&value),
            "scripted real {value} outside [{low}, {high}]"
        );
        value
    }

    fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        let value = self
            .ints
            .pop_front()
            .unwrap_or_else(|| panic!("scripted source ran out of int draws for [{low}, {high}]"));
        assert!(
            (low..=high).contains(&value),
            "scripted int {value} outside [{low}, {high}]"
        );
        value
    }
}
