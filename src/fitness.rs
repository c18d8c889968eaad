//! Fitness values and the fitness-function/scaler pairing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A totally ordered fitness value.
///
/// Phenotype ordering, equality and selection all go through
/// [`FitnessValue::total_cmp`], so implementations must provide a total order
/// even where `PartialOrd` alone cannot (floats: NaN sorts below every other
/// value, so failed evaluations lose every comparison).
pub trait FitnessValue:
    Clone + PartialEq + Send + Sync + Serialize + for<'de> Deserialize<'de>
{
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! ord_fitness {
    ($($t:ty),*) => {$(
        impl FitnessValue for $t {
            fn total_cmp(&self, other: &Self) -> Ordering {
                Ord::cmp(self, other)
            }
        }
    )*};
}

ord_fitness!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, String);

macro_rules! float_fitness {
    ($($t:ty),*) => {$(
        impl FitnessValue for $t {
            fn total_cmp(&self, other: &Self) -> Ordering {
                match (self.is_nan(), other.is_nan()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
                }
            }
        }
    )*};
}

float_fitness!(f32, f64);

/// The environment a genotype lives in: a pure fitness function paired with a
/// pure scaler applied to the raw result before comparison/selection.
///
/// Both closures must be referentially stable for the lifetime of any
/// [`crate::Phenotype`] holding this evaluator; memoization depends on it.
pub struct FitnessEvaluator<G, C> {
    fitness: Box<dyn Fn(&G) -> C + Send + Sync>,
    scale: Box<dyn Fn(&C) -> C + Send + Sync>,
}

impl<G, C> FitnessEvaluator<G, C> {
    pub fn new(
        fitness: impl Fn(&G) -> C + Send + Sync + 'static,
        scale: impl Fn(&C) -> C + Send + Sync + 'static,
    ) -> Self {
        Self {
            fitness: Box::new(fitness),
            scale: Box::new(scale),
        }
    }

    /// An evaluator whose scaled fitness is the raw fitness unchanged.
    pub fn unscaled(fitness: impl Fn(&G) -> C + Send + Sync + 'static) -> Self
    where
        C: Clone,
    {
        Self::new(fitness, |c: &C| c.clone())
    }

    /// Apply the fitness function to a genotype.
    pub fn raw(&self, genotype: &G) -> C {
        (self.fitness)(genotype)
    }

    /// Apply the scaler to a raw fitness value.
    pub fn scale(&self, raw: &C) -> C {
        (self.scale)(raw)
    }
}

impl<G, C> fmt::Debug for FitnessEvaluator<G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FitnessEvaluator").finish_non_exhaustive()
    }
}
