//! The phenotype: a genotype bound to its fitness-evaluation context.
//!
//! A [`Phenotype`] pairs an owned genotype with a shared
//! [`FitnessEvaluator`] and the generation it was created in. The pairing is
//! immutable; the only state transition it ever undergoes is the one-time
//! publication of its memoized fitness pair, and that transition is safe
//! under concurrent first access.
//!
//! # Laziness and memoization
//!
//! Fitness is not computed at construction. The first call to
//! [`Phenotype::evaluate`] (or anything that forces it: [`Phenotype::fitness`],
//! [`Phenotype::raw_fitness`], comparison, equality) runs the fitness
//! function once, scales the result, and publishes both values atomically
//! through a [`OnceLock`]. Racing callers either perform that single
//! computation or block and observe the completed pair; the fitness function
//! runs at most once per phenotype. A panicking fitness function leaves the
//! cell unset, so the phenotype stays retryable.
//!
//! # Example
//!
//! ```rust
//! use evocore::{FitnessEvaluator, Genotype, Phenotype};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
//! struct Knob(f64);
//! impl Genotype for Knob {}
//!
//! let eval = Arc::new(FitnessEvaluator::new(|g: &Knob| g.0, |c| c * 2.0));
//! let pt = Phenotype::new(Knob(4.2), eval, 0).unwrap();
//! assert_eq!(*pt.raw_fitness(), 4.2);
//! assert_eq!(*pt.fitness(), 8.4);
//! ```

use crate::error::PhenotypeError;
use crate::fitness::{FitnessEvaluator, FitnessValue};
use crate::Genotype;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Raw and scaled fitness, published together so a reader never observes one
/// without the other.
#[derive(Clone, Debug)]
struct Memo<C> {
    raw: C,
    scaled: C,
}

/// An individual: a genotype, the evaluator that judges it, and the
/// generation it was born in.
///
/// Ordering, equality and hashing are structural over
/// (scaled fitness, raw fitness, genotype, generation) and force evaluation
/// if it has not happened yet. Callers that want to avoid triggering a
/// possibly expensive fitness function can check [`Phenotype::is_evaluated`]
/// first.
#[derive(Clone, Debug)]
pub struct Phenotype<G: Genotype, C: FitnessValue> {
    genotype: G,
    evaluator: Arc<FitnessEvaluator<G, C>>,
    generation: i64,
    memo: OnceLock<Memo<C>>,
}

impl<G: Genotype, C: FitnessValue> Phenotype<G, C> {
    /// Create a phenotype with unset fitness.
    ///
    /// Fails with [`PhenotypeError::NegativeGeneration`] if `generation < 0`.
    pub fn new(
        genotype: G,
        evaluator: Arc<FitnessEvaluator<G, C>>,
        generation: i64,
    ) -> Result<Self, PhenotypeError> {
        if generation < 0 {
            return Err(PhenotypeError::NegativeGeneration(generation));
        }
        Ok(Self {
            genotype,
            evaluator,
            generation,
            memo: OnceLock::new(),
        })
    }

    /// Convenience constructor building the evaluator from plain closures.
    pub fn of(
        genotype: G,
        fitness: impl Fn(&G) -> C + Send + Sync + 'static,
        scale: impl Fn(&C) -> C + Send + Sync + 'static,
        generation: i64,
    ) -> Result<Self, PhenotypeError> {
        Self::new(
            genotype,
            Arc::new(FitnessEvaluator::new(fitness, scale)),
            generation,
        )
    }

    /// Read-only view of the owned genotype.
    pub fn genotype(&self) -> &G {
        &self.genotype
    }

    /// The generation this phenotype was created in. Never negative.
    pub fn generation(&self) -> i64 {
        self.generation
    }

    /// The shared evaluator judging this phenotype.
    pub fn evaluator(&self) -> &Arc<FitnessEvaluator<G, C>> {
        &self.evaluator
    }

    /// Age relative to `current_generation`. No validation: a caller asking
    /// about a generation before this phenotype's birth gets a negative age.
    pub fn age(&self, current_generation: i64) -> i64 {
        current_generation - self.generation
    }

    /// Delegates to the genotype's own validity predicate.
    pub fn is_valid(&self) -> bool {
        self.genotype.is_valid()
    }

    fn memoized(&self) -> &Memo<C> {
        self.memo.get_or_init(|| {
            log::trace!(
                "evaluating phenotype born in generation {}",
                self.generation
            );
            let raw = self.evaluator.raw(&self.genotype);
            let scaled = self.evaluator.scale(&raw);
            Memo { raw, scaled }
        })
    }

    /// Compute and cache the raw and scaled fitness.
    ///
    /// Idempotent, and safe to race from many threads on the same instance:
    /// exactly one caller runs the fitness function, the rest block until the
    /// pair is published. If the fitness function panics, nothing is cached
    /// and the panic propagates to the caller that ran it.
    pub fn evaluate(&self) {
        self.memoized();
    }

    /// Whether fitness has already been computed. Never triggers evaluation.
    pub fn is_evaluated(&self) -> bool {
        self.memo.get().is_some()
    }

    /// Scaled fitness; evaluates first if needed.
    pub fn fitness(&self) -> &C {
        &self.memoized().scaled
    }

    /// Raw (pre-scaling) fitness; evaluates first if needed.
    pub fn raw_fitness(&self) -> &C {
        &self.memoized().raw
    }

    /// Total order by scaled fitness. Forces evaluation of both sides.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.fitness().total_cmp(other.fitness())
    }

    /// A new phenotype sharing this genotype, re-tagged with a different
    /// evaluator and generation. Memoized fitness is reset: the result
    /// reflects the new evaluator, not this one's cached values.
    pub fn with_evaluator(
        &self,
        evaluator: Arc<FitnessEvaluator<G, C>>,
        generation: i64,
    ) -> Result<Self, PhenotypeError> {
        Self::new(self.genotype.clone(), evaluator, generation)
    }

    /// A new phenotype with this evaluator but a different genotype, born in
    /// `generation`. The usual way offspring inherit their parents'
    /// environment.
    pub fn with_genotype(&self, genotype: G, generation: i64) -> Result<Self, PhenotypeError> {
        Self::new(genotype, self.evaluator.clone(), generation)
    }

    /// Copy out a serializable record of this phenotype. Forces evaluation so
    /// the record always carries both fitness values.
    pub fn snapshot(&self) -> PhenotypeRecord<G, C> {
        let memo = self.memoized();
        PhenotypeRecord {
            generation: self.generation,
            fitness: memo.scaled.clone(),
            raw_fitness: memo.raw.clone(),
            genotype: self.genotype.clone(),
        }
    }

    /// Rebuild a phenotype from a stored record.
    ///
    /// The recorded fitness values are installed as already-memoized, so
    /// loading never re-runs the fitness function. The evaluator is still
    /// required: it serves later [`Phenotype::with_evaluator`] /
    /// [`Phenotype::with_genotype`] calls.
    pub fn from_record(
        record: PhenotypeRecord<G, C>,
        evaluator: Arc<FitnessEvaluator<G, C>>,
    ) -> Result<Self, PhenotypeError> {
        let pt = Self::new(record.genotype, evaluator, record.generation)?;
        let _ = pt.memo.set(Memo {
            raw: record.raw_fitness,
            scaled: record.fitness,
        });
        Ok(pt)
    }
}

impl<G: Genotype + PartialEq, C: FitnessValue> PartialEq for Phenotype<G, C> {
    fn eq(&self, other: &Self) -> bool {
        self.fitness() == other.fitness()
            && self.raw_fitness() == other.raw_fitness()
            && self.genotype == other.genotype
            && self.generation == other.generation
    }
}

impl<G: Genotype + Eq, C: FitnessValue + Eq> Eq for Phenotype<G, C> {}

impl<G: Genotype + PartialEq, C: FitnessValue> PartialOrd for Phenotype<G, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

/// Orders by scaled fitness alone, while `Eq` is structural: two unequal
/// phenotypes with equal fitness compare as `Ordering::Equal`. Containers
/// that treat `Equal` as identity (`BTreeMap` keys, `binary_search`) will
/// conflate such individuals; for sorting, [`Phenotype::compare`] and
/// [`by_fitness`] carry the same order without that caveat.
impl<G: Genotype + Eq, C: FitnessValue + Eq> Ord for Phenotype<G, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<G: Genotype + Hash, C: FitnessValue + Hash> Hash for Phenotype<G, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fitness().hash(state);
        self.raw_fitness().hash(state);
        self.genotype.hash(state);
        self.generation.hash(state);
    }
}

impl<G, C> fmt::Display for Phenotype<G, C>
where
    G: Genotype + fmt::Display,
    C: FitnessValue + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.genotype, self.fitness())
    }
}

/// Persisted form of a phenotype: generation, both fitness values and the
/// genotype's own serialized form. A document missing the genotype fails to
/// deserialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "G: Genotype, C: FitnessValue")]
pub struct PhenotypeRecord<G, C> {
    pub generation: i64,
    pub fitness: C,
    pub raw_fitness: C,
    pub genotype: G,
}

/// Comparator over scaled fitness, for `sort_by` and friends.
pub fn by_fitness<G: Genotype, C: FitnessValue>(
    a: &Phenotype<G, C>,
    b: &Phenotype<G, C>,
) -> Ordering {
    a.compare(b)
}

/// Key extractor returning each phenotype's age at `current_generation`.
pub fn age_at<G: Genotype, C: FitnessValue>(
    current_generation: i64,
) -> impl Fn(&Phenotype<G, C>) -> i64 {
    move |pt| pt.age(current_generation)
}

/// Evaluate every phenotype in the slice, in parallel when the `parallel`
/// feature is enabled. The entry point for worker-pool style evaluation of a
/// population of independent, expensive fitness computations.
pub fn evaluate_all<G: Genotype, C: FitnessValue>(population: &[Phenotype<G, C>]) {
    #[cfg(feature = "parallel")]
    population.par_iter().for_each(Phenotype::evaluate);
    #[cfg(not(feature = "parallel"))]
    for pt in population {
        pt.evaluate();
    }
}
