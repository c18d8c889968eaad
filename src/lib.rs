//! Individual-representation core for evolutionary computation.
//!
//! This crate defines the data model that binds an encoded candidate solution
//! (a genotype) to its fitness, plus the bidirectional mapping between that
//! internal representation and a problem's native parameter space:
//!
//! - [`Phenotype`]: an immutable pairing of a genotype, a fitness evaluator
//!   and a birth generation, with lazy, memoized fitness evaluation that is
//!   safe under concurrent first access.
//! - [`Codec`]: an encoding factory plus a decoding transform, used to adapt
//!   arbitrary optimization problems onto a genotype representation.
//!
//! Selection, crossover, mutation and the generational loop live upstream;
//! they consume these contracts but are not defined here.

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod error;
pub mod fitness;
pub mod phenotype;

pub use codec::Codec;
pub use error::{DecodeError, PhenotypeError};
pub use fitness::{FitnessEvaluator, FitnessValue};
pub use phenotype::{Phenotype, PhenotypeRecord};

/// The encoded representation of a candidate solution.
/// Opaque to this crate: cloned, checked for validity, never mutated in place.
pub trait Genotype: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Whether this genotype satisfies its representation's own constraints.
    /// An invalid genotype is a normal outcome, not an error.
    fn is_valid(&self) -> bool {
        true
    }
}

// Composite genotypes, as produced by codec composition. Valid iff all
// components are valid.

impl<A: Genotype, B: Genotype> Genotype for (A, B) {
    fn is_valid(&self) -> bool {
        self.0.is_valid() && self.1.is_valid()
    }
}

impl<A: Genotype, B: Genotype, C: Genotype> Genotype for (A, B, C) {
    fn is_valid(&self) -> bool {
        self.0.is_valid() && self.1.is_valid() && self.2.is_valid()
    }
}

impl<G: Genotype> Genotype for Vec<G> {
    fn is_valid(&self) -> bool {
        self.iter().all(Genotype::is_valid)
    }
}
