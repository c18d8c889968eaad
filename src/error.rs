use thiserror::Error;

/// Construction-time violations for [`crate::Phenotype`].
///
/// Construction fails fast: no partially initialized phenotype is ever
/// observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhenotypeError {
    #[error("generation must not be negative: {0}")]
    NegativeGeneration(i64),
}

/// A codec's decoder received a genotype outside its defined domain.
///
/// Decoders are total over their own encoding's output space; this error only
/// arises when a genotype from a structurally incompatible encoding is passed
/// in. It is always propagated, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("composite genotype has {found} parts, codec expects {expected}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("genotype outside codec domain: {0}")]
    OutOfDomain(String),
}
