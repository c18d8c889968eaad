//! Bidirectional adapters between genotypes and problem parameters.
//!
//! A [`Codec`] packages the two halves of problem adaptation:
//!
//! - an **encoding**: a factory producing fresh, independent genotypes that
//!   cover the problem's search space, driven by a caller-supplied RNG;
//! - a **decoder**: a pure function mapping a genotype back to the problem's
//!   native parameter type.
//!
//! The decoder is total over the codec's own encoding output. Handing it a
//! genotype from a structurally incompatible encoding yields a
//! [`DecodeError`]; whether a codec instead documents a best-effort fallback
//! is fixed once at construction, never case by case.
//!
//! Compound parameter sets are built by composition: [`Codec::zip`] pairs two
//! heterogeneous codecs over a tuple genotype, [`Codec::concat`] stacks N
//! homogeneous codecs over a `Vec` genotype. In both cases splitting the
//! composite is the exact left-inverse of building it, so composite decode
//! can never fail on the composite's own products.
//!
//! # Example
//!
//! ```rust
//! use evocore::{Codec, Genotype};
//! use rand::{Rng, SeedableRng};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Bits(Vec<bool>);
//! impl Genotype for Bits {}
//!
//! // 8 random bits, decoded to the number of set bits.
//! let codec = Codec::infallible(
//!     |rng: &mut dyn rand::RngCore| Bits((0..8).map(|_| rng.random::<bool>()).collect()),
//!     |g: &Bits| g.0.iter().filter(|&&b| b).count(),
//! );
//!
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(42);
//! let genotype = codec.encode(&mut rng);
//! let ones = codec.decode(&genotype).unwrap();
//! assert!(ones <= 8);
//! ```

use crate::error::DecodeError;
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

/// Factory half of a codec: each call draws one fresh genotype.
pub type Encoding<G> = Arc<dyn Fn(&mut dyn RngCore) -> G + Send + Sync>;

/// Decoder half of a codec.
pub type Decoder<G, P> = Arc<dyn Fn(&G) -> Result<P, DecodeError> + Send + Sync>;

/// Adapter between a genotype representation and a problem's native
/// parameter type `P`.
pub struct Codec<G, P> {
    encoding: Encoding<G>,
    decoder: Decoder<G, P>,
}

impl<G, P> Clone for Codec<G, P> {
    fn clone(&self) -> Self {
        Self {
            encoding: self.encoding.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<G, P> fmt::Debug for Codec<G, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl<G: 'static, P: 'static> Codec<G, P> {
    /// A codec from an encoding factory and a fallible decoder.
    pub fn new(
        encoding: impl Fn(&mut dyn RngCore) -> G + Send + Sync + 'static,
        decoder: impl Fn(&G) -> Result<P, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            encoding: Arc::new(encoding),
            decoder: Arc::new(decoder),
        }
    }

    /// A codec whose decoder is total over all genotypes it can be handed.
    pub fn infallible(
        encoding: impl Fn(&mut dyn RngCore) -> G + Send + Sync + 'static,
        decode: impl Fn(&G) -> P + Send + Sync + 'static,
    ) -> Self {
        Self::new(encoding, move |g: &G| Ok(decode(g)))
    }

    /// Draw one fresh genotype from the encoding. Successive products share
    /// no mutable state.
    pub fn encode<R: Rng>(&self, rng: &mut R) -> G {
        (*self.encoding)(rng)
    }

    /// Map a genotype back to problem parameters. Pure and total over this
    /// codec's own encoding output.
    pub fn decode(&self, genotype: &G) -> Result<P, DecodeError> {
        (*self.decoder)(genotype)
    }

    /// Handle on the encoding factory.
    pub fn encoding(&self) -> Encoding<G> {
        self.encoding.clone()
    }

    /// Handle on the decoder function.
    pub fn decoder(&self) -> Decoder<G, P> {
        self.decoder.clone()
    }

    /// Post-process decoded parameters, keeping the encoding unchanged.
    pub fn map<Q: 'static>(self, f: impl Fn(P) -> Q + Send + Sync + 'static) -> Codec<G, Q> {
        let decoder = self.decoder;
        Codec {
            encoding: self.encoding,
            decoder: Arc::new(move |g: &G| (*decoder)(g).map(&f)),
        }
    }

    /// Pair this codec with another over a tuple genotype. The composite
    /// encoding draws one genotype from each part; decoding splits the tuple
    /// by field, which is trivially the left-inverse of pairing.
    pub fn zip<G2: 'static, P2: 'static>(self, other: Codec<G2, P2>) -> Codec<(G, G2), (P, P2)> {
        let (enc_a, dec_a) = (self.encoding, self.decoder);
        let (enc_b, dec_b) = (other.encoding, other.decoder);
        Codec {
            encoding: Arc::new(move |rng: &mut dyn RngCore| ((*enc_a)(rng), (*enc_b)(rng))),
            decoder: Arc::new(move |composite: &(G, G2)| {
                Ok(((*dec_a)(&composite.0)?, (*dec_b)(&composite.1)?))
            }),
        }
    }

    /// Stack N homogeneous component codecs over a `Vec` genotype.
    ///
    /// The composite encoding collects one genotype per component, in order;
    /// the composite decoder splits by position, so a composite genotype with
    /// the wrong number of parts is outside this codec's domain and fails
    /// with [`DecodeError::ArityMismatch`].
    pub fn concat(parts: Vec<Codec<G, P>>) -> Codec<Vec<G>, Vec<P>> {
        let parts = Arc::new(parts);
        let enc_parts = parts.clone();
        Codec {
            encoding: Arc::new(move |rng: &mut dyn RngCore| {
                enc_parts.iter().map(|c| (*c.encoding)(&mut *rng)).collect()
            }),
            decoder: Arc::new(move |composite: &Vec<G>| {
                if composite.len() != parts.len() {
                    log::debug!(
                        "composite decode rejected: {} parts, expected {}",
                        composite.len(),
                        parts.len()
                    );
                    return Err(DecodeError::ArityMismatch {
                        expected: parts.len(),
                        found: composite.len(),
                    });
                }
                parts
                    .iter()
                    .zip(composite)
                    .map(|(c, g)| (*c.decoder)(g))
                    .collect()
            }),
        }
    }
}
