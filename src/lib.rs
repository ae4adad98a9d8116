//! Implementation of Shamir's Secret Sharing scheme over GF(2^8).
//!
//! A secret byte string is split into n shares where any k shares can
//! reconstruct the secret, but k-1 shares reveal no information about it.
//! Each byte of the secret gets its own random polynomial of degree k-1, and
//! share `j` holds that polynomial evaluated at `x = j`.
//! Based on Adi Shamir's paper "How to Share a Secret" (Communications of the ACM, 1979).
//!
//! Shares are exchanged as base64 strings, see [`split`] and [`combine`].
//!
//! Combining fewer than k shares does not fail: it yields a wrong secret,
//! because nothing in a share records the threshold it was made with.
//! Threshold satisfaction is the caller's responsibility.

use std::collections::HashSet;

use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub mod codec;
pub mod extensions;
pub mod gf256;
pub mod random;

pub use codec::ShareDecodeError;
use gf256::{eval_polynomial, lagrange_weights_at_zero, Gf256};
pub use random::RandomSource;

/// Largest share count: index 0 is reserved, leaving 255 nonzero field elements.
pub const MAX_SHARES: usize = 255;

/// Smallest threshold that keeps a single share from revealing the secret.
pub const MIN_THRESHOLD: usize = 2;

/// Which sharing parameter was out of range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// k = 1 would make every share a copy of the secret
    #[error("threshold k must be at least {MIN_THRESHOLD} (got {threshold})")]
    ThresholdTooSmall { threshold: usize },

    #[error("threshold k must not exceed the share count n (k = {threshold}, n = {total_shares})")]
    ThresholdExceedsShares {
        threshold: usize,
        total_shares: usize,
    },

    #[error("share count n must be at most {MAX_SHARES} (got {total_shares})")]
    TooManyShares { total_shares: usize },

    #[error("secret must not be empty")]
    EmptySecret,
}

/// These are errors that can occur during secret sharing operations
#[derive(Error, Debug)]
pub enum SssError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    #[error("not enough shares to combine (need at least {required}, got {share_count})")]
    InsufficientShares {
        /// Number of shares the operation needs
        required: usize,
        /// Number of shares provided
        share_count: usize,
    },

    #[error("shares have different lengths (expected {expected} bytes, found {found})")]
    InconsistentShareLengths { expected: usize, found: usize },

    /// Index 0, or an index used by more than one share
    #[error("share index {index} is zero or appears more than once")]
    DuplicateOrInvalidIndex { index: u8 },

    #[error("malformed share: {0}")]
    MalformedShare(#[from] ShareDecodeError),

    #[error("random source failed: {0}")]
    RandomSource(#[from] rand::Error),
}

/// A single share of a split secret
///
/// `payload[i]` is the polynomial for secret byte `i` evaluated at `index`.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// The x-coordinate shared by every byte of the payload, never 0
    pub index: u8,
    /// One y-coordinate per secret byte
    pub payload: Vec<u8>,
}

/// A validated (k, n) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheme {
    /// Minimum number of shares needed to reconstruct (k)
    threshold: usize,
    /// Total number of shares to generate (n)
    total_shares: usize,
}

impl Default for Scheme {
    /// Three shares, all three required.
    fn default() -> Self {
        Scheme {
            threshold: 3,
            total_shares: 3,
        }
    }
}

impl Scheme {
    /// Creates a scheme where `threshold` of `total_shares` shares recover the secret.
    ///
    /// # Arguments
    /// * `threshold` - Minimum number of shares needed to reconstruct the secret (k)
    /// * `total_shares` - Total number of shares to generate (n)
    ///
    /// # Returns
    /// * `Ok(Scheme)` - If `2 ≤ k ≤ n ≤ 255`
    /// * `Err(SssError::InvalidParameters)` - Naming the first violated constraint
    ///
    /// # Example
    /// ```
    /// use shamir_bytes::Scheme;
    ///
    /// let scheme = Scheme::new(3, 5).unwrap();
    /// assert_eq!(scheme.threshold(), 3);
    /// assert!(Scheme::new(1, 5).is_err());
    /// assert!(Scheme::new(3, 256).is_err());
    /// ```
    pub fn new(threshold: usize, total_shares: usize) -> Result<Self, SssError> {
        let invalid = if threshold < MIN_THRESHOLD {
            Some(ParameterError::ThresholdTooSmall { threshold })
        } else if threshold > total_shares {
            Some(ParameterError::ThresholdExceedsShares {
                threshold,
                total_shares,
            })
        } else if total_shares > MAX_SHARES {
            Some(ParameterError::TooManyShares { total_shares })
        } else {
            None
        };

        if let Some(err) = invalid {
            warn!(threshold, total_shares, "rejected sharing parameters: {err}");
            return Err(err.into());
        }

        Ok(Scheme {
            threshold,
            total_shares,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn total_shares(&self) -> usize {
        self.total_shares
    }

    /// Splits a secret into n shares using the operating system's CSPRNG.
    ///
    /// # Example
    /// ```
    /// # use shamir_bytes::Scheme;
    /// let scheme = Scheme::new(3, 5).unwrap();
    /// let shares = scheme.split_secret(b"AB").unwrap();
    /// assert_eq!(shares.len(), 5);
    /// assert_eq!(shares[0].index, 1);
    /// assert_eq!(shares[0].payload.len(), 2);
    /// ```
    pub fn split_secret(&self, secret: &[u8]) -> Result<Vec<Share>, SssError> {
        self.split_secret_with(secret, &mut OsRng)
    }

    /// Splits a secret into n shares, drawing coefficients from `rng`.
    ///
    /// Share `j` (for `j` in `1..=n`) gets index `j`. For every byte position
    /// the same k-1 coefficients are used for all n shares, and they are
    /// redrawn for the next position.
    pub fn split_secret_with<R: RandomSource + ?Sized>(
        &self,
        secret: &[u8],
        rng: &mut R,
    ) -> Result<Vec<Share>, SssError> {
        if secret.is_empty() {
            warn!("rejected split of an empty secret");
            return Err(ParameterError::EmptySecret.into());
        }

        let degree = self.threshold - 1;
        let mut randomness = Zeroizing::new(vec![0u8; secret.len() * degree]);
        rng.fill_random(&mut randomness)?;

        let mut shares: Vec<Share> = (1..=self.total_shares as u8)
            .map(|index| Share {
                index,
                payload: Vec::with_capacity(secret.len()),
            })
            .collect();

        let mut coefficients = Zeroizing::new(vec![Gf256::ZERO; self.threshold]);
        for (&byte, random) in secret.iter().zip(randomness.chunks_exact(degree)) {
            Self::fill_polynomial(&mut coefficients, byte, random);

            for share in shares.iter_mut() {
                let y = eval_polynomial(&coefficients, Gf256(share.index));
                share.payload.push(y.0);
            }
        }

        debug!(
            threshold = self.threshold,
            total_shares = self.total_shares,
            secret_len = secret.len(),
            "split secret"
        );
        Ok(shares)
    }

    /// Reconstructs the secret, refusing share sets smaller than this scheme's threshold.
    ///
    /// # Example
    /// ```
    /// # use shamir_bytes::Scheme;
    /// let scheme = Scheme::new(3, 5).unwrap();
    /// let shares = scheme.split_secret(b"AB").unwrap();
    ///
    /// assert_eq!(scheme.reconstruct_secret(&shares[1..4]).unwrap(), b"AB");
    /// assert!(scheme.reconstruct_secret(&shares[0..2]).is_err());
    /// ```
    pub fn reconstruct_secret(&self, shares: &[Share]) -> Result<Vec<u8>, SssError> {
        interpolate_shares(shares, self.threshold)
    }

    /// Sets up the polynomial for one secret byte:
    /// - a₀ is `constant`
    /// - a₁ through aₖ₋₁ come from `random`
    ///
    /// `coefficients` holds k entries and `random` holds k-1 bytes.
    pub(crate) fn fill_polynomial(coefficients: &mut [Gf256], constant: u8, random: &[u8]) {
        debug_assert_eq!(coefficients.len(), random.len() + 1);
        coefficients[0] = Gf256(constant);
        for (coeff, &r) in coefficients[1..].iter_mut().zip(random) {
            *coeff = Gf256(r);
        }
    }
}

/// Reconstructs a secret from shares using Lagrange interpolation at x = 0.
///
/// The order of `shares` does not matter. Any k or more shares of the same
/// split give the same result; fewer than k give a wrong secret without an
/// error.
///
/// # Returns
/// * `Ok(Vec<u8>)` - The reconstructed secret
/// * `Err(SssError::InsufficientShares)` - If fewer than 2 shares are given
/// * `Err(SssError::InconsistentShareLengths)` - If payload lengths differ
/// * `Err(SssError::DuplicateOrInvalidIndex)` - If an index is 0 or repeated
pub fn reconstruct_secret(shares: &[Share]) -> Result<Vec<u8>, SssError> {
    interpolate_shares(shares, MIN_THRESHOLD)
}

fn interpolate_shares(shares: &[Share], required: usize) -> Result<Vec<u8>, SssError> {
    let secret_len = validate_share_set(shares, required)?;

    let xs: Vec<Gf256> = shares.iter().map(|share| Gf256(share.index)).collect();
    let Some(weights) = lagrange_weights_at_zero(&xs) else {
        // Unreachable after validate_share_set, which rejects coinciding x-coordinates
        let index = repeated_index(shares);
        return Err(SssError::DuplicateOrInvalidIndex { index });
    };

    let secret = (0..secret_len)
        .map(|i| {
            let byte = shares
                .iter()
                .zip(&weights)
                .fold(Gf256::ZERO, |acc, (share, &w)| {
                    acc + Gf256(share.payload[i]) * w
                });
            byte.0
        })
        .collect();

    debug!(share_count = shares.len(), secret_len, "combined shares");
    Ok(secret)
}

/// First index that is zero or already used by an earlier share, else the first index.
fn repeated_index(shares: &[Share]) -> u8 {
    let mut seen_indices = HashSet::new();
    shares
        .iter()
        .map(|share| share.index)
        .find(|&index| index == 0 || !seen_indices.insert(index))
        .unwrap_or_else(|| shares.first().map_or(0, |share| share.index))
}

/// Checks that `shares` can be interpolated together and returns their payload length.
pub(crate) fn validate_share_set(shares: &[Share], required: usize) -> Result<usize, SssError> {
    if shares.len() < required {
        warn!(share_count = shares.len(), required, "too few shares");
        return Err(SssError::InsufficientShares {
            required,
            share_count: shares.len(),
        });
    }

    let expected = shares[0].payload.len();
    if let Some(share) = shares.iter().find(|share| share.payload.len() != expected) {
        warn!(expected, found = share.payload.len(), "share lengths differ");
        return Err(SssError::InconsistentShareLengths {
            expected,
            found: share.payload.len(),
        });
    }

    let mut seen_indices = HashSet::new();
    for share in shares {
        if share.index == 0 || !seen_indices.insert(share.index) {
            warn!(index = share.index, "zero or duplicate share index");
            return Err(SssError::DuplicateOrInvalidIndex { index: share.index });
        }
    }

    Ok(expected)
}

/// Splits `secret` into `total_shares` base64 share strings, any `threshold`
/// of which recover it.
///
/// Text secrets should be normalized (e.g. Unicode NFKC) and UTF-8 encoded by
/// the caller first.
///
/// # Example
/// ```
/// let shares = shamir_bytes::split("hunter2".as_bytes(), 5, 3).unwrap();
/// let secret = shamir_bytes::combine(&shares[2..5]).unwrap();
/// assert_eq!(secret, b"hunter2");
/// ```
pub fn split(
    secret: &[u8],
    total_shares: usize,
    threshold: usize,
) -> Result<Vec<String>, SssError> {
    split_with_rng(secret, total_shares, threshold, &mut OsRng)
}

/// Like [`split`], with an explicit random source.
pub fn split_with_rng<R: RandomSource + ?Sized>(
    secret: &[u8],
    total_shares: usize,
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<String>, SssError> {
    let scheme = Scheme::new(threshold, total_shares)?;
    let shares = scheme.split_secret_with(secret, rng)?;
    Ok(shares.iter().map(Share::encode).collect())
}

/// Decodes base64 share strings and reconstructs the secret.
///
/// Empty entries (unfilled input fields) must be filtered out by the caller.
/// A string that fails to decode is reported as [`SssError::MalformedShare`]
/// before any interpolation happens.
pub fn combine<S: AsRef<str>>(shares: &[S]) -> Result<Vec<u8>, SssError> {
    let shares = shares
        .iter()
        .map(|share| share.as_ref().parse::<Share>())
        .collect::<Result<Vec<_>, _>>()?;

    reconstruct_secret(&shares)
}
