//! Proactive share refresh.
//!
//! Every share gets `Q(index)` added to its payload, where `Q` is a fresh
//! random polynomial of degree k-1 with `Q(0) = 0`. The refreshed set still
//! interpolates to the same secret, the secret itself is never rebuilt, and a
//! share from before the refresh no longer combines with shares from after.

use rand::rngs::OsRng;
use tracing::debug;
use zeroize::Zeroizing;

use crate::gf256::{eval_polynomial, Gf256};
use crate::{validate_share_set, RandomSource, Scheme, Share, SssError};

impl Scheme {
    /// Refreshes `shares` in place using the operating system's CSPRNG.
    pub fn refresh_shares(&self, shares: &mut [Share]) -> Result<(), SssError> {
        self.refresh_shares_with(shares, &mut OsRng)
    }

    /// Refreshes `shares` in place, drawing coefficients from `rng`.
    ///
    /// All shares meant to stay usable must be refreshed in the same call, so
    /// at least k of them are required: fewer than k refreshed shares could
    /// never reconstruct on their own, and the rest would no longer match.
    ///
    /// # Example
    /// ```
    /// # use shamir_bytes::{reconstruct_secret, Scheme};
    /// let scheme = Scheme::new(2, 3).unwrap();
    /// let mut shares = scheme.split_secret(b"rotate me").unwrap();
    /// let before = shares.clone();
    ///
    /// scheme.refresh_shares(&mut shares).unwrap();
    /// assert_ne!(before, shares);
    /// assert_eq!(reconstruct_secret(&shares[1..3]).unwrap(), b"rotate me");
    /// ```
    pub fn refresh_shares_with<R: RandomSource + ?Sized>(
        &self,
        shares: &mut [Share],
        rng: &mut R,
    ) -> Result<(), SssError> {
        let payload_len = validate_share_set(shares, self.threshold())?;

        let degree = self.threshold() - 1;
        let mut randomness = Zeroizing::new(vec![0u8; payload_len * degree]);
        rng.fill_random(&mut randomness)?;

        let mut coefficients = Zeroizing::new(vec![Gf256::ZERO; self.threshold()]);
        for (i, random) in randomness.chunks_exact(degree).enumerate() {
            Self::fill_polynomial(&mut coefficients, 0, random);

            for share in shares.iter_mut() {
                let delta = eval_polynomial(&coefficients, Gf256(share.index));
                share.payload[i] ^= delta.0;
            }
        }

        debug!(
            threshold = self.threshold(),
            share_count = shares.len(),
            "refreshed shares"
        );
        Ok(())
    }
}
