//! Source of the random polynomial coefficients.

use rand::{CryptoRng, RngCore};

use crate::SssError;

/// Fills buffers with unpredictable bytes.
///
/// Implemented for every [`RngCore`] + [`CryptoRng`], so `rand::rngs::OsRng`
/// works directly and a seeded `StdRng` can stand in for it in tests. The
/// `CryptoRng` bound keeps non-cryptographic generators out of production
/// code paths.
///
/// Taking `&mut self` gives the split engine exclusive use of the source for
/// the whole call, so a generator with internal state is never interleaved
/// between two concurrent splits.
pub trait RandomSource {
    fn fill_random(&mut self, buffer: &mut [u8]) -> Result<(), SssError>;
}

impl<R: RngCore + CryptoRng + ?Sized> RandomSource for R {
    fn fill_random(&mut self, buffer: &mut [u8]) -> Result<(), SssError> {
        self.try_fill_bytes(buffer)?;
        Ok(())
    }
}
