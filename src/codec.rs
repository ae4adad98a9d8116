//! Transport format for shares.
//!
//! A share travels as standard base64 over `[index] ++ payload`. The layout is
//! what previously handed-out shares were written in, so it is fixed.

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::{Share, SssError};

/// Reasons a share string or buffer could not be read back.
#[derive(Error, Debug)]
pub enum ShareDecodeError {
    #[error("share is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Fewer than two bytes leaves no room for an index and a payload byte
    #[error("share is too short ({len} bytes, need at least 2)")]
    TooShort { len: usize },

    #[error("share index must not be zero")]
    ZeroIndex,
}

impl Share {
    /// Serializes the share as its index byte followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.payload.len());
        bytes.push(self.index);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Parses the binary layout produced by [`Share::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ShareDecodeError> {
        match bytes {
            [] | [_] => Err(ShareDecodeError::TooShort { len: bytes.len() }),
            [0, ..] => Err(ShareDecodeError::ZeroIndex),
            [index, payload @ ..] => Ok(Share {
                index: *index,
                payload: payload.to_vec(),
            }),
        }
    }

    /// Encodes the share as the base64 string handed to share holders.
    ///
    /// # Example
    /// ```
    /// use shamir_bytes::Share;
    ///
    /// let share = Share { index: 1, payload: vec![0xAB, 0xCD] };
    /// assert_eq!(share.encode(), "AavN");
    /// assert_eq!("AavN".parse::<Share>().unwrap(), share);
    /// ```
    pub fn encode(&self) -> String {
        let mut bytes = self.to_bytes();
        let encoded = STANDARD.encode(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        encoded
    }
}

impl FromStr for Share {
    type Err = SssError;

    /// Surrounding whitespace, as left by copy and paste, is ignored.
    ///
    /// The rest must be canonical standard base64: padding is required and
    /// whitespace inside the string is rejected, so `"A0F"` or `"A0 FC"` fail
    /// with [`ShareDecodeError::Base64`] even though a browser's `atob`
    /// would accept them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = STANDARD.decode(s.trim());
        let mut bytes = decoded.map_err(ShareDecodeError::from)?;
        let share = Share::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        share.map_err(SssError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let share = Share {
            index: 3,
            payload: vec![0x41, 0x42],
        };
        assert_eq!(share.to_bytes(), vec![3, 0x41, 0x42]);
        // base64 of [0x03, 0x41, 0x42]
        assert_eq!(share.encode(), "A0FC");
    }

    #[test]
    fn test_decode() {
        let share: Share = "A0FC".parse().unwrap();
        assert_eq!(share.index, 3);
        assert_eq!(share.payload, vec![0x41, 0x42]);
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let share: Share = "  A0FC\n".parse().unwrap();
        assert_eq!(share.index, 3);
    }

    #[test]
    fn test_decode_max_index() {
        let share = Share {
            index: 255,
            payload: vec![0],
        };
        let decoded: Share = share.encode().parse().unwrap();
        assert_eq!(decoded, share);
    }

    #[test]
    fn test_reject_zero_index() {
        // base64 of [0x00, 0x41]
        assert!(matches!(
            "AEE=".parse::<Share>(),
            Err(SssError::MalformedShare(ShareDecodeError::ZeroIndex))
        ));
        assert!(matches!(
            Share::from_bytes(&[0, 1, 2]),
            Err(ShareDecodeError::ZeroIndex)
        ));
    }

    #[test]
    fn test_reject_too_short() {
        // base64 of [0x01]
        assert!(matches!(
            "AQ==".parse::<Share>(),
            Err(SssError::MalformedShare(ShareDecodeError::TooShort { len: 1 }))
        ));
        assert!(matches!(
            "".parse::<Share>(),
            Err(SssError::MalformedShare(ShareDecodeError::TooShort { len: 0 }))
        ));
    }

    #[test]
    fn test_reject_bad_base64() {
        for input in ["not base64!", "A0F", "A0FC==", "A0 FC", "AEE"] {
            assert!(
                matches!(
                    input.parse::<Share>(),
                    Err(SssError::MalformedShare(ShareDecodeError::Base64(_)))
                ),
                "accepted {input:?}"
            );
        }
    }
}
