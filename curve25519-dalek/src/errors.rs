//! Error types for the field, group and signature layers.
//!
//! The taxonomy is intentionally coarse and externally distinguishable: callers
//! that need to tell a bad length apart from a bad signature (to avoid
//! padding-oracle-style confusion) can match on [`Error`] directly.

use core::fmt;

/// A failure at the field, group, encoding or signature layer.
///
/// Every variant is a unit variant so that `Error` stays `Copy` — there is
/// never a reason to allocate to report which of these eight things went
/// wrong.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A byte slice did not have the length its decoder required.
    InvalidLength,
    /// A 32-byte encoding did not decode to a point on the curve.
    InvalidPoint,
    /// A 64-byte signature failed the verification equation, or its `s`
    /// component was out of range.
    InvalidSignature,
    /// A Ristretto or Edwards encoding was syntactically wrong (non-canonical,
    /// or out-of-range field/scalar representative).
    InvalidEncoding,
    /// An X25519 Diffie-Hellman output was the all-zero u-coordinate, meaning
    /// one of the inputs was a small-subgroup point.
    InvalidSharedSecret,
    /// A scalar was not in the range its caller required.
    ScalarOutOfRange,
    /// A requested wNAF window width did not divide 256.
    InvalidWindow,
    /// [`crate::field::FieldElement::invert`] was called on zero.
    NonInvertible,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidLength => "input had the wrong length",
            Error::InvalidPoint => "encoding does not decode to a curve point",
            Error::InvalidSignature => "signature failed to verify",
            Error::InvalidEncoding => "encoding is not canonical",
            Error::InvalidSharedSecret => "Diffie-Hellman output was the identity",
            Error::ScalarOutOfRange => "scalar is out of the required range",
            Error::InvalidWindow => "window width does not divide 256",
            Error::NonInvertible => "field element has no multiplicative inverse",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
