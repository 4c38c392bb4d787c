//! X25519 Diffie-Hellman key exchange (RFC 7748), built on
//! [`curve25519_dalek::montgomery`]'s ladder.
//!
//! This is a thin wrapper: [`EphemeralSecret`] and [`StaticSecret`] differ
//! only in whether the scalar can be reused across more than one
//! [`diffie_hellman`](StaticSecret::diffie_hellman) call, matching the split
//! the teacher crate uses to make accidental scalar reuse a type error rather
//! than a runtime footgun.

#![no_std]
#![allow(non_snake_case)]

use curve25519_dalek::errors::{Error, Result};
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::signing::SigningKey;

use rand_core::{CryptoRng, RngCore};

/// An x25519 public key: a Curve25519 u-coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(MontgomeryPoint);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        *self.0.as_bytes()
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> PublicKey {
        PublicKey(MontgomeryPoint(bytes))
    }
}

/// The output of a Diffie-Hellman exchange: a shared u-coordinate.
///
/// Constructing one never fails by itself; [`SharedSecret::was_contributory`]
/// tells the caller whether the result was the all-zero u-coordinate (RFC
/// 7748 §6.1's non-contributory case), since that check is a protocol-level
/// decision the caller, not this crate, should make explicitly.
#[derive(Clone, Copy, Debug)]
pub struct SharedSecret(MontgomeryPoint);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        *self.0.as_bytes()
    }

    /// `false` iff the shared secret is the all-zero u-coordinate, i.e. at
    /// least one of the two parties' public keys had small order.
    pub fn was_contributory(&self) -> bool {
        !bool::from(self.0.is_zero())
    }
}

fn diffie_hellman(secret_scalar: [u8; 32], their_public: &PublicKey) -> SharedSecret {
    SharedSecret(their_public.0.mul_clamped(secret_scalar))
}

/// A single-use Diffie-Hellman secret.
///
/// There is no `to_bytes`/serialization on purpose: the point of an
/// `EphemeralSecret` is that it exists for exactly one
/// [`diffie_hellman`](EphemeralSecret::diffie_hellman) call, which consumes
/// it.
pub struct EphemeralSecret([u8; 32]);

impl EphemeralSecret {
    pub fn random_from_rng<T: RngCore + CryptoRng>(mut csprng: T) -> EphemeralSecret {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        EphemeralSecret(bytes)
    }

    #[cfg(feature = "os_rng")]
    pub fn random() -> EphemeralSecret {
        EphemeralSecret::random_from_rng(rand_core::OsRng)
    }

    pub fn diffie_hellman(self, their_public: &PublicKey) -> SharedSecret {
        diffie_hellman(self.0, their_public)
    }
}

impl<'a> From<&'a EphemeralSecret> for PublicKey {
    fn from(secret: &'a EphemeralSecret) -> PublicKey {
        PublicKey(MontgomeryPoint::basepoint().mul_clamped(secret.0))
    }
}

/// A reusable Diffie-Hellman secret, e.g. a long-lived identity key.
#[derive(Clone)]
pub struct StaticSecret([u8; 32]);

impl StaticSecret {
    pub fn random_from_rng<T: RngCore + CryptoRng>(mut csprng: T) -> StaticSecret {
        let mut bytes = [0u8; 32];
        csprng.fill_bytes(&mut bytes);
        StaticSecret(bytes)
    }

    #[cfg(feature = "os_rng")]
    pub fn random() -> StaticSecret {
        StaticSecret::random_from_rng(rand_core::OsRng)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> StaticSecret {
        StaticSecret(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn diffie_hellman(&self, their_public: &PublicKey) -> SharedSecret {
        diffie_hellman(self.0, their_public)
    }
}

impl<'a> From<&'a StaticSecret> for PublicKey {
    fn from(secret: &'a StaticSecret) -> PublicKey {
        PublicKey(MontgomeryPoint::basepoint().mul_clamped(secret.0))
    }
}

/// Derive an X25519 static secret from an Ed25519 signing key, via the
/// shared clamp (RFC 8032 §5.1.5 and RFC 7748 §5 clamp identically) rather
/// than the birational point map — the two curves' private scalars agree
/// bit-for-bit, so there is nothing to convert beyond reading them out.
impl From<&SigningKey> for StaticSecret {
    fn from(signing_key: &SigningKey) -> StaticSecret {
        StaticSecret(signing_key.to_scalar_bytes())
    }
}

/// The RFC 7748 X25519 function: `scalar * point`, with RFC 7748 §5 clamping
/// applied to `scalar`. The lower-level entry point beneath
/// [`StaticSecret::diffie_hellman`]/[`EphemeralSecret::diffie_hellman`], for
/// callers that want the bare function over raw byte arrays.
pub fn x25519(scalar: [u8; 32], point: [u8; 32]) -> [u8; 32] {
    MontgomeryPoint(point).mul_clamped(scalar).0
}

/// The all-zero-rejecting variant of [`x25519`], returning
/// [`Error::InvalidSharedSecret`] for a non-contributory result.
pub fn x25519_checked(scalar: [u8; 32], point: [u8; 32]) -> Result<[u8; 32]> {
    let out = MontgomeryPoint(point).mul_clamped(scalar);
    if bool::from(out.is_zero()) {
        Err(Error::InvalidSharedSecret)
    } else {
        Ok(out.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use curve25519_dalek::constants::{EIGHT_TORSION, X25519_SMALL_ORDER_U};

    fn hex32(s: &str) -> [u8; 32] {
        let decoded = hex::decode(s).expect("valid hex");
        let mut out = [0u8; 32];
        out.copy_from_slice(&decoded);
        out
    }

    #[test]
    fn rfc7748_ladder_vectorset1() {
        let scalar = hex32("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
        let point = hex32("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let expected = hex32("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");
        assert_eq!(x25519(scalar, point), expected);
    }

    #[test]
    fn rfc7748_ladder_vectorset2() {
        let scalar = hex32("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
        let point = hex32("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let expected = hex32("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");
        assert_eq!(x25519(scalar, point), expected);
    }

    #[test]
    fn static_secret_diffie_hellman_is_symmetric() {
        let a = StaticSecret::from_bytes([0x11u8; 32]);
        let b = StaticSecret::from_bytes([0x22u8; 32]);
        let a_pub = PublicKey::from(&a);
        let b_pub = PublicKey::from(&b);
        assert_eq!(
            a.diffie_hellman(&b_pub).to_bytes(),
            b.diffie_hellman(&a_pub).to_bytes()
        );
    }

    #[test]
    fn ephemeral_secret_diffie_hellman_is_symmetric() {
        struct FixedRng(u8);
        impl RngCore for FixedRng {
            fn next_u32(&mut self) -> u32 {
                let mut b = [0u8; 4];
                self.fill_bytes(&mut b);
                u32::from_le_bytes(b)
            }
            fn next_u64(&mut self) -> u64 {
                let mut b = [0u8; 8];
                self.fill_bytes(&mut b);
                u64::from_le_bytes(b)
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(self.0);
            }
        }
        impl CryptoRng for FixedRng {}

        let a = EphemeralSecret::random_from_rng(FixedRng(0x33));
        let b_static = StaticSecret::from_bytes([0x44u8; 32]);
        let a_pub = PublicKey::from(&a);
        let b_pub = PublicKey::from(&b_static);
        let shared_a = a.diffie_hellman(&b_pub);
        let shared_b = b_static.diffie_hellman(&a_pub);
        assert_eq!(shared_a.to_bytes(), shared_b.to_bytes());
    }

    #[test]
    fn small_order_points_are_rejected_as_non_contributory() {
        for u in X25519_SMALL_ORDER_U.iter() {
            let secret = StaticSecret::from_bytes([0x55u8; 32]);
            let shared = secret.diffie_hellman(&PublicKey::from(*u));
            assert!(!shared.was_contributory());
            assert_eq!(
                x25519_checked(secret.to_bytes(), *u),
                Err(curve25519_dalek::errors::Error::InvalidSharedSecret)
            );
        }
    }

    #[test]
    fn eight_torsion_table_has_expected_u_coordinates() {
        // The torsion table's points collapse to at most four distinct
        // Montgomery u-coordinates (each u shared by a point and its
        // negation) -- sanity check that the two tables describe the same
        // small-subgroup points via the birational bridge.
        assert_eq!(EIGHT_TORSION.len(), 8);
        assert_eq!(X25519_SMALL_ORDER_U.len(), 4);
    }

    #[test]
    fn static_secret_from_signing_key_matches_direct_bridge() {
        use curve25519_dalek::edwards::CompressedEdwardsY;

        let signing_key = SigningKey::from_seed([0x77u8; 32]);
        let via_bridge = StaticSecret::from(&signing_key);
        let expected_edwards = CompressedEdwardsY(signing_key.verifying_key().to_bytes())
            .decompress()
            .expect("verifying key decodes");
        let expected_public = expected_edwards.to_montgomery();
        assert_eq!(PublicKey::from(&via_bridge).to_bytes(), expected_public.0);
    }
}
