//! Ed25519 signing and verification (RFC 8032).
//!
//! A [`SigningKey`] is a 32-byte seed; [`SigningKey::expand`] runs it through
//! SHA-512 once to split it into a clamped scalar half and a "prefix" half,
//! mirroring the key-expansion step every RFC 8032 implementation performs.
//! Signing and verification are otherwise direct translations of RFC 8032
//! §5.1.6/§5.1.7 onto this crate's [`EdwardsPoint`]/[`Scalar`] types, with
//! cofactored (ZIP215-style) verification: the final check multiplies both
//! sides by the cofactor 8 rather than requiring `R` and `A` to be torsion-free,
//! which accepts the same signatures as the reference implementation plus a
//! handful of edge cases reference Ed25519 rejects.

use sha2::{Digest, Sha512};

use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::errors::{Error, Result};
use crate::scalar::Scalar;
use crate::scalar_mul;

/// Length in bytes of an encoded signature.
pub const SIGNATURE_LENGTH: usize = 64;
/// Length in bytes of a seed or a verifying key.
pub const KEY_LENGTH: usize = 32;

/// A detached Ed25519 signature: `R || s`, 64 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: CompressedEdwardsY,
    s: Scalar,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(self.r.as_bytes());
        out[32..].copy_from_slice(&self.s.to_bytes());
        out
    }

    /// Decode `R || s`. `s` must be a canonical (fully reduced) scalar
    /// representative; `R` is only checked for canonical encoding here; a
    /// non-curve-point `R` is caught later, during verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Signature> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(Error::InvalidLength);
        }
        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        s_bytes.copy_from_slice(&bytes[32..]);
        let s = Scalar::from_canonical_bytes(&s_bytes)?;
        Ok(Signature {
            r: CompressedEdwardsY(r_bytes),
            s,
        })
    }
}

/// A 32-byte Ed25519 seed plus its SHA-512 expansion.
///
/// The expansion is computed once, at construction, rather than on every
/// call to [`SigningKey::sign`]: `scalar` and `prefix` are each used per
/// signature, so caching them trades 32 bytes of storage for a SHA-512 call
/// per signature instead of per key.
pub struct SigningKey {
    seed: [u8; KEY_LENGTH],
    scalar: Scalar,
    prefix: [u8; 32],
    verifying_key: VerifyingKey,
}

/// An Ed25519 public key: a compressed Edwards point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    compressed: CompressedEdwardsY,
    point: EdwardsPoint,
}

impl SigningKey {
    /// Expand a 32-byte seed per RFC 8032 §5.1.5: hash it with SHA-512, clamp
    /// the low half into a scalar, and keep the high half as the nonce prefix.
    pub fn from_seed(seed: [u8; KEY_LENGTH]) -> SigningKey {
        let hash = Sha512::digest(seed);
        let mut scalar_bytes = [0u8; 32];
        let mut prefix = [0u8; 32];
        scalar_bytes.copy_from_slice(&hash[..32]);
        prefix.copy_from_slice(&hash[32..]);
        let scalar_bytes = Scalar::clamp_integer(scalar_bytes);
        // The clamped integer lives in [2^254, 2^255), well above L, so this
        // is a real reduction. It is still exactly what RFC 8032 signing
        // needs: B and every point this crate multiplies by `scalar` has
        // order L, so a*B and k*a mod L only ever depend on a mod L.
        let scalar = Scalar::from_bytes_mod_order(&scalar_bytes);
        let point = scalar_mul::multiply(&EdwardsPoint::basepoint(), &scalar);
        let verifying_key = VerifyingKey {
            compressed: point.compress(),
            point,
        };
        SigningKey {
            seed,
            scalar,
            prefix,
            verifying_key,
        }
    }

    /// Generate a new signing key from a caller-supplied CSPRNG, the natural
    /// parallel to `x25519_dalek::{EphemeralSecret, StaticSecret}::
    /// random_from_rng`.
    #[cfg(feature = "rand_core")]
    pub fn generate<R: rand_core::RngCore + rand_core::CryptoRng>(csprng: &mut R) -> SigningKey {
        let mut seed = [0u8; KEY_LENGTH];
        csprng.fill_bytes(&mut seed);
        SigningKey::from_seed(seed)
    }

    /// Reconstruct from a 64-byte `seed || verifying_key` pair, as produced by
    /// [`SigningKey::to_keypair_bytes`]. The verifying key half is taken on
    /// faith from the caller, not recomputed, matching what most Ed25519
    /// implementations' "keypair bytes" format assumes.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<SigningKey> {
        if bytes.len() != 64 {
            return Err(Error::InvalidLength);
        }
        let mut seed = [0u8; KEY_LENGTH];
        seed.copy_from_slice(&bytes[..32]);
        let key = SigningKey::from_seed(seed);
        let mut vk_bytes = [0u8; 32];
        vk_bytes.copy_from_slice(&bytes[32..]);
        if vk_bytes != key.verifying_key.compressed.0 {
            return Err(Error::InvalidEncoding);
        }
        Ok(key)
    }

    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.seed);
        out[32..].copy_from_slice(self.verifying_key.compressed.as_bytes());
        out
    }

    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.seed
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    /// The clamped private scalar, little-endian. Ed25519 and X25519 share
    /// the same key-expansion clamp (RFC 8032 §5.1.5, RFC 7748 §5), so this
    /// is also exactly the Montgomery-ladder scalar a matching X25519 static
    /// secret needs: `x25519_dalek::StaticSecret::from(&signing_key)`.
    pub fn to_scalar_bytes(&self) -> [u8; 32] {
        self.scalar.to_bytes()
    }

    /// RFC 8032 §5.1.6, deterministic Ed25519 signing:
    /// `r = H(prefix || M) mod L`, `R = [r]B`, `k = H(R || A || M) mod L`,
    /// `s = r + k*a mod L`.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let mut nonce_hash = Sha512::new();
        nonce_hash.update(self.prefix);
        nonce_hash.update(message);
        let r = Scalar::from_bytes_mod_order_wide(&finalize_64(nonce_hash));

        let r_point = scalar_mul::multiply(&EdwardsPoint::basepoint(), &r);
        let r_compressed = r_point.compress();

        let mut k_hash = Sha512::new();
        k_hash.update(r_compressed.as_bytes());
        k_hash.update(self.verifying_key.compressed.as_bytes());
        k_hash.update(message);
        let k = Scalar::from_bytes_mod_order_wide(&finalize_64(k_hash));

        let s = r.mul_add(&k, &self.scalar);
        Signature {
            r: r_compressed,
            s,
        }
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        SigningKey {
            seed: self.seed,
            scalar: self.scalar,
            prefix: self.prefix,
            verifying_key: self.verifying_key,
        }
    }
}

fn finalize_64(hash: Sha512) -> [u8; 64] {
    let digest = hash.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

impl VerifyingKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
        if bytes.len() != KEY_LENGTH {
            return Err(Error::InvalidLength);
        }
        let mut array = [0u8; KEY_LENGTH];
        array.copy_from_slice(bytes);
        let compressed = CompressedEdwardsY(array);
        // Non-strict: A feeds into the cofactored verification equation below,
        // which tolerates a non-canonical y the same way ZIP215 does for R.
        let point = compressed.decompress_non_strict()?;
        Ok(VerifyingKey { compressed, point })
    }

    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.compressed.0
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.compressed.0
    }

    /// RFC 8032 §5.1.7 verification, cofactored per the ZIP215 relaxation:
    /// checks `[8][s]B == [8]R + [8][k]A` instead of `[s]B == R + [k]A`,
    /// clearing any 8-torsion component from `R` or `A` before comparing so
    /// that cofactor-subgroup noise in either can't flip the result.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let r_point = signature.r.decompress_non_strict()?;

        let mut k_hash = Sha512::new();
        k_hash.update(signature.r.as_bytes());
        k_hash.update(self.compressed.as_bytes());
        k_hash.update(message);
        let k = Scalar::from_bytes_mod_order_wide(&finalize_64(k_hash));

        let sb = scalar_mul::multiply_unsafe(&EdwardsPoint::basepoint(), &signature.s);
        let ka = scalar_mul::multiply_unsafe(&self.point, &k);
        let rhs = r_point.add(&ka);

        let lhs_8 = sb.double().double().double();
        let rhs_8 = rhs.double().double().double();

        if bool::from(lhs_8.ct_eq(&rhs_8)) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}
