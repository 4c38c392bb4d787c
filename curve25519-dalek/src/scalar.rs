//! Scalar arithmetic modulo the group order
//! `L = 2^252 + 27742317777372353535851937790883648493`.
//!
//! Like [`crate::field`], this uses a plain 256-bit (four `u64` limbs)
//! representation rather than dalek's radix-52 internal form. Reduction mod
//! `L` does not get the same two-fold trick the field layer uses (`L` sits
//! far enough below `2^256` that "fold the high half back in" needs dozens
//! of iterations in the worst case — verified and rejected during design,
//! see DESIGN.md). Instead this reduces by a fixed, 512-step bit-serial
//! double-and-reduce: process the input MSB-to-LSB, `r = 2*r + bit`,
//! conditionally subtracting `L` once per step. The per-step invariant
//! `r < 2*L` (so a single conditional subtraction always suffices) and exact
//! agreement with an arbitrary-precision `mod L` were both checked
//! independently before this was transcribed.

use core::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::constants::GROUP_L;

/// An integer modulo the prime group order `L`.
///
/// Internally four little-endian `u64` limbs, always held canonical
/// (`0 <= limbs < L`) except for the transient unreduced values
/// `from_limbs_unreduced` exists to construct (used only for constants that
/// are reduced before anything observes them).
#[derive(Clone, Copy, Debug)]
pub struct Scalar(pub(crate) [u64; 4]);

#[inline(always)]
fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let sum = a as u128 + b as u128 + carry as u128;
    (sum as u64, (sum >> 64) as u64)
}

#[inline(always)]
fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let diff = a as i128 - b as i128 - borrow as i128;
    if diff < 0 {
        ((diff + (1i128 << 64)) as u64, 1)
    } else {
        (diff as u64, 0)
    }
}

#[inline(always)]
fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let v = a as u128 + (b as u128) * (c as u128) + carry as u128;
    (v as u64, (v >> 64) as u64)
}

fn limbs_ge(a: &[u64; 4], b: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    true
}

fn limbs_sub(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut out = [0u64; 4];
    let mut borrow = 0u64;
    for i in 0..4 {
        let (d, brw) = sbb(a[i], b[i], borrow);
        out[i] = d;
        borrow = brw;
    }
    out
}

fn limbs_add(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut out = [0u64; 4];
    let mut carry = 0u64;
    for i in 0..4 {
        let (s, c) = adc(a[i], b[i], carry);
        out[i] = s;
        carry = c;
    }
    out
}

/// Extract bit `i` (0 = LSB) of a 512-bit value given as eight little-endian
/// `u64` limbs.
fn get_bit_512(limbs: &[u64; 8], i: usize) -> u64 {
    (limbs[i / 64] >> (i % 64)) & 1
}

/// Bit-serial double-and-reduce mod `L` over a fixed 512 steps.
///
/// `r` is carried as a 256-bit value; the per-step invariant `r < 2L` (proved
/// during design, see module docs) means a single conditional subtraction of
/// `L` after each doubling-and-adding-the-next-bit step is always enough to
/// restore `r < L`.
fn reduce_mod_l_512(bits: &[u64; 8]) -> [u64; 4] {
    let mut r = [0u64; 4];
    for i in (0..512).rev() {
        // r = 2*r + bit
        let mut doubled = [0u64; 4];
        let mut carry = 0u64;
        for j in 0..4 {
            let shifted = (r[j] << 1) | carry;
            carry = r[j] >> 63;
            doubled[j] = shifted;
        }
        doubled[0] |= get_bit_512(bits, i);
        r = doubled;
        if limbs_ge(&r, &GROUP_L) {
            r = limbs_sub(&r, &GROUP_L);
        }
    }
    r
}

impl Scalar {
    /// The additive identity.
    pub const ZERO: Scalar = Scalar([0, 0, 0, 0]);
    /// The multiplicative identity.
    pub const ONE: Scalar = Scalar([1, 0, 0, 0]);

    /// Build a `Scalar` from limbs known in advance to already be `< L`
    /// (used only for this crate's own constants).
    pub(crate) const fn from_limbs_unreduced(limbs: [u64; 4]) -> Self {
        Scalar(limbs)
    }

    /// Reduce a 32-byte little-endian integer mod `L`.
    pub fn from_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(bytes);
        Scalar::from_bytes_mod_order_wide(&wide)
    }

    /// Reduce a 64-byte little-endian integer (e.g. a SHA-512 digest) mod `L`.
    /// This is the primitive Ed25519 signing uses for both `r = H(prefix || M) mod L`
    /// and `k = H(R || A || M) mod L`.
    pub fn from_bytes_mod_order_wide(bytes: &[u8; 64]) -> Self {
        let mut limbs = [0u64; 8];
        for i in 0..8 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            limbs[i] = u64::from_le_bytes(chunk);
        }
        Scalar(reduce_mod_l_512(&limbs))
    }

    /// Decode 32 canonical little-endian bytes. Fails if the encoded integer
    /// is `>= L`.
    pub fn from_canonical_bytes(bytes: &[u8; 32]) -> crate::errors::Result<Self> {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            limbs[i] = u64::from_le_bytes(chunk);
        }
        // Bounds-check against L via normalize_scalar rather than re-deriving
        // the same comparison here: non-strict, since 0 is a canonical scalar.
        normalize_scalar(
            &Scalar(limbs),
            &crate::constants::group_order_scalar(),
            false,
        )
    }

    /// Encode to 32 little-endian bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[i * 8..i * 8 + 8].copy_from_slice(&self.0[i].to_le_bytes());
        }
        out
    }

    pub fn add(&self, rhs: &Scalar) -> Scalar {
        let sum = limbs_add(&self.0, &rhs.0);
        if limbs_ge(&sum, &GROUP_L) {
            Scalar(limbs_sub(&sum, &GROUP_L))
        } else {
            Scalar(sum)
        }
    }

    pub fn sub(&self, rhs: &Scalar) -> Scalar {
        if limbs_ge(&self.0, &rhs.0) {
            Scalar(limbs_sub(&self.0, &rhs.0))
        } else {
            let diff = limbs_sub(&self.0, &rhs.0);
            Scalar(limbs_add(&diff, &GROUP_L))
        }
    }

    pub fn neg(&self) -> Scalar {
        Scalar::ZERO.sub(self)
    }

    /// Schoolbook multiply to a 512-bit product, then bit-serial reduce mod `L`.
    pub fn mul(&self, rhs: &Scalar) -> Scalar {
        let mut t = [0u64; 8];
        for i in 0..4 {
            let mut carry = 0u64;
            for j in 0..4 {
                let (lo, hi) = mac(t[i + j], self.0[i], rhs.0[j], carry);
                t[i + j] = lo;
                carry = hi;
            }
            t[i + 4] = carry;
        }
        Scalar(reduce_mod_l_512(&t))
    }

    /// `self * a + b`, the fused operation RFC 8032 signing and verification
    /// both reduce to (`s = r + k*a mod L`, and the verifier's
    /// `[s]B = R + [k]A` check's scalar side).
    pub fn mul_add(&self, a: &Scalar, b: &Scalar) -> Scalar {
        self.mul(a).add(b)
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Scalar::ZERO)
    }

    /// Clamp a 32-byte seed-derived scalar per RFC 8032 §5.1.5: clear the
    /// low 3 bits, clear bit 255, set bit 254.
    pub fn clamp_integer(mut bytes: [u8; 32]) -> [u8; 32] {
        bytes[0] &= 0xf8;
        bytes[31] &= 0x7f;
        bytes[31] |= 0x40;
        bytes
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            limbs[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Scalar(limbs)
    }

    fn conditional_assign(&mut self, other: &Self, choice: Choice) {
        for i in 0..4 {
            self.0[i].conditional_assign(&other.0[i], choice);
        }
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl Eq for Scalar {}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar::add(&self, &rhs)
    }
}
impl<'a, 'b> Add<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn add(self, rhs: &'b Scalar) -> Scalar {
        Scalar::add(self, rhs)
    }
}
impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar::sub(&self, &rhs)
    }
}
impl<'a, 'b> Sub<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &'b Scalar) -> Scalar {
        Scalar::sub(self, rhs)
    }
}
impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar::mul(&self, &rhs)
    }
}
impl<'a, 'b> Mul<&'b Scalar> for &'a Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::mul(self, rhs)
    }
}
impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar::neg(&self)
    }
}
impl<'a> Neg for &'a Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar::neg(self)
    }
}

/// Validate a scalar representative against a caller-supplied upper bound:
/// `strict` requires `0 < n < max` (rejecting zero as well as anything at or
/// above `max`); non-strict requires `0 <= n < max`. Every `Scalar` is
/// already held canonical (`0 <= n < L`), so this never reduces — it only
/// range-checks `n` against `max` and passes it through unchanged or rejects
/// it with `ScalarOutOfRange`.
pub fn normalize_scalar(n: &Scalar, max: &Scalar, strict: bool) -> crate::errors::Result<Scalar> {
    let below_max = !limbs_ge(&n.0, &max.0);
    let in_range = below_max && (!strict || !bool::from(n.is_zero()));
    if in_range {
        Ok(*n)
    } else {
        Err(crate::errors::Error::ScalarOutOfRange)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> serde::de::Visitor<'de> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("32 canonical little-endian bytes of a scalar mod L")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Scalar, E>
            where
                E: serde::de::Error,
            {
                if v.len() != 32 {
                    return Err(serde::de::Error::invalid_length(v.len(), &self));
                }
                let mut bytes = [0u8; 32];
                bytes.copy_from_slice(v);
                Scalar::from_canonical_bytes(&bytes)
                    .map_err(|_| serde::de::Error::custom("scalar representative out of range"))
            }
        }

        deserializer.deserialize_bytes(ScalarVisitor)
    }
}
