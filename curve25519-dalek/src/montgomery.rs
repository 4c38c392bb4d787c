//! The Montgomery form of Curve25519, `v^2 = u^3 + 486662*u^2 + u`, used by
//! X25519 (RFC 7748).
//!
//! [`MontgomeryPoint`] holds only a u-coordinate — the Montgomery ladder
//! never needs `v` — so equality, addition and general group structure are
//! unavailable here; only the ladder (`mul_clamped`) and the birational
//! bridge to the Edwards curve (`to_edwards`) are defined.

use subtle::{Choice, ConditionallySelectable};

use crate::edwards::{CompressedEdwardsY, EdwardsPoint};
use crate::field::FieldElement;
use crate::scalar::Scalar;

/// `(486662 - 2) / 4`, the Montgomery ladder constant for Curve25519.
const A24: u64 = 121665;

fn field_a24() -> FieldElement {
    let mut limbs = [0u64; 4];
    limbs[0] = A24;
    FieldElement::from_limbs(limbs)
}

/// A point on Curve25519, represented by its u-coordinate only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MontgomeryPoint(pub [u8; 32]);

impl MontgomeryPoint {
    /// The standard X25519 basepoint, `u = 9`.
    pub fn basepoint() -> MontgomeryPoint {
        MontgomeryPoint(crate::constants::X25519_BASEPOINT_BYTES)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `true` iff this is the all-zero u-coordinate, the image of every
    /// point in Curve25519's small (order-8) subgroup under a scalar
    /// multiplication that lands on the identity. X25519 implementations
    /// are expected to reject this as a shared secret (RFC 7748 §6.1).
    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u8;
        for b in self.0.iter() {
            acc |= *b;
        }
        Choice::from((acc == 0) as u8)
    }

    /// The RFC 7748 Montgomery ladder: `[clamp(scalar_bytes)] * self`.
    pub fn mul_clamped(&self, scalar_bytes: [u8; 32]) -> MontgomeryPoint {
        let clamped = Scalar::clamp_integer(scalar_bytes);
        montgomery_ladder(&FieldElement::from_bytes(&self.0), &clamped)
    }

    /// `[scalar] * self` without RFC 7748 clamping, for callers that have
    /// already reduced or clamped the scalar themselves.
    pub fn mul_bits(&self, scalar_bytes: &[u8; 32]) -> MontgomeryPoint {
        montgomery_ladder(&FieldElement::from_bytes(&self.0), scalar_bytes)
    }

    /// Map to the birationally-equivalent Edwards point, given the sign bit
    /// of the Edwards `x` coordinate (which the Montgomery u-coordinate
    /// alone does not determine).
    ///
    /// `y = (u - 1) / (u + 1)`; fails if `u == -1` (the point at infinity
    /// under the birational map) or if the resulting encoding is not a
    /// valid Edwards point.
    pub fn to_edwards(&self, sign_bit: u8) -> crate::errors::Result<EdwardsPoint> {
        let u = FieldElement::from_bytes(&self.0);
        let one = FieldElement::ONE;
        let numerator = u.sub(&one);
        let denominator = u.add(&one);
        let inv = denominator.invert()?;
        let y = numerator.mul(&inv);
        let mut y_bytes = y.to_bytes();
        y_bytes[31] &= 0x7f;
        y_bytes[31] |= (sign_bit & 1) << 7;
        CompressedEdwardsY(y_bytes).decompress()
    }
}

fn cswap(choice: Choice, a: &mut FieldElement, b: &mut FieldElement) {
    FieldElement::conditional_swap(a, b, choice);
}

/// RFC 7748 §5, Montgomery ladder variant with constant step count (255
/// iterations) and a single conditional swap per step.
fn montgomery_ladder(u: &FieldElement, clamped_scalar: &[u8; 32]) -> MontgomeryPoint {
    let x1 = *u;
    let mut x2 = FieldElement::ONE;
    let mut z2 = FieldElement::ZERO;
    let mut x3 = *u;
    let mut z3 = FieldElement::ONE;
    let mut swap = Choice::from(0u8);

    let a24 = field_a24();

    for t in (0..255).rev() {
        let byte = clamped_scalar[t / 8];
        let bit = Choice::from((byte >> (t % 8)) & 1);
        swap ^= bit;
        cswap(swap, &mut x2, &mut x3);
        cswap(swap, &mut z2, &mut z3);
        swap = bit;

        let a = x2.add(&z2);
        let aa = a.square();
        let b = x2.sub(&z2);
        let bb = b.square();
        let e = aa.sub(&bb);
        let c = x3.add(&z3);
        let d = x3.sub(&z3);
        let da = d.mul(&a);
        let cb = c.mul(&b);
        x3 = da.add(&cb).square();
        z3 = x1.mul(&da.sub(&cb).square());
        x2 = aa.mul(&bb);
        z2 = e.mul(&aa.add(&a24.mul(&e)));
    }

    cswap(swap, &mut x2, &mut x3);
    cswap(swap, &mut z2, &mut z3);

    let z2_inv = z2.invert().unwrap_or(FieldElement::ZERO);
    MontgomeryPoint((x2.mul(&z2_inv)).to_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let decoded = hex::decode(s).expect("valid hex");
        let mut out = [0u8; 32];
        out.copy_from_slice(&decoded);
        out
    }

    #[test]
    fn rfc7748_vector_1() {
        let scalar = hex32("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
        let u = hex32("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let expected = hex32("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");
        let result = MontgomeryPoint(u).mul_clamped(scalar);
        assert_eq!(result.0, expected);
    }

    #[test]
    fn rfc7748_vector_2() {
        let scalar = hex32("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
        let u = hex32("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let expected = hex32("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");
        let result = MontgomeryPoint(u).mul_clamped(scalar);
        assert_eq!(result.0, expected);
    }

    #[test]
    fn basepoint_ladder_matches_edwards_basepoint_order() {
        // [1]*basepoint == basepoint
        let mut one = [0u8; 32];
        one[0] = 1;
        let result = MontgomeryPoint::basepoint().mul_bits(&one);
        assert_eq!(result, MontgomeryPoint::basepoint());
    }
}
