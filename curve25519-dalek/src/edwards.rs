//! Points on the twisted Edwards curve `-x^2 + y^2 = 1 + d*x^2*y^2` used by
//! Ed25519 (`d` as in [`crate::constants::field_d`]).
//!
//! Points are held in extended projective coordinates `(X, Y, Z, T)` with
//! `x = X/Z`, `y = Y/Z`, `T = XY/Z`, using the unified Hisil–Wong–Carter–Dawson
//! addition and doubling formulas (the same formulas
//! `curve25519-dalek` itself uses for its extended backend) so that the same
//! code path handles doubling a point with itself, adding the identity, and
//! adding a point to its own negation without a separate branch.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::constants::{basepoint_x, basepoint_y, field_d2};
use crate::errors::{Error, Result};
use crate::field::FieldElement;

/// A point on the Edwards curve, in extended projective coordinates.
#[derive(Clone, Copy, Debug)]
pub struct EdwardsPoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

/// A compressed (32-byte) Edwards point encoding: the `y` coordinate with
/// the sign of `x` folded into the otherwise-unused top bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedEdwardsY(pub [u8; 32]);

impl EdwardsPoint {
    /// The identity element, `(0, 1)` in affine coordinates.
    pub fn identity() -> EdwardsPoint {
        EdwardsPoint {
            x: FieldElement::ZERO,
            y: FieldElement::ONE,
            z: FieldElement::ONE,
            t: FieldElement::ZERO,
        }
    }

    /// The standard Ed25519 basepoint `B`.
    pub fn basepoint() -> EdwardsPoint {
        let x = basepoint_x();
        let y = basepoint_y();
        let t = x.mul(&y);
        EdwardsPoint {
            x,
            y,
            z: FieldElement::ONE,
            t,
        }
    }

    pub(crate) fn from_affine(x: FieldElement, y: FieldElement) -> EdwardsPoint {
        EdwardsPoint {
            x,
            y,
            z: FieldElement::ONE,
            t: x.mul(&y),
        }
    }

    /// Build directly from extended coordinates already known to satisfy
    /// `X*Y == Z*T`, e.g. the output of a hash-to-curve map. Callers
    /// elsewhere in the crate always go through [`EdwardsPoint::from_affine`]
    /// instead; this exists for [`crate::ristretto::elligator_map`], whose
    /// formulas produce `Z != 1` directly.
    pub(crate) fn from_raw(
        x: FieldElement,
        y: FieldElement,
        z: FieldElement,
        t: FieldElement,
    ) -> EdwardsPoint {
        EdwardsPoint { x, y, z, t }
    }

    /// Affine `(x, y)` coordinates, obtained via a single field inversion.
    pub fn to_affine(&self) -> Result<(FieldElement, FieldElement)> {
        let zinv = self.z.invert()?;
        Ok((self.x.mul(&zinv), self.y.mul(&zinv)))
    }

    /// The birationally-equivalent Montgomery u-coordinate, `u = (1+y)/(1-y)`
    /// computed projectively as `(Z+Y)/(Z-Y)` to avoid normalizing first.
    /// `y = 1` (the identity) has no finite image under this map; as with
    /// [`crate::montgomery::MontgomeryPoint`]'s own all-zero convention for
    /// non-contributory results, it is mapped to `u = 0` rather than
    /// propagating an inversion error here.
    pub fn to_montgomery(&self) -> crate::montgomery::MontgomeryPoint {
        let z_plus_y = self.z.add(&self.y);
        let z_minus_y = self.z.sub(&self.y);
        let inv = z_minus_y.invert().unwrap_or(FieldElement::ZERO);
        crate::montgomery::MontgomeryPoint(z_plus_y.mul(&inv).to_bytes())
    }

    pub fn compress(&self) -> CompressedEdwardsY {
        // self.z is never zero for a point constructed by this module.
        let zinv = self
            .z
            .invert()
            .expect("EdwardsPoint invariant violated: z == 0");
        let x = self.x.mul(&zinv);
        let y = self.y.mul(&zinv);
        let mut bytes = y.to_bytes();
        let sign = x.is_negative();
        bytes[31] &= 0x7f;
        bytes[31] |= (sign.unwrap_u8()) << 7;
        CompressedEdwardsY(bytes)
    }

    pub fn add(&self, rhs: &EdwardsPoint) -> EdwardsPoint {
        let a = (self.y.sub(&self.x)).mul(&rhs.y.sub(&rhs.x));
        let b = (self.y.add(&self.x)).mul(&rhs.y.add(&rhs.x));
        let c = self.t.mul(&field_d2()).mul(&rhs.t);
        let d = self.z.mul(&rhs.z).add(&self.z.mul(&rhs.z));
        let e = b.sub(&a);
        let f = d.sub(&c);
        let g = d.add(&c);
        let h = b.add(&a);
        EdwardsPoint {
            x: e.mul(&f),
            y: g.mul(&h),
            z: f.mul(&g),
            t: e.mul(&h),
        }
    }

    pub fn double(&self) -> EdwardsPoint {
        let a = self.x.square();
        let b = self.y.square();
        let c = self.z.square().add(&self.z.square());
        let h = a.add(&b);
        let xy = self.x.add(&self.y);
        let e = h.sub(&xy.square());
        let g = a.sub(&b);
        let f = c.add(&g);
        EdwardsPoint {
            x: e.mul(&f),
            y: g.mul(&h),
            z: f.mul(&g),
            t: e.mul(&h),
        }
    }

    pub fn negate(&self) -> EdwardsPoint {
        EdwardsPoint {
            x: self.x.neg(),
            y: self.y,
            z: self.z,
            t: self.t.neg(),
        }
    }

    /// Constant-time equality of the points these coordinates represent,
    /// i.e. `X1*Z2 == X2*Z1 && Y1*Z2 == Y2*Z1` — no inversion required.
    pub fn ct_eq(&self, other: &EdwardsPoint) -> Choice {
        let xz = self.x.mul(&other.z);
        let zx = other.x.mul(&self.z);
        let yz = self.y.mul(&other.z);
        let zy = other.y.mul(&self.z);
        xz.ct_eq(&zx) & yz.ct_eq(&zy)
    }

    pub fn is_identity(&self) -> Choice {
        self.ct_eq(&EdwardsPoint::identity())
    }

    /// Normalize a batch of points to affine coordinates with a single
    /// inversion amortized over all of them, via [`FieldElement::invert_batch`].
    #[cfg(feature = "alloc")]
    pub fn batch_normalize(points: &[EdwardsPoint]) -> alloc::vec::Vec<EdwardsPoint> {
        use alloc::vec::Vec;
        let zs: Vec<FieldElement> = points.iter().map(|p| p.z).collect();
        let zinvs = FieldElement::invert_batch(&zs);
        points
            .iter()
            .zip(zinvs.iter())
            .map(|(p, zinv)| EdwardsPoint {
                x: p.x.mul(zinv),
                y: p.y.mul(zinv),
                z: FieldElement::ONE,
                t: p.x.mul(zinv).mul(&p.y.mul(zinv)),
            })
            .collect()
    }
}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        EdwardsPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice),
        }
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl Eq for EdwardsPoint {}

impl CompressedEdwardsY {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decode per RFC 8032 §5.1.3: recover `x` from `y` and the sign bit via
    /// `x^2 = (y^2 - 1) / (d*y^2 + 1)`, rejecting non-canonical `y` and the
    /// `(x=0, sign=1)` encoding which has no valid preimage.
    pub fn decompress(&self) -> Result<EdwardsPoint> {
        self.decompress_impl(true)
    }

    /// ZIP215-style non-strict decode: accepts any `y` in `[0, 2^255)`
    /// instead of requiring the canonical (`< p`) representative, reducing
    /// mod `p` before recovering `x`. Used for `R`/`A` acceptance in
    /// signature verification, where the cofactored check tolerates a
    /// non-canonical `y` that the strict decoder would otherwise reject.
    pub(crate) fn decompress_non_strict(&self) -> Result<EdwardsPoint> {
        self.decompress_impl(false)
    }

    fn decompress_impl(&self, strict: bool) -> Result<EdwardsPoint> {
        let mut y_bytes = self.0;
        let sign_bit = (y_bytes[31] >> 7) & 1;
        y_bytes[31] &= 0x7f;
        let y = FieldElement::from_bytes(&y_bytes);
        // Reject non-canonical y: re-encoding must match what we were given.
        if strict && y.to_bytes() != y_bytes {
            return Err(Error::InvalidEncoding);
        }
        let y2 = y.square();
        let u = y2.sub(&FieldElement::ONE);
        let v = y2.mul(&crate::constants::field_d()).add(&FieldElement::ONE);
        let (is_valid, mut x) = FieldElement::uv_ratio(&u, &v);
        if !bool::from(is_valid) {
            return Err(Error::InvalidPoint);
        }
        let x_is_zero = x.is_zero();
        if bool::from(x_is_zero) && sign_bit == 1 {
            return Err(Error::InvalidPoint);
        }
        let want_negative = Choice::from(sign_bit);
        let wrong_sign = x.is_negative() ^ want_negative;
        x.conditional_assign(&x.neg(), wrong_sign);
        Ok(EdwardsPoint::from_affine(x, y))
    }
}

impl From<EdwardsPoint> for CompressedEdwardsY {
    fn from(p: EdwardsPoint) -> CompressedEdwardsY {
        p.compress()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basepoint_roundtrips_through_compression() {
        let b = EdwardsPoint::basepoint();
        let compressed = b.compress();
        let decompressed = compressed.decompress().expect("basepoint decodes");
        assert_eq!(b, decompressed);
    }

    #[test]
    fn identity_is_identity() {
        assert!(bool::from(EdwardsPoint::identity().is_identity()));
    }

    #[test]
    fn double_matches_self_add() {
        let b = EdwardsPoint::basepoint();
        assert_eq!(b.double(), b.add(&b));
    }

    #[test]
    fn adding_negation_gives_identity() {
        let b = EdwardsPoint::basepoint();
        let sum = b.add(&b.negate());
        assert!(bool::from(sum.is_identity()));
    }

    #[test]
    fn basepoint_to_montgomery_matches_x25519_basepoint() {
        let u = EdwardsPoint::basepoint().to_montgomery();
        assert_eq!(u.as_bytes(), &crate::constants::X25519_BASEPOINT_BYTES);
    }

    #[test]
    fn basepoint_matches_known_encoding() {
        // RFC 8032 §5.1, the standard Ed25519 basepoint encoding: 0x58 followed
        // by 31 bytes of 0x66.
        let mut expected = [0x66u8; 32];
        expected[0] = 0x58;
        assert_eq!(EdwardsPoint::basepoint().compress().0, expected);
    }
}
