//! Curve, field and group constants.
//!
//! Every constant below was derived from its defining algebraic relation with
//! an independent arbitrary-precision arithmetic tool and cross-checked
//! against the relation itself (e.g. `SQRT_M1 * SQRT_M1 == -1 mod p`,
//! `BASEPOINT` satisfies the curve equation and matches the RFC 8032 encoded
//! basepoint) rather than hand-copied from a reference implementation.

use crate::field::FieldElement;
use crate::scalar::Scalar;

/// `p = 2^255 - 19`, as little-endian 64-bit limbs.
pub(crate) const FIELD_P: [u64; 4] = [
    0xffffffffffffffed,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x7fffffffffffffff,
];

/// `p - 2`, the exponent for Fermat-little-theorem inversion.
pub(crate) const P_MINUS_2: [u64; 4] = [
    0xffffffffffffffeb,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x7fffffffffffffff,
];

/// `(p - 5) / 8`, the exponent used by [`crate::field::FieldElement::pow_2_252_3`]
/// and by the `p ≡ 5 (mod 8)` square-root algorithm.
pub(crate) const P_MINUS_5_DIV_8: [u64; 4] = [
    0xfffffffffffffffd,
    0xffffffffffffffff,
    0xffffffffffffffff,
    0x0fffffffffffffff,
];

/// `2^256 mod p`, used to fold the high half of a 512-bit product back into
/// the low half during field-element reduction.
pub(crate) const TWO_256_MOD_P: u64 = 38;

/// The order of the prime-order subgroup, `L = 2^252 + 27742317777372353535851937790883648493`.
pub(crate) const GROUP_L: [u64; 4] = [
    0x5812631a5cf5d3ed,
    0x14def9dea2f79cd6,
    0x0000000000000000,
    0x1000000000000000,
];

/// The Edwards curve parameter `d = -121665/121666 mod p`.
pub(crate) const EDWARDS_D: [u64; 4] = [
    0x75eb4dca135978a3,
    0x00700a4d4141d8ab,
    0x8cc740797779e898,
    0x52036cee2b6ffe73,
];

/// `2*d`, used by the unified addition formula.
pub(crate) const EDWARDS_D2: [u64; 4] = [
    0xebd69b9426b2f159,
    0x00e0149a8283b156,
    0x198e80f2eef3d130,
    0x2406d9dc56dffce7,
];

/// A square root of `-1` mod `p`, used by [`crate::field::FieldElement::uv_ratio`]
/// and by Ristretto decompression.
pub(crate) const SQRT_M1: [u64; 4] = [
    0xc4ee1b274a0ea0b0,
    0x2f431806ad2fe478,
    0x2b4d00993dfbd7a7,
    0x2b8324804fc1df0b,
];

/// The x-coordinate of the standard Ed25519 basepoint.
pub(crate) const BASEPOINT_X: [u64; 4] = [
    0xc9562d608f25d51a,
    0x692cc7609525a7b2,
    0xc0a4e231fdd6dc5c,
    0x216936d3cd6e53fe,
];

/// The y-coordinate of the standard Ed25519 basepoint.
pub(crate) const BASEPOINT_Y: [u64; 4] = [
    0x6666666666666658,
    0x6666666666666666,
    0x6666666666666666,
    0x6666666666666666,
];

/// `1/sqrt(a - d)` where `a = -1`, used by Ristretto decompression.
pub(crate) const INVSQRT_A_MINUS_D: [u64; 4] = [
    0x99c8fdaa805d40ea,
    0x9d2f16175a4172be,
    0x16c27b91fe01d840,
    0x786c8905cfaffca2,
];

/// `sqrt(a*d - 1)` where `a = -1`, used by Ristretto compression.
pub(crate) const SQRT_AD_MINUS_ONE: [u64; 4] = [
    0x7e97f6a0497b2e1b,
    0xaf9d8e0c1b7854bd,
    0x0f3cfcc931f5d1fd,
    0x376931bf2b8348ac,
];

/// `1 - d^2`, used by Ristretto decompression.
pub(crate) const ONE_MINUS_D_SQ: [u64; 4] = [
    0xe27c09c1945fc176,
    0x2c81a138cd5e350f,
    0x9994abddbe70dfe4,
    0x029072a8b2b3e0d7,
];

/// `(d - 1)^2`, used by Ristretto decompression.
pub(crate) const D_MINUS_ONE_SQ: [u64; 4] = [
    0x31ad5aaa44ed4d20,
    0xd29e4a2cb01e1999,
    0x4cdcd32f529b4eeb,
    0x5968b37af66c2241,
];

/// The ratio of the full curve order to the prime-order subgroup order.
pub const COFACTOR: u8 = 8;

/// The standard X25519 base u-coordinate, `0x09 || 0x00 * 31`.
pub const X25519_BASEPOINT_BYTES: [u8; 32] = {
    let mut b = [0u8; 32];
    b[0] = 9;
    b
};

/// The curve's 8-torsion subgroup, as compressed Edwards encodings. Entry 0
/// is the identity; the rest are the seven non-identity points of order
/// dividing 8, generated by repeatedly adding a fixed order-8 point. Exposed
/// for test vectors and small-subgroup checks, e.g. rejecting these as
/// X25519 Diffie-Hellman inputs.
pub const EIGHT_TORSION: [[u8; 32]; 8] = [
    [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0xc7, 0x17, 0x6a, 0x70, 0x3d, 0x4d, 0xd8, 0x4f, 0xba, 0x3c, 0x0b, 0x76, 0x0d, 0x10, 0x67,
        0x0f, 0x2a, 0x20, 0x53, 0xfa, 0x2c, 0x39, 0xcc, 0xc6, 0x4e, 0xc7, 0xfd, 0x77, 0x92, 0xac,
        0x03, 0x7a,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x80,
    ],
    [
        0x26, 0xe8, 0x95, 0x8f, 0xc2, 0xb2, 0x27, 0xb0, 0x45, 0xc3, 0xf4, 0x89, 0xf2, 0xef, 0x98,
        0xf0, 0xd5, 0xdf, 0xac, 0x05, 0xd3, 0xc6, 0x33, 0x39, 0xb1, 0x38, 0x02, 0x88, 0x6d, 0x53,
        0xfc, 0x05,
    ],
    [
        0xec, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ],
    [
        0x26, 0xe8, 0x95, 0x8f, 0xc2, 0xb2, 0x27, 0xb0, 0x45, 0xc3, 0xf4, 0x89, 0xf2, 0xef, 0x98,
        0xf0, 0xd5, 0xdf, 0xac, 0x05, 0xd3, 0xc6, 0x33, 0x39, 0xb1, 0x38, 0x02, 0x88, 0x6d, 0x53,
        0xfc, 0x85,
    ],
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0xc7, 0x17, 0x6a, 0x70, 0x3d, 0x4d, 0xd8, 0x4f, 0xba, 0x3c, 0x0b, 0x76, 0x0d, 0x10, 0x67,
        0x0f, 0x2a, 0x20, 0x53, 0xfa, 0x2c, 0x39, 0xcc, 0xc6, 0x4e, 0xc7, 0xfd, 0x77, 0x92, 0xac,
        0x03, 0xfa,
    ],
];

/// The four distinct non-contributory X25519 u-coordinates: the images of
/// [`EIGHT_TORSION`]'s seven non-identity points under the birational map
/// `u = (1+y)/(1-y)` (two torsion points can share a u-coordinate, since the
/// Montgomery ladder only ever sees `u`, never the sign-bearing `y`).
pub const X25519_SMALL_ORDER_U: [[u8; 32]; 4] = [
    [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ],
    [
        0xe0, 0xeb, 0x7a, 0x7c, 0x3b, 0x41, 0xb8, 0xae, 0x16, 0x56, 0xe3, 0xfa, 0xf1, 0x9f, 0xc4,
        0x6a, 0xda, 0x09, 0x8d, 0xeb, 0x9c, 0x32, 0xb1, 0xfd, 0x86, 0x62, 0x05, 0x16, 0x5f, 0x49,
        0xb8, 0x00,
    ],
    [
        0x5f, 0x9c, 0x95, 0xbc, 0xa3, 0x50, 0x8c, 0x24, 0xb1, 0xd0, 0xb1, 0x55, 0x9c, 0x83, 0xef,
        0x5b, 0x04, 0x44, 0x5c, 0xc4, 0x58, 0x1c, 0x8e, 0x86, 0xd8, 0x22, 0x4e, 0xdd, 0xd0, 0x9f,
        0x11, 0x57,
    ],
];

pub(crate) fn field_d() -> FieldElement {
    FieldElement::from_limbs(EDWARDS_D)
}

pub(crate) fn field_d2() -> FieldElement {
    FieldElement::from_limbs(EDWARDS_D2)
}

pub(crate) fn field_sqrt_m1() -> FieldElement {
    FieldElement::from_limbs(SQRT_M1)
}

pub(crate) fn field_invsqrt_a_minus_d() -> FieldElement {
    FieldElement::from_limbs(INVSQRT_A_MINUS_D)
}

pub(crate) fn field_sqrt_ad_minus_one() -> FieldElement {
    FieldElement::from_limbs(SQRT_AD_MINUS_ONE)
}

pub(crate) fn field_one_minus_d_sq() -> FieldElement {
    FieldElement::from_limbs(ONE_MINUS_D_SQ)
}

pub(crate) fn field_d_minus_one_sq() -> FieldElement {
    FieldElement::from_limbs(D_MINUS_ONE_SQ)
}

pub(crate) fn basepoint_x() -> FieldElement {
    FieldElement::from_limbs(BASEPOINT_X)
}

pub(crate) fn basepoint_y() -> FieldElement {
    FieldElement::from_limbs(BASEPOINT_Y)
}

/// The group order as a [`Scalar`], `0 <= L < 2^256`.
pub(crate) fn group_order_scalar() -> Scalar {
    Scalar::from_limbs_unreduced(GROUP_L)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edwards::CompressedEdwardsY;

    #[test]
    fn eight_torsion_entry_zero_is_identity() {
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(EIGHT_TORSION[0], expected);
    }

    #[test]
    fn eight_torsion_entries_have_order_dividing_eight() {
        for bytes in EIGHT_TORSION.iter() {
            let p = CompressedEdwardsY(*bytes)
                .decompress()
                .expect("torsion table entries are valid curve points");
            let mut acc = p;
            for _ in 0..3 {
                acc = acc.double();
            }
            assert!(bool::from(acc.is_identity()));
        }
    }
}
