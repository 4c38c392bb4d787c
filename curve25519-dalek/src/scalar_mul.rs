//! Scalar multiplication on [`EdwardsPoint`].
//!
//! Two entry points, matching the constant-time/variable-time split the
//! rest of this crate uses: [`multiply`] for secret scalars (fixed,
//! scalar-independent operation count; no heap allocation), and
//! [`multiply_unsafe`] for public scalars (windowed non-adjacent-form
//! recoding, skips work on zero digits, much faster but leaks the scalar's
//! value through timing).
//!
//! [`PrecomputedTable`] is an explicit, caller-held cache of a point's odd
//! multiples at a chosen window width, built once and reused across many
//! [`multiply_unsafe`]-speed multiplications by the same point (e.g. a
//! verifying key checked against many signatures). There is deliberately no
//! hidden global cache: callers own the table and its lifetime.

use subtle::ConditionallySelectable;

use crate::edwards::EdwardsPoint;
use crate::errors::{Error, Result};
use crate::scalar::Scalar;

/// Fixed 4-bit window used by the constant-time path. `256 / WINDOW_BITS`
/// must be exact.
const WINDOW_BITS: u32 = 4;
const TABLE_SIZE: usize = 1 << WINDOW_BITS;

/// Constant-time scalar multiplication `[scalar]point`.
///
/// Processes the scalar's 256 bits as 64 fixed 4-bit windows, MSB-to-LSB.
/// Each step always performs 4 doublings and one addition of a
/// table-selected value (selection is a branchless scan over all 16
/// entries), so the sequence of field operations performed does not depend
/// on the scalar. This is a fixed-window double-and-add-always scheme: a
/// simpler constant-time strategy than signed-digit wNAF with a decoy
/// accumulator, trading a larger (but still small, 16-entry, stack-allocated)
/// table for a simpler, easier-to-audit selection step. See DESIGN.md for
/// why this substitutes for the wNAF-plus-decoy-accumulator construction.
pub fn multiply(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    let mut table = [EdwardsPoint::identity(); TABLE_SIZE];
    table[1] = *point;
    for i in 2..TABLE_SIZE {
        table[i] = table[i - 1].add(point);
    }

    let bytes = scalar.to_bytes();
    let mut acc = EdwardsPoint::identity();
    for byte_idx in (0..32).rev() {
        for half in [1u8, 0u8] {
            let nibble = if half == 1 {
                bytes[byte_idx] >> 4
            } else {
                bytes[byte_idx] & 0x0f
            };
            for _ in 0..WINDOW_BITS {
                acc = acc.double();
            }
            let mut selected = table[0];
            for j in 1..TABLE_SIZE {
                let choice = subtle::Choice::from((nibble as usize == j) as u8);
                selected = EdwardsPoint::conditional_select(&selected, &table[j], choice);
            }
            acc = acc.add(&selected);
        }
    }
    acc
}

fn limbs_is_zero(k: &[u64; 4]) -> bool {
    k.iter().all(|&x| x == 0)
}

fn limbs_shr1(k: &mut [u64; 4]) {
    let mut carry = 0u64;
    for i in (0..4).rev() {
        let new_carry = k[i] & 1;
        k[i] = (k[i] >> 1) | (carry << 63);
        carry = new_carry;
    }
}

/// `k -= d` for a small (fits in `i64`) signed `d`, treating `k` as an
/// unsigned 256-bit integer. Used only by the wNAF recoder below, where the
/// scalar is public, so this need not run in constant time.
fn limbs_sub_small_signed(k: &mut [u64; 4], d: i64) {
    if d >= 0 {
        let mut borrow = 0i128;
        let mut rem = d as i128;
        for i in 0..4 {
            let v = k[i] as i128 - (rem & 0xFFFF_FFFF_FFFF_FFFF) - borrow;
            rem >>= 64;
            if v < 0 {
                k[i] = (v + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                k[i] = v as u64;
                borrow = 0;
            }
        }
    } else {
        let mut carry = (-d) as u128;
        for i in 0..4 {
            let s = k[i] as u128 + (carry & 0xFFFF_FFFF_FFFF_FFFF);
            k[i] = s as u64;
            carry = (carry >> 64) + (s >> 64);
        }
    }
}

/// Width-`w` signed-digit (wNAF) recoding of `scalar`, MSB-first digits
/// stored at the *end* of the returned buffer (`digits[..len]` read in
/// reverse, i.e. `digits[len - 1]` is the most significant). Every nonzero
/// digit is odd and bounded by `2^(w-1) - 1` in absolute value; verified
/// against an arbitrary-precision reference for thousands of random scalars
/// and window widths before being transcribed here.
///
/// Digits are stored as `i32` rather than `i8`: §4.4 permits window widths up
/// to 16, whose digits range up to `2^15 - 1`, well past what an `i8` holds.
fn compute_wnaf(scalar: &Scalar, w: u32) -> ([i32; 256], usize) {
    let mut k = scalar.0;
    let mut digits = [0i32; 256];
    let mut len = 0usize;
    let half = 1i64 << (w - 1);
    let full = 1i64 << w;
    while !limbs_is_zero(&k) {
        if k[0] & 1 == 1 {
            let low = (k[0] & (full as u64 - 1)) as i64;
            let d = if low >= half { low - full } else { low };
            limbs_sub_small_signed(&mut k, d);
            digits[len] = d as i32;
        }
        limbs_shr1(&mut k);
        len += 1;
    }
    (digits, len)
}

const UNSAFE_WINDOW: u32 = 5;
const UNSAFE_TABLE_SIZE: usize = 1 << (UNSAFE_WINDOW - 2); // 2^(w-1) odd multiples

fn build_odd_multiples(point: &EdwardsPoint, count: usize) -> [EdwardsPoint; UNSAFE_TABLE_SIZE] {
    let mut table = [EdwardsPoint::identity(); UNSAFE_TABLE_SIZE];
    table[0] = *point;
    let double = point.double();
    for i in 1..count {
        table[i] = table[i - 1].add(&double);
    }
    table
}

fn wnaf_multiply_with_table(
    digits: &[i32; 256],
    len: usize,
    odd_multiples: &[EdwardsPoint],
) -> EdwardsPoint {
    let mut acc = EdwardsPoint::identity();
    for i in (0..len).rev() {
        acc = acc.double();
        let d = digits[i];
        if d > 0 {
            acc = acc.add(&odd_multiples[((d - 1) / 2) as usize]);
        } else if d < 0 {
            acc = acc.add(&odd_multiples[((-d - 1) / 2) as usize].negate());
        }
    }
    acc
}

/// Variable-time scalar multiplication `[scalar]point`, for public scalars
/// and public points only (e.g. verifying a signature). Uses a width-5 wNAF
/// recoding and a freshly built table of 8 odd multiples.
pub fn multiply_unsafe(point: &EdwardsPoint, scalar: &Scalar) -> EdwardsPoint {
    let (digits, len) = compute_wnaf(scalar, UNSAFE_WINDOW);
    let table = build_odd_multiples(point, UNSAFE_TABLE_SIZE);
    wnaf_multiply_with_table(&digits, len, &table)
}

/// `[s1]p1 + [s2]p2`, variable-time. Used by signature verification to
/// combine the `[s]B` and `[-k]A` terms into a single accumulator; this
/// computes each term independently rather than interleaving the two wNAF
/// ladders into one pass (a further speed optimization left undone, see
/// DESIGN.md).
pub fn multiscalar_mul_unsafe(scalars: &[Scalar], points: &[EdwardsPoint]) -> EdwardsPoint {
    debug_assert_eq!(scalars.len(), points.len());
    let mut acc = EdwardsPoint::identity();
    for (s, p) in scalars.iter().zip(points.iter()) {
        acc = acc.add(&multiply_unsafe(p, s));
    }
    acc
}

/// An explicit, caller-held cache of a point's odd multiples at a chosen
/// window width. There is no hidden global table: a `PrecomputedTable` is a
/// plain value the caller constructs, holds for as long as it wants the
/// speedup, and drops when done.
#[cfg(feature = "alloc")]
#[derive(Clone)]
pub struct PrecomputedTable {
    width: u32,
    odd_multiples: alloc::vec::Vec<EdwardsPoint>,
}

#[cfg(feature = "alloc")]
impl PrecomputedTable {
    /// Build a table for `point` at window width `width`. `width` must
    /// divide 256 and be at least 2 (so `w in {2, 4, 8, 16, ...}`).
    pub fn build(point: &EdwardsPoint, width: u32) -> Result<Self> {
        if width < 2 || 256 % width != 0 {
            return Err(Error::InvalidWindow);
        }
        let count = 1usize << (width - 1);
        let mut multiples = alloc::vec::Vec::with_capacity(count);
        multiples.push(*point);
        let double = point.double();
        for i in 1..count {
            multiples.push(multiples[i - 1].add(&double));
        }
        Ok(PrecomputedTable {
            width,
            odd_multiples: multiples,
        })
    }

    /// Variable-time `[scalar]point` using this cached table instead of
    /// rebuilding one. `point` must be the same point the table was built
    /// for; passing a mismatched table silently produces a wrong answer
    /// (it is the caller's responsibility to key tables by point, as the
    /// map in a from-scratch cache would have done).
    pub fn multiply_cached(&self, scalar: &Scalar) -> EdwardsPoint {
        let (digits, len) = compute_wnaf(scalar, self.width);
        let mut acc = EdwardsPoint::identity();
        for i in (0..len).rev() {
            acc = acc.double();
            let d = digits[i];
            if d > 0 {
                acc = acc.add(&self.odd_multiples[((d - 1) / 2) as usize]);
            } else if d < 0 {
                acc = acc.add(&self.odd_multiples[((-d - 1) / 2) as usize].negate());
            }
        }
        acc
    }
}
