//! A pure-Rust implementation of Curve25519 group operations: Ed25519
//! signatures (RFC 8032), X25519 Diffie-Hellman (RFC 7748) and the
//! ristretto255 prime-order group (RFC 9496).
//!
//! - [`edwards`] — the twisted Edwards curve Ed25519 signs over.
//! - [`montgomery`] — the Montgomery-form curve X25519 operates on.
//! - [`ristretto`] — the prime-order quotient group built on top of the
//!   Edwards curve's 8-torsion subgroup.
//! - [`signing`] — Ed25519 signing and verification.
//! - [`field`] and [`scalar`] — the field `GF(2^255 - 19)` and scalar ring
//!   `Z/LZ` every point/signature type above is built from.
//!
//! This crate is `#![no_std]`; heap-allocating APIs (batch point
//! normalization, precomputed tables) are gated behind the `alloc` feature.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(non_snake_case)]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

pub mod constants;
pub mod edwards;
pub mod errors;
pub mod field;
pub mod montgomery;
pub mod ristretto;
pub mod scalar;
pub mod scalar_mul;
pub mod signing;

pub use errors::{Error, Result};
