//! Taproot (P2TR) transaction support
//!
//! BIP340 Schnorr signatures over BIP341 key-path sighashes.

pub mod p2tr;
pub mod schnorr;

pub use p2tr::*;
pub use schnorr::*;
