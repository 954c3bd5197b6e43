//! PSBT (Partially Signed Bitcoin Transactions) Roles
//!
//! BIP174 splits building a transaction between independent participants.
//! Each role lives in its own module and works on a shared [`Psbt`]:
//! - Creator
//! - Updater
//! - Signer
//! - Combiner
//! - Finalizer
//! - Extractor

pub use bitcoin::Psbt;

pub mod codec;
pub mod combiner;
pub mod creator;
pub mod extractor;
pub mod finalizer;
pub mod signer;
pub mod updater;

#[cfg(test)]
pub(crate) mod fixtures;

pub use codec::*;
pub use combiner::*;
pub use creator::*;
pub use extractor::*;
pub use finalizer::*;
pub use signer::*;
pub use updater::*;
