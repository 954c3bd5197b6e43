//! # Bitcoin Transaction Cookbook
//!
//! Executable recipes for building and signing Bitcoin transactions with
//! `rust-bitcoin`, and the tooling that keeps the cookbook pages honest.
//!
//! ## Features
//!
//! - **Legacy Transactions**
//!   - P2PKH (Pay-to-Public-Key-Hash) with one or more inputs
//!
//! - **SegWit v0 Transactions**
//!   - P2WPKH (Pay-to-Witness-Public-Key-Hash) single and multiple inputs
//!
//! - **Taproot Transactions**
//!   - P2TR key-path spends signed with BIP340 Schnorr
//!
//! - **PSBT**
//!   - Creator, Updater, Signer, Combiner, Finalizer and Extractor roles (BIP174)
//!
//! - **Utilities**
//!   - Key generation and BIP32 derivation
//!   - Address encoding and network checks
//!   - Sighash computation for every supported output type
//!
//! - **Book tooling**
//!   - Code block extraction, a test harness that runs every page, and the
//!     build/serve/deploy tasks behind the `cookbook` binary
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitcoin::{Amount, Network, TxOut};
//! use bitcoin::secp256k1::Secp256k1;
//! use bitcoin_cookbook::*;
//!
//! let secp = Secp256k1::new();
//! let sk = secret_key_from_seed([0x11; 32]).unwrap();
//! let pubkey = compressed_public_key(&secp, &sk);
//! let address = p2wpkh_address(&pubkey, Network::Regtest);
//!
//! let utxo = SpendableUtxo::dummy(0, Amount::from_sat(20_000_000), address.script_pubkey());
//! let mut tx = P2WPKHTransaction::new(utxo, sk);
//! tx.add_output(TxOut {
//!     value: Amount::from_sat(19_999_000),
//!     script_pubkey: address.script_pubkey(),
//! });
//!
//! let signed = tx.sign(&secp).unwrap();
//! println!("{}", signed.to_hex());
//! ```
//!
//! ## Safety
//!
//! ⚠️ **Educational Purpose Only**: the recipes spend dummy UTXOs with keys
//! derived from fixed seeds. Never reuse those keys for real funds.

pub mod book;
pub mod cli;
pub mod error;
pub mod flags;
pub mod legacy;
pub mod psbt;
pub mod segwit;
pub mod taproot;
pub mod traits;
pub mod utils;

pub use book::{CookbookConfig, HarnessReport, Task};
pub use error::{Error, Result};
pub use flags::*;
pub use legacy::*;
pub use psbt::*;
pub use segwit::*;
pub use taproot::*;
pub use traits::*;
pub use utils::*;
