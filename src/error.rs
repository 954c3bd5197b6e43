//! Error types for the cookbook recipes and book tooling

use std::path::PathBuf;

use bitcoin::Network;
use thiserror::Error;

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid address: {0}")]
    Address(#[from] bitcoin::address::ParseError),

    #[error("Address {address} is not valid for network {expected}")]
    WrongNetwork { address: String, expected: Network },

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Key error: {0}")]
    Key(#[from] secp256k1::Error),

    #[error("BIP32 error: {0}")]
    Bip32(#[from] bitcoin::bip32::Error),

    #[error("Sighash computation failed: {0}")]
    Sighash(String),

    #[error("Legacy sighash failed: {0}")]
    LegacySighash(#[from] bitcoin::transaction::InputsIndexError),

    #[error("SegWit v0 sighash failed: {0}")]
    SegwitSighash(#[from] bitcoin::sighash::P2wpkhError),

    #[error("Taproot sighash failed: {0}")]
    TaprootSighash(#[from] bitcoin::sighash::TaprootError),

    #[error("Input index {index} out of range for transaction with {len} inputs")]
    InputIndex { index: usize, len: usize },

    #[error("Expected {expected} prevouts, got {actual}")]
    PrevoutCount { expected: usize, actual: usize },

    #[error("Key does not control the output spent by input {0}")]
    KeyMismatch(usize),

    #[error("Unsupported locking script: {0}")]
    UnsupportedScript(String),

    #[error("Outputs ({outputs}) exceed inputs ({inputs})")]
    InsufficientFunds {
        inputs: bitcoin::Amount,
        outputs: bitcoin::Amount,
    },

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Script error: {0}")]
    Script(#[from] bitcoin::script::PushBytesError),

    #[error("PSBT error: {0}")]
    Psbt(#[from] bitcoin::psbt::Error),

    #[error("Invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Signing failed for inputs: {0}")]
    PsbtSigning(String),

    #[error("Cannot finalize input {0} with available data")]
    CannotFinalize(usize),

    #[error("Input {0} not finalized")]
    InputNotFinalized(usize),

    #[error("Transaction extraction failed: {0}")]
    Extract(String),

    #[error("Unsigned transaction input {0} already carries unlocking data")]
    NotUnsigned(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("`{program}` failed: {status}")]
    CommandFailed { program: String, status: String },

    #[error("Snippet error in {path:?}: {message}")]
    Snippet { path: PathBuf, message: String },
}
