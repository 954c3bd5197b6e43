pub mod address;
pub mod keys;
pub mod logging;
pub mod utxo;

pub use address::{p2pkh_address, p2tr_address, p2wpkh_address, parse_address, parse_network};
pub use keys::{
    compressed_public_key, derive_key, derived_public_key, generate_secret_key, master_xpriv,
    secret_key_from_seed, taproot_keypair, taproot_output_key, verify_ecdsa, verify_schnorr,
};
pub use logging::{initialize_logger, verbosity_level};
pub use utxo::{ensure_balanced, prevouts, unsigned_transaction, SpendableUtxo};
