pub mod p2pkh;

pub use p2pkh::{p2pkh_script_sig, P2PKHTransaction};
