pub mod p2wpkh_multi_input;
pub mod p2wpkh_single_input;

pub use p2wpkh_multi_input::MultiInputP2WPKHTransaction;
pub use p2wpkh_single_input::{sign_p2wpkh_input, P2WPKHTransaction};
