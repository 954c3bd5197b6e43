pub mod sighash;

pub use sighash::*;
