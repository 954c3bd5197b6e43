//! PSBT Creator Role
//!
//! Wraps an unsigned transaction in an empty PSBT.

use bitcoin::{Psbt, Transaction};
use tracing::info;

use crate::error::{Error, Result};

/// Create a PSBT from a transaction whose inputs carry no unlocking data
pub fn create_psbt(unsigned_tx: Transaction) -> Result<Psbt> {
    for (index, input) in unsigned_tx.input.iter().enumerate() {
        if !input.script_sig.is_empty() || !input.witness.is_empty() {
            return Err(Error::NotUnsigned(index));
        }
    }

    let psbt = Psbt::from_unsigned_tx(unsigned_tx)?;
    info!(
        inputs = psbt.inputs.len(),
        outputs = psbt.outputs.len(),
        "created psbt"
    );
    Ok(psbt)
}
