//! PSBT Transaction Extractor Role

use bitcoin::Psbt;
use tracing::info;

use crate::error::{Error, Result};
use crate::psbt::finalizer::is_finalized;
use crate::traits::transaction::SignedTransaction;

/// Extract the network-ready transaction from a fully finalized PSBT
pub fn extract_transaction(psbt: Psbt) -> Result<SignedTransaction> {
    if let Some(index) = psbt.inputs.iter().position(|input| !is_finalized(input)) {
        return Err(Error::InputNotFinalized(index));
    }

    let tx = psbt.extract_tx().map_err(|e| Error::Extract(e.to_string()))?;
    let signed = SignedTransaction::new(tx);
    info!(txid = %signed.txid(), vsize = signed.vsize(), "extracted transaction");
    Ok(signed)
}
