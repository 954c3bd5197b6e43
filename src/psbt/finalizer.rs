//! PSBT Input Finalizer Role
//!
//! Turns collected signatures into final scriptSigs and witnesses.

use bitcoin::psbt::Input;
use bitcoin::{ecdsa, Psbt, ScriptBuf, Witness};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::legacy::p2pkh::p2pkh_script_sig;

/// Whether an input already carries its final unlocking data
pub fn is_finalized(input: &Input) -> bool {
    input.final_script_sig.is_some() || input.final_script_witness.is_some()
}

/// Locking script of the output spent by an input, from whichever UTXO field is present
fn spent_script(psbt: &Psbt, index: usize) -> Option<ScriptBuf> {
    let input = &psbt.inputs[index];
    if let Some(utxo) = &input.witness_utxo {
        return Some(utxo.script_pubkey.clone());
    }
    let vout = psbt.unsigned_tx.input[index].previous_output.vout as usize;
    input
        .non_witness_utxo
        .as_ref()
        .and_then(|prev| prev.output.get(vout))
        .map(|out| out.script_pubkey.clone())
}

// The one partial signature, provided its key is the one the script commits to
fn single_partial_sig(
    input: &Input,
    index: usize,
    script_pubkey: &ScriptBuf,
) -> Result<(bitcoin::PublicKey, ecdsa::Signature)> {
    if input.partial_sigs.len() != 1 {
        return Err(Error::CannotFinalize(index));
    }
    let (pubkey, sig) = input
        .partial_sigs
        .iter()
        .next()
        .map(|(pubkey, sig)| (*pubkey, *sig))
        .ok_or(Error::CannotFinalize(index))?;

    let committed = if script_pubkey.is_p2wpkh() {
        pubkey
            .wpubkey_hash()
            .map(|hash| ScriptBuf::new_p2wpkh(&hash) == *script_pubkey)
            .unwrap_or(false)
    } else {
        ScriptBuf::new_p2pkh(&pubkey.pubkey_hash()) == *script_pubkey
    };
    if !committed {
        warn!(index, %pubkey, "partial signature key does not match the spent script");
        return Err(Error::CannotFinalize(index));
    }
    Ok((pubkey, sig))
}

// Only the UTXO and final fields survive finalization
fn clear_signing_data(input: &mut Input) {
    input.partial_sigs.clear();
    input.sighash_type = None;
    input.redeem_script = None;
    input.witness_script = None;
    input.bip32_derivation.clear();
    input.tap_key_sig = None;
    input.tap_script_sigs.clear();
    input.tap_scripts.clear();
    input.tap_key_origins.clear();
    input.tap_internal_key = None;
    input.tap_merkle_root = None;
}

/// Finalize one input
///
/// Inputs that are already final are left as they are.
pub fn finalize_input(psbt: &mut Psbt, index: usize) -> Result<()> {
    let len = psbt.inputs.len();
    if index >= len {
        return Err(Error::InputIndex { index, len });
    }
    if is_finalized(&psbt.inputs[index]) {
        debug!(index, "input already finalized");
        return Ok(());
    }

    let script_pubkey = spent_script(psbt, index).ok_or(Error::CannotFinalize(index))?;
    let input = &mut psbt.inputs[index];

    if script_pubkey.is_p2tr() {
        let sig = input.tap_key_sig.ok_or(Error::CannotFinalize(index))?;
        input.final_script_witness = Some(Witness::p2tr_key_spend(&sig));
    } else if script_pubkey.is_p2wpkh() {
        let (pubkey, sig) = single_partial_sig(input, index, &script_pubkey)?;
        input.final_script_witness = Some(Witness::p2wpkh(&sig, &pubkey.inner));
    } else if script_pubkey.is_p2pkh() {
        let (pubkey, sig) = single_partial_sig(input, index, &script_pubkey)?;
        input.final_script_sig = Some(p2pkh_script_sig(&sig, &pubkey)?);
    } else {
        warn!(index, script = %script_pubkey.to_hex_string(), "no finalizer for script");
        return Err(Error::CannotFinalize(index));
    }

    clear_signing_data(input);
    debug!(index, "finalized input");
    Ok(())
}

/// Finalize every input
///
/// Either every input ends up final or the PSBT is left as it was.
pub fn finalize_psbt(psbt: &mut Psbt) -> Result<()> {
    let mut finalized = psbt.clone();
    for index in 0..finalized.inputs.len() {
        finalize_input(&mut finalized, index)?;
    }
    *psbt = finalized;
    info!(inputs = psbt.inputs.len(), "finalized psbt");
    Ok(())
}
