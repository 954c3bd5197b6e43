//! PSBT Updater Role
//!
//! Attaches the spent outputs and the key origins a signer needs to find its keys.

use bitcoin::bip32::KeySource;
use bitcoin::psbt::{Input, PsbtSighashType};
use bitcoin::{Psbt, TxOut, XOnlyPublicKey};
use secp256k1::PublicKey;
use tracing::debug;

use crate::error::{Error, Result};
use crate::flags::sighash::{SighashAlgorithm, SighashFlag};

fn input_mut(psbt: &mut Psbt, index: usize) -> Result<&mut Input> {
    let len = psbt.inputs.len();
    psbt.inputs
        .get_mut(index)
        .ok_or(Error::InputIndex { index, len })
}

/// Describe a P2WPKH input: the output it spends and the BIP32 origin of its key
pub fn update_input_segwit_v0(
    psbt: &mut Psbt,
    index: usize,
    utxo: TxOut,
    pubkey: PublicKey,
    source: KeySource,
) -> Result<()> {
    if !utxo.script_pubkey.is_p2wpkh() {
        return Err(Error::UnsupportedScript(utxo.script_pubkey.to_hex_string()));
    }

    let input = input_mut(psbt, index)?;
    input.witness_utxo = Some(utxo);
    input.bip32_derivation.insert(pubkey, source);
    debug!(index, %pubkey, "updated segwit v0 input");
    Ok(())
}

/// Describe a P2TR key-path input: the output it spends and the origin of its internal key
pub fn update_input_taproot(
    psbt: &mut Psbt,
    index: usize,
    utxo: TxOut,
    internal_key: XOnlyPublicKey,
    source: KeySource,
) -> Result<()> {
    if !utxo.script_pubkey.is_p2tr() {
        return Err(Error::UnsupportedScript(utxo.script_pubkey.to_hex_string()));
    }

    let input = input_mut(psbt, index)?;
    input.witness_utxo = Some(utxo);
    input.tap_internal_key = Some(internal_key);
    // key-path spends carry no leaf hashes
    input.tap_key_origins.insert(internal_key, (vec![], source));
    debug!(index, %internal_key, "updated taproot input");
    Ok(())
}

/// Request a non-default sighash type for an input
///
/// The input must already carry its witness UTXO so the flag can be checked
/// against the signing algorithm.
pub fn set_input_sighash(psbt: &mut Psbt, index: usize, flag: SighashFlag) -> Result<()> {
    let input = input_mut(psbt, index)?;
    let script_pubkey = input
        .witness_utxo
        .as_ref()
        .map(|utxo| utxo.script_pubkey.clone())
        .ok_or_else(|| Error::Sighash(format!("input {index} has no witness utxo")))?;

    let sighash_type = match SighashAlgorithm::for_script(&script_pubkey)? {
        SighashAlgorithm::Taproot => PsbtSighashType::from(flag.to_taproot()),
        _ => PsbtSighashType::from(flag.to_ecdsa()?),
    };
    input.sighash_type = Some(sighash_type);
    Ok(())
}

/// Record the origin of a change output key so the wallet can recognise it
pub fn update_output_bip32(
    psbt: &mut Psbt,
    index: usize,
    pubkey: PublicKey,
    source: KeySource,
) -> Result<()> {
    let len = psbt.outputs.len();
    let output = psbt
        .outputs
        .get_mut(index)
        .ok_or(Error::InputIndex { index, len })?;
    output.bip32_derivation.insert(pubkey, source);
    Ok(())
}

/// Record the internal key and origin of a taproot change output
pub fn update_output_taproot(
    psbt: &mut Psbt,
    index: usize,
    internal_key: XOnlyPublicKey,
    source: KeySource,
) -> Result<()> {
    let len = psbt.outputs.len();
    let output = psbt
        .outputs
        .get_mut(index)
        .ok_or(Error::InputIndex { index, len })?;
    output.tap_internal_key = Some(internal_key);
    output.tap_key_origins.insert(internal_key, (vec![], source));
    Ok(())
}
