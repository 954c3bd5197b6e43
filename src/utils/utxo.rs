//! Spendable outputs and unsigned transaction assembly

use bitcoin::absolute::LockTime;
use bitcoin::hashes::Hash;
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};

use crate::error::{Error, Result};

/// A previous output that a new transaction can spend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableUtxo {
    pub outpoint: OutPoint,
    pub txout: TxOut,
}

impl SpendableUtxo {
    pub fn new(outpoint: OutPoint, txout: TxOut) -> Self {
        Self { outpoint, txout }
    }

    /// A UTXO with an all-zero txid, standing in for a real funding transaction
    pub fn dummy(vout: u32, value: Amount, script_pubkey: ScriptBuf) -> Self {
        Self {
            outpoint: OutPoint {
                txid: Txid::all_zeros(),
                vout,
            },
            txout: TxOut {
                value,
                script_pubkey,
            },
        }
    }

    pub fn value(&self) -> Amount {
        self.txout.value
    }

    pub fn script_pubkey(&self) -> &ScriptBuf {
        &self.txout.script_pubkey
    }
}

/// Assemble an unsigned version 2 transaction spending `utxos` in order
///
/// Script-sigs and witnesses are left empty for the signer to fill in.
pub fn unsigned_transaction(
    utxos: &[SpendableUtxo],
    outputs: Vec<TxOut>,
    sequence: Sequence,
) -> Transaction {
    let input = utxos
        .iter()
        .map(|utxo| TxIn {
            previous_output: utxo.outpoint,
            script_sig: ScriptBuf::new(),
            sequence,
            witness: Witness::default(),
        })
        .collect();

    Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input,
        output: outputs,
    }
}

/// Previous outputs in input order, as required by the taproot sighash
pub fn prevouts(utxos: &[SpendableUtxo]) -> Vec<TxOut> {
    utxos.iter().map(|utxo| utxo.txout.clone()).collect()
}

/// Check that inputs cover outputs and return the fee
pub fn ensure_balanced(utxos: &[SpendableUtxo], outputs: &[TxOut]) -> Result<Amount> {
    let inputs = sum(utxos.iter().map(SpendableUtxo::value))?;
    let spent = sum(outputs.iter().map(|out| out.value))?;

    inputs
        .checked_sub(spent)
        .ok_or(Error::InsufficientFunds {
            inputs,
            outputs: spent,
        })
}

fn sum(amounts: impl Iterator<Item = Amount>) -> Result<Amount> {
    amounts.fold(Ok(Amount::ZERO), |acc, amount| {
        acc?.checked_add(amount).ok_or(Error::AmountOverflow)
    })
}
