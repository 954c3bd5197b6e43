//! Taproot (P2TR) key-path spending
//!
//! Each input is signed under the BIP341 sighash, which commits to every
//! previous output of the transaction, not only the one being spent.

use bitcoin::key::Keypair;
use bitcoin::sighash::TapSighashType;
use bitcoin::{ScriptBuf, Sequence, Transaction, TxOut, Witness};
use secp256k1::{Secp256k1, Signing, Verification};
use tracing::info;

use crate::error::{Error, Result};
use crate::flags::sighash::{taproot_key_spend_sighash, SighashFlag};
use crate::taproot::schnorr::schnorr_sign;
use crate::traits::transaction::{SignedTransaction, TransactionRecipe};
use crate::utils::*;

#[derive(Debug, Clone)]
pub struct TaprootTxInput {
    pub utxo: SpendableUtxo,
    pub keypair: Keypair,
    pub sighash_flag: SighashFlag,
}

/// Key-path spend of one or more P2TR UTXOs
#[derive(Debug, Clone, Default)]
pub struct TaprootTransaction {
    inputs: Vec<TaprootTxInput>,
    outputs: Vec<TxOut>,
}

impl TaprootTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, utxo: SpendableUtxo, keypair: Keypair) {
        self.inputs.push(TaprootTxInput {
            utxo,
            keypair,
            sighash_flag: SighashFlag::Default,
        });
    }

    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    pub fn set_sighash_flag(&mut self, input_index: usize, flag: SighashFlag) -> Result<()> {
        let len = self.inputs.len();
        let input = self.inputs.get_mut(input_index).ok_or(Error::InputIndex {
            index: input_index,
            len,
        })?;
        input.sighash_flag = flag;
        Ok(())
    }

    fn utxos(&self) -> Vec<SpendableUtxo> {
        self.inputs.iter().map(|i| i.utxo.clone()).collect()
    }
}

impl TransactionRecipe for TaprootTransaction {
    fn build_unsigned(&self) -> Transaction {
        unsigned_transaction(
            &self.utxos(),
            self.outputs.clone(),
            Sequence::ENABLE_RBF_NO_LOCKTIME,
        )
    }

    fn prevouts(&self) -> Vec<TxOut> {
        prevouts(&self.utxos())
    }

    /// Sign every input through the key path; witness is the lone signature
    fn sign<C: Signing + Verification>(&self, secp: &Secp256k1<C>) -> Result<SignedTransaction> {
        if self.inputs.is_empty() {
            return Err(Error::InputIndex { index: 0, len: 0 });
        }

        let unsigned = self.build_unsigned();
        let prevouts = self.prevouts();
        let mut tx = unsigned.clone();

        for (input_index, input) in self.inputs.iter().enumerate() {
            let (internal_key, _) = input.keypair.x_only_public_key();
            if ScriptBuf::new_p2tr(secp, internal_key, None) != *input.utxo.script_pubkey() {
                return Err(Error::KeyMismatch(input_index));
            }

            let sighash_type: TapSighashType = input.sighash_flag.to_taproot();
            let msg = taproot_key_spend_sighash(&unsigned, input_index, &prevouts, sighash_type)?;
            let signature = schnorr_sign(secp, &input.keypair, &msg, sighash_type);

            tx.input[input_index].witness = Witness::p2tr_key_spend(&signature);
            info!(input_index, ?sighash_type, "signed taproot key-path input");
        }

        Ok(SignedTransaction::new(tx))
    }
}
