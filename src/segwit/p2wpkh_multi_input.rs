use bitcoin::sighash::EcdsaSighashType;
use bitcoin::{Sequence, Transaction, TxOut};
use secp256k1::{Secp256k1, SecretKey, Signing, Verification};
use tracing::info;

use crate::error::Result;
use crate::segwit::p2wpkh_single_input::sign_p2wpkh_input;
use crate::traits::transaction::{SignedTransaction, TransactionRecipe};
use crate::utils::*;

/// P2WPKH spend of several UTXOs, each controlled by its own key
///
/// Every input gets its own BIP143 sighash; the signatures are independent, so
/// the inputs may belong to different people.
#[derive(Debug, Clone, Default)]
pub struct MultiInputP2WPKHTransaction {
    inputs: Vec<(SpendableUtxo, SecretKey)>,
    outputs: Vec<TxOut>,
    sighash_type: Option<EcdsaSighashType>,
}

impl MultiInputP2WPKHTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, utxo: SpendableUtxo, secret_key: SecretKey) {
        self.inputs.push((utxo, secret_key));
    }

    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    pub fn set_sighash_type(&mut self, sighash_type: EcdsaSighashType) {
        self.sighash_type = Some(sighash_type);
    }

    fn utxos(&self) -> Vec<SpendableUtxo> {
        self.inputs.iter().map(|(utxo, _)| utxo.clone()).collect()
    }
}

impl TransactionRecipe for MultiInputP2WPKHTransaction {
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

    fn sign<C: Signing + Verification>(&self, secp: &Secp256k1<C>) -> Result<SignedTransaction> {
        let sighash_type = self.sighash_type.unwrap_or(EcdsaSighashType::All);
        let unsigned = self.build_unsigned();
        let mut tx = unsigned.clone();

        for (input_index, (utxo, secret_key)) in self.inputs.iter().enumerate() {
            sign_p2wpkh_input(
                secp,
                &unsigned,
                &mut tx,
                input_index,
                utxo,
                secret_key,
                sighash_type,
            )?;
        }

        info!(inputs = self.inputs.len(), "signed multi-input p2wpkh transaction");
        Ok(SignedTransaction::new(tx))
    }
}
