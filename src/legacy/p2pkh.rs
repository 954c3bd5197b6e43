//! Legacy P2PKH (Pay-to-Public-Key-Hash) Spending
//!
//! The original transaction type, used before SegWit. The signature and public
//! key go into the input's scriptSig and the witness stays empty.

use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::sighash::EcdsaSighashType;
use bitcoin::{ecdsa, ScriptBuf, Sequence, Transaction, TxOut};
use secp256k1::{Secp256k1, SecretKey, Signing, Verification};
use tracing::info;

use crate::error::{Error, Result};
use crate::flags::sighash::legacy_sighash;
use crate::traits::transaction::{SignedTransaction, TransactionRecipe};
use crate::utils::*;

/// Build the `<sig> <pubkey>` scriptSig that unlocks a P2PKH output
pub fn p2pkh_script_sig(
    signature: &ecdsa::Signature,
    pubkey: &bitcoin::PublicKey,
) -> Result<ScriptBuf> {
    let sig = PushBytesBuf::try_from(signature.to_vec())?;
    Ok(Builder::new().push_slice(sig).push_key(pubkey).into_script())
}

/// Legacy spend of one or more P2PKH UTXOs
#[derive(Debug, Clone, Default)]
pub struct P2PKHTransaction {
    inputs: Vec<(SpendableUtxo, SecretKey)>,
    outputs: Vec<TxOut>,
}

impl P2PKHTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, utxo: SpendableUtxo, secret_key: SecretKey) {
        self.inputs.push((utxo, secret_key));
    }

    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    fn utxos(&self) -> Vec<SpendableUtxo> {
        self.inputs.iter().map(|(utxo, _)| utxo.clone()).collect()
    }
}

impl TransactionRecipe for P2PKHTransaction {
    fn build_unsigned(&self) -> Transaction {
        unsigned_transaction(&self.utxos(), self.outputs.clone(), Sequence::MAX)
    }

    fn prevouts(&self) -> Vec<TxOut> {
        prevouts(&self.utxos())
    }

    fn sign<C: Signing + Verification>(&self, secp: &Secp256k1<C>) -> Result<SignedTransaction> {
        let sighash_type = EcdsaSighashType::All;
        let unsigned = self.build_unsigned();
        let mut tx = unsigned.clone();

        for (input_index, (utxo, secret_key)) in self.inputs.iter().enumerate() {
            let pubkey = bitcoin::PublicKey::new(compressed_public_key(secp, secret_key).0);
            if ScriptBuf::new_p2pkh(&pubkey.pubkey_hash()) != *utxo.script_pubkey() {
                return Err(Error::KeyMismatch(input_index));
            }

            // Other inputs' scriptSigs are blanked by the algorithm, so sign the unsigned form.
            let msg = legacy_sighash(&unsigned, input_index, utxo.script_pubkey(), sighash_type)?;
            let signature = ecdsa::Signature {
                signature: secp.sign_ecdsa(&msg, secret_key),
                sighash_type,
            };
            tx.input[input_index].script_sig = p2pkh_script_sig(&signature, &pubkey)?;
            info!(input_index, "signed p2pkh input");
        }

        Ok(SignedTransaction::new(tx))
    }
}
