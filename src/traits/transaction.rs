//! Common interface of the transaction recipes
//!
//! Every recipe walks the same steps: assemble an unsigned transaction from
//! spendable outputs, compute a sighash per input, sign it and place the
//! signature into the input's unlocking data.

use bitcoin::consensus::encode::serialize_hex;
use bitcoin::{Amount, Transaction, TxOut, Txid};
use secp256k1::{Secp256k1, Signing, Verification};

use crate::error::Result;

/// A fully signed transaction, ready to broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx: Transaction,
}

impl SignedTransaction {
    pub fn new(tx: Transaction) -> Self {
        Self { tx }
    }

    /// Consensus serialization (with witness data) as lowercase hex
    pub fn to_hex(&self) -> String {
        serialize_hex(&self.tx)
    }

    pub fn txid(&self) -> Txid {
        self.tx.compute_txid()
    }

    pub fn vsize(&self) -> usize {
        self.tx.vsize()
    }

    pub fn into_inner(self) -> Transaction {
        self.tx
    }
}

/// Trait implemented by each signing recipe
pub trait TransactionRecipe {
    /// The transaction before any unlocking data is added
    fn build_unsigned(&self) -> Transaction;

    /// Previous outputs in input order
    fn prevouts(&self) -> Vec<TxOut>;

    /// Sign every input and return the finished transaction
    fn sign<C: Signing + Verification>(&self, secp: &Secp256k1<C>) -> Result<SignedTransaction>;

    /// Difference between the spent and created amounts
    fn fee(&self) -> Result<Amount> {
        let tx = self.build_unsigned();
        let spent = self.prevouts();
        let utxos: Vec<_> = tx
            .input
            .iter()
            .zip(spent)
            .map(|(input, txout)| crate::utils::SpendableUtxo::new(input.previous_output, txout))
            .collect();
        crate::utils::ensure_balanced(&utxos, &tx.output)
    }
}
