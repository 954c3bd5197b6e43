use bitcoin::sighash::EcdsaSighashType;
use bitcoin::{ecdsa, ScriptBuf, Sequence, Transaction, TxOut, Witness};
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing, Verification};
use tracing::info;

use crate::error::{Error, Result};
use crate::flags::sighash::segwit_v0_sighash;
use crate::traits::transaction::{SignedTransaction, TransactionRecipe};
use crate::utils::*;

/// Sign input `input_index` of `tx` as a P2WPKH spend of `utxo`
///
/// The sighash is computed over `unsigned`, which must be `tx` without witnesses,
/// so that signing one input never changes what another input commits to.
pub fn sign_p2wpkh_input<C: Signing>(
    secp: &Secp256k1<C>,
    unsigned: &Transaction,
    tx: &mut Transaction,
    input_index: usize,
    utxo: &SpendableUtxo,
    secret_key: &SecretKey,
    sighash_type: EcdsaSighashType,
) -> Result<()> {
    let pubkey = compressed_public_key(secp, secret_key);
    if ScriptBuf::new_p2wpkh(&pubkey.wpubkey_hash()) != *utxo.script_pubkey() {
        return Err(Error::KeyMismatch(input_index));
    }

    let msg = segwit_v0_sighash(
        unsigned,
        input_index,
        utxo.script_pubkey(),
        utxo.value(),
        sighash_type,
    )?;
    let signature = ecdsa::Signature {
        signature: secp.sign_ecdsa(&msg, secret_key),
        sighash_type,
    };

    let pk: PublicKey = pubkey.0;
    tx.input[input_index].witness = Witness::p2wpkh(&signature, &pk);
    info!(input_index, sig_len = signature.to_vec().len(), "signed p2wpkh input");
    Ok(())
}

/// P2WPKH spend of one UTXO
#[derive(Debug, Clone)]
pub struct P2WPKHTransaction {
    utxo: SpendableUtxo,
    secret_key: SecretKey,
    outputs: Vec<TxOut>,
    sequence: Sequence,
    sighash_type: EcdsaSighashType,
}

impl P2WPKHTransaction {
    pub fn new(utxo: SpendableUtxo, secret_key: SecretKey) -> Self {
        Self {
            utxo,
            secret_key,
            outputs: Vec::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            sighash_type: EcdsaSighashType::All,
        }
    }

    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    pub fn set_sighash_type(&mut self, sighash_type: EcdsaSighashType) {
        self.sighash_type = sighash_type;
    }
}

impl TransactionRecipe for P2WPKHTransaction {
    fn build_unsigned(&self) -> Transaction {
        unsigned_transaction(
            std::slice::from_ref(&self.utxo),
            self.outputs.clone(),
            self.sequence,
        )
    }

    fn prevouts(&self) -> Vec<TxOut> {
        vec![self.utxo.txout.clone()]
    }

    fn sign<C: Signing + Verification>(&self, secp: &Secp256k1<C>) -> Result<SignedTransaction> {
        let unsigned = self.build_unsigned();
        let mut tx = unsigned.clone();
        sign_p2wpkh_input(
            secp,
            &unsigned,
            &mut tx,
            0,
            &self.utxo,
            &self.secret_key,
            self.sighash_type,
        )?;
        Ok(SignedTransaction::new(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::{Amount, Network};

    const DUMMY_UTXO_AMOUNT: Amount = Amount::from_sat(20_000_000);
    const SPEND_AMOUNT: Amount = Amount::from_sat(5_000_000);
    const CHANGE_AMOUNT: Amount = Amount::from_sat(14_999_000);

    fn recipe(secp: &Secp256k1<secp256k1::All>) -> (P2WPKHTransaction, PublicKey) {
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();
        let pk = compressed_public_key(secp, &sk);
        let spk = p2wpkh_address(&pk, Network::Regtest).script_pubkey();

        let utxo = SpendableUtxo::dummy(0, DUMMY_UTXO_AMOUNT, spk.clone());
        let receiver = parse_address(
            "bcrt1q6mlqttg852e63uahyglwla55xusryqp08vx9w2",
            Network::Regtest,
        )
        .unwrap();

        let mut tx = P2WPKHTransaction::new(utxo, sk);
        tx.add_output(TxOut {
            value: SPEND_AMOUNT,
            script_pubkey: receiver.script_pubkey(),
        });
        tx.add_output(TxOut {
            value: CHANGE_AMOUNT,
            script_pubkey: spk,
        });
        (tx, pk.0)
    }

    #[test]
    fn test_sign_p2wpkh_transaction() {
        let secp = Secp256k1::new();
        let (recipe, pk) = recipe(&secp);
        let signed = recipe.sign(&secp).unwrap();

        let witness = &signed.tx.input[0].witness;
        assert_eq!(witness.len(), 2);
        assert_eq!(witness.nth(1).unwrap(), &pk.serialize()[..]);
        assert!(signed.tx.input[0].script_sig.is_empty());

        // marker and flag follow the version
        let hex = signed.to_hex();
        assert_eq!(&hex[8..12], "0001");
    }

    #[test]
    fn test_signature_verifies() {
        let secp = Secp256k1::new();
        let (recipe, pk) = recipe(&secp);
        let signed = recipe.sign(&secp).unwrap();

        let witness = &signed.tx.input[0].witness;
        let sig = ecdsa::Signature::from_slice(witness.nth(0).unwrap()).unwrap();
        assert_eq!(sig.sighash_type, EcdsaSighashType::All);

        let unsigned = recipe.build_unsigned();
        let msg = segwit_v0_sighash(
            &unsigned,
            0,
            &recipe.prevouts()[0].script_pubkey,
            DUMMY_UTXO_AMOUNT,
            EcdsaSighashType::All,
        )
        .unwrap();
        assert!(verify_ecdsa(&secp, &msg, &sig.signature, &pk));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let secp = Secp256k1::new();
        let (recipe, _) = recipe(&secp);
        assert_eq!(recipe.sign(&secp).unwrap(), recipe.sign(&secp).unwrap());
    }

    #[test]
    fn test_fee() {
        let secp = Secp256k1::new();
        let (recipe, _) = recipe(&secp);
        assert_eq!(recipe.fee().unwrap(), Amount::from_sat(1_000));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let secp = Secp256k1::new();
        let (recipe, _) = recipe(&secp);
        let other = secret_key_from_seed([0x22u8; 32]).unwrap();
        let wrong = P2WPKHTransaction {
            secret_key: other,
            ..recipe
        };
        assert!(matches!(wrong.sign(&secp), Err(Error::KeyMismatch(0))));
    }

    #[test]
    fn test_custom_sighash_type() {
        let secp = Secp256k1::new();
        let (mut recipe, _) = recipe(&secp);
        recipe.set_sighash_type(EcdsaSighashType::AllPlusAnyoneCanPay);
        let signed = recipe.sign(&secp).unwrap();

        let sig_bytes = signed.tx.input[0].witness.nth(0).unwrap();
        assert_eq!(*sig_bytes.last().unwrap(), 0x81);
    }
}
