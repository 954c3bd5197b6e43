//! Signature Hash (Sighash) Computation
//!
//! Three generations of signature hash algorithm are in use on the network:
//! the original legacy algorithm, BIP143 for SegWit v0 and BIP341 for Taproot.
//! The algorithm an input needs is fixed by the locking script of the output it
//! spends, so callers only pass the previous outputs and a flag.

use bitcoin::hashes::Hash;
use bitcoin::sighash::{EcdsaSighashType, Prevouts, SighashCache, TapSighashType};
use bitcoin::{Amount, Script, Transaction, TxOut};
use secp256k1::Message;
use tracing::debug;

use crate::error::{Error, Result};

/// Sighash flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashFlag {
    All = 0x01,
    None = 0x02,
    Single = 0x03,
    AllAnyoneCanPay = 0x81,
    NoneAnyoneCanPay = 0x82,
    SingleAnyoneCanPay = 0x83,
    Default = 0x00, // Taproot only
}

impl SighashFlag {
    /// ECDSA form of the flag, used by legacy and SegWit v0 inputs
    pub fn to_ecdsa(self) -> Result<EcdsaSighashType> {
        match self {
            SighashFlag::All => Ok(EcdsaSighashType::All),
            SighashFlag::None => Ok(EcdsaSighashType::None),
            SighashFlag::Single => Ok(EcdsaSighashType::Single),
            SighashFlag::AllAnyoneCanPay => Ok(EcdsaSighashType::AllPlusAnyoneCanPay),
            SighashFlag::NoneAnyoneCanPay => Ok(EcdsaSighashType::NonePlusAnyoneCanPay),
            SighashFlag::SingleAnyoneCanPay => Ok(EcdsaSighashType::SinglePlusAnyoneCanPay),
            SighashFlag::Default => Err(Error::Sighash(
                "SIGHASH_DEFAULT is only valid for taproot inputs".to_string(),
            )),
        }
    }

    pub fn to_taproot(self) -> TapSighashType {
        match self {
            SighashFlag::Default => TapSighashType::Default,
            SighashFlag::All => TapSighashType::All,
            SighashFlag::None => TapSighashType::None,
            SighashFlag::Single => TapSighashType::Single,
            SighashFlag::AllAnyoneCanPay => TapSighashType::AllPlusAnyoneCanPay,
            SighashFlag::NoneAnyoneCanPay => TapSighashType::NonePlusAnyoneCanPay,
            SighashFlag::SingleAnyoneCanPay => TapSighashType::SinglePlusAnyoneCanPay,
        }
    }
}

/// Which signature hash algorithm an input is signed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashAlgorithm {
    /// Original algorithm, P2PKH
    Legacy,
    /// BIP143, P2WPKH
    SegwitV0,
    /// BIP341, P2TR key path
    Taproot,
}

impl SighashAlgorithm {
    /// Select the algorithm from the locking script being spent
    pub fn for_script(script_pubkey: &Script) -> Result<Self> {
        if script_pubkey.is_p2pkh() {
            Ok(SighashAlgorithm::Legacy)
        } else if script_pubkey.is_p2wpkh() {
            Ok(SighashAlgorithm::SegwitV0)
        } else if script_pubkey.is_p2tr() {
            Ok(SighashAlgorithm::Taproot)
        } else {
            Err(Error::UnsupportedScript(script_pubkey.to_hex_string()))
        }
    }
}

fn check_index(tx: &Transaction, input_index: usize) -> Result<()> {
    if input_index >= tx.input.len() {
        return Err(Error::InputIndex {
            index: input_index,
            len: tx.input.len(),
        });
    }
    Ok(())
}

/// Legacy sighash: the scriptCode is the full previous locking script
pub fn legacy_sighash(
    tx: &Transaction,
    input_index: usize,
    script_pubkey: &Script,
    sighash_type: EcdsaSighashType,
) -> Result<Message> {
    check_index(tx, input_index)?;
    let cache = SighashCache::new(tx);
    let sighash =
        cache.legacy_signature_hash(input_index, script_pubkey, sighash_type.to_u32())?;
    Ok(Message::from_digest(sighash.to_byte_array()))
}

/// BIP143 sighash for a P2WPKH input; commits to the value being spent
pub fn segwit_v0_sighash(
    tx: &Transaction,
    input_index: usize,
    script_pubkey: &Script,
    value: Amount,
    sighash_type: EcdsaSighashType,
) -> Result<Message> {
    check_index(tx, input_index)?;
    let mut cache = SighashCache::new(tx);
    let sighash = cache.p2wpkh_signature_hash(input_index, script_pubkey, value, sighash_type)?;
    Ok(Message::from_digest(sighash.to_byte_array()))
}

/// BIP341 key-path sighash; commits to every previous output
pub fn taproot_key_spend_sighash(
    tx: &Transaction,
    input_index: usize,
    prevouts: &[TxOut],
    sighash_type: TapSighashType,
) -> Result<Message> {
    check_index(tx, input_index)?;
    if prevouts.len() != tx.input.len() {
        return Err(Error::PrevoutCount {
            expected: tx.input.len(),
            actual: prevouts.len(),
        });
    }
    let mut cache = SighashCache::new(tx);
    let sighash = cache.taproot_key_spend_signature_hash(
        input_index,
        &Prevouts::All(prevouts),
        sighash_type,
    )?;
    Ok(Message::from_digest(sighash.to_byte_array()))
}

/// Compute the message to sign for one input, choosing the algorithm from its previous output
pub fn input_sighash(
    tx: &Transaction,
    input_index: usize,
    prevouts: &[TxOut],
    flag: SighashFlag,
) -> Result<(SighashAlgorithm, Message)> {
    check_index(tx, input_index)?;
    if prevouts.len() != tx.input.len() {
        return Err(Error::PrevoutCount {
            expected: tx.input.len(),
            actual: prevouts.len(),
        });
    }

    let prevout = &prevouts[input_index];
    let algorithm = SighashAlgorithm::for_script(&prevout.script_pubkey)?;
    let msg = match algorithm {
        SighashAlgorithm::Legacy => {
            legacy_sighash(tx, input_index, &prevout.script_pubkey, flag.to_ecdsa()?)?
        }
        SighashAlgorithm::SegwitV0 => segwit_v0_sighash(
            tx,
            input_index,
            &prevout.script_pubkey,
            prevout.value,
            flag.to_ecdsa()?,
        )?,
        SighashAlgorithm::Taproot => {
            taproot_key_spend_sighash(tx, input_index, prevouts, flag.to_taproot())?
        }
    };

    debug!(
        input_index,
        ?algorithm,
        sighash = %msg,
        "computed sighash"
    );
    Ok((algorithm, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::*;
    use bitcoin::{Network, ScriptBuf, Sequence};
    use secp256k1::Secp256k1;

    fn fixture(spk: ScriptBuf) -> (Transaction, Vec<TxOut>) {
        let utxos = vec![
            SpendableUtxo::dummy(0, Amount::from_sat(50_000), spk.clone()),
            SpendableUtxo::dummy(1, Amount::from_sat(60_000), spk.clone()),
        ];
        let outputs = vec![
            TxOut {
                value: Amount::from_sat(70_000),
                script_pubkey: spk.clone(),
            },
            TxOut {
                value: Amount::from_sat(39_000),
                script_pubkey: spk,
            },
        ];
        let tx = unsigned_transaction(&utxos, outputs, Sequence::ENABLE_RBF_NO_LOCKTIME);
        (tx, prevouts(&utxos))
    }

    fn wpkh_script() -> ScriptBuf {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();
        p2wpkh_address(&compressed_public_key(&secp, &sk), Network::Regtest).script_pubkey()
    }

    fn tr_script() -> ScriptBuf {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();
        let (_, internal) = taproot_keypair(&secp, &sk);
        p2tr_address(&secp, internal, Network::Regtest).script_pubkey()
    }

    fn pkh_script() -> ScriptBuf {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();
        p2pkh_address(&compressed_public_key(&secp, &sk), Network::Regtest).script_pubkey()
    }

    #[test]
    fn test_algorithm_selection() {
        assert_eq!(
            SighashAlgorithm::for_script(&pkh_script()).unwrap(),
            SighashAlgorithm::Legacy
        );
        assert_eq!(
            SighashAlgorithm::for_script(&wpkh_script()).unwrap(),
            SighashAlgorithm::SegwitV0
        );
        assert_eq!(
            SighashAlgorithm::for_script(&tr_script()).unwrap(),
            SighashAlgorithm::Taproot
        );
        assert!(matches!(
            SighashAlgorithm::for_script(&ScriptBuf::new()),
            Err(Error::UnsupportedScript(_))
        ));
    }

    #[test]
    fn test_default_rejected_for_segwit() {
        let (tx, prevouts) = fixture(wpkh_script());
        assert!(input_sighash(&tx, 0, &prevouts, SighashFlag::Default).is_err());
    }

    #[test]
    fn test_default_accepted_for_taproot() {
        let (tx, prevouts) = fixture(tr_script());
        let (algorithm, _) = input_sighash(&tx, 0, &prevouts, SighashFlag::Default).unwrap();
        assert_eq!(algorithm, SighashAlgorithm::Taproot);
    }

    #[test]
    fn test_index_out_of_range() {
        let (tx, prevouts) = fixture(wpkh_script());
        assert!(matches!(
            input_sighash(&tx, 2, &prevouts, SighashFlag::All),
            Err(Error::InputIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_prevout_count_mismatch() {
        let (tx, prevouts) = fixture(tr_script());
        assert!(matches!(
            taproot_key_spend_sighash(&tx, 0, &prevouts[..1], TapSighashType::Default),
            Err(Error::PrevoutCount {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_sighash_differs_per_input_and_flag() {
        for spk in [pkh_script(), wpkh_script(), tr_script()] {
            let (tx, prevouts) = fixture(spk);
            let (_, first) = input_sighash(&tx, 0, &prevouts, SighashFlag::All).unwrap();
            let (_, second) = input_sighash(&tx, 1, &prevouts, SighashFlag::All).unwrap();
            let (_, none) = input_sighash(&tx, 0, &prevouts, SighashFlag::None).unwrap();
            assert_ne!(first, second);
            assert_ne!(first, none);
        }
    }

    #[test]
    fn test_segwit_sighash_commits_to_value() {
        let (tx, _) = fixture(wpkh_script());
        let spk = wpkh_script();
        let a = segwit_v0_sighash(&tx, 0, &spk, Amount::from_sat(50_000), EcdsaSighashType::All)
            .unwrap();
        let b = segwit_v0_sighash(&tx, 0, &spk, Amount::from_sat(50_001), EcdsaSighashType::All)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_segwit_sighash_rejects_other_scripts() {
        let (tx, _) = fixture(wpkh_script());
        let result = segwit_v0_sighash(
            &tx,
            0,
            &pkh_script(),
            Amount::from_sat(50_000),
            EcdsaSighashType::All,
        );
        assert!(matches!(result, Err(Error::SegwitSighash(_))));
    }

    #[test]
    fn test_taproot_single_needs_matching_output() {
        let (mut tx, prevouts) = fixture(tr_script());
        tx.output.truncate(1);
        assert!(matches!(
            taproot_key_spend_sighash(&tx, 1, &prevouts, TapSighashType::Single),
            Err(Error::TaprootSighash(_))
        ));
    }

    #[test]
    fn test_sighash_none_ignores_outputs() {
        let (tx, prevouts) = fixture(wpkh_script());
        let mut changed = tx.clone();
        changed.output[0].value = Amount::from_sat(1);

        let (_, before) = input_sighash(&tx, 0, &prevouts, SighashFlag::None).unwrap();
        let (_, after) = input_sighash(&changed, 0, &prevouts, SighashFlag::None).unwrap();
        assert_eq!(before, after);

        let (_, all_before) = input_sighash(&tx, 0, &prevouts, SighashFlag::All).unwrap();
        let (_, all_after) = input_sighash(&changed, 0, &prevouts, SighashFlag::All).unwrap();
        assert_ne!(all_before, all_after);
    }
}
