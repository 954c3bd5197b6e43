//! Shared participants and funding outputs for PSBT role tests

use bitcoin::bip32::{KeySource, Xpriv};
use bitcoin::{Amount, CompressedPublicKey, Network, Psbt, Sequence, TxOut, XOnlyPublicKey};
use secp256k1::{PublicKey, Secp256k1, Signing, Verification};

use crate::psbt::creator::create_psbt;
use crate::utils::*;

pub(crate) const SEGWIT_PATH: &str = "m/84'/1'/0'/0/0";
pub(crate) const TAPROOT_PATH: &str = "m/86'/1'/0'/0/0";

pub(crate) struct Participant {
    pub master: Xpriv,
    pub source: KeySource,
    pub pubkey: PublicKey,
}

impl Participant {
    pub fn internal_key(&self) -> XOnlyPublicKey {
        self.pubkey.x_only_public_key().0
    }
}

pub(crate) fn participant<C: Signing>(secp: &Secp256k1<C>, seed: u8, path: &str) -> Participant {
    let master = master_xpriv(&[seed; 32], Network::Regtest).unwrap();
    let (child, source) = derive_key(secp, &master, path).unwrap();
    Participant {
        master,
        source,
        pubkey: derived_public_key(secp, &child),
    }
}

pub(crate) fn segwit_utxo(owner: &Participant, vout: u32, sats: u64) -> SpendableUtxo {
    let address = p2wpkh_address(&CompressedPublicKey(owner.pubkey), Network::Regtest);
    SpendableUtxo::dummy(vout, Amount::from_sat(sats), address.script_pubkey())
}

pub(crate) fn taproot_utxo<C: Verification>(
    secp: &Secp256k1<C>,
    owner: &Participant,
    vout: u32,
    sats: u64,
) -> SpendableUtxo {
    let address = p2tr_address(secp, owner.internal_key(), Network::Regtest);
    SpendableUtxo::dummy(vout, Amount::from_sat(sats), address.script_pubkey())
}

/// Unsigned PSBT paying `sats` to a fixed receiver
pub(crate) fn psbt_spending(utxos: &[SpendableUtxo], sats: u64) -> Psbt {
    let secp = Secp256k1::new();
    let receiver = participant(&secp, 0x7f, SEGWIT_PATH);
    let output = TxOut {
        value: Amount::from_sat(sats),
        script_pubkey: segwit_utxo(&receiver, 0, 0).txout.script_pubkey,
    };
    let tx = unsigned_transaction(utxos, vec![output], Sequence::ENABLE_RBF_NO_LOCKTIME);
    create_psbt(tx).unwrap()
}
