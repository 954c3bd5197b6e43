use std::str::FromStr;

use bitcoin::bip32::{DerivationPath, KeySource, Xpriv, Xpub};
use bitcoin::key::{Keypair, TapTweak};
use bitcoin::{CompressedPublicKey, Network, XOnlyPublicKey};
use rand::rngs::OsRng;
use secp256k1::{ecdsa, schnorr, Message, PublicKey, Secp256k1, SecretKey, Signing, Verification};

use crate::error::Result;

/// Build a secret key from fixed bytes
///
/// Recipes use fixed seeds so the printed transactions stay stable between runs.
pub fn secret_key_from_seed(seed: [u8; 32]) -> Result<SecretKey> {
    Ok(SecretKey::from_slice(&seed)?)
}

/// Generate a new random secret key
pub fn generate_secret_key() -> SecretKey {
    let secp = Secp256k1::new();
    let (secret_key, _) = secp.generate_keypair(&mut OsRng);
    secret_key
}

/// Derive the compressed public key for a secret key
pub fn compressed_public_key<C: Signing>(
    secp: &Secp256k1<C>,
    secret_key: &SecretKey,
) -> CompressedPublicKey {
    CompressedPublicKey(PublicKey::from_secret_key(secp, secret_key))
}

/// Keypair and its untweaked x-only internal key, as used for taproot outputs
pub fn taproot_keypair<C: Signing>(
    secp: &Secp256k1<C>,
    secret_key: &SecretKey,
) -> (Keypair, XOnlyPublicKey) {
    let keypair = Keypair::from_secret_key(secp, secret_key);
    let (internal_key, _parity) = keypair.x_only_public_key();
    (keypair, internal_key)
}

/// The key-path output key committed to by a P2TR output without a script tree
pub fn taproot_output_key<C: Verification>(
    secp: &Secp256k1<C>,
    internal_key: XOnlyPublicKey,
) -> XOnlyPublicKey {
    let (tweaked, _parity) = internal_key.tap_tweak(secp, None);
    tweaked.to_inner()
}

/// BIP32 master key from seed bytes
pub fn master_xpriv(seed: &[u8], network: Network) -> Result<Xpriv> {
    Ok(Xpriv::new_master(network, seed)?)
}

/// Derive a child key and the key source (master fingerprint + path) that identifies it
pub fn derive_key<C: Signing>(
    secp: &Secp256k1<C>,
    master: &Xpriv,
    path: &str,
) -> Result<(Xpriv, KeySource)> {
    let path = DerivationPath::from_str(path)?;
    let child = master.derive_priv(secp, &path)?;
    let fingerprint = master.fingerprint(secp);
    Ok((child, (fingerprint, path)))
}

/// Public counterpart of a derived key
pub fn derived_public_key<C: Signing>(secp: &Secp256k1<C>, xpriv: &Xpriv) -> PublicKey {
    Xpub::from_priv(secp, xpriv).public_key
}

/// Verify an ECDSA signature over a sighash message
pub fn verify_ecdsa<C: Verification>(
    secp: &Secp256k1<C>,
    msg: &Message,
    signature: &ecdsa::Signature,
    pubkey: &PublicKey,
) -> bool {
    secp.verify_ecdsa(msg, signature, pubkey).is_ok()
}

/// Verify a BIP340 Schnorr signature over a sighash message
pub fn verify_schnorr<C: Verification>(
    secp: &Secp256k1<C>,
    msg: &Message,
    signature: &schnorr::Signature,
    pubkey: &XOnlyPublicKey,
) -> bool {
    secp.verify_schnorr(signature, msg, pubkey).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_generation() {
        let secp = Secp256k1::new();
        let sk = generate_secret_key();
        let pk = compressed_public_key(&secp, &sk);

        let serialized = pk.to_bytes();
        assert_eq!(serialized.len(), 33);
        assert!(serialized[0] == 0x02 || serialized[0] == 0x03);
    }

    #[test]
    fn test_deterministic_pubkey() {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();

        let pk1 = compressed_public_key(&secp, &sk);
        let pk2 = compressed_public_key(&secp, &sk);
        assert_eq!(pk1, pk2);

        let expected = "034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa";
        assert_eq!(hex::encode(pk1.to_bytes()), expected);
    }

    #[test]
    fn test_zero_seed_rejected() {
        assert!(secret_key_from_seed([0u8; 32]).is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x11u8; 32]).unwrap();
        let pk = PublicKey::from_secret_key(&secp, &sk);
        let msg = Message::from_digest([0x42u8; 32]);

        let sig = secp.sign_ecdsa(&msg, &sk);
        assert!(verify_ecdsa(&secp, &msg, &sig, &pk));

        let other = Message::from_digest([0x43u8; 32]);
        assert!(!verify_ecdsa(&secp, &other, &sig, &pk));
    }

    #[test]
    fn test_taproot_tweak_is_applied() {
        let secp = Secp256k1::new();
        let sk = secret_key_from_seed([0x01u8; 32]).unwrap();
        let (keypair, internal_key) = taproot_keypair(&secp, &sk);
        let output_key = taproot_output_key(&secp, internal_key);
        assert_ne!(internal_key, output_key);

        let tweaked = keypair.tap_tweak(&secp, None).to_inner();
        let msg = Message::from_digest([0x07u8; 32]);
        let sig = secp.sign_schnorr_no_aux_rand(&msg, &tweaked);
        assert!(verify_schnorr(&secp, &msg, &sig, &output_key));
        assert!(!verify_schnorr(&secp, &msg, &sig, &internal_key));
    }

    #[test]
    fn test_derive_key_records_source() {
        let secp = Secp256k1::new();
        let master = master_xpriv(&[0x5au8; 32], Network::Regtest).unwrap();
        let (child, (fingerprint, path)) = derive_key(&secp, &master, "m/84'/1'/0'/0/0").unwrap();

        assert_eq!(fingerprint, master.fingerprint(&secp));
        assert_eq!(path, DerivationPath::from_str("m/84'/1'/0'/0/0").unwrap());
        assert_eq!(child, master.derive_priv(&secp, &path).unwrap());
    }

    #[test]
    fn test_invalid_path() {
        let secp = Secp256k1::new();
        let master = master_xpriv(&[0x5au8; 32], Network::Regtest).unwrap();
        assert!(derive_key(&secp, &master, "m/not/a/path").is_err());
    }
}
