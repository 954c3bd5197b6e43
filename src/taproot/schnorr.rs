//! BIP340 Schnorr signing for taproot key-path spends

use bitcoin::key::{Keypair, TapTweak, TweakedKeypair};
use bitcoin::sighash::TapSighashType;
use bitcoin::taproot;
use secp256k1::{Message, Secp256k1, Signing, Verification};

/// Apply the BIP341 tweak for an output without a script tree
pub fn tweak_keypair<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    keypair: &Keypair,
) -> TweakedKeypair {
    keypair.tap_tweak(secp, None)
}

/// Sign a taproot sighash with the tweaked key
///
/// No auxiliary randomness is mixed in, so the same key and message always give
/// the same signature.
pub fn schnorr_sign<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    keypair: &Keypair,
    msg: &Message,
    sighash_type: TapSighashType,
) -> taproot::Signature {
    let tweaked = tweak_keypair(secp, keypair);
    let signature = secp.sign_schnorr_no_aux_rand(msg, &tweaked.to_inner());
    taproot::Signature {
        signature,
        sighash_type,
    }
}
