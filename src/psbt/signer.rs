//! PSBT Signer Role
//!
//! Signs every input whose key origin resolves under the signer's master key.
//! Inputs owned by other participants are left untouched so their PSBT copies
//! can be merged later by the combiner.

use bitcoin::bip32::Xpriv;
use bitcoin::psbt::SigningKeys;
use bitcoin::Psbt;
use secp256k1::{Secp256k1, Signing, Verification};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Sign all inputs this master key controls
///
/// Returns the indices of inputs this call added signatures to.
pub fn sign_psbt<C: Signing + Verification>(
    psbt: &mut Psbt,
    master: &Xpriv,
    secp: &Secp256k1<C>,
) -> Result<Vec<usize>> {
    let keys = match psbt.sign(master, secp) {
        Ok(keys) => keys,
        Err((_, errors)) => {
            let detail = errors
                .iter()
                .map(|(index, err)| format!("input {index}: {err}"))
                .collect::<Vec<_>>()
                .join(", ");
            warn!(%detail, "psbt signing failed");
            return Err(Error::PsbtSigning(detail));
        }
    };

    let signed: Vec<usize> = keys
        .into_iter()
        .filter(|(_, used)| match used {
            SigningKeys::Ecdsa(pubkeys) => !pubkeys.is_empty(),
            SigningKeys::Schnorr(pubkeys) => !pubkeys.is_empty(),
        })
        .map(|(index, _)| index)
        .collect();

    info!(
        fingerprint = %master.fingerprint(secp),
        signed = ?signed,
        "signed psbt"
    );
    Ok(signed)
}
