//! Base64 transport encoding for PSBTs passed between participants

use base64::{engine::general_purpose, Engine as _};
use bitcoin::Psbt;

use crate::error::Result;

pub fn psbt_to_base64(psbt: &Psbt) -> String {
    general_purpose::STANDARD.encode(psbt.serialize())
}

pub fn psbt_from_base64(s: &str) -> Result<Psbt> {
    let bytes = general_purpose::STANDARD.decode(s.trim())?;
    Ok(Psbt::deserialize(&bytes)?)
}
