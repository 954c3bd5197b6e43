//! PSBT Combiner Role
//!
//! Merges copies of the same PSBT that were updated or signed independently.

use bitcoin::Psbt;
use tracing::info;

use crate::error::Result;

/// Merge `others` into `base`
///
/// Every copy must wrap the same unsigned transaction.
pub fn combine_psbts(mut base: Psbt, others: impl IntoIterator<Item = Psbt>) -> Result<Psbt> {
    let mut merged = 0;
    for other in others {
        base.combine(other)?;
        merged += 1;
    }
    info!(merged, "combined psbts");
    Ok(base)
}
