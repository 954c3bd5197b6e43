use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::key::Secp256k1;
use bitcoin::{CompressedPublicKey, Network, XOnlyPublicKey};
use secp256k1::Verification;

use crate::error::{Error, Result};

/// Map a network name to a [`Network`]
pub fn parse_network(network: &str) -> Result<Network> {
    match network {
        "bitcoin" | "mainnet" => Ok(Network::Bitcoin),
        "testnet" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => Err(Error::UnknownNetwork(other.to_string())),
    }
}

/// Parse an address string and require that it belongs to `network`
pub fn parse_address(address: &str, network: Network) -> Result<Address> {
    let unchecked: Address<NetworkUnchecked> = address.parse()?;
    if !unchecked.is_valid_for_network(network) {
        return Err(Error::WrongNetwork {
            address: address.to_string(),
            expected: network,
        });
    }
    Ok(unchecked.assume_checked())
}

/// P2WPKH (native SegWit v0) address for a compressed public key
pub fn p2wpkh_address(pubkey: &CompressedPublicKey, network: Network) -> Address {
    Address::p2wpkh(pubkey, network)
}

/// P2PKH (legacy) address for a compressed public key
pub fn p2pkh_address(pubkey: &CompressedPublicKey, network: Network) -> Address {
    Address::p2pkh(pubkey.pubkey_hash(), network)
}

/// P2TR key-path address for an untweaked internal key
///
/// The tweak is applied by `Address::p2tr`, so pass the internal key, not the output key.
pub fn p2tr_address<C: Verification>(
    secp: &Secp256k1<C>,
    internal_key: XOnlyPublicKey,
    network: Network,
) -> Address {
    Address::p2tr(secp, internal_key, None, network)
}
