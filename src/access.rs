//! Access layer: the single public entry point that chains key resolution,
//! transport encryption, and network encryption into one outbound PDU.
use crate::address::{Address, UnicastAddress};
use crate::crypto::k2;
use crate::error::CoreError;
use crate::mesh::{Ctl, IvIndex, SequenceNumber, Ttl};
use crate::model::{KeySelector, MeshNetwork};
use crate::network::{self, PduOptions};
use crate::transport::{self, TransportKey, MAX_UNSEGMENTED_PAYLOAD};

/// Builds a fully obfuscated, encrypted network PDU from a model-layer payload.
///
/// Resolves `(net_key, app_or_dev_key, nonce_type)` from `network` and
/// `app_idx`, derives `(nid, enc_key, privacy_key) = K2(net_key, [0x00])`, then
/// chains transport encryption and network encryption. Returns the final bytes
/// ready to wrap in a Mesh Proxy PDU.
#[allow(clippy::too_many_arguments)]
pub fn build_network_pdu(
    model_message: &[u8],
    network: &MeshNetwork,
    app_idx: u16,
    seq: u32,
    src: u16,
    dst: u16,
    ttl: u8,
) -> Result<Vec<u8>, CoreError> {
    build_network_pdu_with_options(
        model_message,
        network,
        app_idx,
        seq,
        src,
        dst,
        ttl,
        PduOptions::default(),
    )
}

/// As [`build_network_pdu`], but with explicit privacy-random-mode options
/// instead of the crate default.
#[allow(clippy::too_many_arguments)]
pub fn build_network_pdu_with_options(
    model_message: &[u8],
    network: &MeshNetwork,
    app_idx: u16,
    seq: u32,
    src: u16,
    dst: u16,
    ttl: u8,
    options: PduOptions,
) -> Result<Vec<u8>, CoreError> {
    if model_message.is_empty() || model_message.len() > MAX_UNSEGMENTED_PAYLOAD {
        return Err(CoreError::PayloadTooLarge(model_message.len()));
    }
    let src = UnicastAddress::new(src)?;
    let dst = Address::new(dst);
    let ttl = Ttl::new(ttl)?;
    let seq = SequenceNumber::new(seq)?;
    let iv_index = IvIndex::new(network.iv_index);

    let transport_key = match KeySelector::from_app_idx(app_idx) {
        KeySelector::AppKey(index) => {
            let app_key = network.app_key(index)?;
            TransportKey::App(app_key, crate::crypto::k_funcs::k4(app_key))
        }
        KeySelector::DevKey => TransportKey::Dev(&network.provisioner_dev_key),
    };

    log::trace!(
        "access: app_idx={:#06x} seq={:?} src={:?} dst={:?} ttl={:?}",
        app_idx,
        seq,
        src,
        dst,
        ttl
    );

    let transport_pdu =
        transport::build_transport_pdu(model_message, &transport_key, seq, src, dst, iv_index);

    let net_key = network.primary_net_key();
    let (nid, enc_key, privacy_key) = k2(net_key, &[0x00]);

    Ok(network::build_network_pdu(
        &transport_pdu,
        nid,
        &enc_key,
        &privacy_key,
        Ctl::ACCESS,
        ttl,
        seq,
        src,
        iv_index,
        options,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key::{AppKey, DevKey, Key, NetKey};
    use crate::model::{NamedAppKey, NamedNetKey, Node};

    fn sample_network() -> MeshNetwork {
        MeshNetwork::new(
            "sample".into(),
            vec![NamedNetKey {
                index: 0,
                key: NetKey::from_hex("7dd7364cd842ad18c17c2b820c84c3d6").unwrap(),
                name: "primary".into(),
            }],
            vec![NamedAppKey {
                index: 0,
                key: AppKey::from_hex("63964771734fbd76e3b40519d1d94a48").unwrap(),
                bound_net_key_index: 0,
                name: "app0".into(),
            }],
            DevKey::from_hex("9d6dd0e96eb25dc19a40ed9914f8f03f").unwrap(),
            vec![Node {
                unicast_address: 0x7F16,
                dev_key: DevKey::new(Key::new([0u8; 16])),
                name: "n".into(),
            }],
            0,
            0,
        )
        .unwrap()
    }

    const MODEL: [u8; 6] = [0x59, 0x00, 0x06, 0x00, 0xe0, 0x01];

    #[test]
    fn s1_app_key_path_has_expected_length() {
        let network = sample_network();
        let pdu = build_network_pdu(&MODEL, &network, 0, 37, 0x7F16, 0x000C, 7).unwrap();
        assert_eq!(pdu.len(), 20 + MODEL.len());
        let (nid, ..) = k2(network.primary_net_key(), &[0x00]);
        assert_eq!(pdu[0] & 0x7F, nid.value());
    }

    #[test]
    fn s2_dev_key_path_differs_from_app_key_path() {
        let network = sample_network();
        let app_pdu = build_network_pdu(&MODEL, &network, 0, 37, 0x7F16, 0x000C, 7).unwrap();
        let dev_pdu = build_network_pdu(
            &MODEL,
            &network,
            crate::model::APP_IDX_DEV,
            37,
            0x7F16,
            0x000C,
            7,
        )
        .unwrap();
        assert_eq!(dev_pdu.len(), 20 + MODEL.len());
        assert_ne!(app_pdu, dev_pdu);
    }

    #[test]
    fn s3_changed_seq_changes_pdu() {
        let network = sample_network();
        let pdu1 = build_network_pdu(&MODEL, &network, 0, 37, 0x7F16, 0x000C, 7).unwrap();
        let pdu2 = build_network_pdu(&MODEL, &network, 0, 38, 0x7F16, 0x000C, 7).unwrap();
        assert_ne!(pdu1, pdu2);
    }

    #[test]
    fn s4_empty_model_is_payload_too_large() {
        let network = sample_network();
        let result = build_network_pdu(&[], &network, 0, 37, 0x7F16, 0x000C, 7);
        assert!(matches!(result, Err(CoreError::PayloadTooLarge(0))));
    }

    #[test]
    fn s5_too_large_model_is_payload_too_large() {
        let network = sample_network();
        let model = [0u8; 12];
        let result = build_network_pdu(&model, &network, 0, 37, 0x7F16, 0x000C, 7);
        assert!(matches!(result, Err(CoreError::PayloadTooLarge(12))));
    }

    #[test]
    fn s6_unknown_app_idx_is_unknown_key() {
        let network = sample_network();
        let app_key_count = network.app_keys.len() as u16;
        let result = build_network_pdu(&MODEL, &network, app_key_count, 37, 0x7F16, 0x000C, 7);
        assert!(matches!(result, Err(CoreError::UnknownKey)));
    }

    #[test]
    fn rejects_non_unicast_src() {
        let network = sample_network();
        let result = build_network_pdu(&MODEL, &network, 0, 37, 0x0000, 0x000C, 7);
        assert!(matches!(result, Err(CoreError::InvalidAddress)));
    }
}
