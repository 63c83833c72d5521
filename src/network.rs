//! Network layer (Bluetooth Mesh Profile 3.8.6, 3.8.7).
//!
//! Runs AES-CCM over the transport PDU with a 64-bit MIC, assembles the 7-byte
//! cleartext network header, then XOR-obfuscates header bytes 1..6 via an AES-ECB
//! PECB derived from the privacy key and the first seven bytes of the encrypted
//! payload (Mesh Profile 3.8.7.3).
use crate::address::UnicastAddress;
use crate::crypto::key::{EncryptionKey, PrivacyKey};
use crate::crypto::nonce::network_nonce;
use crate::crypto::{AesCipher, MicSize};
use crate::mesh::{Ctl, IvIndex, Nid, SequenceNumber, Ttl};

/// Selects how the 16-byte privacy-random block is padded before the AES-ECB
/// PECB derivation. See DESIGN.md for why both variants are kept.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum PrivacyRandomMode {
    /// Places the IV Index at bytes 8..11 of the privacy-random block, per the
    /// Bluetooth Mesh Profile. Interoperable with conformant mesh nodes.
    Conformant,
    /// Zero-pads bytes 12..15 instead, omitting the IV Index entirely. Kept for
    /// byte-exact parity with this crate's distilled predecessor; not
    /// interoperable with conformant receivers.
    Legacy,
}

/// Per-call knobs for the network layer's outbound framing. Currently only
/// controls privacy-random padding; everything else in the pipeline is fixed by
/// the Mesh Profile.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PduOptions {
    pub privacy_random_mode: PrivacyRandomMode,
}
impl Default for PduOptions {
    fn default() -> Self {
        PduOptions {
            privacy_random_mode: PrivacyRandomMode::Conformant,
        }
    }
}

fn privacy_random(
    enc_dst_and_payload: &[u8],
    iv_index: IvIndex,
    mode: PrivacyRandomMode,
) -> [u8; 16] {
    let mut block = [0u8; 16];
    let n = enc_dst_and_payload.len().min(7);
    block[5..5 + n].copy_from_slice(&enc_dst_and_payload[..n]);
    if let PrivacyRandomMode::Conformant = mode {
        block[8..12].copy_from_slice(&iv_index.to_bytes_be());
    }
    block
}

/// Builds the final obfuscated network PDU: `obfuscated_header (7 bytes) ||
/// enc_dst_and_payload`. `ctl` is always [`Ctl::ACCESS`] on this crate's
/// outbound access path; the parameter exists so the nonce/header layout stays
/// reusable if a control-message path is ever added.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn build_network_pdu(
    transport_pdu: &[u8],
    nid: Nid,
    enc_key: &EncryptionKey,
    privacy_key: &PrivacyKey,
    ctl: Ctl,
    ttl: Ttl,
    seq: SequenceNumber,
    src: UnicastAddress,
    iv_index: IvIndex,
    options: PduOptions,
) -> Vec<u8> {
    let nonce = network_nonce(ctl, ttl.value(), seq, src, iv_index);
    let enc_dst_and_payload =
        AesCipher::new(*enc_key.key()).ccm_encrypt(&nonce, transport_pdu, MicSize::Big);

    let seq_bytes = seq.to_bytes_be();
    let src_bytes = src.to_bytes_be();
    let header = [
        nid.with_flag(iv_index.ivi()),
        ttl.with_flag(ctl.is_control()),
        seq_bytes[0],
        seq_bytes[1],
        seq_bytes[2],
        src_bytes[0],
        src_bytes[1],
    ];

    let random = privacy_random(&enc_dst_and_payload, iv_index, options.privacy_random_mode);
    let pecb = AesCipher::new(*privacy_key.key()).ecb_encrypt(random);

    let mut obfuscated = header;
    for i in 1..7 {
        obfuscated[i] ^= pecb[i - 1];
    }
    log::debug!(
        "network: nid={:?} ttl={:?} seq={:?} src={:?} pdu_len={}",
        nid,
        ttl,
        seq,
        src,
        obfuscated.len() + enc_dst_and_payload.len()
    );

    let mut out = Vec::with_capacity(obfuscated.len() + enc_dst_and_payload.len());
    out.extend_from_slice(&obfuscated);
    out.extend(enc_dst_and_payload);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::k2;
    use crate::crypto::key::NetKey;

    fn sample_materials() -> (Nid, EncryptionKey, PrivacyKey) {
        let net_key = NetKey::from_hex("7dd7364cd842ad18c17c2b820c84c3d6").unwrap();
        k2(&net_key, &[0x00])
    }

    #[test]
    fn header_first_byte_is_ivi_and_nid() {
        let (nid, enc_key, privacy_key) = sample_materials();
        let iv_index = IvIndex::new(0x1234_5677);
        let pdu = build_network_pdu(
            &[0xAAu8; 10],
            nid,
            &enc_key,
            &privacy_key,
            Ctl::ACCESS,
            Ttl::new(7).unwrap(),
            SequenceNumber::new(37).unwrap(),
            UnicastAddress::new(0x7F16).unwrap(),
            iv_index,
            PduOptions::default(),
        );
        assert_eq!(pdu[0], nid.with_flag(iv_index.ivi()));
    }

    #[test]
    fn header_round_trips_through_pecb_xor() {
        let (nid, enc_key, privacy_key) = sample_materials();
        let iv_index = IvIndex::new(0x1234_5677);
        let ttl = Ttl::new(7).unwrap();
        let seq = SequenceNumber::new(37).unwrap();
        let src = UnicastAddress::new(0x7F16).unwrap();
        let transport_pdu = [0xAAu8; 10];
        let pdu = build_network_pdu(
            &transport_pdu,
            nid,
            &enc_key,
            &privacy_key,
            Ctl::ACCESS,
            ttl,
            seq,
            src,
            iv_index,
            PduOptions::default(),
        );
        let enc_dst_and_payload = &pdu[7..];
        let random = privacy_random(enc_dst_and_payload, iv_index, PrivacyRandomMode::Conformant);
        let pecb = AesCipher::new(*privacy_key.key()).ecb_encrypt(random);
        let mut recovered = [0u8; 6];
        for i in 0..6 {
            recovered[i] = pdu[1 + i] ^ pecb[i];
        }
        let expected = [
            ttl.with_flag(false),
            seq.to_bytes_be()[0],
            seq.to_bytes_be()[1],
            seq.to_bytes_be()[2],
            src.to_bytes_be()[0],
            src.to_bytes_be()[1],
        ];
        assert_eq!(recovered, expected);
    }

    #[test]
    fn length_matches_header_plus_transport_plus_net_mic() {
        let (nid, enc_key, privacy_key) = sample_materials();
        let transport_pdu = [0xAAu8; 10];
        let pdu = build_network_pdu(
            &transport_pdu,
            nid,
            &enc_key,
            &privacy_key,
            Ctl::ACCESS,
            Ttl::new(7).unwrap(),
            SequenceNumber::new(37).unwrap(),
            UnicastAddress::new(0x7F16).unwrap(),
            IvIndex::new(0),
            PduOptions::default(),
        );
        assert_eq!(pdu.len(), 7 + transport_pdu.len() + 8);
    }
}
