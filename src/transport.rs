//! Unsegmented upper + lower transport layer (Bluetooth Mesh Profile 3.8.5, 3.8.6).
//!
//! Builds the 13-byte transport nonce, runs AES-CCM over the access payload with a
//! 32-bit MIC, and prefixes the 1-byte transport header (AKF/AID, SEG=0). Segmented
//! PDUs are out of scope: this module only ever emits the unsegmented framing.
use crate::address::{Address, UnicastAddress};
use crate::crypto::key::{AppKey, DevKey, Key};
use crate::crypto::nonce::{transport_nonce, TransportNonceType};
use crate::crypto::{AesCipher, MicSize};
use crate::mesh::{IvIndex, SequenceNumber};

const AID_MAX: u8 = 0x3F;

/// 6-bit Application Key ID, used by a receiver to preselect which AppKey to try.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Aid(u8);
impl Aid {
    #[must_use]
    pub fn new_masked(v: u8) -> Aid {
        Aid(v & AID_MAX)
    }
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Which credential signs the transport layer for this message: an application
/// key (carrying its AID for the header byte, AKF = 1) or the device key
/// (AKF = 0, AID unused).
pub enum TransportKey<'a> {
    App(&'a AppKey, Aid),
    Dev(&'a DevKey),
}
impl TransportKey<'_> {
    fn key(&self) -> Key {
        *match self {
            TransportKey::App(k, _) => k.key(),
            TransportKey::Dev(k) => k.key(),
        }
    }
    fn nonce_type(&self) -> TransportNonceType {
        match self {
            TransportKey::App(..) => TransportNonceType::Application,
            TransportKey::Dev(_) => TransportNonceType::Device,
        }
    }
    /// AKF<<6 | AID; SEG (bit 7) is always 0 here since this layer never segments.
    fn header_byte(&self) -> u8 {
        match self {
            TransportKey::App(_, aid) => 0x40 | aid.value(),
            TransportKey::Dev(_) => 0x00,
        }
    }
}

/// Maximum unsegmented upper-transport payload with a 32-bit MIC on a 15-byte
/// lower transport PDU: 15 - 1 (header) - 4 (MIC) = 10... except the header byte
/// lives in the *lower* transport PDU alongside the encrypted upper payload, so
/// the access-layer limit (no header, no MIC) is 11 bytes (see `access::MAX_UNSEGMENTED_PAYLOAD`).
pub const MAX_UNSEGMENTED_PAYLOAD: usize = 11;

/// Encrypts `model_message` and returns the lower transport PDU: the 1-byte
/// transport header followed by `AES-CCM(model_message) || mic` (4-byte MIC).
#[must_use]
pub fn build_transport_pdu(
    model_message: &[u8],
    key: &TransportKey,
    seq: SequenceNumber,
    src: UnicastAddress,
    dst: Address,
    iv_index: IvIndex,
) -> Vec<u8> {
    let nonce = transport_nonce(key.nonce_type(), seq, src, dst, iv_index);
    let cipher = AesCipher::new(key.key());
    log::trace!(
        "transport: header=0x{:02x} seq={:?} src={:?} dst={:?}",
        key.header_byte(),
        seq,
        src,
        dst
    );
    let mut out = Vec::with_capacity(1 + model_message.len() + MicSize::Small.byte_size());
    out.push(key.header_byte());
    out.extend(cipher.ccm_encrypt(&nonce, model_message, MicSize::Small));
    out
}
