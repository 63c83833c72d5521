//! 13-byte AES-CCM nonces for the transport and network layers. Both share the
//! `seq || src` prefix pattern described in the design notes; `Nonce::build`
//! is the one place that lays out the 13 bytes, so the two callers (transport,
//! network) only supply their differing trailer.
use crate::address::{Address, UnicastAddress};
use crate::mesh::{Ctl, IvIndex, SequenceNumber};

pub const NONCE_LEN: usize = 13;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Nonce([u8; NONCE_LEN]);
impl Nonce {
    fn build(
        first_byte: u8,
        second_byte: u8,
        seq: SequenceNumber,
        src: UnicastAddress,
        trailer_7_8: [u8; 2],
        iv_index: IvIndex,
    ) -> Nonce {
        let seq = seq.to_bytes_be();
        let src = src.to_bytes_be();
        let iv = iv_index.to_bytes_be();
        Nonce([
            first_byte,
            second_byte,
            seq[0],
            seq[1],
            seq[2],
            src[0],
            src[1],
            trailer_7_8[0],
            trailer_7_8[1],
            iv[0],
            iv[1],
            iv[2],
            iv[3],
        ])
    }
}
impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Which key kind a transport nonce was built for, per Mesh Profile 3.8.5.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TransportNonceType {
    Application,
    Device,
}
impl TransportNonceType {
    #[must_use]
    fn as_u8(self) -> u8 {
        match self {
            TransportNonceType::Application => 0x01,
            TransportNonceType::Device => 0x02,
        }
    }
}

/// Builds the unsegmented (`SZMIC` = 0) transport nonce.
#[must_use]
pub fn transport_nonce(
    nonce_type: TransportNonceType,
    seq: SequenceNumber,
    src: UnicastAddress,
    dst: Address,
    iv_index: IvIndex,
) -> Nonce {
    Nonce::build(nonce_type.as_u8(), 0x00, seq, src, dst.to_bytes_be(), iv_index)
}

/// Builds the network-layer nonce. `ctl` is always [`Ctl::ACCESS`] on the
/// outbound access-message path this crate builds; bytes 7-8 are zero padding
/// (DST is never part of the network nonce, regardless of CTL).
#[must_use]
pub fn network_nonce(
    ctl: Ctl,
    ttl: u8,
    seq: SequenceNumber,
    src: UnicastAddress,
    iv_index: IvIndex,
) -> Nonce {
    let second_byte = (ttl & 0x7F) | ((ctl.is_control() as u8) << 7);
    Nonce::build(0x00, second_byte, seq, src, [0x00, 0x00], iv_index)
}
