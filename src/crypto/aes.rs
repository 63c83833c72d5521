//! Wrapper around the RustCrypto `aes`/`cmac`/`ccm` crates so the rest of the library
//! never has a hard dependence on which AES implementation backs it. Mirrors the
//! shape of the original AESCipher: one struct holding a 128-bit key that can be
//! used as an ECB block function, a CMAC, or a CCM AEAD.
use crate::crypto::key::Key;
use crate::crypto::nonce::Nonce;
use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use ccm::aead::AeadInPlace;
use ccm::Ccm;
use cmac::{Cmac, Mac};
use generic_array::typenum::{U13, U4, U8};

type AesCcmBigMic = Ccm<Aes128, U8, U13>;
type AesCcmSmallMic = Ccm<Aes128, U4, U13>;

/// 4- or 8-byte Message Integrity Check, appended by AES-CCM.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum MicSize {
    /// 32-bit MIC, used by the unsegmented upper transport layer.
    Small,
    /// 64-bit MIC, used by the network layer.
    Big,
}
impl MicSize {
    #[must_use]
    pub fn byte_size(self) -> usize {
        match self {
            MicSize::Small => 4,
            MicSize::Big => 8,
        }
    }
}

pub struct AesCipher {
    key: [u8; 16],
}

impl AesCipher {
    #[must_use]
    pub fn new(key: Key) -> AesCipher {
        AesCipher {
            key: *key.as_bytes(),
        }
    }

    /// Single-block AES-128 ECB encryption. Deterministic, no padding; callers
    /// supply an already block-sized (16-byte) input.
    #[must_use]
    pub fn ecb_encrypt(&self, block: [u8; 16]) -> [u8; 16] {
        let cipher = Aes128::new(GenericArray::from_slice(&self.key));
        let mut ga = GenericArray::clone_from_slice(&block);
        cipher.encrypt_block(&mut ga);
        ga.into()
    }

    /// AES-CMAC (NIST SP-800-38B) over a possibly-empty message.
    #[must_use]
    pub fn cmac(&self, msg: &[u8]) -> [u8; 16] {
        self.cmac_concat(&[msg])
    }

    /// AES-CMAC over the concatenation of `parts`, without needing to allocate a
    /// single contiguous buffer first (used by `k2`, which CMACs `T1 || p || 0x02`
    /// style inputs).
    #[must_use]
    pub fn cmac_concat(&self, parts: &[&[u8]]) -> [u8; 16] {
        let mut mac = Cmac::<Aes128>::new_from_slice(&self.key)
            .expect("Aes128 key size is always valid for Cmac<Aes128>");
        for part in parts {
            if !part.is_empty() {
                mac.update(part);
            }
        }
        mac.finalize().into_bytes().into()
    }

    /// AES-CCM encryption with empty associated data. Returns `ciphertext || mic`.
    /// The `ccm` crate's `Result` is infallible here: it only fails on a payload
    /// that overflows CCM's length counter, which cannot happen for mesh PDUs
    /// (bounded to ~31 bytes total).
    #[must_use]
    pub fn ccm_encrypt(&self, nonce: &Nonce, plaintext: &[u8], mic_size: MicSize) -> Vec<u8> {
        let nonce_ga = GenericArray::from_slice(nonce.as_ref());
        let key_ga = GenericArray::from_slice(&self.key);
        let mut buf = plaintext.to_vec();
        let tag = match mic_size {
            MicSize::Big => {
                let cipher = AesCcmBigMic::new(key_ga);
                cipher
                    .encrypt_in_place_detached(nonce_ga, b"", &mut buf)
                    .expect("mesh PDUs never overflow CCM's length limit")
            }
            MicSize::Small => {
                let cipher = AesCcmSmallMic::new(key_ga);
                cipher
                    .encrypt_in_place_detached(nonce_ga, b"", &mut buf)
                    .expect("mesh PDUs never overflow CCM's length limit")
            }
        };
        buf.extend_from_slice(&tag);
        buf
    }
}
