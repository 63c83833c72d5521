//! Cryptographic primitives and key-derivation functions backing the outbound PDU
//! pipeline: AES-ECB, AES-CMAC, AES-CCM (via the `aes`/`cmac`/`ccm` crates), and the
//! mesh-specific `s1`/`K2` salts and derivations (Bluetooth Mesh Profile v1.0.1 3.8.2).
pub mod aes;
pub mod k_funcs;
pub mod key;
pub mod nonce;

pub use aes::{AesCipher, MicSize};
pub use k_funcs::{k2, s1};
