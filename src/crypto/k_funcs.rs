//! Mesh-specific key derivation functions from Bluetooth Mesh Profile v1.0.1 3.8.2.
use crate::crypto::aes::AesCipher;
use crate::crypto::key::{AppKey, EncryptionKey, Key, NetKey, PrivacyKey};
use crate::mesh::Nid;
use crate::transport::Aid;

const ZERO_KEY: Key = Key::new([0u8; 16]);

/// `s1(m) = AES-CMAC_zero_key(m)`. Used only to produce mesh salts, e.g. `s1("smk2")`.
#[must_use]
pub fn s1(m: &[u8]) -> [u8; 16] {
    AesCipher::new(ZERO_KEY).cmac(m)
}

/// K2, Bluetooth Mesh Profile 3.8.2.6. Derives the NID/EncryptionKey/PrivacyKey
/// triple used for all network-layer crypto. `p` is the "friendship" selector
/// byte string; the master-credential caller passes `[0x00]`.
#[must_use]
pub fn k2(net_key: &NetKey, p: &[u8]) -> (Nid, EncryptionKey, PrivacyKey) {
    let salt = s1(b"smk2");
    let t = AesCipher::new(Key::new(salt)).cmac(net_key.key().as_ref());
    let cipher = AesCipher::new(Key::new(t));
    let t1 = cipher.cmac_concat(&[p, &[0x01]]);
    let t2 = cipher.cmac_concat(&[&t1, p, &[0x02]]);
    let t3 = cipher.cmac_concat(&[&t2, p, &[0x03]]);
    (
        Nid::new_masked(t1[15]),
        EncryptionKey::new(Key::new(t2)),
        PrivacyKey::new(Key::new(t3)),
    )
}

/// K4, Bluetooth Mesh Profile 3.8.2.8. Derives the 6-bit AID a receiver uses to
/// preselect which AppKey decrypted a message; the transport layer here uses it
/// only to fill in the outbound transport header byte.
#[must_use]
pub fn k4(app_key: &AppKey) -> Aid {
    let salt = s1(b"smk4");
    let t = AesCipher::new(Key::new(salt)).cmac(app_key.key().as_ref());
    let out = AesCipher::new(Key::new(t)).cmac(b"id6\x01");
    Aid::new_masked(out[15])
}
