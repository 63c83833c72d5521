//! 128-bit AES keys used across the mesh crypto stack. Every key-shaped value
//! (net, app, device, derived encryption/privacy keys) wraps the same `Key`
//! newtype so the K2 derivation and CCM/CMAC helpers only need to be written once;
//! the wrapper types exist to stop a `NetKey` and an `EncryptionKey` from being
//! passed to the wrong parameter at a call site.
use crate::error::CoreError;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 16;

/// Raw 128-bit AES key. Zeroized on drop; mesh key material should never
/// outlive the PDU it was used to build.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    #[must_use]
    pub const fn new(bytes: [u8; KEY_LEN]) -> Key {
        Key(bytes)
    }

    pub fn from_hex(hex: &str) -> Result<Key, CoreError> {
        let bytes = hex::decode(hex).map_err(|_| CoreError::InvalidKeyMaterial)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Key, CoreError> {
        if bytes.len() != KEY_LEN {
            return Err(CoreError::InvalidKeyMaterial);
        }
        let mut out = [0u8; KEY_LEN];
        out.copy_from_slice(bytes);
        Ok(Key(out))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}
impl core::fmt::Debug for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Key(<redacted>)")
    }
}
impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

macro_rules! key_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Eq, PartialEq, Hash, Zeroize, ZeroizeOnDrop)]
        pub struct $name(Key);
        impl $name {
            #[must_use]
            pub fn new(key: Key) -> Self {
                Self(key)
            }
            pub fn from_hex(hex: &str) -> Result<Self, CoreError> {
                Ok(Self(Key::from_hex(hex)?))
            }
            #[must_use]
            pub fn key(&self) -> &Key {
                &self.0
            }
        }
        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}(<redacted>)", stringify!($name))
            }
        }
        impl From<Key> for $name {
            fn from(k: Key) -> Self {
                Self(k)
            }
        }
    };
}

key_newtype!(NetKey, "A network's shared symmetric key.");
key_newtype!(AppKey, "An application key, bound to exactly one NetKey.");
key_newtype!(DevKey, "A per-node device key used for configuration messages.");
key_newtype!(
    EncryptionKey,
    "K2-derived key used for network-layer AES-CCM."
);
key_newtype!(PrivacyKey, "K2-derived key used for header obfuscation.");
