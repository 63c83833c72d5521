//! In-memory network data model: the key material and node roster a caller
//! assembles (typically via `loader`) before handing it to `access::build_network_pdu`.
use crate::crypto::key::{AppKey, DevKey, NetKey};
use crate::error::CoreError;
use std::sync::Mutex;

/// Sentinel `app_idx` meaning "use the device key", never a valid stored
/// `AppKey` index (Mesh Profile app-key index space is 12-bit, far below this).
pub const APP_IDX_DEV: u16 = 0x7FFF;

/// Which credential `access::build_network_pdu` should sign a message with.
/// Replaces the spec's bare `app_idx == APP_IDX_DEV` convention with a type that
/// makes an invalid index unrepresentable once resolved.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum KeySelector {
    AppKey(usize),
    DevKey,
}
impl KeySelector {
    #[must_use]
    pub fn from_app_idx(app_idx: u16) -> KeySelector {
        if app_idx == APP_IDX_DEV {
            KeySelector::DevKey
        } else {
            KeySelector::AppKey(app_idx as usize)
        }
    }
}

/// A network's shared symmetric key, with the index/name metadata the
/// persisted document carries alongside it.
#[derive(Clone, Debug)]
pub struct NamedNetKey {
    pub index: u16,
    pub key: NetKey,
    pub name: String,
}

/// An application key bound to exactly one `NetKey` by index.
#[derive(Clone, Debug)]
pub struct NamedAppKey {
    pub index: u16,
    pub key: AppKey,
    pub bound_net_key_index: u16,
    pub name: String,
}

/// A provisioned node: its own unicast address and device key.
#[derive(Clone, Debug)]
pub struct Node {
    pub unicast_address: u16,
    pub dev_key: DevKey,
    pub name: String,
}

/// A mesh network's key material, roster, and replay-protection state.
///
/// The core borrows this read-only except for `acquire_seq`, which atomically
/// mints the next sequence number under a mutex (§5 of the design notes):
/// concurrent callers transmitting on the same network must serialize through
/// it rather than incrementing a bare counter.
pub struct MeshNetwork {
    pub uuid: String,
    pub net_keys: Vec<NamedNetKey>,
    pub app_keys: Vec<NamedAppKey>,
    pub provisioner_dev_key: DevKey,
    pub nodes: Vec<Node>,
    pub iv_index: u32,
    sequence_number: Mutex<u32>,
}

impl MeshNetwork {
    pub fn new(
        uuid: String,
        net_keys: Vec<NamedNetKey>,
        app_keys: Vec<NamedAppKey>,
        provisioner_dev_key: DevKey,
        nodes: Vec<Node>,
        iv_index: u32,
        sequence_number: u32,
    ) -> Result<MeshNetwork, CoreError> {
        if net_keys.is_empty() {
            return Err(CoreError::UnknownKey);
        }
        for app_key in &app_keys {
            if !net_keys.iter().any(|n| n.index == app_key.bound_net_key_index) {
                return Err(CoreError::MalformedDocument(format!(
                    "app key {} references unknown net key index {}",
                    app_key.index, app_key.bound_net_key_index
                )));
            }
        }
        for node in &nodes {
            if node.unicast_address == 0 || node.unicast_address & 0x8000 != 0 {
                return Err(CoreError::InvalidAddress);
            }
        }
        Ok(MeshNetwork {
            uuid,
            net_keys,
            app_keys,
            provisioner_dev_key,
            nodes,
            iv_index,
            sequence_number: Mutex::new(sequence_number),
        })
    }

    /// The network's first (master-credential) `NetKey`. Multi-NetKey selection
    /// by friendship/subnet is out of scope; the outbound path always signs
    /// against this one.
    pub(crate) fn primary_net_key(&self) -> &NetKey {
        &self.net_keys[0].key
    }

    pub(crate) fn app_key(&self, index: usize) -> Result<&AppKey, CoreError> {
        self.app_keys.get(index).map(|k| &k.key).ok_or(CoreError::UnknownKey)
    }

    /// Atomically mints the next 24-bit sequence number, returning
    /// `SequenceExhausted` rather than wrapping. Callers transmitting
    /// concurrently on this network must go through this instead of tracking
    /// their own counter, since it is the crate's sole synchronization point.
    pub fn acquire_seq(&self) -> Result<u32, CoreError> {
        let mut guard = self.sequence_number.lock().expect("sequence_number mutex poisoned");
        if *guard > crate::mesh::SEQUENCE_MAX {
            return Err(CoreError::SequenceExhausted);
        }
        let seq = *guard;
        *guard = guard.checked_add(1).ok_or(CoreError::SequenceExhausted)?;
        Ok(seq)
    }

    #[must_use]
    pub fn current_seq(&self) -> u32 {
        *self.sequence_number.lock().expect("sequence_number mutex poisoned")
    }
}
