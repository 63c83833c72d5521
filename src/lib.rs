//! Bluetooth Mesh provisioner-side outbound PDU construction.
//!
//! Given a [`model::MeshNetwork`]'s key material and a model-layer payload,
//! [`access::build_network_pdu`] produces a fully obfuscated, encrypted
//! network PDU ready for transmission over a Mesh Proxy link: K2 key
//! derivation, AES-CCM transport- and network-layer authenticated encryption,
//! and AES-ECB header obfuscation, per Bluetooth Mesh Profile v1.0.1 §3.8.
//!
//! Segmentation, inbound decryption, replay-cache enforcement, and
//! provisioning are out of scope; this crate only builds outbound,
//! unsegmented access-message PDUs from already-established keys.

mod access;
mod address;
mod crypto;
mod error;
mod loader;
mod mesh;
mod model;
mod network;
mod transport;

pub use access::{build_network_pdu, build_network_pdu_with_options};
pub use error::CoreError;
pub use loader::load_network;
pub use model::{KeySelector, MeshNetwork, NamedAppKey, NamedNetKey, Node, APP_IDX_DEV};
pub use network::{PduOptions, PrivacyRandomMode};
