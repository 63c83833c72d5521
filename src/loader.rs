//! Loads a persisted network document (§6 of the design notes) into a
//! `MeshNetwork`. A thin, infallible-shape adapter over `serde_json`: structural
//! errors surface as `CoreError::MalformedDocument`, key-length errors as
//! `CoreError::InvalidKeyMaterial`. This module never retries or caches; it is
//! the caller's job to re-fetch a document if the underlying store changes.
use crate::crypto::key::{AppKey, DevKey, Key, NetKey};
use crate::error::CoreError;
use crate::model::{MeshNetwork, NamedAppKey, NamedNetKey, Node};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct DocumentNetKey {
    #[serde(rename = "refresh")]
    index: u16,
    key: String,
}

#[derive(Deserialize)]
struct DocumentAppKey {
    key: String,
    #[serde(rename = "boundNetKey")]
    bound_net_key: u16,
}

#[derive(Deserialize)]
struct DocumentNode {
    unicast: u16,
    key: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct DocumentNetwork {
    #[serde(default)]
    name: String,
    #[serde(rename = "netKeys")]
    net_keys: Vec<DocumentNetKey>,
    #[serde(rename = "appKeys", default)]
    app_keys: Vec<DocumentAppKey>,
    #[serde(default)]
    nodes: Vec<DocumentNode>,
    #[serde(rename = "lowerAddress")]
    lower_address: u16,
    #[serde(rename = "ivIndex")]
    iv_index: u32,
}

/// Parses a persisted network document and builds the one `MeshNetwork` it
/// contains. `uuid` selects which top-level entry to load if the document
/// contains more than one (the format is keyed by network UUID).
pub fn load_network(json: &str, uuid: &str) -> Result<MeshNetwork, CoreError> {
    let mut documents: HashMap<String, DocumentNetwork> = serde_json::from_str(json)?;
    let doc = documents
        .remove(uuid)
        .ok_or_else(|| CoreError::MalformedDocument(format!("no network with uuid {uuid}")))?;

    let net_keys = doc
        .net_keys
        .into_iter()
        .map(|nk| {
            Ok(NamedNetKey {
                index: nk.index,
                key: NetKey::from_hex(&nk.key)?,
                name: doc_name(&doc.name, nk.index),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let app_keys = doc
        .app_keys
        .into_iter()
        .enumerate()
        .map(|(i, ak)| {
            Ok(NamedAppKey {
                index: i as u16,
                key: AppKey::from_hex(&ak.key)?,
                bound_net_key_index: ak.bound_net_key,
                name: doc_name(&doc.name, i as u16),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let mut nodes = Vec::with_capacity(doc.nodes.len());
    let mut provisioner_dev_key = None;
    for node in doc.nodes {
        let dev_key = DevKey::from_hex(&node.key)?;
        if node.unicast == doc.lower_address {
            provisioner_dev_key = Some(dev_key);
        }
        nodes.push(Node {
            unicast_address: node.unicast,
            dev_key,
            name: node.name,
        });
    }
    let provisioner_dev_key = provisioner_dev_key.unwrap_or_else(|| DevKey::new(Key::new([0u8; 16])));

    MeshNetwork::new(
        uuid.to_string(),
        net_keys,
        app_keys,
        provisioner_dev_key,
        nodes,
        doc.iv_index,
        0,
    )
}

fn doc_name(network_name: &str, index: u16) -> String {
    if network_name.is_empty() {
        format!("key-{index}")
    } else {
        format!("{network_name}-{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "11111111-2222-3333-4444-555555555555": {
            "name": "sample",
            "netKeys": [{"refresh": 0, "key": "7dd7364cd842ad18c17c2b820c84c3d6"}],
            "appKeys": [{"key": "63964771734fbd76e3b40519d1d94a48", "boundNetKey": 0}],
            "nodes": [{"unicast": 4118, "key": "9d6dd0e96eb25dc19a40ed9914f8f03f", "name": "provisioner"}],
            "lowerAddress": 4118,
            "ivIndex": 0,
            "timestamp": "2020-01-01T00:00:00Z"
        }
    }"#;

    #[test]
    fn loads_sample_network() {
        let network = load_network(SAMPLE, "11111111-2222-3333-4444-555555555555").unwrap();
        assert_eq!(network.net_keys.len(), 1);
        assert_eq!(network.app_keys.len(), 1);
        assert_eq!(network.nodes.len(), 1);
        assert_eq!(network.iv_index, 0);
    }

    #[test]
    fn unknown_uuid_is_malformed_document() {
        let result = load_network(SAMPLE, "00000000-0000-0000-0000-000000000000");
        assert!(matches!(result, Err(CoreError::MalformedDocument(_))));
    }

    #[test]
    fn bad_key_hex_is_invalid_key_material() {
        let bad = SAMPLE.replace("7dd7364cd842ad18c17c2b820c84c3d6", "zz");
        let result = load_network(&bad, "11111111-2222-3333-4444-555555555555");
        assert!(matches!(result, Err(CoreError::InvalidKeyMaterial)));
    }
}
