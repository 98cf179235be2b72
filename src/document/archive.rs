use crate::error::ArchiveError;
use crate::tabs::{Tab, TabKind, TabRegistry};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// One tab frozen for archival.
///
/// The opaque JSON payloads (`content`, the cached flow document, metadata)
/// are stored as encoded strings: the bincode frame is not self-describing,
/// so `serde_json::Value` fields cannot cross it directly.
#[derive(Serialize, Deserialize, Debug)]
struct ArchivedTab {
    id: String,
    kind: TabKind,
    title: String,
    content: String,
    flow: Option<String>,
    metadata: Option<String>,
}

/// A restorable capture of the open-tab set, written in the bincode format.
///
/// Lets an embedding shell persist its session across restarts: capture the
/// registry on shutdown, save it to disk, and restore it on the next start.
#[derive(Serialize, Deserialize, Debug)]
pub struct WorkspaceArchive {
    tabs: Vec<ArchivedTab>,
    active_tab_id: Option<String>,
}

impl WorkspaceArchive {
    /// Freezes the current state of a tab registry.
    pub fn capture(registry: &TabRegistry) -> Result<Self, ArchiveError> {
        let mut tabs = Vec::with_capacity(registry.tabs().len());
        for tab in registry.tabs() {
            tabs.push(ArchivedTab {
                id: tab.id.clone(),
                kind: tab.kind.clone(),
                title: tab.title.clone(),
                content: encode_json(&tab.content)?,
                flow: tab.flow.as_ref().map(encode_json).transpose()?,
                metadata: tab.metadata.as_ref().map(encode_json).transpose()?,
            });
        }
        Ok(Self {
            tabs,
            active_tab_id: registry.active_id().map(str::to_string),
        })
    }

    /// Rebuilds a tab registry from the archived state.
    pub fn restore(&self) -> Result<TabRegistry, ArchiveError> {
        let mut tabs = Vec::with_capacity(self.tabs.len());
        for archived in &self.tabs {
            tabs.push(Tab {
                id: archived.id.clone(),
                kind: archived.kind.clone(),
                title: archived.title.clone(),
                content: decode_json(&archived.content)?,
                flow: archived.flow.as_deref().map(decode_json).transpose()?,
                metadata: archived.metadata.as_deref().map(decode_json).transpose()?,
            });
        }
        Ok(TabRegistry::from_parts(tabs, self.active_tab_id.clone()))
    }

    /// Serializes the archive to bincode bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        encode_to_vec(self, standard()).map_err(|e| ArchiveError::Encode(e.to_string()))
    }

    /// Deserializes an archive from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        decode_from_slice(bytes, standard())
            .map(|(archive, _)| archive) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArchiveError::Decode(e.to_string()))
    }

    /// Saves the archive to a file.
    pub fn save(&self, path: &str) -> Result<(), ArchiveError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads an archive from a file.
    pub fn from_file(path: &str) -> Result<Self, ArchiveError> {
        let mut file = fs::File::open(path).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArchiveError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, ArchiveError> {
    serde_json::to_string(value).map_err(|e| ArchiveError::Encode(e.to_string()))
}

fn decode_json<T: for<'de> Deserialize<'de>>(json: &str) -> Result<T, ArchiveError> {
    serde_json::from_str(json).map_err(|e| ArchiveError::Decode(e.to_string()))
}
