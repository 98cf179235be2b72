//! Open-document directory: one record per open tab plus the active-tab
//! pointer.

use crate::document::FlowDocument;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Discriminates what a tab holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Flow,
    Settings,
    Terminal,
}

/// A single open editor tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub kind: TabKind,
    pub title: String,
    /// Opaque panel payload; the registry never looks inside.
    #[serde(default)]
    pub content: serde_json::Value,
    /// Last-known copy of the flow document; the degraded-load fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AHashMap<String, serde_json::Value>>,
}

impl Tab {
    /// The flow identifier of a flow tab, recovered from its canonical id.
    pub fn flow_id(&self) -> Option<&str> {
        match self.kind {
            TabKind::Flow => self.id.strip_prefix(FLOW_ID_PREFIX),
            _ => None,
        }
    }
}

/// What [`TabRegistry::open`] needs to create or refresh a tab.
#[derive(Debug, Clone)]
pub struct TabRequest {
    pub kind: TabKind,
    pub title: String,
    /// Document identifier for identifier-bearing tab kinds (flows).
    pub identifier: Option<String>,
    pub content: serde_json::Value,
    pub flow: Option<FlowDocument>,
    pub metadata: Option<AHashMap<String, serde_json::Value>>,
}

impl TabRequest {
    /// A flow tab for `document`, carrying the document as the cached copy.
    pub fn flow(document: &FlowDocument) -> Self {
        Self {
            kind: TabKind::Flow,
            title: document.name.clone(),
            identifier: Some(document.id.clone()),
            content: serde_json::Value::Null,
            flow: Some(document.clone()),
            metadata: None,
        }
    }

    /// The singleton settings tab.
    pub fn settings() -> Self {
        Self {
            kind: TabKind::Settings,
            title: "Settings".to_string(),
            identifier: None,
            content: serde_json::Value::Null,
            flow: None,
            metadata: None,
        }
    }

    /// A terminal tab. Each request yields a distinct tab.
    pub fn terminal(title: impl Into<String>) -> Self {
        Self {
            kind: TabKind::Terminal,
            title: title.into(),
            identifier: None,
            content: serde_json::Value::Null,
            flow: None,
            metadata: None,
        }
    }
}

const FLOW_ID_PREFIX: &str = "flow-";
const SETTINGS_TAB_ID: &str = "settings";

/// Derives the canonical tab id for a kind + optional document identifier.
///
/// Flow tabs get `flow-{id}`, the settings singleton a fixed id, and
/// terminal tabs a fresh time-based id on every call. Membership queries
/// must use this same derivation, so a flow reopened under the same
/// identifier lands on the same id.
pub fn canonical_tab_id(kind: &TabKind, identifier: Option<&str>) -> String {
    match kind {
        TabKind::Flow => format!("{FLOW_ID_PREFIX}{}", identifier.unwrap_or_default()),
        TabKind::Settings => SETTINGS_TAB_ID.to_string(),
        TabKind::Terminal => {
            // Wall-clock alone can collide on coarse clocks; the sequence
            // number keeps ids unique within a process.
            static NEXT: AtomicU64 = AtomicU64::new(0);
            let sequence = NEXT.fetch_add(1, Ordering::Relaxed);
            format!(
                "terminal-{}-{sequence}",
                OffsetDateTime::now_utc().unix_timestamp_nanos()
            )
        }
    }
}

/// Directory of open tabs. Order is insertion order; at most one tab exists
/// per canonical id.
#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(tabs: Vec<Tab>, active: Option<String>) -> Self {
        Self { tabs, active }
    }

    /// Opens (or refreshes) a tab and activates it.
    ///
    /// If a tab with the derived id already exists, its fields are replaced
    /// in place; the tab keeps its position. Returns the tab's id.
    pub fn open(&mut self, request: TabRequest) -> String {
        let id = canonical_tab_id(&request.kind, request.identifier.as_deref());
        let tab = Tab {
            id: id.clone(),
            kind: request.kind,
            title: request.title,
            content: request.content,
            flow: request.flow,
            metadata: request.metadata,
        };
        match self.tabs.iter().find_position(|t| t.id == id) {
            Some((position, _)) => self.tabs[position] = tab,
            None => self.tabs.push(tab),
        }
        self.active = Some(id.clone());
        id
    }

    /// Removes a tab. Closing the active tab advances the active pointer to
    /// the tab now at the closed tab's former index, else the new last tab,
    /// else none. Unknown ids are ignored.
    pub fn close(&mut self, id: &str) {
        let Some((position, _)) = self.tabs.iter().find_position(|t| t.id == id) else {
            return;
        };
        self.tabs.remove(position);
        if self.active.as_deref() == Some(id) {
            self.active = self
                .tabs
                .get(position)
                .or_else(|| self.tabs.last())
                .map(|t| t.id.clone());
        }
    }

    /// Activates a tab if it is open; unknown ids are silently ignored.
    pub fn set_active(&mut self, id: &str) {
        if self.tabs.iter().any(|t| t.id == id) {
            self.active = Some(id.to_string());
        }
    }

    /// Removes every tab and clears the active pointer.
    pub fn close_all(&mut self) {
        self.tabs.clear();
        self.active = None;
    }

    /// Whether a tab for this identifier + kind is open, using the same id
    /// derivation as [`open`](Self::open).
    pub fn is_open(&self, identifier: &str, kind: &TabKind) -> bool {
        self.find_by_identifier(identifier, kind).is_some()
    }

    /// Looks up a tab by identifier + kind via the canonical derivation.
    pub fn find_by_identifier(&self, identifier: &str, kind: &TabKind) -> Option<&Tab> {
        let id = canonical_tab_id(kind, Some(identifier));
        self.get(&id)
    }

    pub(crate) fn find_by_identifier_mut(
        &mut self,
        identifier: &str,
        kind: &TabKind,
    ) -> Option<&mut Tab> {
        let id = canonical_tab_id(kind, Some(identifier));
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let id = self.active.as_deref()?;
        self.get(id)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}
