//! Menu data types
//!
//! `MenuNode` mirrors one node of a remote menu layout. `MenuEntry` is a
//! flattened, matchable leaf built from it by the loader.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

/// Identity of a remote menu: the owning service and the object path it
/// exports the menu on.
///
/// "No menu available" is `Option::<MenuSource>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuSource {
    pub service: String,
    pub object_path: String,
}

impl MenuSource {
    pub fn new(service: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            object_path: object_path.into(),
        }
    }

    /// Whether a signal from `(sender, path)` concerns this menu
    pub fn matches(&self, sender: &str, path: &str) -> bool {
        self.service == sender && self.object_path == path
    }
}

impl fmt::Display for MenuSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.service, self.object_path)
    }
}

/// Properties of a remote menu node.
///
/// Field names follow the menu protocol's property names. Everything is
/// optional; missing properties take their protocol defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NodeProperties {
    pub label: Option<String>,
    pub icon_name: Option<String>,
    /// `"submenu"` when the node has children that may not be populated yet
    pub children_display: Option<String>,
    /// Key combinations; only the first one is displayed
    pub shortcut: Vec<Vec<String>>,
    pub enabled: Option<bool>,
}

impl NodeProperties {
    /// Whether the node declares children that have to be fetched
    pub fn has_submenu(&self) -> bool {
        self.children_display
            .as_deref()
            .is_some_and(|display| !display.is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// A node of a remote menu tree, as returned by a layout fetch
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuNode {
    pub id: i32,
    pub properties: NodeProperties,
    pub children: Vec<MenuNode>,
}

/// Result of a layout fetch
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub revision: u32,
    pub root: MenuNode,
}

/// A group on the path from the menu root to an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub id: i32,
    pub label: String,
}

/// A selectable leaf of the flattened menu
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub id: i32,
    /// Label with mnemonic markers removed
    pub label: String,
    pub icon_name: Option<String>,
    /// Display form, e.g. "Ctrl+Shift+N"
    pub shortcut: Option<String>,
    /// Root-to-parent order; empty for top-level entries
    pub ancestors: Vec<Ancestor>,
    pub action_id: String,
    /// e.g. "File » New"
    pub action_text: String,
    pub match_tokens: BTreeSet<String>,
}

impl MenuEntry {
    /// The group this entry's enabled state is read from
    pub fn parent(&self) -> Option<&Ancestor> {
        self.ancestors.last()
    }
}
