//! Menu Loader
//!
//! Walks a remote menu tree depth-first and flattens it into matchable
//! leaf entries.
//!
//! ## Expansion
//!
//! The root is always fetched. Any other node is expanded when it declares a
//! submenu (`children-display`) but arrived without children; expansion sends
//! `about_to_show` first because some applications only fill submenus in
//! response to it.
//!
//! ## Entries
//!
//! A node with children is a group: it joins the ancestor chain of its
//! descendants and is never an entry itself. A childless node with a
//! non-empty label is an entry. Child order is preserved.

use tracing::{debug, instrument, trace};

use crate::matching::normalize::match_tokens;

use super::action_id::ActionId;
use super::transport::{MenuTransport, TransportError};
use super::types::{Ancestor, MenuEntry, MenuNode, MenuSource};

/// The implicit root of every menu
pub const ROOT_ID: i32 = 0;

/// Fetch the whole subtree
const FULL_DEPTH: i32 = -1;

/// Properties requested while loading the tree
pub const LAYOUT_PROPERTIES: &[&str] = &["label", "icon-name", "children-display", "shortcut"];

/// Load and flatten the menu exported by `source`.
///
/// Any transport error aborts the whole load; no partial list is returned.
#[instrument(skip(transport))]
pub fn load_menu<T: MenuTransport + ?Sized>(
    transport: &T,
    source: &MenuSource,
    separator: &str,
) -> Result<Vec<MenuEntry>, TransportError> {
    let layout = transport.get_layout(source, ROOT_ID, FULL_DEPTH, LAYOUT_PROPERTIES)?;
    debug!(revision = layout.revision, "Fetched menu root");

    let walker = TreeWalker {
        transport,
        source,
        separator,
    };

    let mut entries = Vec::new();
    for child in layout.root.children {
        walker.visit(child, &[], &mut entries)?;
    }

    debug!(entry_count = entries.len(), "Flattened menu");
    Ok(entries)
}

struct TreeWalker<'a, T: ?Sized> {
    transport: &'a T,
    source: &'a MenuSource,
    separator: &'a str,
}

impl<T: MenuTransport + ?Sized> TreeWalker<'_, T> {
    fn visit(
        &self,
        node: MenuNode,
        ancestors: &[Ancestor],
        entries: &mut Vec<MenuEntry>,
    ) -> Result<(), TransportError> {
        let id = node.id;
        let node = if node.properties.has_submenu() && node.children.is_empty() {
            self.expand(id)?
        } else {
            node
        };

        let label = strip_mnemonics(node.properties.label.as_deref().unwrap_or_default());

        if !node.children.is_empty() {
            let mut chain = ancestors.to_vec();
            chain.push(Ancestor { id, label });
            for child in node.children {
                self.visit(child, &chain, entries)?;
            }
            return Ok(());
        }

        if label.trim().is_empty() {
            trace!(id, "Skipping unlabeled menu item");
            return Ok(());
        }

        let shortcut = format_shortcut(&node.properties.shortcut);
        let icon_name = node.properties.icon_name.filter(|name| !name.is_empty());
        entries.push(self.build_entry(id, label, icon_name, shortcut, ancestors));
        Ok(())
    }

    fn expand(&self, id: i32) -> Result<MenuNode, TransportError> {
        trace!(id, "Expanding submenu");
        self.transport.about_to_show(self.source, id)?;
        let layout = self
            .transport
            .get_layout(self.source, id, FULL_DEPTH, LAYOUT_PROPERTIES)?;
        Ok(layout.root)
    }

    fn build_entry(
        &self,
        id: i32,
        label: String,
        icon_name: Option<String>,
        shortcut: Option<String>,
        ancestors: &[Ancestor],
    ) -> MenuEntry {
        let action_id = ActionId::new(
            self.source.clone(),
            ancestors.iter().map(|a| a.id).collect(),
            id,
        )
        .encode();

        let path: Vec<&str> = ancestors
            .iter()
            .map(|a| a.label.as_str())
            .chain(std::iter::once(label.as_str()))
            .collect();
        let action_text = path.join(self.separator);
        let match_tokens = match_tokens(path.iter().copied());

        MenuEntry {
            id,
            icon_name,
            shortcut,
            ancestors: ancestors.to_vec(),
            action_id,
            action_text,
            match_tokens,
            label,
        }
    }
}

/// Remove mnemonic markers: a single `_` is dropped, `__` is a literal `_`.
pub fn strip_mnemonics(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if chars.peek() == Some(&'_') {
                chars.next();
                out.push('_');
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Render the first key combination, e.g. `[["Control", "Shift", "n"]]`
/// becomes "Ctrl+Shift+N".
pub fn format_shortcut(shortcut: &[Vec<String>]) -> Option<String> {
    let keys = shortcut.first().filter(|keys| !keys.is_empty())?;
    let rendered = keys
        .iter()
        .map(|key| display_key(key))
        .collect::<Vec<_>>()
        .join("+");
    Some(rendered)
}

fn display_key(key: &str) -> String {
    match key {
        "Control" => "Ctrl".to_string(),
        "Super" => "Meta".to_string(),
        k if k.chars().count() == 1 => k.to_uppercase(),
        k => k.to_string(),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
