//! Remote application menus: identity, layout types, the transport seam,
//! tree loading and action id encoding.

pub mod action_id;
pub mod loader;
pub mod transport;
pub mod types;

pub use action_id::{ActionId, ActionIdError};
pub use loader::load_menu;
pub use transport::{MenuChangeListener, MenuSignal, MenuTransport, TransportError};
pub use types::{Ancestor, MenuEntry, MenuLayout, MenuNode, MenuSource, NodeProperties};
