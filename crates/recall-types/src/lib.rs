//! Shared type definitions for the Recall countdown teleport.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actors and actions
//! - [`spatial`] -- Positions (movement anchors) and locations (with facing)
//! - [`items`] -- Item kinds, stacks and inventory slots
//! - [`events`] -- Interact and move notifications from the host

pub mod events;
pub mod ids;
pub mod items;
pub mod spatial;

// Re-export all public types at crate root for convenience.
pub use events::{ClickAction, InteractEvent, MoveEvent};
pub use ids::{ActionId, ActorId};
pub use items::{ItemKind, ItemStack, Slot};
pub use spatial::{Location, Position};
