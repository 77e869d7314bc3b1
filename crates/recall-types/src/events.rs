//! Inbound notifications delivered by the host game.

use serde::{Deserialize, Serialize};

use crate::ids::ActorId;
use crate::items::ItemKind;
use crate::spatial::Location;

/// How an actor interacted with the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickAction {
    /// Right click while aiming at nothing.
    RightClickAir,
    /// Right click while aiming at a block.
    RightClickBlock,
    /// Left click while aiming at nothing.
    LeftClickAir,
    /// Left click while aiming at a block.
    LeftClickBlock,
    /// Pressure plates and other physical triggers.
    Physical,
}

impl ClickAction {
    /// Whether this is a right click (air or block).
    pub const fn is_right_click(self) -> bool {
        matches!(self, Self::RightClickAir | Self::RightClickBlock)
    }
}

/// An actor used the item in their hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractEvent {
    /// Who interacted.
    pub actor: ActorId,
    /// The kind of item held during the interaction, if any.
    pub item: Option<ItemKind>,
    /// The kind of click.
    pub click: ClickAction,
}

/// An actor's location changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// Who moved.
    pub actor: ActorId,
    /// Location before the move.
    pub from: Location,
    /// Location after the move.
    pub to: Location,
}

impl MoveEvent {
    /// Whether only the facing changed.
    pub fn is_turn_only(&self) -> bool {
        !self.to.position.differs_from(&self.from.position)
    }
}
