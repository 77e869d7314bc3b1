//! Host world capabilities and an in-memory implementation.
//!
//! The scheduler never talks to a game engine directly. It needs to know
//! where an actor stands, to move them, to message them, and to inspect and
//! change the items they carry. [`ActorWorld`] and [`Inventory`] abstract
//! those capabilities; the integration layer of a real server implements
//! them over its own player API.
//!
//! [`MemoryWorld`] implements both over plain maps. It backs the demo
//! binary and the test suites, records every teleport and message, and can
//! be told to fail commands.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use recall_types::{ActorId, ItemKind, ItemStack, Location, Position, Slot};
use tracing::debug;

use crate::error::HostError;

/// Number of inventory slots a [`MemoryWorld`] actor has.
pub const INVENTORY_SLOTS: usize = 36;

/// Where an actor is, moving them, and talking to them.
pub trait ActorWorld: Send + Sync {
    /// Current location of the actor.
    fn location(&self, actor: ActorId) -> Result<Location, HostError>;

    /// Move the actor to `destination`, keeping their facing.
    fn teleport(&self, actor: ActorId, destination: Position) -> Result<(), HostError>;

    /// Send a chat message to the actor. Fire-and-forget.
    fn notify(&self, actor: ActorId, message: &str) -> Result<(), HostError>;
}

/// The items an actor carries.
pub trait Inventory: Send + Sync {
    /// Units of `kind` held anywhere in the actor's inventory.
    fn held_item_count(&self, actor: ActorId, kind: &ItemKind) -> Result<u32, HostError>;

    /// The stack the actor is actively holding, if any.
    fn active_stack(&self, actor: ActorId) -> Result<Option<ItemStack>, HostError>;

    /// All non-empty stacks with their inventory index, in index order.
    fn stacks(&self, actor: ActorId) -> Result<Vec<(usize, ItemStack)>, HostError>;

    /// Change the amount of one stack by `delta`. A stack reaching zero is
    /// removed. Returns the new amount.
    fn adjust_stack(&self, actor: ActorId, slot: Slot, delta: i32) -> Result<u32, HostError>;
}

/// Which stack gave up an item in [`consume_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRemoval {
    /// Taken from the actively held stack.
    ActiveStack,
    /// Taken from the stack at this inventory index.
    Slot(usize),
    /// No stack of the kind was found; nothing was taken.
    NotFound,
}

/// Remove one unit of `kind` from the actor's inventory.
///
/// The actively held stack is preferred. If it holds something else, the
/// inventory is scanned in index order and the first matching stack gives
/// up one unit.
pub fn consume_one(
    inventory: &dyn Inventory,
    actor: ActorId,
    kind: &ItemKind,
) -> Result<ItemRemoval, HostError> {
    if inventory
        .active_stack(actor)?
        .is_some_and(|stack| stack.is_kind(kind))
    {
        inventory.adjust_stack(actor, Slot::ActiveHand, -1)?;
        return Ok(ItemRemoval::ActiveStack);
    }

    let found = inventory
        .stacks(actor)?
        .into_iter()
        .find(|(_, stack)| stack.is_kind(kind));

    match found {
        Some((index, _)) => {
            inventory.adjust_stack(actor, Slot::Index(index), -1)?;
            Ok(ItemRemoval::Slot(index))
        }
        None => Ok(ItemRemoval::NotFound),
    }
}

/// State of one actor inside a [`MemoryWorld`].
#[derive(Debug, Clone)]
struct ActorRecord {
    location: Location,
    active_slot: usize,
    slots: Vec<Option<ItemStack>>,
    messages: Vec<String>,
    teleports: Vec<Position>,
}

impl ActorRecord {
    fn new(location: Location) -> Self {
        Self {
            location,
            active_slot: 0,
            slots: vec![None; INVENTORY_SLOTS],
            messages: Vec::new(),
            teleports: Vec::new(),
        }
    }

    fn slot_index(&self, slot: Slot) -> usize {
        match slot {
            Slot::ActiveHand => self.active_slot,
            Slot::Index(index) => index,
        }
    }
}

/// In-memory host world.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    actors: DashMap<ActorId, ActorRecord>,
    fail_teleports: AtomicBool,
    fail_notifications: AtomicBool,
}

impl MemoryWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor at `location` with an empty inventory.
    pub fn spawn(&self, actor: ActorId, location: impl Into<Location>) {
        self.actors.insert(actor, ActorRecord::new(location.into()));
    }

    /// Remove an actor (e.g. the player left the server).
    pub fn despawn(&self, actor: ActorId) {
        self.actors.remove(&actor);
    }

    /// Put `stack` into inventory slot `index`, replacing what was there.
    pub fn give(&self, actor: ActorId, index: usize, stack: ItemStack) -> Result<(), HostError> {
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        let slot = record
            .slots
            .get_mut(index)
            .ok_or_else(|| HostError::CommandFailed {
                actor,
                command: "give",
                message: format!("slot {index} out of range"),
            })?;
        *slot = Some(stack);
        Ok(())
    }

    /// Select which slot is the actively held one.
    pub fn select_slot(&self, actor: ActorId, index: usize) -> Result<(), HostError> {
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        if index >= record.slots.len() {
            return Err(HostError::CommandFailed {
                actor,
                command: "select_slot",
                message: format!("slot {index} out of range"),
            });
        }
        record.active_slot = index;
        Ok(())
    }

    /// Move an actor without going through a teleport.
    pub fn set_location(&self, actor: ActorId, location: impl Into<Location>) -> Result<(), HostError> {
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        record.location = location.into();
        Ok(())
    }

    /// Drop every stack of `kind` the actor carries. Returns how many units
    /// were removed.
    pub fn take_all(&self, actor: ActorId, kind: &ItemKind) -> Result<u32, HostError> {
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        let mut removed: u32 = 0;
        for slot in &mut record.slots {
            if slot.as_ref().is_some_and(|stack| stack.kind == *kind) {
                let amount = slot.take().map_or(0, |stack| stack.amount);
                removed = removed.saturating_add(amount);
            }
        }
        Ok(removed)
    }

    /// Messages delivered to the actor so far, oldest first.
    pub fn messages(&self, actor: ActorId) -> Vec<String> {
        self.actors
            .get(&actor)
            .map(|record| record.messages.clone())
            .unwrap_or_default()
    }

    /// Teleport destinations applied to the actor so far.
    pub fn teleports(&self, actor: ActorId) -> Vec<Position> {
        self.actors
            .get(&actor)
            .map(|record| record.teleports.clone())
            .unwrap_or_default()
    }

    /// Amount held in slot `index`, zero when empty.
    pub fn slot_amount(&self, actor: ActorId, index: usize) -> u32 {
        self.actors
            .get(&actor)
            .and_then(|record| record.slots.get(index).cloned().flatten())
            .map_or(0, |stack| stack.amount)
    }

    /// Make every subsequent teleport fail (or succeed again).
    pub fn fail_teleports(&self, fail: bool) {
        self.fail_teleports.store(fail, Ordering::Release);
    }

    /// Make every subsequent notification fail (or succeed again).
    pub fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::Release);
    }
}

impl ActorWorld for MemoryWorld {
    fn location(&self, actor: ActorId) -> Result<Location, HostError> {
        self.actors
            .get(&actor)
            .map(|record| record.location)
            .ok_or(HostError::UnknownActor(actor))
    }

    fn teleport(&self, actor: ActorId, destination: Position) -> Result<(), HostError> {
        if self.fail_teleports.load(Ordering::Acquire) {
            return Err(HostError::CommandFailed {
                actor,
                command: "teleport",
                message: "teleport rejected by host".to_owned(),
            });
        }
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        record.location.position = destination;
        record.teleports.push(destination);
        debug!(%actor, %destination, "actor teleported");
        Ok(())
    }

    fn notify(&self, actor: ActorId, message: &str) -> Result<(), HostError> {
        if self.fail_notifications.load(Ordering::Acquire) {
            return Err(HostError::CommandFailed {
                actor,
                command: "notify",
                message: "chat channel closed".to_owned(),
            });
        }
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        record.messages.push(message.to_owned());
        Ok(())
    }
}

impl Inventory for MemoryWorld {
    fn held_item_count(&self, actor: ActorId, kind: &ItemKind) -> Result<u32, HostError> {
        let record = self
            .actors
            .get(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        Ok(record
            .slots
            .iter()
            .flatten()
            .filter(|stack| stack.kind == *kind)
            .fold(0_u32, |total, stack| total.saturating_add(stack.amount)))
    }

    fn active_stack(&self, actor: ActorId) -> Result<Option<ItemStack>, HostError> {
        let record = self
            .actors
            .get(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        Ok(record.slots.get(record.active_slot).cloned().flatten())
    }

    fn stacks(&self, actor: ActorId) -> Result<Vec<(usize, ItemStack)>, HostError> {
        let record = self
            .actors
            .get(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        Ok(record
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.clone().map(|stack| (index, stack)))
            .collect())
    }

    fn adjust_stack(&self, actor: ActorId, slot: Slot, delta: i32) -> Result<u32, HostError> {
        let mut record = self
            .actors
            .get_mut(&actor)
            .ok_or(HostError::UnknownActor(actor))?;
        let index = record.slot_index(slot);
        let entry = record
            .slots
            .get_mut(index)
            .ok_or_else(|| HostError::CommandFailed {
                actor,
                command: "adjust_stack",
                message: format!("slot {index} out of range"),
            })?;
        let Some(stack) = entry.as_mut() else {
            return Err(HostError::CommandFailed {
                actor,
                command: "adjust_stack",
                message: format!("slot {index} is empty"),
            });
        };

        let magnitude = delta.unsigned_abs();
        stack.amount = if delta < 0 {
            stack.amount.saturating_sub(magnitude)
        } else {
            stack.amount.saturating_add(magnitude)
        };
        let amount = stack.amount;
        if amount == 0 {
            *entry = None;
        }
        Ok(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn paper() -> ItemKind {
        ItemKind::from("paper")
    }

    fn world_with_actor() -> (MemoryWorld, ActorId) {
        let world = MemoryWorld::new();
        let actor = ActorId::new();
        world.spawn(actor, Position::new(0.0, 64.0, 0.0));
        (world, actor)
    }

    #[test]
    fn count_spans_all_slots() {
        let (world, actor) = world_with_actor();
        world.give(actor, 0, ItemStack::new(paper(), 2)).unwrap();
        world.give(actor, 7, ItemStack::new(paper(), 3)).unwrap();
        world.give(actor, 8, ItemStack::new(ItemKind::from("stick"), 9)).unwrap();
        assert_eq!(world.held_item_count(actor, &paper()).unwrap(), 5);
    }

    #[test]
    fn consume_prefers_active_stack() {
        let (world, actor) = world_with_actor();
        world.give(actor, 0, ItemStack::new(paper(), 4)).unwrap();
        world.give(actor, 3, ItemStack::new(paper(), 2)).unwrap();
        world.select_slot(actor, 3).unwrap();

        let removal = consume_one(&world, actor, &paper()).unwrap();
        assert_eq!(removal, ItemRemoval::ActiveStack);
        assert_eq!(world.slot_amount(actor, 3), 1);
        assert_eq!(world.slot_amount(actor, 0), 4);
    }

    #[test]
    fn consume_falls_back_to_first_matching_slot() {
        let (world, actor) = world_with_actor();
        world.give(actor, 0, ItemStack::new(ItemKind::from("sword"), 1)).unwrap();
        world.give(actor, 5, ItemStack::new(paper(), 1)).unwrap();
        world.give(actor, 9, ItemStack::new(paper(), 6)).unwrap();

        let removal = consume_one(&world, actor, &paper()).unwrap();
        assert_eq!(removal, ItemRemoval::Slot(5));
        // The last unit empties the slot entirely.
        assert!(world.stacks(actor).unwrap().iter().all(|(i, _)| *i != 5));
        assert_eq!(world.slot_amount(actor, 9), 6);
    }

    #[test]
    fn consume_reports_missing_item() {
        let (world, actor) = world_with_actor();
        let removal = consume_one(&world, actor, &paper()).unwrap();
        assert_eq!(removal, ItemRemoval::NotFound);
    }

    #[test]
    fn teleport_moves_and_records() {
        let (world, actor) = world_with_actor();
        let spawn = Position::new(100.0, 70.0, -20.0);
        world.teleport(actor, spawn).unwrap();
        assert_eq!(world.location(actor).unwrap().position, spawn);
        assert_eq!(world.teleports(actor), vec![spawn]);
    }

    #[test]
    fn injected_failures() {
        let (world, actor) = world_with_actor();
        world.fail_teleports(true);
        world.fail_notifications(true);
        assert!(world.teleport(actor, Position::default()).is_err());
        assert!(world.notify(actor, "hello").is_err());
        assert!(world.messages(actor).is_empty());
    }

    #[test]
    fn unknown_actor_is_an_error() {
        let world = MemoryWorld::new();
        let stranger = ActorId::new();
        assert_eq!(
            world.location(stranger),
            Err(HostError::UnknownActor(stranger))
        );
    }

    #[test]
    fn take_all_empties_matching_stacks() {
        let (world, actor) = world_with_actor();
        world.give(actor, 1, ItemStack::new(paper(), 2)).unwrap();
        world.give(actor, 2, ItemStack::new(paper(), 3)).unwrap();
        assert_eq!(world.take_all(actor, &paper()).unwrap(), 5);
        assert_eq!(world.held_item_count(actor, &paper()).unwrap(), 0);
    }
}
