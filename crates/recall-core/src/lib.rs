//! Per-actor delayed action scheduling for the Recall countdown teleport.
//!
//! An actor right-clicks with the required item, stands still for the
//! countdown, and is teleported to their team spawn. Moving, dropping the
//! item, re-triggering or shutting down cancels the countdown.
//!
//! # Modules
//!
//! - [`arena`] -- [`ArenaService`] capability, host [`Services`] registry,
//!   and the in-memory [`StaticArena`].
//! - [`config`] -- Configuration loading from `recall-config.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- Start rejections and host failures.
//! - [`listener`] -- Interact and move notifications into scheduler calls.
//! - [`locks`] -- Per-actor async locks.
//! - [`plugin`] -- Enable/disable lifecycle.
//! - [`registry`] -- At most one in-flight action per actor.
//! - [`scheduler`] -- The countdown state machine.
//! - [`timer`] -- Cancellable periodic timers and the live-handle gauge.
//! - [`world`] -- Position, teleport, messaging and inventory
//!   capabilities, and the in-memory [`MemoryWorld`].
//!
//! [`ArenaService`]: arena::ArenaService
//! [`Services`]: arena::Services
//! [`StaticArena`]: arena::StaticArena
//! [`MemoryWorld`]: world::MemoryWorld

pub mod arena;
pub mod config;
pub mod error;
pub mod listener;
pub mod locks;
pub mod plugin;
pub mod registry;
pub mod scheduler;
pub mod timer;
pub mod world;
