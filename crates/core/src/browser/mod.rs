//! Top-level catalog coordination.
//!
//! `CatalogBrowser` owns the current `QueryState`, reconciles the initial
//! state across session snapshot, deep link, and default on every view
//! entry, and turns user actions into state transitions with their fetch
//! and persistence dispatches.

mod commands;
mod deeplink;
mod machine;

pub use commands::{command_channel, BrowseCommand, CommandReceiver, CommandSender};
pub use deeplink::DeepLink;
pub use machine::{CatalogBrowser, Origin};
