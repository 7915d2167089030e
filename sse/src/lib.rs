//! Server-Sent Events (SSE) broadcasting of HTML fragment updates.
//!
//! This crate pushes small DOM patches to live browser connections grouped into
//! named channels. A page subscribes to a group over one long-lived SSE response
//! and applies each received envelope to the element it targets.
//!
//! # Architecture
//!
//! - **Group registry**: a sharded `DashMap` from group name to its connection
//!   set. Sets are created on first use and removed only by an explicit close.
//! - **Connection sets**: each group has its own locks. Producers on one group
//!   are serialized so every connection sees ids in increasing order; groups
//!   never contend with each other. Membership changes take the write side.
//! - **Bounded delivery**: every connection owns a bounded queue. Producers never
//!   wait; an event that does not fit is dropped for that connection only, and a
//!   connection that keeps refusing events (or whose consumer is gone) is evicted.
//! - **Ephemeral events**: there is no replay. A client that reconnects starts
//!   cold and only sees events broadcast after it subscribed.
//! - **One sequence per broadcaster**: every event gets the next id of the
//!   broadcaster instance, shared by all of its groups.
//!
//! # Wire format
//!
//! Each event is one SSE frame of type `message` whose data is an envelope:
//!
//! ```text
//! id: 2
//! event: message
//! data: <turbo-stream action="append" target="room-messages"><template><div>hi</div></template></turbo-stream>
//! ```
//!
//! # Example: Sending an event
//!
//! ```rust,ignore
//! use sse::message::Action;
//!
//! app_state.broadcaster.send_event(
//!     "",
//!     Action::Append,
//!     "room-messages",
//!     app_state.templates.as_ref(),
//!     "message",
//!     &message_json,
//! )?;
//! ```
//!
//! # Modules
//!
//! - `broadcaster`: producer and transport facing entry point
//! - `registry`: group name to connection set mapping
//! - `connection`: connection sets, subscriptions and delivery
//! - `message`: actions, envelopes and numbered stream events
//! - `sequence`: per-instance event id counter
//! - `template`: contract with the HTML template collaborator
//! - `error`: producer facing errors

pub mod broadcaster;
pub mod connection;
pub mod error;
pub mod message;
pub mod registry;
pub mod sequence;
pub mod template;

pub use broadcaster::Broadcaster;
pub use connection::{ConnectionSettings, Subscription};
pub use message::Action;
pub use template::{FragmentRenderer, RenderError};
