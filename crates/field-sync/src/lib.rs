//! # Field Sync
//!
//! A declarative engine for keeping a desired configuration model and a
//! device's in-memory configuration snapshot in agreement, one field at a
//! time.
//!
//! ## Why declarative?
//!
//! Every configurable entity on a device (a port, a VLAN, the system
//! identity) follows the same protocol: find the backend object, walk its
//! attributes, copy values in one direction or the other, persist. Instead of
//! writing that protocol per entity, the entity is *described*:
//!
//! 1. **Field layer** ([`SyncedField`]): binds one backend attribute to one
//!    model attribute through accessor functions and a [`Converter`].
//! 2. **Resource layer** ([`Resource`]): an ordered field list plus the
//!    callbacks that locate, create and remove backend objects.
//! 3. **Runtime layer** ([`Session`], [`Controller`]): a single task owns the
//!    backend client; controllers ship each lifecycle operation to it as one
//!    atomic job.
//! 4. **Host layer** ([`Registry`]): type-erased, JSON-shaped access by
//!    resource name, plus schema advertisement.
//!
//! ## Three-state values
//!
//! Model attributes are [`Value`]s: `Known`, `Null` or `Unknown`. During
//! create and update a known value is written to the device; anything else is
//! filled in from the device. Read always copies from the device.
//!
//! ```rust
//! use field_sync::mock::MockBackend;
//! use field_sync::{Controller, Flag, LocateError, Resource, Session, SyncedField, Text, Value};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Link { name: String, enabled: bool }
//!
//! #[derive(Debug, Clone, Default)]
//! struct Port { name: Value<String>, enabled: Value<bool> }
//!
//! type Client = MockBackend<Link>;
//!
//! fn link<'c>(client: &'c mut Client, _: &Port) -> Result<&'c mut Link, LocateError> {
//!     Ok(&mut client.state)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockBackend::new(Link { name: "ether1".into(), enabled: true });
//!     let probe = backend.probe();
//!     probe.expect_save().return_ok();
//!
//!     let (session, client) = Session::new(backend, 8);
//!     tokio::spawn(session.run());
//!
//!     let port = Controller::new(
//!         Resource::new("port", link)
//!             .field(SyncedField::attribute("name", |l: &mut Link| &mut l.name, |p: &mut Port| &mut p.name, Text))
//!             .field(SyncedField::attribute("enabled", |l: &mut Link| &mut l.enabled, |p: &mut Port| &mut p.enabled, Flag)),
//!     );
//!     port.configure(client).unwrap();
//!
//!     let updated = port
//!         .update(Port { name: "uplink".into(), ..Default::default() })
//!         .await
//!         .unwrap();
//!     assert_eq!(updated.enabled, Value::Known(true));
//!     assert_eq!(probe.device().name, "uplink");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - The backend client lives inside one [`Session`] task; nothing else holds it.
//! - Lifecycle operations are processed **sequentially**, each one to
//!   completion (`locate → mutate → persist`).
//! - Controllers for different resources run concurrently and share the
//!   session through cloned [`SessionClient`]s.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockBackend`](mock::MockBackend), an
//! in-memory backend with queued `save`/`fetch` expectations.

pub mod backend;
pub mod client;
pub mod controller;
pub mod convert;
pub mod error;
pub mod field;
pub mod message;
pub mod mock;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod session;
pub mod value;

pub use backend::Backend;
pub use client::SessionClient;
pub use controller::Controller;
pub use convert::{BackendInt, Converter, EnumMap, Flag, Integer, Text};
pub use error::{BackendError, BoxError, ConvertError, LocateError, SessionError, SyncError};
pub use field::{Field, SyncedField};
pub use message::{Job, Response, SessionRequest};
pub use registry::{Registry, ResourceHandle};
pub use resource::{DeletePolicy, Locate, Remove, Resource};
pub use schema::{AttributeKind, AttributeSchema, ResourceSchema, Shape};
pub use session::Session;
pub use value::Value;
