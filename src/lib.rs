//! # SwOS Provider
//!
//! Declarative configuration of MikroTik SwOS switches, built on the
//! [`field_sync`] engine.
//!
//! ## Module Tour
//!
//! ### 1. The Device ([`switch`])
//! - **Role**: the in-memory snapshot of one switch and the storage it is
//!   loaded from and saved to.
//! - **Key items**: [`Switch`](switch::Switch), [`Snapshot`](switch::Snapshot),
//!   [`JsonFile`](switch::JsonFile).
//!
//! ### 2. The Catalog ([`resources`])
//! - **Role**: one declarative [`Resource`](field_sync::Resource) per switch
//!   subsystem: `port`, `port_vlan`, `vlan`, `system`.
//! - **Key items**: [`catalog`](resources::catalog), the model types
//!   ([`PortConfig`](resources::PortConfig), ...).
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: spawns the session that owns the switch, binds every resource
//!   to it and shuts everything down again.
//! - **Key items**: [`Provider`](lifecycle::Provider),
//!   [`setup_tracing`](lifecycle::tracing::setup_tracing).
//!
//! ### 4. Settings ([`config`])
//! - TOML file with snapshot location, port count, session queue depth and
//!   default log filter.
//!
//! ## Running
//!
//! ```bash
//! swos-provider schema
//! swos-provider apply port '{"id": 3, "name": "uplink", "poe_out": "off"}'
//! swos-provider apply vlan '{"id": 20, "igmp_snooping": true}'
//! swos-provider read port_vlan '{"port": 3}'
//! swos-provider delete vlan '{"id": 20}'
//! ```

pub mod config;
pub mod lifecycle;
pub mod resources;
pub mod switch;
