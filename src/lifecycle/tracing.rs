//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter for the
//! binary. `RUST_LOG` wins when set; otherwise the `[log] filter` from the
//! config file is used.
//!
//! ## What Gets Traced
//!
//! - **Session lifecycle**: startup, every job with its operation name, shutdown
//!   with the number of jobs processed
//! - **Resource operations**: `Created`, `Updated`, `Applied`, `Deleted` at info, `Read` at debug
//! - **Field traffic**: each push to or pull from the device at trace level
//! - **Failures**: locate and save failures at warn, unrepresentable device
//!   values at error
//!
//! ```bash
//! # Operation summaries
//! RUST_LOG=info swos-provider apply port '{"id": 3, "name": "uplink"}'
//!
//! # Every field as it is synchronized
//! RUST_LOG=field_sync=trace swos-provider read port '{"id": 3}'
//! ```
//!
//! With `RUST_LOG=debug`:
//!
//! ```text
//! INFO Switch connected ports=8 vlans=0
//! INFO Session started client_type="Switch"
//! INFO Configured resource="port"
//! DEBUG Execute client_type="Switch" operation="apply" job=1
//! INFO Applied resource="port" created=false
//! INFO Shutdown client_type="Switch" jobs=1
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
