//! # Session Actor
//!
//! The `Session` is the single owner of a backend client. Every lifecycle
//! operation on every resource is shipped to it as one job, and jobs run one
//! at a time. Two controllers updating overlapping parts of the snapshot are
//! therefore serialized: the second one locates, mutates and persists only
//! after the first one has finished persisting.
//!
//! ```rust
//! use field_sync::mock::MockBackend;
//! use field_sync::Session;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockBackend::new(vec![String::from("ether1")]);
//!     let (session, client) = Session::new(backend, 8);
//!     tokio::spawn(session.run());
//!
//!     let name = client
//!         .execute("peek", |b: &mut MockBackend<Vec<String>>| b.state[0].clone())
//!         .await
//!         .unwrap();
//!     assert_eq!(name, "ether1");
//! }
//! ```

use crate::backend::Backend;
use crate::client::SessionClient;
use crate::message::SessionRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct Session<C: Backend> {
    receiver: mpsc::Receiver<SessionRequest<C>>,
    client: C,
    jobs: u64,
}

impl<C: Backend> Session<C> {
    /// Creates a session owning `client` and the handle used to reach it.
    ///
    /// `buffer_size` bounds the number of queued requests; callers wait for
    /// space when the queue is full.
    pub fn new(client: C, buffer_size: usize) -> (Self, SessionClient<C>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let session = Self {
            receiver,
            client,
            jobs: 0,
        };
        (session, SessionClient::new(sender))
    }

    /// Processes requests until every [`SessionClient`] has been dropped,
    /// then hands the client back.
    pub async fn run(mut self) -> C {
        // "swos_provider::switch::Switch<...>" -> "Switch"
        let client_type = std::any::type_name::<C>()
            .split('<')
            .next()
            .and_then(|path| path.split("::").last())
            .unwrap_or("Unknown");
        info!(client_type, "Session started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SessionRequest::Execute { operation, job } => {
                    self.jobs += 1;
                    debug!(client_type, operation, job = self.jobs, "Execute");
                    job(&mut self.client);
                }
                SessionRequest::Fetch { respond_to } => {
                    let result = self.client.fetch();
                    match &result {
                        Ok(()) => info!(client_type, "Fetched"),
                        Err(e) => warn!(client_type, error = %e, "Fetch failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(client_type, jobs = self.jobs, "Shutdown");
        self.client
    }
}
