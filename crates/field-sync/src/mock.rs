//! # Mock Backend & Testing Guide
//!
//! [`MockBackend`] is an in-memory [`Backend`] for exercising resources and
//! controllers without a device. It keeps two copies of the state:
//!
//! - `state`: the client's in-memory snapshot that resources mutate;
//! - the *device* copy, replaced on every successful `save` and copied back
//!   on every successful `fetch`.
//!
//! Every `save` and `fetch` consumes the next queued expectation, in order.
//! A call without a matching expectation panics, so tests state exactly how
//! many times the snapshot is persisted.
//!
//! ```rust
//! use field_sync::mock::MockBackend;
//! use field_sync::Backend;
//!
//! let mut backend = MockBackend::new(vec![1u8, 2, 3]);
//! let probe = backend.probe();
//! probe.expect_save().return_err("device unreachable");
//!
//! backend.state[0] = 9;
//! assert!(backend.save().is_err());
//! assert_eq!(probe.device(), vec![1, 2, 3]);
//! probe.verify();
//! ```
//!
//! Use [`MockBackend::probe`] before handing the backend to a
//! [`Session`](crate::Session); the probe keeps access to expectations and to
//! the device copy after the backend has moved into the session task.
//!
//! For controller tests that need to observe raw session traffic, use
//! [`create_mock_session`] and answer the requests by hand.

use crate::backend::Backend;
use crate::client::SessionClient;
use crate::error::BackendError;
use crate::message::SessionRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Save,
    Fetch,
}

struct Expectation {
    call: Call,
    response: Result<(), String>,
}

struct Shared<S> {
    expectations: VecDeque<Expectation>,
    device: S,
    saves: usize,
    fetches: usize,
}

pub struct MockBackend<S> {
    /// In-memory snapshot handed to resource callbacks.
    pub state: S,
    shared: Arc<Mutex<Shared<S>>>,
}

impl<S: Clone + Send + 'static> MockBackend<S> {
    /// Creates a backend whose snapshot and device copy both start as `state`.
    pub fn new(state: S) -> Self {
        let shared = Shared {
            expectations: VecDeque::new(),
            device: state.clone(),
            saves: 0,
            fetches: 0,
        };
        Self {
            state,
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    /// Returns a handle that outlives moving the backend into a session.
    pub fn probe(&self) -> MockProbe<S> {
        MockProbe {
            shared: self.shared.clone(),
        }
    }

    pub fn expect_save(&mut self) -> ExpectationBuilder<S> {
        self.probe().expect_save()
    }

    pub fn expect_fetch(&mut self) -> ExpectationBuilder<S> {
        self.probe().expect_fetch()
    }

    pub fn saves(&self) -> usize {
        self.probe().saves()
    }

    pub fn verify(&self) {
        self.probe().verify()
    }

    fn answer(&self, call: Call) -> Result<(), BackendError> {
        let mut shared = self.shared.lock().unwrap();
        match shared.expectations.pop_front() {
            Some(expectation) if expectation.call == call => {
                expectation.response.map_err(BackendError::new)
            }
            Some(expectation) => panic!(
                "Unexpected {call:?}, next expectation is {:?}",
                expectation.call
            ),
            None => panic!("Unexpected {call:?}, no expectations left"),
        }
    }
}

impl<S: Clone + Send + 'static> Backend for MockBackend<S> {
    fn fetch(&mut self) -> Result<(), BackendError> {
        self.answer(Call::Fetch)?;
        let mut shared = self.shared.lock().unwrap();
        shared.fetches += 1;
        self.state = shared.device.clone();
        Ok(())
    }

    fn save(&mut self) -> Result<(), BackendError> {
        self.answer(Call::Save)?;
        let mut shared = self.shared.lock().unwrap();
        shared.saves += 1;
        shared.device = self.state.clone();
        Ok(())
    }
}

/// Shared view of a [`MockBackend`]'s expectations and device copy.
#[derive(Clone)]
pub struct MockProbe<S> {
    shared: Arc<Mutex<Shared<S>>>,
}

impl<S: Clone> MockProbe<S> {
    pub fn expect_save(&self) -> ExpectationBuilder<S> {
        ExpectationBuilder {
            call: Call::Save,
            shared: self.shared.clone(),
        }
    }

    pub fn expect_fetch(&self) -> ExpectationBuilder<S> {
        ExpectationBuilder {
            call: Call::Fetch,
            shared: self.shared.clone(),
        }
    }

    /// State as last persisted to the device.
    pub fn device(&self) -> S {
        self.shared.lock().unwrap().device.clone()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.shared.lock().unwrap().saves
    }

    /// Number of successful fetches.
    pub fn fetches(&self) -> usize {
        self.shared.lock().unwrap().fetches
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let shared = self.shared.lock().unwrap();
        if !shared.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                shared.expectations.len()
            );
        }
    }
}

/// Builder for `save`/`fetch` expectations.
pub struct ExpectationBuilder<S> {
    call: Call,
    shared: Arc<Mutex<Shared<S>>>,
}

impl<S> ExpectationBuilder<S> {
    /// Sets the expectation to succeed.
    pub fn return_ok(self) {
        self.push(Ok(()));
    }

    /// Sets the expectation to fail with `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Err(message.into()));
    }

    fn push(self, response: Result<(), String>) {
        let mut shared = self.shared.lock().unwrap();
        shared.expectations.push_back(Expectation {
            call: self.call,
            response,
        });
    }
}

/// Creates a session client and the receiver its requests arrive on.
///
/// Nothing answers the requests unless the test does; dropping the receiver
/// makes every call fail with [`SessionError::Closed`](crate::SessionError::Closed).
pub fn create_mock_session<C: Backend>(
    buffer_size: usize,
) -> (SessionClient<C>, mpsc::Receiver<SessionRequest<C>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (SessionClient::new(sender), receiver)
}
