//! Worker lifecycle state machine and client registry.
//!
//! Transitions are triggered by the hosting runtime; the worker only reacts
//! to install and activate. The transition table itself is a pure function
//! so strategy and lifecycle logic stay testable without an event host.

use hashbrown::HashMap;
use url::Url;

/// Worker lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Script parsed, nothing run yet.
    #[default]
    Parsed,
    /// Install event in flight.
    Installing,
    /// Installed, waiting to activate.
    Installed,
    /// Activate event in flight.
    Activating,
    /// Active and intercepting fetches.
    Activated,
    /// Replaced by a newer worker.
    Redundant,
}

impl WorkerState {
    /// Check whether a transition to `next` is legal.
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Parsed, Installing)
                | (Installing, Installed)
                | (Installed, Activating)
                | (Activating, Activated)
                | (Parsed, Redundant)
                | (Installing, Redundant)
                | (Installed, Redundant)
                | (Activating, Redundant)
                | (Activated, Redundant)
        )
    }

    /// Only an activated worker intercepts fetches.
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    /// Check whether the worker is in its terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerState::Redundant)
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        write!(f, "{}", name)
    }
}

/// An open page the worker can control.
#[derive(Debug, Clone)]
pub struct Client {
    /// Client ID.
    pub id: String,
    /// Page URL.
    pub url: Url,
    /// Whether this worker controls the page.
    pub controlled: bool,
}

/// Registry of open pages.
#[derive(Debug, Default)]
pub struct Clients {
    clients: HashMap<String, Client>,
}

impl Clients {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open page.
    pub fn add(&mut self, id: &str, url: Url) {
        self.clients.insert(
            id.to_string(),
            Client {
                id: id.to_string(),
                url,
                controlled: false,
            },
        );
    }

    /// Get a client by ID.
    pub fn get(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Remove a client.
    pub fn remove(&mut self, id: &str) -> Option<Client> {
        self.clients.remove(id)
    }

    /// Take control of every registered page, without waiting for reloads.
    pub fn claim(&mut self) {
        for client in self.clients.values_mut() {
            client.controlled = true;
        }
    }

    /// Number of controlled pages.
    pub fn controlled_count(&self) -> usize {
        self.clients.values().filter(|c| c.controlled).count()
    }

    /// Total number of registered pages.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
