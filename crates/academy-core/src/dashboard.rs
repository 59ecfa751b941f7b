//! Dashboard screen model.
//!
//! Tracks the fetch lifecycle for the admin dashboard. Initial load and
//! pull-to-refresh share one fetch path; a generation ticket makes sure a
//! superseded request can never overwrite a newer one.

use std::time::Duration;

use tracing::debug;

use crate::api::types::DashboardData;
use crate::api::{ApiError, Gateway};

/// Dashboard reads get a tighter deadline than the gateway default.
pub const DASHBOARD_TIMEOUT: Duration = Duration::from_secs(8);

const LOAD_FAILED: &str = "Could not load dashboard. Check connection or server.";

/// Where a fetch currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Ready(DashboardData),
    Error(String),
}

/// Per-screen dashboard state.
pub struct Dashboard {
    state: FetchState,
    generation: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: FetchState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Starts a fetch and returns the ticket the result must present to
    /// `finish`. Starting again supersedes earlier tickets. A cold load shows
    /// `Loading`; a refresh keeps the last data visible until the result
    /// lands.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        if !matches!(self.state, FetchState::Ready(_)) {
            self.state = FetchState::Loading;
        }
        self.generation
    }

    /// Applies a fetch outcome. Results from superseded tickets are dropped;
    /// returns whether the state changed.
    ///
    /// An `Unauthorized` failure returns the screen to `Idle`: the session
    /// teardown already redirected away, so there is nothing to display.
    pub fn finish(&mut self, ticket: u64, result: Result<DashboardData, ApiError>) -> bool {
        if ticket != self.generation {
            debug!(ticket, latest = self.generation, "dropping superseded dashboard result");
            return false;
        }

        self.state = match result {
            Ok(data) => FetchState::Ready(data),
            Err(ApiError::Unauthorized) => FetchState::Idle,
            Err(ApiError::Server { message, .. }) => FetchState::Error(message),
            Err(ApiError::Network(_)) => FetchState::Error(LOAD_FAILED.to_string()),
        };
        true
    }

    /// One full load cycle against the gateway.
    pub async fn refresh(&mut self, gateway: &Gateway) -> &FetchState {
        let ticket = self.begin();
        let result = fetch(gateway).await;
        self.finish(ticket, result);
        self.state()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches the dashboard payload with the screen's deadline.
///
/// # Errors
/// Returns the classified failure.
pub async fn fetch(gateway: &Gateway) -> Result<DashboardData, ApiError> {
    gateway.get_json("/dashboard", Some(DASHBOARD_TIMEOUT)).await
}
