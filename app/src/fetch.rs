//! FILENAME: app/src/fetch.rs
//! PURPOSE: Per-tab fetch lifecycle with supersede semantics.
//! CONTEXT: Every (tab, date-range, bucket, geo-level) change issues a new
//! fetch. Only the most recently issued request for a tab may commit its
//! result; anything older is discarded on arrival. Failures clear the tab's
//! data into an explicit error state rather than keeping stale rows.

use std::sync::atomic::{AtomicU64, Ordering};

use rollup_engine::SourceRow;

use crate::client::{AnalyticsClient, AnalyticsQuery, AnalyticsResponse};
use crate::tabs::TabKey;
use crate::{log_info, log_warn, DashboardState};

// ============================================================================
// FETCH GATE
// ============================================================================

/// Request-generation token source for one tab.
///
/// `begin` stamps a new request; `is_current` tells an arriving response
/// whether it is still the newest one. Stale responses must be dropped by
/// the caller, not merged.
#[derive(Debug, Default)]
pub struct FetchGate {
    generation: AtomicU64,
}

impl FetchGate {
    pub fn new() -> Self {
        FetchGate::default()
    }

    /// Issues the next generation token.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `token` is still the most recently issued generation.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}

// ============================================================================
// TAB DATA
// ============================================================================

/// Lifecycle of one tab's analytics window.
#[derive(Debug, Clone, Default)]
pub enum TabData {
    /// Nothing fetched yet.
    #[default]
    Empty,
    /// A fetch is in flight and nothing older is shown.
    Loading,
    /// The committed window of the latest fetch.
    Loaded(AnalyticsResponse),
    /// The latest fetch failed; data was cleared, the message is shown.
    Failed(String),
}

impl TabData {
    /// The row window the engines work on; empty outside Loaded.
    pub fn rows(&self) -> &[SourceRow] {
        match self {
            TabData::Loaded(response) => &response.rows,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TabData::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// REFRESH
// ============================================================================

/// Fetches a tab's window and commits it unless a newer request was issued
/// meanwhile. Returns Err with the load-error message when the fetch failed
/// AND was still current (the tab is then in the Failed state).
pub async fn refresh_tab(
    state: &DashboardState,
    client: &AnalyticsClient,
    tab: TabKey,
) -> Result<(), String> {
    let (token, endpoint, query) = {
        let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
        let tab_state = tabs
            .get_mut(&tab)
            .ok_or_else(|| format!("unknown tab: {}", tab.as_str()))?;
        let token = tab_state.gate.begin();
        tab_state.data = TabData::Loading;
        let query = AnalyticsQuery {
            bucket: tab_state.bucket,
            date_from: tab_state.date_from.clone(),
            date_to: tab_state.date_to.clone(),
            geo_level: tab_state.geo_level,
        };
        (token, tab_state.spec.endpoint.clone(), query)
    };

    let outcome = client.fetch_tab(&endpoint, &query).await;

    let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
    let tab_state = tabs
        .get_mut(&tab)
        .ok_or_else(|| format!("unknown tab: {}", tab.as_str()))?;

    if !tab_state.gate.is_current(token) {
        // A newer request owns this tab now; this response is stale.
        log_warn!(
            "FETCH",
            "discarding stale response for {} (generation {})",
            tab.as_str(),
            token
        );
        return Ok(());
    }

    match outcome {
        Ok(response) => {
            log_info!(
                "FETCH",
                "{}: committed {} rows for {}..{}",
                tab.as_str(),
                response.rows.len(),
                query.date_from,
                query.date_to
            );
            tab_state.data = TabData::Loaded(response);
            Ok(())
        }
        Err(error) => {
            let message = error.to_string();
            tab_state.data = TabData::Failed(message.clone());
            log_warn!("FETCH", "{}: load failed: {}", tab.as_str(), message);
            Err(message)
        }
    }
}
