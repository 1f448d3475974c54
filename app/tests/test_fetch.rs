//! FILENAME: tests/test_fetch.rs
//! Integration tests for the fetch lifecycle: failure semantics and the
//! explicit load-error state. No live endpoint is involved; the client
//! points at a closed port.

mod common;

use app_lib::{
    create_dashboard_state, load_error, refresh_tab, report, AnalyticsClient, DashboardConfig,
    TabKey,
};
use common::{SalesFixture, TestHarness};

fn unreachable_config() -> DashboardConfig {
    DashboardConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        ..DashboardConfig::default()
    }
}

#[tokio::test]
async fn failed_fetch_clears_stale_rows_into_an_error_state() {
    let harness = TestHarness {
        state: create_dashboard_state(unreachable_config()),
    };
    // The tab had committed data from an earlier range.
    harness.load_rows(TabKey::Sales, SalesFixture::rows());
    assert!(load_error(&harness.state, TabKey::Sales).unwrap().is_none());

    let client = AnalyticsClient::new(&harness.state.config);
    let result = refresh_tab(&harness.state, &client, TabKey::Sales).await;
    assert!(result.is_err());

    // Explicit error state, not silently retained content.
    let message = load_error(&harness.state, TabKey::Sales).unwrap().unwrap();
    assert!(message.contains("transport error"));
    let view = report(&harness.state, TabKey::Sales).unwrap();
    assert_eq!(view.table.unwrap().total_rows, 0);
    assert!(view.series.unwrap().is_empty());
}

#[tokio::test]
async fn each_tab_fails_independently() {
    let harness = TestHarness {
        state: create_dashboard_state(unreachable_config()),
    };
    harness.load_rows(TabKey::Orders, Vec::new());

    let client = AnalyticsClient::new(&harness.state.config);
    let _ = refresh_tab(&harness.state, &client, TabKey::Sales).await;

    assert!(load_error(&harness.state, TabKey::Sales).unwrap().is_some());
    assert!(load_error(&harness.state, TabKey::Orders).unwrap().is_none());
}
