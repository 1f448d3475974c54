//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard backend integration tests.

use app_lib::{
    create_dashboard_state, AnalyticsResponse, DashboardConfig, DashboardState, TabData, TabKey,
};
use rollup_engine::SourceRow;
use serde_json::{json, Value};

/// Test harness for creating and managing dashboard state.
pub struct TestHarness {
    pub state: DashboardState,
}

impl TestHarness {
    /// Create a new harness with default configuration and no data.
    pub fn new() -> Self {
        TestHarness {
            state: create_dashboard_state(DashboardConfig::default()),
        }
    }

    /// Create a harness with the sales fixture loaded and a date range set.
    pub fn with_sales_data() -> Self {
        let harness = Self::new();
        harness.load_rows(TabKey::Sales, SalesFixture::rows());
        app_lib::set_date_range(&harness.state, TabKey::Sales, "2024-05-01", "2024-05-31")
            .unwrap();
        harness
    }

    /// Commit a row window into a tab as if a fetch had landed.
    pub fn load_rows(&self, tab: TabKey, rows: Vec<SourceRow>) {
        let mut tabs = self.state.tabs.lock().unwrap();
        let tab_state = tabs.get_mut(&tab).unwrap();
        tab_state.data = TabData::Loaded(AnalyticsResponse {
            rows,
            summary: None,
            extras: Default::default(),
        });
    }
}

/// Order-line rows for the sales tab: three local calendar days, producer
/// tag sets (some rows belong to two producers), shared order ids.
pub struct SalesFixture;

impl SalesFixture {
    pub fn rows() -> Vec<SourceRow> {
        [
            json!({
                "created_at": "2024-05-01 09:00:00",
                "order_id": "o1",
                "producers": ["Ferme du Lac"],
                "category": "Légumes",
                "product_name": "Panier de légumes",
                "quantity": 2.0,
                "line_total": 24.0,
            }),
            json!({
                "created_at": "2024-05-01 09:00:00",
                "order_id": "o1",
                "producers": ["Rucher des Prés"],
                "category": "Miel",
                "product_name": "Miel toutes fleurs",
                "quantity": 1.0,
                "line_total": 8.5,
            }),
            json!({
                "created_at": "2024-05-01 11:30:00",
                "order_id": "o2",
                "producers": ["Ferme du Lac"],
                "category": "Fromage",
                "product_name": "Tomme fermière",
                "quantity": 1.0,
                "line_total": 12.0,
            }),
            json!({
                "created_at": "2024-05-02 10:00:00",
                "order_id": "o3",
                "producers": ["Ferme du Lac", "Rucher des Prés"],
                "category": "Coffrets",
                "product_name": "Coffret gourmand",
                "quantity": 1.0,
                "line_total": 30.0,
            }),
            json!({
                "created_at": "2024-05-02 14:00:00",
                "order_id": "o4",
                "producers": ["GAEC des Vergers"],
                "category": "Fruits",
                "product_name": "Pommes 3 kg",
                "quantity": 3.0,
                "line_total": 9.9,
            }),
            json!({
                "created_at": "2024-05-03 16:45:00",
                "order_id": "o5",
                "producers": ["GAEC des Vergers"],
                "category": "Fruits",
                "product_name": "Jus de pomme",
                "quantity": 6.0,
                "line_total": 21.0,
            }),
            json!({
                "created_at": "2024-05-03 17:00:00",
                "order_id": "o5",
                "producers": ["Rucher des Prés"],
                "category": "Miel",
                "product_name": "Pain d'épices",
                "quantity": 2.0,
                "line_total": 13.0,
            }),
        ]
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect()
    }

    /// A larger synthetic window for export pagination tests.
    pub fn many_rows(count: usize) -> Vec<SourceRow> {
        (0..count)
            .map(|i| {
                let day = 1 + (i % 28);
                match json!({
                    "created_at": format!("2024-05-{day:02} {:02}:00:00", 8 + i % 10),
                    "order_id": format!("o{}", i / 2),
                    "producers": ["Ferme du Lac"],
                    "category": "Légumes",
                    "product_name": format!("Produit {i}"),
                    "quantity": (i % 4 + 1) as f64,
                    "line_total": (i % 9 + 1) as f64 * 3.5,
                }) {
                    Value::Object(map) => map,
                    _ => unreachable!(),
                }
            })
            .collect()
    }
}
