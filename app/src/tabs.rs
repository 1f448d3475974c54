//! FILENAME: app/src/tabs.rs
//! PURPOSE: Per-tab projections for every dashboard report.
//! CONTEXT: One generic engine serves all tabs; a tab is nothing but a
//! TabSpec (timestamp field, chart measures, facet columns, table columns,
//! KPI cards) plus its endpoint. Adding a report means adding a projection
//! here, not new control flow.

use serde::{Deserialize, Serialize};

use filter_engine::ColumnSpec;
use report_engine::{KpiFormat, KpiKind, KpiSpec, TabSpec, TableColumn};
use rollup_engine::{MeasureSpec, SeriesSpec};

// ============================================================================
// TAB KEYS
// ============================================================================

/// Every report tab of the admin/producer dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKey {
    Sales,
    Orders,
    Customers,
    Carts,
    Catalog,
    Health,
    Impact,
    Payments,
    Cohorts,
    Geo,
    Reviews,
}

impl TabKey {
    pub fn all() -> [TabKey; 11] {
        [
            TabKey::Sales,
            TabKey::Orders,
            TabKey::Customers,
            TabKey::Carts,
            TabKey::Catalog,
            TabKey::Health,
            TabKey::Impact,
            TabKey::Payments,
            TabKey::Cohorts,
            TabKey::Geo,
            TabKey::Reviews,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TabKey::Sales => "sales",
            TabKey::Orders => "orders",
            TabKey::Customers => "customers",
            TabKey::Carts => "carts",
            TabKey::Catalog => "catalog",
            TabKey::Health => "health",
            TabKey::Impact => "impact",
            TabKey::Payments => "payments",
            TabKey::Cohorts => "cohorts",
            TabKey::Geo => "geo",
            TabKey::Reviews => "reviews",
        }
    }
}

// ============================================================================
// PROJECTIONS
// ============================================================================

/// Builds the projection for a tab.
pub fn tab_spec(key: TabKey) -> TabSpec {
    match key {
        TabKey::Sales => TabSpec {
            key: "sales".into(),
            title: "Ventes".into(),
            endpoint: "analytics/sales".into(),
            series: SeriesSpec::new(
                "created_at",
                vec![
                    MeasureSpec::sum("units", "quantity"),
                    MeasureSpec::sum("revenue", "line_total"),
                    MeasureSpec::distinct("orders", "order_id"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("producers", "producers", "Producteur"),
                ColumnSpec::new("category", "category", "Catégorie"),
            ],
            table_columns: vec![
                TableColumn::text("date", "created_at", "Date"),
                TableColumn::text("product", "product_name", "Produit"),
                TableColumn::text("producers", "producers", "Producteur"),
                TableColumn::number("quantity", "quantity", "Qté"),
                TableColumn::number("line_total", "line_total", "Total"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "revenue",
                    "Chiffre d'affaires",
                    KpiKind::Sum { field: "line_total".into() },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "orders",
                    "Commandes",
                    KpiKind::DistinctCount { field: "order_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "units",
                    "Unités vendues",
                    KpiKind::Sum { field: "quantity".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "basket",
                    "Panier moyen",
                    KpiKind::SumPerDistinct {
                        sum_field: "line_total".into(),
                        id_field: "order_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Orders => TabSpec {
            key: "orders".into(),
            title: "Commandes".into(),
            endpoint: "analytics/orders".into(),
            series: SeriesSpec::new(
                "created_at",
                vec![
                    MeasureSpec::distinct("orders", "order_id"),
                    MeasureSpec::sum("revenue", "total"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("status", "status", "Statut"),
                ColumnSpec::new("method", "payment_method", "Paiement"),
            ],
            table_columns: vec![
                TableColumn::text("date", "created_at", "Date"),
                TableColumn::text("reference", "reference", "Référence"),
                TableColumn::text("status", "status", "Statut"),
                TableColumn::text("method", "payment_method", "Paiement"),
                TableColumn::number("total", "total", "Total"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "orders",
                    "Commandes",
                    KpiKind::DistinctCount { field: "order_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "revenue",
                    "Montant total",
                    KpiKind::Sum { field: "total".into() },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "average",
                    "Commande moyenne",
                    KpiKind::SumPerDistinct {
                        sum_field: "total".into(),
                        id_field: "order_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Customers => TabSpec {
            key: "customers".into(),
            title: "Clients".into(),
            endpoint: "analytics/customers".into(),
            series: SeriesSpec::new(
                "signup_at",
                vec![
                    MeasureSpec::distinct("signups", "customer_id"),
                    MeasureSpec::sum("orders", "orders_count"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("city", "city", "Ville"),
                ColumnSpec::new("segment", "segment", "Segment"),
            ],
            table_columns: vec![
                TableColumn::text("date", "signup_at", "Inscription"),
                TableColumn::text("city", "city", "Ville"),
                TableColumn::text("segment", "segment", "Segment"),
                TableColumn::number("orders", "orders_count", "Commandes"),
                TableColumn::number("spent", "total_spent", "Total dépensé"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "customers",
                    "Clients",
                    KpiKind::DistinctCount { field: "customer_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "orders_per_customer",
                    "Commandes / client",
                    KpiKind::SumPerDistinct {
                        sum_field: "orders_count".into(),
                        id_field: "customer_id".into(),
                    },
                    KpiFormat::Decimal,
                ),
                KpiSpec::new(
                    "spent",
                    "Dépense cumulée",
                    KpiKind::Sum { field: "total_spent".into() },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Carts => TabSpec {
            key: "carts".into(),
            title: "Paniers".into(),
            endpoint: "analytics/carts".into(),
            series: SeriesSpec::new(
                "updated_at",
                vec![
                    MeasureSpec::distinct("carts", "cart_id"),
                    MeasureSpec::sum("value", "cart_total"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("status", "status", "Statut")],
            table_columns: vec![
                TableColumn::text("date", "updated_at", "Dernière activité"),
                TableColumn::text("status", "status", "Statut"),
                TableColumn::number("items", "item_count", "Articles"),
                TableColumn::number("total", "cart_total", "Total"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "carts",
                    "Paniers",
                    KpiKind::DistinctCount { field: "cart_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "value",
                    "Valeur cumulée",
                    KpiKind::Sum { field: "cart_total".into() },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "average",
                    "Panier moyen",
                    KpiKind::SumPerDistinct {
                        sum_field: "cart_total".into(),
                        id_field: "cart_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Catalog => TabSpec {
            key: "catalog".into(),
            title: "Catalogue".into(),
            endpoint: "analytics/catalog".into(),
            series: SeriesSpec::new(
                "listed_at",
                vec![
                    MeasureSpec::distinct("products", "product_id"),
                    MeasureSpec::sum("stock", "stock_quantity"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("category", "category", "Catégorie"),
                ColumnSpec::new("producers", "producers", "Producteur"),
            ],
            table_columns: vec![
                TableColumn::text("date", "listed_at", "Mise en ligne"),
                TableColumn::text("product", "product_name", "Produit"),
                TableColumn::text("category", "category", "Catégorie"),
                TableColumn::number("price", "price", "Prix"),
                TableColumn::number("stock", "stock_quantity", "Stock"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "products",
                    "Produits en ligne",
                    KpiKind::DistinctCount { field: "product_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "stock",
                    "Stock cumulé",
                    KpiKind::Sum { field: "stock_quantity".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "price",
                    "Prix moyen",
                    KpiKind::SumPerDistinct {
                        sum_field: "price".into(),
                        id_field: "product_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Health => TabSpec {
            key: "health".into(),
            title: "Santé de la plateforme".into(),
            endpoint: "analytics/health".into(),
            series: SeriesSpec::new(
                "occurred_at",
                vec![
                    MeasureSpec::sum("requests", "request_count"),
                    MeasureSpec::sum("errors", "error_count"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("service", "service", "Service")],
            table_columns: vec![
                TableColumn::text("date", "occurred_at", "Date"),
                TableColumn::text("service", "service", "Service"),
                TableColumn::number("requests", "request_count", "Requêtes"),
                TableColumn::number("errors", "error_count", "Erreurs"),
                TableColumn::number("latency", "response_ms", "Latence (ms)"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "requests",
                    "Requêtes",
                    KpiKind::Sum { field: "request_count".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "errors",
                    "Erreurs",
                    KpiKind::Sum { field: "error_count".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "incidents",
                    "Incidents",
                    KpiKind::DistinctCount { field: "incident_id".into() },
                    KpiFormat::Count,
                ),
            ],
        },

        TabKey::Impact => TabSpec {
            key: "impact".into(),
            title: "Impact local".into(),
            endpoint: "analytics/impact".into(),
            series: SeriesSpec::new(
                "created_at",
                vec![
                    MeasureSpec::sum("co2", "co2_saved_kg"),
                    MeasureSpec::sum("km", "km_avoided"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("producers", "producers", "Producteur")],
            table_columns: vec![
                TableColumn::text("date", "created_at", "Date"),
                TableColumn::text("producers", "producers", "Producteur"),
                TableColumn::number("co2", "co2_saved_kg", "CO₂ évité (kg)"),
                TableColumn::number("km", "km_avoided", "Km évités"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "co2",
                    "CO₂ évité (kg)",
                    KpiKind::Sum { field: "co2_saved_kg".into() },
                    KpiFormat::Decimal,
                ),
                KpiSpec::new(
                    "km",
                    "Kilomètres évités",
                    KpiKind::Sum { field: "km_avoided".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "producers",
                    "Producteurs soutenus",
                    KpiKind::DistinctCount { field: "producer_id".into() },
                    KpiFormat::Count,
                ),
            ],
        },

        TabKey::Payments => TabSpec {
            key: "payments".into(),
            title: "Paiements".into(),
            endpoint: "analytics/payments".into(),
            series: SeriesSpec::new(
                "captured_at",
                vec![
                    MeasureSpec::distinct("payments", "payment_id"),
                    MeasureSpec::sum("amount", "amount"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("method", "method", "Méthode"),
                ColumnSpec::new("status", "status", "Statut"),
            ],
            table_columns: vec![
                TableColumn::text("date", "captured_at", "Date"),
                TableColumn::text("method", "method", "Méthode"),
                TableColumn::text("status", "status", "Statut"),
                TableColumn::number("amount", "amount", "Montant"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "amount",
                    "Montant encaissé",
                    KpiKind::Sum { field: "amount".into() },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "payments",
                    "Paiements",
                    KpiKind::DistinctCount { field: "payment_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "average",
                    "Paiement moyen",
                    KpiKind::SumPerDistinct {
                        sum_field: "amount".into(),
                        id_field: "payment_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        },

        TabKey::Cohorts => TabSpec {
            key: "cohorts".into(),
            title: "Cohortes".into(),
            endpoint: "analytics/cohorts".into(),
            series: SeriesSpec::new(
                "first_order_at",
                vec![
                    MeasureSpec::distinct("customers", "customer_id"),
                    MeasureSpec::sum("repeat", "repeat_orders"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("channel", "channel", "Canal")],
            table_columns: vec![
                TableColumn::text("date", "first_order_at", "Première commande"),
                TableColumn::text("channel", "channel", "Canal"),
                TableColumn::number("repeat", "repeat_orders", "Commandes répétées"),
                TableColumn::number("spent", "total_spent", "Total dépensé"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "customers",
                    "Nouveaux clients",
                    KpiKind::DistinctCount { field: "customer_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "repeat",
                    "Commandes répétées",
                    KpiKind::Sum { field: "repeat_orders".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "retention",
                    "Répétition / client",
                    KpiKind::SumPerDistinct {
                        sum_field: "repeat_orders".into(),
                        id_field: "customer_id".into(),
                    },
                    KpiFormat::Decimal,
                ),
            ],
        },

        TabKey::Geo => TabSpec {
            key: "geo".into(),
            title: "Géographie".into(),
            endpoint: "analytics/geo".into(),
            series: SeriesSpec::new(
                "created_at",
                vec![
                    MeasureSpec::distinct("orders", "order_id"),
                    MeasureSpec::sum("revenue", "total"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("zone", "zone_name", "Zone")],
            table_columns: vec![
                TableColumn::text("date", "created_at", "Date"),
                TableColumn::text("zone", "zone_name", "Zone"),
                TableColumn::number("orders_count", "orders_count", "Commandes"),
                TableColumn::number("total", "total", "Total"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "revenue",
                    "Chiffre d'affaires",
                    KpiKind::Sum { field: "total".into() },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "orders",
                    "Commandes",
                    KpiKind::DistinctCount { field: "order_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "zones",
                    "Zones actives",
                    KpiKind::DistinctCount { field: "zone_name".into() },
                    KpiFormat::Count,
                ),
            ],
        },

        TabKey::Reviews => TabSpec {
            key: "reviews".into(),
            title: "Avis".into(),
            endpoint: "analytics/reviews".into(),
            series: SeriesSpec::new(
                "submitted_at",
                vec![
                    MeasureSpec::distinct("reviews", "review_id"),
                    MeasureSpec::sum("stars", "rating"),
                ],
            ),
            filter_columns: vec![
                ColumnSpec::new("producers", "producers", "Producteur"),
                ColumnSpec::new("rating", "rating", "Note"),
            ],
            table_columns: vec![
                TableColumn::text("date", "submitted_at", "Date"),
                TableColumn::text("product", "product_name", "Produit"),
                TableColumn::text("producers", "producers", "Producteur"),
                TableColumn::number("rating", "rating", "Note"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "reviews",
                    "Avis reçus",
                    KpiKind::DistinctCount { field: "review_id".into() },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "rating",
                    "Note moyenne",
                    KpiKind::SumPerDistinct {
                        sum_field: "rating".into(),
                        id_field: "review_id".into(),
                    },
                    KpiFormat::Decimal,
                ),
            ],
        },
    }
}
