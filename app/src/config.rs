//! FILENAME: app/src/config.rs
//! PURPOSE: Explicit dashboard configuration.
//! CONTEXT: The configuration is a plain value injected at construction;
//! nothing in the analytics stack reads ambient process state at module
//! load. Hosts typically deserialize this from their own settings file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use export_engine::{PageSetup, DEFAULT_DEVICE_SCALE};

/// Everything the dashboard backend needs to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Base URL the relative analytics endpoints resolve against.
    pub api_base_url: String,

    /// Bearer token attached to every analytics request, when present.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Product slug used in export artifact names.
    #[serde(default = "default_product_slug")]
    pub product_slug: String,

    /// Device-pixel supersampling factor for export captures.
    #[serde(default = "default_device_scale")]
    pub device_scale: f32,

    /// Physical page geometry for PDF exports.
    #[serde(default)]
    pub page_setup: PageSetup,

    /// Unified log file location; logging stays console-only when absent.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

fn default_product_slug() -> String {
    "terroir".to_string()
}

fn default_device_scale() -> f32 {
    DEFAULT_DEVICE_SCALE
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            api_base_url: "https://api.terroir.example".to_string(),
            api_token: None,
            product_slug: default_product_slug(),
            device_scale: default_device_scale(),
            page_setup: PageSetup::default(),
            log_path: None,
        }
    }
}
