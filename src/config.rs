//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

pub const APP_DIR: &str = "character_explorer";
pub const DEFAULT_PAGE_COUNT: u32 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_page_count")]
    pub page_count: u32,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_true() -> bool { true }
fn default_page_count() -> u32 { DEFAULT_PAGE_COUNT }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            dark_mode: true,
            page_count: DEFAULT_PAGE_COUNT,
        }
    }
}

/// Per-user application directory, created on demand
pub fn app_dir() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(APP_DIR);
    if let Err(e) = fs::create_dir_all(&path) {
        log::warn!("Could not create {}: {}", path.display(), e);
        return None;
    }
    Some(path)
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = app_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("config.json");
        path
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Missing or unreadable config falls back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        let config = fs::read_to_string(path)
            .ok()
            .and_then(|content| match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        config.sanitized()
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    log::error!("Failed to save config to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::error!("Failed to serialize config: {}", e),
        }
    }

    fn sanitized(mut self) -> Self {
        if self.base_url.trim().is_empty() {
            self.base_url = default_base_url();
        }
        if self.page_count == 0 {
            self.page_count = DEFAULT_PAGE_COUNT;
        }
        self
    }
}
