use crate::config::types::OverlaySettings;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

impl OverlaySettings {
    /// 讀取設定檔；未指定時使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        debug!("已載入設定檔 {}: {settings:?}", path.display());
        Ok(settings)
    }
}
