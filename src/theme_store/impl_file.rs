use crate::library::logger::interface::Logger;
use crate::theme_store::interface::{Theme, ThemeStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Stores the preference as `{"theme":"dark"}`.
pub struct ThemeStoreFile {
    path: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ThemeStoreFile {
    pub fn new(path: PathBuf, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path,
            logger: logger.with_namespace("theme_store"),
        }
    }
}

impl ThemeStore for ThemeStoreFile {
    fn load(&self) -> Result<Theme, Box<dyn std::error::Error + Send + Sync>> {
        if !self.path.exists() {
            return Ok(Theme::default());
        }
        let bytes = std::fs::read(&self.path)?;
        let file: ThemeFile = serde_json::from_slice(&bytes)?;
        Ok(file.theme)
    }

    fn save(&self, theme: Theme) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&ThemeFile { theme })?;
        std::fs::write(&self.path, json)?;
        self.logger
            .info(&format!("Saved theme {:?} to {}", theme, self.path.display()))?;
        Ok(())
    }
}
