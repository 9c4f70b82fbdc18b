use crate::theme_store::interface::{Theme, ThemeStore};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ThemeStoreFake {
    theme: Mutex<Theme>,
}

impl ThemeStoreFake {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: Mutex::new(theme),
        }
    }
}

impl ThemeStore for ThemeStoreFake {
    fn load(&self) -> Result<Theme, Box<dyn std::error::Error + Send + Sync>> {
        Ok(*self.theme.lock().map_err(|e| e.to_string())?)
    }

    fn save(&self, theme: Theme) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.theme.lock().map_err(|e| e.to_string())? = theme;
        Ok(())
    }
}
