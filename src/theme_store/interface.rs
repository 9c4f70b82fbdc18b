use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub trait ThemeStore {
    fn load(&self) -> Result<Theme, Box<dyn std::error::Error + Send + Sync>>;
    fn save(&self, theme: Theme) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
