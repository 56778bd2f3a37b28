//! Accessibility and display preferences.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::storage::{load_document, save_document, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorblindMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
}

/// Per-user display settings, stored as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub dyslexia_font: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub text_size: TextSize,
    pub overwhelm_mode: bool,
    pub language: String,
    pub is_premium: bool,
    pub colorblind_mode: ColorblindMode,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            dyslexia_font: false,
            high_contrast: false,
            reduced_motion: false,
            text_size: TextSize::Medium,
            overwhelm_mode: false,
            language: "English".into(),
            is_premium: false,
            colorblind_mode: ColorblindMode::None,
        }
    }
}

impl UserSettings {
    /// Load from `key`, falling back to defaults.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Self {
        load_document(store, key)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S, key: &str) -> Result<()> {
        save_document(store, key, self)?;
        Ok(())
    }

    /// Field value by its stored (camelCase) name.
    pub fn get(&self, field: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(field)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a field by its stored name. `self` is unchanged on error.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] for unknown fields, [`CoreError::InvalidArgument`]
    /// for values the field cannot hold.
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| CoreError::invalid(field, e.to_string()))?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CoreError::not_found("setting", field))?;
        let existing = obj
            .get(field)
            .ok_or_else(|| CoreError::not_found("setting", field))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| CoreError::invalid(field, format!("expected true or false, got '{value}'")))?,
            ),
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(field.to_string(), new_value);

        *self = serde_json::from_value(json)
            .map_err(|e| CoreError::invalid(field, e.to_string()))?;
        Ok(())
    }
}
