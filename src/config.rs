use crate::errors::{HarnessError, Result};
use ini::Ini;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Key the flattener derives from `device`; scenarios read it like any other
/// setting, but the file is not required to contain it.
pub const DEVICE_CATEGORY_KEY: &str = "device_category";

/// A single setting, typed from its raw INI string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl SettingValue {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            SettingValue::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            SettingValue::Bool(false)
        } else if let Ok(number) = raw.parse::<i64>() {
            SettingValue::Int(number)
        } else {
            SettingValue::Str(raw.to_string())
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(value) => write!(f, "{}", value),
            SettingValue::Int(value) => write!(f, "{}", value),
            SettingValue::Str(value) => write!(f, "{}", value),
        }
    }
}

/// Device classification derived from the `device` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceCategory {
    Desktop,
    Ios,
    Android,
}

impl DeviceCategory {
    /// Case-insensitive: `pc` and `mac` are desktops, anything naming an
    /// iPhone or iPad is iOS, and everything else is treated as Android.
    pub fn classify(device: &str) -> Self {
        let normalized = device.to_lowercase();
        if normalized == "pc" || normalized == "mac" {
            DeviceCategory::Desktop
        } else if normalized.contains("iphone") || normalized.contains("ipad") {
            DeviceCategory::Ios
        } else {
            DeviceCategory::Android
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceCategory::Desktop => "Desktop",
            DeviceCategory::Ios => "iOS",
            DeviceCategory::Android => "Android",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat settings map built once per scenario run from an INI file.
///
/// Section titles only group the file for humans; flattening discards them,
/// with later sections silently overwriting earlier ones on key collisions.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let file = Ini::load_from_file(path)
            .map_err(|e| HarnessError::ConfigParse(format!("{}: {}", path.display(), e)))?;

        let mut values = HashMap::new();
        for (_section, properties) in file.iter() {
            for (key, raw) in properties.iter() {
                values.insert(key.to_string(), SettingValue::parse(raw));
            }
        }

        let mut settings = Self { values };
        settings.derive_device_category()?;
        Ok(settings)
    }

    /// The configurator tabs are keyed by device category, so the category is
    /// implied by the required `device` setting rather than read from the file.
    fn derive_device_category(&mut self) -> Result<()> {
        let device = self.require("device")?;
        let category = DeviceCategory::classify(&device);
        self.values.insert(
            DEVICE_CATEGORY_KEY.to_string(),
            SettingValue::Str(category.as_str().to_string()),
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Rendered string form of a setting that must be present.
    pub fn require(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .map(|value| value.to_string())
            .ok_or_else(|| HarnessError::ConfigParse(format!("missing required setting '{}'", key)))
    }

    pub fn require_bool(&self, key: &str) -> Result<bool> {
        match self.values.get(key) {
            Some(value) => value.as_bool().ok_or_else(|| {
                HarnessError::ConfigParse(format!("setting '{}' is not a boolean", key))
            }),
            None => Err(HarnessError::ConfigParse(format!(
                "missing required setting '{}'",
                key
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
