use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::manifest::{AssetManifest, FontDescriptor};
use crate::assets::registry::ItemCatalog;
use crate::components::section::{Section, END};
use crate::core::color::Rgb;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("timeline config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("month '{0}' has no asset list")]
    MissingMonth(String),
    #[error("no months configured")]
    NoMonths,
    #[error("month '{0}' is configured twice")]
    DuplicateMonth(String),
    #[error("no 'end' section configured")]
    MissingEndSection,
}

/// The colors one month paints the scene with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Rgb,
    pub outline: Option<Rgb>,
    pub background: Rgb,
    pub tint: Rgb,
    pub contact: Option<Rgb>,
}

impl Palette {
    /// Color for page chrome (svgs, compass, theme meta): outline if the
    /// month has one, text otherwise.
    pub fn interface(&self) -> Rgb {
        self.outline.unwrap_or(self.text)
    }

    pub fn contact_or_white(&self) -> Rgb {
        self.contact.unwrap_or(Rgb::WHITE)
    }
}

/// Static configuration of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
    pub key: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    pub text_color: Rgb,
    #[serde(default)]
    pub outline_text_color: Option<Rgb>,
    #[serde(alias = "bgColor")]
    pub background_color: Rgb,
    pub tint_color: Rgb,
    #[serde(default)]
    pub contact_color: Option<Rgb>,
    /// Vertical offset of the section title.
    #[serde(default, alias = "offset")]
    pub camera_offset: Option<f32>,
}

impl MonthEntry {
    pub fn palette(&self) -> Palette {
        Palette {
            text: self.text_color,
            outline: self.outline_text_color,
            background: self.background_color,
            tint: self.tint_color,
            contact: self.contact_color,
        }
    }
}

/// Months in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthsConfig {
    entries: Vec<MonthEntry>,
}

impl MonthsConfig {
    pub fn new(entries: Vec<MonthEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&MonthEntry> {
        self.entries.iter().find(|m| m.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|m| m.key.as_str())
    }

    pub fn first(&self) -> Option<&MonthEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&MonthEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The contact ("say hello") panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactConfig {
    /// Panel y in scene units.
    pub height: f32,
    pub link: Option<String>,
    pub link_x: f32,
    pub link_y: f32,
    pub link_width: f32,
    pub link_height: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            height: -1800.0,
            link: None,
            link_x: 0.0,
            link_y: -120.0,
            link_width: 400.0,
            link_height: 40.0,
        }
    }
}

/// Everything authored about the timeline's content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub months: MonthsConfig,
    /// month → ordered media file names.
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub items: ItemCatalog,
    #[serde(default)]
    pub fonts: Vec<FontDescriptor>,
    #[serde(default)]
    pub contact: ContactConfig,
}

impl TimelineConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Every month is unique, an end section exists, and every month that
    /// holds items has an asset list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months.is_empty() {
            return Err(ConfigError::NoMonths);
        }
        let mut seen = std::collections::HashSet::new();
        for key in self.months.keys() {
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateMonth(key.to_string()));
            }
            if Section::holds_items(key) && !self.assets.contains_key(key) {
                return Err(ConfigError::MissingMonth(key.to_string()));
            }
        }
        if self.months.get(END).is_none() {
            return Err(ConfigError::MissingEndSection);
        }
        Ok(())
    }

    /// Media files and fonts to load.
    pub fn manifest(&self) -> AssetManifest {
        AssetManifest {
            months: self.assets.clone(),
            fonts: self.fonts.clone(),
        }
    }

    pub fn files(&self, month: &str) -> &[String] {
        self.assets.get(month).map(Vec::as_slice).unwrap_or(&[])
    }
}
