use crate::draw::model::Color;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Key under which the saved palette is stored.
pub const PALETTE_STORE_KEY: &str = "savedPalette";

/// String key-value persistence, the way a browser's local storage behaves.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keeps every key in one JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read store file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize store file {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store folder {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&values).context("serialize store values")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write store file {}", self.path.display()))
    }
}

/// Ordered list of user-saved colors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Appends `color` and persists the palette. A color that is already
    /// present is ignored and nothing is written.
    pub fn save_color(&mut self, color: Color, store: &mut dyn KeyValueStore) -> Result<bool> {
        if self.contains(color) {
            return Ok(false);
        }
        self.colors.push(color);
        let encoded: Vec<String> = self.colors.iter().map(|c| c.to_hex()).collect();
        let json = serde_json::to_string(&encoded).context("serialize palette")?;
        store.set(PALETTE_STORE_KEY, &json)?;
        tracing::info!(len = self.colors.len(), color = %color, "palette saved");
        Ok(true)
    }

    /// Replaces the palette with the stored one. Leaves it unchanged and
    /// returns `false` when nothing has been stored yet.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<bool> {
        let Some(json) = store.get(PALETTE_STORE_KEY)? else {
            return Ok(false);
        };
        let entries: Vec<String> =
            serde_json::from_str(&json).context("deserialize stored palette")?;
        let mut colors = Vec::with_capacity(entries.len());
        for entry in entries {
            match Color::parse(&entry) {
                Some(color) => colors.push(color),
                None => tracing::warn!(value = %entry, "skipping unreadable palette color"),
            }
        }
        self.colors = colors;
        tracing::info!(len = self.colors.len(), "palette loaded");
        Ok(true)
    }
}
