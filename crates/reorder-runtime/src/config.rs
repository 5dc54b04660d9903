#![forbid(unsafe_code)]

//! Per-list reorder configuration.
//!
//! A [`ReorderConfig`] describes one drag-and-drop list: its identity, the
//! reorder mode, what happens to an emitted change, and the options handed to
//! the external gesture engine. It can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! list_id = "tasks"
//! mode = "swap"
//! action = "persist"
//! persist_endpoint = "tasks-order"
//! items_to_submit = "P1_FILTER,P1_OWNER"
//! distance = "8"
//! ```
//!
//! ```rust,ignore
//! let config = ReorderConfig::from_toml_file("tasks.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Selectors default to `ul` / `li`, the drag distance to 5 and the
//! placeholder colour to `#ccc`. `list_id` has no usable default and must be
//! set.

use std::fmt;
use std::path::Path;

use reorder_core::ReorderMode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Distance used when none is configured or the value cannot be parsed.
pub const DEFAULT_DISTANCE: u32 = 5;
pub const DEFAULT_GROUP_SELECTOR: &str = "ul";
pub const DEFAULT_ITEM_SELECTOR: &str = "li";
pub const DEFAULT_PLACEHOLDER_COLOR: &str = "#ccc";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid reorder config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What the host does with an emitted change besides notifying listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderAction {
    /// Notify listeners only.
    #[default]
    Event,
    /// Send the change to the configured persistence endpoint.
    #[serde(alias = "plsql")]
    Persist,
    /// Invoke a named callback registered with the host.
    #[serde(alias = "javascript")]
    Callback,
}

impl fmt::Display for ReorderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Event => "event",
            Self::Persist => "persist",
            Self::Callback => "callback",
        })
    }
}

// ---------------------------------------------------------------------------
// ReorderConfig
// ---------------------------------------------------------------------------

/// Configuration of one reorderable list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Identity of the list (the region it lives in). Required.
    pub list_id: String,
    pub mode: ReorderMode,
    pub action: ReorderAction,
    /// Persistence endpoint, required for [`ReorderAction::Persist`].
    pub persist_endpoint: Option<String>,
    /// Callback name, required for [`ReorderAction::Callback`].
    pub callback: Option<String>,
    /// Page items submitted with a persist request. Accepts a list or a
    /// comma-separated string.
    #[serde(deserialize_with = "deserialize_item_list")]
    pub items_to_submit: Vec<String>,
    pub group_selector: String,
    pub item_selector: String,
    /// Sub-element that must be grabbed to start a drag (sort mode only).
    pub handle: Option<String>,
    /// Pointer travel before a drag starts. Accepts a number or a numeric
    /// string; anything unparseable falls back to [`DEFAULT_DISTANCE`].
    #[serde(deserialize_with = "deserialize_distance")]
    pub distance: u32,
    pub placeholder_color: String,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            list_id: String::new(),
            mode: ReorderMode::Sort,
            action: ReorderAction::Event,
            persist_endpoint: None,
            callback: None,
            items_to_submit: Vec::new(),
            group_selector: DEFAULT_GROUP_SELECTOR.to_owned(),
            item_selector: DEFAULT_ITEM_SELECTOR.to_owned(),
            handle: None,
            distance: DEFAULT_DISTANCE,
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR.to_owned(),
        }
    }
}

impl ReorderConfig {
    /// Minimal config for `list_id` in `mode`, everything else default.
    #[must_use]
    pub fn new(list_id: impl Into<String>, mode: ReorderMode) -> Self {
        Self {
            list_id: list_id.into(),
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: ReorderAction) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn with_persist_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.persist_endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_callback(mut self, name: impl Into<String>) -> Self {
        self.callback = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_items_to_submit<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items_to_submit = items.into_iter().map(Into::into).collect();
        self
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check required identifiers.
    ///
    /// Returns a list of problems. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.list_id.trim().is_empty() {
            errors.push("list_id must be set".into());
        }
        if self.group_selector.trim().is_empty() {
            errors.push("group_selector must not be empty".into());
        }
        if self.item_selector.trim().is_empty() {
            errors.push("item_selector must not be empty".into());
        }

        match self.action {
            ReorderAction::Persist if is_blank(self.persist_endpoint.as_deref()) => {
                errors.push("action 'persist' requires persist_endpoint".into());
            }
            ReorderAction::Callback if is_blank(self.callback.as_deref()) => {
                errors.push("action 'callback' requires callback".into());
            }
            _ => {}
        }

        errors
    }

    /// Validate, turning any problem into [`ConfigError::Invalid`].
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Options for the external gesture engine.
    #[must_use]
    pub fn gesture_options(&self) -> GestureOptions {
        GestureOptions {
            mode: self.mode,
            group_selector: self.group_selector.clone(),
            item_selector: self.item_selector.clone(),
            // The swap engine has no drag handle support.
            handle: match self.mode {
                ReorderMode::Sort => self.handle.clone(),
                ReorderMode::Swap => None,
            },
            distance: self.distance,
            placeholder_color: self.placeholder_color.clone(),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Settings the host passes to the gesture engine for one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GestureOptions {
    pub mode: ReorderMode,
    pub group_selector: String,
    pub item_selector: String,
    pub handle: Option<String>,
    pub distance: u32,
    pub placeholder_color: String,
}

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemList {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_item_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawItemList>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(RawItemList::List(items)) => items
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(RawItemList::Joined(joined)) => split_item_list(&joined),
    })
}

/// Split a comma-separated page item list, dropping blanks.
#[must_use]
pub fn split_item_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDistance {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_distance<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDistance>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDistance::Int(n)) => u32::try_from(n).unwrap_or(DEFAULT_DISTANCE),
        Some(RawDistance::Float(f)) if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) => {
            // Truncates like an integer parse of "7.9".
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = f as u32;
            n
        }
        Some(RawDistance::Text(s)) => parse_distance(&s).unwrap_or(DEFAULT_DISTANCE),
        Some(RawDistance::Float(_)) | None => DEFAULT_DISTANCE,
    })
}

/// Parse the leading integer of `s` (e.g. `"12px"` → 12).
///
/// Returns `None` when there is no leading digit or the value is negative.
#[must_use]
pub fn parse_distance(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: &str = &s[..s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())];
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
