//! Configuration options for opening scenes.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling how a scene is discovered and loaded.
///
/// Directory and file names of the scene layout are fixed (see
/// [`crate::VIEWS_DIR`] and [`crate::BUNDLE_FILE`]); only loading behavior is
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// What to do with entries of `views/` that fail to load.
    pub view_errors: ViewErrorPolicy,

    /// Whether to sort discovered views by id instead of keeping listing order.
    pub sort_views_by_id: bool,

    /// Whether to load the bundle while opening the scene.
    ///
    /// When set, a missing or malformed bundle file fails the open call
    /// instead of the first bundle access.
    pub load_bundle_on_create: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            view_errors: ViewErrorPolicy::Fail,
            sort_views_by_id: false,
            load_bundle_on_create: false,
        }
    }
}

impl Options {
    /// Parses options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        log::debug!("parsed scene options: {options:?}");
        Ok(options)
    }

    /// Serializes these options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Policy for view directories that cannot be loaded during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewErrorPolicy {
    /// The first failing view fails the whole open call.
    #[default]
    Fail,
    /// Failing views are logged and left out of the scene.
    Skip,
}
