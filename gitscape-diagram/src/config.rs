//! Tunable constants of the diagram engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transition::{Easing, TransitionConfig};

/// Space kept free around the laid-out tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 150.0,
            bottom: 30.0,
            left: 100.0,
        }
    }
}

/// Diagram engine configuration.
///
/// Every field has a default, so a partial settings document only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub margins: Margins,
    /// Distance between adjacent visible siblings on the cross axis.
    pub node_spacing: f32,
    /// Lower bound for the distance between depth levels.
    pub min_level_spacing: f32,
    /// Added to the visible depth when dividing the viewport into levels.
    pub depth_slack: f32,
    pub transition_ms: u64,
    pub easing: Easing,
    /// Complete every transition immediately.
    pub reduced_motion: bool,
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
    /// Extra horizontal offset of the root, on top of the left margin.
    pub root_offset: f32,
    /// Names longer than this many characters are truncated.
    pub label_budget: usize,
    /// Characters kept in front of the ellipsis when truncating.
    pub label_keep: usize,
    /// Base of external file links.
    pub browse_base_url: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            node_spacing: 28.0,
            min_level_spacing: 150.0,
            depth_slack: 3.0,
            transition_ms: 750,
            easing: Easing::CubicInOut,
            reduced_motion: false,
            min_scale: 0.05,
            max_scale: 5.0,
            initial_scale: 0.85,
            root_offset: 60.0,
            label_budget: 22,
            label_keep: 20,
            browse_base_url: "https://github.com".to_string(),
        }
    }
}

impl DiagramConfig {
    pub fn transition(&self) -> TransitionConfig {
        if self.reduced_motion {
            return TransitionConfig::instant();
        }
        TransitionConfig::new(Duration::from_millis(self.transition_ms), self.easing)
    }

    /// Scale range with the bounds in order, whatever the settings said.
    pub fn scale_extent(&self) -> (f32, f32) {
        let (a, b) = (self.min_scale, self.max_scale);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// URL browsing `path` of `display_name` at `branch`.
    ///
    /// The path is inserted verbatim: separators are never percent-encoded.
    pub fn file_url(&self, display_name: &str, branch: &str, path: &str) -> String {
        format!(
            "{}/{display_name}/blob/{branch}/{path}",
            self.browse_base_url.trim_end_matches('/')
        )
    }
}
