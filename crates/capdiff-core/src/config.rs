//! Comparison policy.
//!
//! [`ComparisonConfig`] is supplied by the caller and stays immutable for the
//! duration of one comparison. It can be built in code or loaded from TOML:
//!
//! ```toml
//! ignored_fields = ["capture_time", "session_id"]
//! critical_fields = ["total_assets"]
//! major_change_threshold = 0.3
//! large_absolute_delta = 100.0
//! ```
//!
//! No field names are ignored or treated as critical by default.

use crate::errors::{CapdiffError, ExError};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_MAJOR_CHANGE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_LARGE_ABSOLUTE_DELTA: f64 = 100.0;
pub const DEFAULT_RELATIVE_CHANGE_FLOOR: f64 = 10.0;
pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_MAX_VALUE_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Field names skipped wherever they appear (timestamps, tokens, session ids)
    pub ignored_fields: BTreeSet<String>,
    /// Field names whose differences are never reported below MAJOR
    pub critical_fields: BTreeSet<String>,
    /// Relative change (fraction of the old value) at which a numeric change is MAJOR
    pub major_change_threshold: f64,
    /// Absolute numeric delta at which a change is MAJOR regardless of relative size
    pub large_absolute_delta: f64,
    /// Minimum absolute delta before the relative threshold is consulted
    pub relative_change_floor: f64,
    /// Nesting depth past which differing subtrees are skipped
    pub max_depth: usize,
    /// Display bound for old/new values carried on a difference
    pub max_value_chars: usize,
    /// Stop recording after this many differences
    pub max_differences: Option<usize>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            ignored_fields: BTreeSet::new(),
            critical_fields: BTreeSet::new(),
            major_change_threshold: DEFAULT_MAJOR_CHANGE_THRESHOLD,
            large_absolute_delta: DEFAULT_LARGE_ABSOLUTE_DELTA,
            relative_change_floor: DEFAULT_RELATIVE_CHANGE_FLOOR,
            max_depth: DEFAULT_MAX_DEPTH,
            max_value_chars: DEFAULT_MAX_VALUE_CHARS,
            max_differences: None,
        }
    }
}

impl ComparisonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_critical_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_major_change_threshold(mut self, threshold: f64) -> Self {
        self.major_change_threshold = threshold;
        self
    }

    pub fn with_large_absolute_delta(mut self, delta: f64) -> Self {
        self.large_absolute_delta = delta;
        self
    }

    pub fn with_relative_change_floor(mut self, floor: f64) -> Self {
        self.relative_change_floor = floor;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_value_chars(mut self, chars: usize) -> Self {
        self.max_value_chars = chars;
        self
    }

    pub fn with_max_differences(mut self, limit: usize) -> Self {
        self.max_differences = Some(limit);
        self
    }

    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignored_fields.contains(field)
    }

    pub fn is_critical(&self, field: &str) -> bool {
        self.critical_fields.contains(field)
    }

    /// Check thresholds and limits.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when a threshold is negative or not finite, when
    /// `max_depth` is zero, or when a field is both ignored and critical.
    pub fn validate(&self) -> crate::errors::Result<()> {
        let thresholds = [
            ("major_change_threshold", self.major_change_threshold),
            ("large_absolute_delta", self.large_absolute_delta),
            ("relative_change_floor", self.relative_change_floor),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(CapdiffError::InvalidConfig {
                    reason: format!("`{}` must be a finite non-negative number, got {}", name, value),
                });
            }
        }
        if self.max_depth == 0 {
            return Err(CapdiffError::InvalidConfig {
                reason: "`max_depth` must be at least 1".to_string(),
            });
        }
        if let Some(field) = self.ignored_fields.intersection(&self.critical_fields).next() {
            return Err(CapdiffError::InvalidConfig {
                reason: format!("field `{}` is both ignored and critical", field),
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the text is not valid TOML for this schema or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, ExError> {
        let config: ComparisonConfig = toml::from_str(text).map_err(|e| {
            ExError::from(CapdiffError::InvalidConfig {
                reason: e.to_string(),
            })
            .with_op("load_config")
        })?;
        config
            .validate()
            .map_err(|e| ExError::from(e).with_op("load_config"))?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        log_op_start!("load_config", path = %shown);
        let start = std::time::Instant::now();

        let result = std::fs::read_to_string(path)
            .map_err(|e| {
                ExError::from(CapdiffError::Io {
                    path: shown.clone(),
                    message: e.to_string(),
                })
                .with_op("load_config")
            })
            .and_then(|text| Self::from_toml_str(&text).map_err(|e| e.with_path(shown.clone())));

        match result {
            Ok(config) => {
                log_op_end!(
                    "load_config",
                    duration_ms = start.elapsed().as_millis() as u64,
                    ignored = config.ignored_fields.len(),
                    critical = config.critical_fields.len()
                );
                Ok(config)
            }
            Err(e) => {
                log_op_error!(
                    "load_config",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }
}
