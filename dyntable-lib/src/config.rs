//! Grid configuration

use serde::Deserialize;
use serde::Serialize;

/// How a string filter value is matched against cell text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringMatch {
    /// Case-sensitive substring match.
    #[default]
    Contains,
    /// Case-sensitive whole-value match.
    Exact,
}

/// Locale settings for read-only number cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    /// Separator between thousands groups (`,` in en-US).
    pub thousands_separator: String,
    /// Separator before the fraction (`.` in en-US).
    pub decimal_separator: String,
    /// Maximum number of fraction digits shown; trailing zeros are trimmed.
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            max_fraction_digits: 3,
        }
    }
}

/// Configuration for a [`DynamicTable`](crate::grid::DynamicTable).
///
/// # Example
///
/// ```
/// use dyntable_lib::config::{GridConfig, StringMatch};
///
/// let config = GridConfig::default()
///     .with_string_match(StringMatch::Exact)
///     .with_page_size(50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// String filter policy.
    ///
    /// Default: substring contains
    pub string_match: StringMatch,

    /// Number rendering.
    ///
    /// Default: en-US style (`1,234.5`)
    pub number_format: NumberFormat,

    /// Rows per display page.
    ///
    /// Default: 25
    pub page_size: usize,

    /// Buffered events per subscriber before lagging ones drop events.
    ///
    /// Default: 64
    pub event_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            string_match: StringMatch::Contains,
            number_format: NumberFormat::default(),
            page_size: 25,
            event_capacity: 64,
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the string filter policy.
    pub fn with_string_match(mut self, string_match: StringMatch) -> Self {
        self.string_match = string_match;
        self
    }

    /// Sets the number format.
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Sets the page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the event channel capacity. Zero is treated as one.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
