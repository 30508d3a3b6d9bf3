//! Ordered list of verticals.
//!
//! This is the one place vertical order is defined. Position in the list fixes
//! the menu order, the TAB cycle order and the auto-demo rotation order.

use ratatui::style::Color;
use std::collections::HashSet;

use crate::error::OrchestrationError;
use crate::modules::{builtin, ModuleFactory};

/// A configured vertical whose constructor may be unavailable.
#[derive(Debug, Clone)]
pub struct RawVerticalEntry {
    /// Selection key shown in the menu
    pub key: char,
    /// Unique display name
    pub display_name: String,
    /// Constructor, `None` when the vertical is not available in this build
    pub constructor: Option<ModuleFactory>,
}

impl RawVerticalEntry {
    /// Creates a raw entry.
    pub fn new(key: char, display_name: impl Into<String>, constructor: Option<ModuleFactory>) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            constructor,
        }
    }
}

/// A vertical that can be launched.
#[derive(Debug, Clone)]
pub struct VerticalEntry {
    /// Selection key shown in the menu
    pub key: char,
    /// Unique display name
    pub display_name: String,
    /// Constructor handed to the loader
    pub constructor: ModuleFactory,
}

/// Presentation data for a vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetadata {
    /// Short symbol shown before the name
    pub symbol: &'static str,
    /// Menu color
    pub color: Color,
    /// One-line description
    pub description: &'static str,
}

/// Metadata used for verticals missing from [`VERTICAL_METADATA`].
pub const UNKNOWN_METADATA: VerticalMetadata = VerticalMetadata {
    symbol: "[?]",
    color: Color::Rgb(150, 150, 150),
    description: "Unknown vertical",
};

/// Display metadata by vertical name.
pub const VERTICAL_METADATA: &[(&str, VerticalMetadata)] = &[
    (
        "Smart Home",
        VerticalMetadata {
            symbol: "[^]",
            color: Color::Rgb(80, 255, 120),
            description: "Smart home dashboard and control",
        },
    ),
    (
        "Auto HUD",
        VerticalMetadata {
            symbol: "[>]",
            color: Color::Rgb(255, 255, 100),
            description: "Automotive heads-up display",
        },
    ),
    (
        "Wellness",
        VerticalMetadata {
            symbol: "[+]",
            color: Color::Rgb(80, 255, 120),
            description: "Clinical & wellness monitoring",
        },
    ),
    (
        "Education",
        VerticalMetadata {
            symbol: "[#]",
            color: Color::Rgb(200, 100, 255),
            description: "Education and learning platform",
        },
    ),
    (
        "Security",
        VerticalMetadata {
            symbol: "[*]",
            color: Color::Rgb(255, 180, 0),
            description: "Security & government systems",
        },
    ),
    (
        "Emergency",
        VerticalMetadata {
            symbol: "[!]",
            color: Color::Rgb(255, 80, 80),
            description: "Emergency response systems",
        },
    ),
    (
        "Industrial",
        VerticalMetadata {
            symbol: "[=]",
            color: Color::Rgb(0, 255, 180),
            description: "Enterprise & industrial control",
        },
    ),
];

/// Looks up display metadata, falling back to [`UNKNOWN_METADATA`].
#[must_use]
pub fn metadata(name: &str) -> VerticalMetadata {
    lookup_metadata(name).unwrap_or(UNKNOWN_METADATA)
}

fn lookup_metadata(name: &str) -> Option<VerticalMetadata> {
    VERTICAL_METADATA
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, meta)| *meta)
}

/// The built-in vertical list, in menu order.
///
/// Verticals whose cargo feature is disabled keep their slot without a
/// constructor and are dropped by [`VerticalOrderingConfig::from_raw`].
#[must_use]
pub fn default_raw_entries() -> Vec<RawVerticalEntry> {
    fn gated(enabled: bool, factory: ModuleFactory) -> Option<ModuleFactory> {
        enabled.then_some(factory)
    }

    vec![
        RawVerticalEntry::new('1', "Smart Home", gated(cfg!(feature = "home"), builtin::home)),
        RawVerticalEntry::new(
            '2',
            "Auto HUD",
            gated(cfg!(feature = "automotive"), builtin::automotive),
        ),
        RawVerticalEntry::new(
            '3',
            "Wellness",
            gated(cfg!(feature = "clinical"), builtin::clinical),
        ),
        RawVerticalEntry::new(
            '4',
            "Education",
            gated(cfg!(feature = "education"), builtin::education),
        ),
        RawVerticalEntry::new(
            '5',
            "Security",
            gated(cfg!(feature = "security"), builtin::security),
        ),
        RawVerticalEntry::new(
            '6',
            "Emergency",
            gated(cfg!(feature = "emergency"), builtin::emergency),
        ),
        RawVerticalEntry::new(
            '7',
            "Industrial",
            gated(cfg!(feature = "industrial"), builtin::industrial),
        ),
    ]
}

/// Ordered, validated list of launchable verticals.
#[derive(Debug, Clone, Default)]
pub struct VerticalOrderingConfig {
    entries: Vec<VerticalEntry>,
    warnings: Vec<OrchestrationError>,
}

impl VerticalOrderingConfig {
    /// Builds the active list from raw configuration.
    ///
    /// Duplicate keys and names are configuration errors: they are logged and
    /// only the first occurrence is kept. Entries without a constructor are
    /// dropped. Names without display metadata are logged and shown with the
    /// fallback metadata.
    #[must_use]
    pub fn from_raw(raw: Vec<RawVerticalEntry>) -> Self {
        let mut seen_keys = HashSet::new();
        let mut seen_names = HashSet::new();
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for item in raw {
            if !seen_keys.insert(item.key) {
                warnings.push(OrchestrationError::DuplicateKey {
                    key: item.key,
                    name: item.display_name,
                });
                continue;
            }
            if !seen_names.insert(item.display_name.clone()) {
                warnings.push(OrchestrationError::DuplicateName(item.display_name));
                continue;
            }
            if lookup_metadata(&item.display_name).is_none() {
                warnings.push(OrchestrationError::MissingMetadata(item.display_name.clone()));
            }

            match item.constructor {
                Some(constructor) => entries.push(VerticalEntry {
                    key: item.key,
                    display_name: item.display_name,
                    constructor,
                }),
                None => tracing::debug!("vertical '{}' unavailable, skipped", item.display_name),
            }
        }

        for warning in &warnings {
            tracing::warn!("vertical config: {warning}");
        }

        Self { entries, warnings }
    }

    /// The built-in configuration.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_raw(default_raw_entries())
    }

    /// Launchable verticals in order.
    #[must_use]
    pub fn active_entries(&self) -> &[VerticalEntry] {
        &self.entries
    }

    /// Number of launchable verticals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no vertical is launchable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configuration problems found while building the list.
    #[must_use]
    pub fn warnings(&self) -> &[OrchestrationError] {
        &self.warnings
    }

    /// Position of `name` in the active list.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.display_name == name)
    }

    /// The entry after `name`, wrapping from last to first.
    ///
    /// An unknown name yields the first entry; an empty list yields `None`.
    #[must_use]
    pub fn next_after(&self, name: &str) -> Option<&VerticalEntry> {
        let next = self
            .position(name)
            .map_or(0, |idx| (idx + 1) % self.entries.len());
        self.entries.get(next)
    }

    /// The entry selected by `key`.
    #[must_use]
    pub fn by_key(&self, key: char) -> Option<&VerticalEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// First entry whose name starts with `prefix`, ignoring case.
    #[must_use]
    pub fn starting_with(&self, prefix: &str) -> Option<&VerticalEntry> {
        let prefix = prefix.to_lowercase();
        if prefix.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.display_name.to_lowercase().starts_with(&prefix))
    }
}
