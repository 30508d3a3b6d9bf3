//! Failure taxonomy for the orchestration layer.
//!
//! Every failure the shell recovers from is one of four kinds, and each kind has
//! exactly one recovery: discovery problems skip the candidate, construction
//! problems show a placeholder, runtime problems evict to the menu, and
//! configuration problems fall back to a filtered configuration.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Broad category of an [`OrchestrationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A scene plugin file could not be loaded or failed its contract check.
    Discovery,
    /// A module constructor failed or produced an unusable instance.
    Construction,
    /// A running module or scene faulted during update or render.
    Runtime,
    /// The vertical ordering configuration is inconsistent.
    Configuration,
}

/// What the shell does after an error of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Leave the candidate out of the registry and keep scanning.
    SkipCandidate,
    /// Run a placeholder module in place of the failed one.
    ShowPlaceholder,
    /// Drop the active mode and go back to the menu.
    ReturnToMenu,
    /// Keep running with the offending entries removed.
    UseFilteredConfig,
}

/// Errors raised and recovered inside the shell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    /// Scene file could not be read or parsed.
    #[error("failed to load scene file {}: {reason}", file.display())]
    SceneLoad {
        /// Offending file
        file: PathBuf,
        /// Read or parse error text
        reason: String,
    },

    /// Scene file lacks required identifiers or entry points.
    #[error("scene file {} is missing required items: {}", file.display(), missing.join(", "))]
    MissingEntryPoints {
        /// Offending file
        file: PathBuf,
        /// Every missing item, in contract order
        missing: Vec<&'static str>,
    },

    /// Scene file declares a name that is already registered.
    #[error("scene '{name}' in {} is already registered", file.display())]
    DuplicateScene {
        /// Duplicated scene name
        name: String,
        /// File that was skipped
        file: PathBuf,
    },

    /// Module constructor returned an error or panicked.
    #[error("module '{module}' failed to construct: {reason}")]
    Construction {
        /// Display name of the module
        module: String,
        /// Constructor failure text
        reason: String,
    },

    /// Constructed module cannot be driven or run.
    #[error("module '{module}' exposes neither run nor update/render")]
    ContractViolation {
        /// Display name of the module
        module: String,
    },

    /// Running module or scene faulted.
    #[error("{mode} faulted: {reason}")]
    Runtime {
        /// Mode that was active when the fault happened
        mode: String,
        /// Fault text
        reason: String,
    },

    /// Two vertical entries share a key.
    #[error("duplicate vertical key '{key}' ('{name}' ignored)")]
    DuplicateKey {
        /// Shared key
        key: char,
        /// Entry that was dropped
        name: String,
    },

    /// Two vertical entries share a display name.
    #[error("duplicate vertical name '{0}'")]
    DuplicateName(String),

    /// A configured vertical has no display metadata.
    #[error("no display metadata for vertical '{0}'")]
    MissingMetadata(String),
}

impl OrchestrationError {
    /// Builds a runtime fault from any error surfaced by a module.
    pub fn runtime(mode: impl fmt::Display, err: &anyhow::Error) -> Self {
        Self::Runtime {
            mode: mode.to_string(),
            reason: format!("{err:#}"),
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SceneLoad { .. } | Self::MissingEntryPoints { .. } | Self::DuplicateScene { .. } => {
                ErrorKind::Discovery
            }
            Self::Construction { .. } | Self::ContractViolation { .. } => ErrorKind::Construction,
            Self::Runtime { .. } => ErrorKind::Runtime,
            Self::DuplicateKey { .. } | Self::DuplicateName(_) | Self::MissingMetadata(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Returns the recovery the shell applies for this error.
    #[must_use]
    pub const fn recovery(&self) -> Recovery {
        match self.kind() {
            ErrorKind::Discovery => Recovery::SkipCandidate,
            ErrorKind::Construction => Recovery::ShowPlaceholder,
            ErrorKind::Runtime => Recovery::ReturnToMenu,
            ErrorKind::Configuration => Recovery::UseFilteredConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_recovery() {
        let err = OrchestrationError::MissingEntryPoints {
            file: PathBuf::from("scene_broken.toml"),
            missing: vec!["render_scene"],
        };
        assert_eq!(err.kind(), ErrorKind::Discovery);
        assert_eq!(err.recovery(), Recovery::SkipCandidate);

        let err = OrchestrationError::Construction {
            module: "Wellness".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.recovery(), Recovery::ShowPlaceholder);

        let err = OrchestrationError::runtime("RunningModule", &anyhow::anyhow!("bad frame"));
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert_eq!(err.recovery(), Recovery::ReturnToMenu);

        let err = OrchestrationError::DuplicateName("Security".to_string());
        assert_eq!(err.recovery(), Recovery::UseFilteredConfig);
    }

    #[test]
    fn test_missing_entry_points_message_names_file_and_items() {
        let err = OrchestrationError::MissingEntryPoints {
            file: PathBuf::from("scenes/scene_broken.toml"),
            missing: vec!["update_scene", "render_scene"],
        };
        let text = err.to_string();
        assert!(text.contains("scene_broken.toml"));
        assert!(text.contains("update_scene, render_scene"));
    }
}
