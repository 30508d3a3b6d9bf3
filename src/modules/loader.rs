//! Module construction with graceful fallback.
//!
//! The loader is the only place modules are constructed. It never fails: any
//! constructor error, panic, or contract violation is logged in full and turned
//! into a [`PlaceholderModule`] that explains what went wrong.

use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use super::{ContentModule, ModuleArgs, ModuleFactory, ModuleStatus};
use crate::error::OrchestrationError;
use crate::tui::Theme;

/// Maximum number of error characters shown on the placeholder screen.
pub const MAX_ERROR_CHARS: usize = 60;

/// A constructed module plus the fault that forced a placeholder, if any.
pub struct LoadedModule {
    /// Module to host. A placeholder when `fault` is set.
    pub module: Box<dyn ContentModule>,
    /// Construction failure, when one happened.
    pub fault: Option<OrchestrationError>,
}

impl LoadedModule {
    /// Whether the module is a load-error placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.fault.is_some()
    }
}

/// Constructs modules and substitutes a placeholder on failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorFallbackLoader;

impl ErrorFallbackLoader {
    /// Constructs `name` through `factory`.
    ///
    /// The instance must satisfy the run contract. When `args` carries a
    /// surface the module is initialized against it, and an initialization
    /// failure counts as a construction failure.
    pub fn load(name: &str, factory: ModuleFactory, args: &ModuleArgs) -> LoadedModule {
        match Self::construct(name, factory, args) {
            Ok(module) => {
                tracing::info!("loaded module '{name}'");
                LoadedModule {
                    module,
                    fault: None,
                }
            }
            Err(fault) => {
                tracing::error!("{fault}");
                let module = PlaceholderModule::new(name, &fault_reason(&fault));
                LoadedModule {
                    module: Box::new(module),
                    fault: Some(fault),
                }
            }
        }
    }

    fn construct(
        name: &str,
        factory: ModuleFactory,
        args: &ModuleArgs,
    ) -> Result<Box<dyn ContentModule>, OrchestrationError> {
        let construction = |reason: String| OrchestrationError::Construction {
            module: name.to_string(),
            reason,
        };

        let mut module =
            catch_fault(|| factory(args)).map_err(|e| construction(format!("{e:#}")))?;

        if !module.capabilities().satisfies_run_contract() {
            return Err(OrchestrationError::ContractViolation {
                module: name.to_string(),
            });
        }

        if let Some(surface) = args.surface {
            catch_fault(|| module.initialize(surface))
                .map_err(|e| construction(format!("{e:#}")))?;
        }

        Ok(module)
    }
}

fn fault_reason(fault: &OrchestrationError) -> String {
    match fault {
        OrchestrationError::Construction { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// Runs `f`, turning a panic inside it into an error.
pub fn catch_fault<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(anyhow!(panic_message(payload.as_ref()))))
}

/// Text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

/// Shortens `text` to `max` characters, appending `...` when cut.
#[must_use]
pub fn truncate_error(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Stand-in shown when a module could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderModule {
    module_name: String,
    error_text: String,
}

impl PlaceholderModule {
    /// Creates a placeholder for `module_name` that failed with `error`.
    #[must_use]
    pub fn new(module_name: &str, error: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            error_text: truncate_error(error, MAX_ERROR_CHARS),
        }
    }

    /// Name of the module that failed.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Error text as displayed (already truncated).
    #[must_use]
    pub fn error_text(&self) -> &str {
        &self.error_text
    }
}

impl ContentModule for PlaceholderModule {
    fn name(&self) -> &str {
        &self.module_name
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        Ok(ModuleStatus::Running)
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) -> Result<()> {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Vertical Load Error",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Failed to load: {}", self.module_name),
                Style::default().fg(theme.text),
            )),
            Line::from(Span::styled(
                self.error_text.clone(),
                Style::default().fg(theme.text_secondary),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press ESC to return to menu",
                Style::default().fg(theme.text_muted),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.background));

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModuleStatus {
        if key.code == KeyCode::Esc {
            ModuleStatus::Finished
        } else {
            ModuleStatus::Running
        }
    }
}
