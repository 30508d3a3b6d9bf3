//! Integration tests for the fallback loader.
//!
//! Every way a constructor can fail must still yield a hostable module:
//! - returned errors and panics from the constructor
//! - instances that cannot be driven or run
//! - initialization errors and panics

mod common;

use anyhow::{bail, Result};
use common::{alpha_factory, failing_factory, panicking_factory};
use motibeam::error::{ErrorKind, OrchestrationError, Recovery};
use motibeam::modules::{
    Capabilities, ContentModule, ErrorFallbackLoader, LoadedModule, ModuleArgs, ModuleFactory,
    ModuleStatus,
};
use motibeam::tui::Theme;
use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};
use std::time::Duration;

const SURFACE: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

/// Module that can be stepped but not drawn.
struct Inert;

impl ContentModule for Inert {
    fn name(&self) -> &str {
        "Inert"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            update: true,
            render: false,
            run: false,
        }
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        Ok(ModuleStatus::Running)
    }

    fn render(&self, _f: &mut Frame, _area: Rect, _theme: &Theme) -> Result<()> {
        Ok(())
    }
}

/// Module whose initialization fails or panics.
struct Unready {
    panic: bool,
}

impl ContentModule for Unready {
    fn name(&self) -> &str {
        "Unready"
    }

    fn initialize(&mut self, _surface: Rect) -> Result<()> {
        assert!(!self.panic, "surface handle lost");
        bail!("gesture camera offline")
    }

    fn update(&mut self, _dt: Duration) -> Result<ModuleStatus> {
        Ok(ModuleStatus::Running)
    }

    fn render(&self, _f: &mut Frame, _area: Rect, _theme: &Theme) -> Result<()> {
        Ok(())
    }
}

fn inert_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(Inert))
}

fn init_error_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(Unready { panic: false }))
}

fn init_panic_factory(_args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(Unready { panic: true }))
}

fn load(name: &str, factory: ModuleFactory) -> LoadedModule {
    ErrorFallbackLoader::load(name, factory, &ModuleArgs::hosted(SURFACE))
}

/// Asserts the loaded module is a placeholder that can be stepped and drawn.
fn assert_hostable_placeholder(mut loaded: LoadedModule, expected_text: &str) -> OrchestrationError {
    assert!(loaded.is_placeholder());
    assert!(loaded.module.capabilities().satisfies_run_contract());
    assert_eq!(loaded.module.update(Duration::from_millis(16)).unwrap(), ModuleStatus::Running);

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let theme = Theme::dark();
    terminal
        .draw(|f| loaded.module.render(f, f.area(), &theme).unwrap())
        .unwrap();
    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect();
    assert!(screen.contains("Vertical Load Error"));
    assert!(screen.contains(expected_text), "{screen}");

    let fault = loaded.fault.take().unwrap();
    assert_eq!(fault.kind(), ErrorKind::Construction);
    assert_eq!(fault.recovery(), Recovery::ShowPlaceholder);
    fault
}

#[test]
fn test_healthy_factory_loads_module() {
    let loaded = load("Wellness", alpha_factory);
    assert!(!loaded.is_placeholder());
    assert_eq!(loaded.module.name(), "Alpha");
}

#[test]
fn test_constructor_error_gives_placeholder() {
    let loaded = load("Emergency", failing_factory);
    let fault = assert_hostable_placeholder(loaded, "projector lamp not detected");
    assert!(matches!(fault, OrchestrationError::Construction { .. }));
}

#[test]
fn test_constructor_panic_gives_placeholder() {
    let loaded = load("Security", panicking_factory);
    let fault = assert_hostable_placeholder(loaded, "constructor exploded");
    assert!(fault.to_string().contains("panicked: constructor exploded"));
}

#[test]
fn test_contract_violation_gives_placeholder() {
    let loaded = load("Industrial", inert_factory);
    let fault = assert_hostable_placeholder(loaded, "Industrial");
    assert_eq!(
        fault,
        OrchestrationError::ContractViolation {
            module: "Industrial".to_string()
        }
    );
}

#[test]
fn test_initialize_error_gives_placeholder() {
    let loaded = load("Education", init_error_factory);
    let fault = assert_hostable_placeholder(loaded, "gesture camera offline");
    assert!(matches!(fault, OrchestrationError::Construction { .. }));
}

#[test]
fn test_initialize_panic_gives_placeholder() {
    let loaded = load("Education", init_panic_factory);
    assert_hostable_placeholder(loaded, "surface handle lost");
}

#[test]
fn test_same_failure_gives_same_message() {
    let first = load("Emergency", failing_factory).fault.unwrap();
    let second = load("Emergency", failing_factory).fault.unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unhosted_args_skip_initialize() {
    let args = ModuleArgs {
        standalone: true,
        surface: None,
    };
    let loaded = ErrorFallbackLoader::load("Education", init_error_factory, &args);
    assert!(!loaded.is_placeholder());
}
