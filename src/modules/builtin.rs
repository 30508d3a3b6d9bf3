//! Built-in vertical screens.
//!
//! Each vertical is a titled information screen that reveals its talking points
//! one by one and keeps a live status bar. Which verticals are compiled in is
//! decided by cargo features (see [`crate::verticals::default_raw_entries`]).

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use std::time::Duration;

use super::{ContentModule, ModuleArgs, ModuleStatus};
use crate::tui::Theme;

/// Time between two talking points appearing.
const REVEAL_STEP: Duration = Duration::from_millis(1200);

/// Static content of one vertical screen.
#[derive(Debug)]
pub struct VerticalContent {
    /// Screen title
    pub title: &'static str,
    /// Headline under the title
    pub headline: &'static str,
    /// Talking points, revealed in order
    pub points: &'static [&'static str],
    /// Status line shown at the bottom
    pub status: &'static str,
    /// Accent color of the vertical
    pub accent: Color,
}

const HOME: VerticalContent = VerticalContent {
    title: "SMART HOME",
    headline: "AMBIENT HOUSEHOLD DASHBOARD",
    points: &[
        "Lights: Living Room 60% | Kitchen Off",
        "Climate: 21.5 C Target | Eco Schedule",
        "Front Door: Locked | Garage Closed",
        "Deliveries: 1 Package Expected 3 PM",
        "Energy Today: 8.2 kWh (-12% vs avg)",
    ],
    status: "Home: All Quiet | Presence: 2 Occupants",
    accent: Color::Rgb(80, 255, 120),
};

const AUTOMOTIVE: VerticalContent = VerticalContent {
    title: "AUTO HUD",
    headline: "EXTERNAL PROJECTION SAFETY",
    points: &[
        "Projecting: << STOP >> & Direction Arrows",
        "V2X: Pedestrian Detected Rear-Left",
        "Cabin Display: Speed Limit 25 MPH",
        "Safety Zone: ACTIVE",
        "Autonomous Vehicle Ready",
    ],
    status: "Vehicle Systems: NOMINAL",
    accent: Color::Rgb(255, 255, 100),
};

const CLINICAL: VerticalContent = VerticalContent {
    title: "WELLNESS",
    headline: "MULTI-MODAL ADHERENCE VERIFICATION",
    points: &[
        "Voice: 'Medication Taken'",
        "Gesture: Nod Head Confirmation",
        "Projected: Checkmark + Vital Signs",
        "Adherence Confidence Score: 94%",
        "Clinical Deterioration Index: Stable",
    ],
    status: "Patient Status: STABLE | Next Dose 18:00",
    accent: Color::Rgb(80, 255, 120),
};

const EDUCATION: VerticalContent = VerticalContent {
    title: "EDUCATION",
    headline: "AMBIENT LEARNING PLATFORM",
    points: &[
        "Study-to-Sleep: French Vocabulary",
        "Homework Helper: Step 3/5 Calculus",
        "Presentation: Timer 4:32 Remaining",
        "Classroom Tools: Attendance & Alerts",
        "Smart Dorm: University Ready",
    ],
    status: "Focus: 87% | Retention: High",
    accent: Color::Rgb(200, 100, 255),
};

const SECURITY: VerticalContent = VerticalContent {
    title: "SECURITY",
    headline: "GUARDIAN ALERT SYSTEM",
    points: &[
        "Projecting: 'ALPHA ZONE SECURE'",
        "Personnel: 3 Friendly, 0 Unknown",
        "Evacuation: Green Path Highlighted",
        "Tactical Overlays: Active",
        "Perimeter Sensors: 12/12 Online",
    ],
    status: "Alert Level: GREEN | All Systems Secure",
    accent: Color::Rgb(255, 180, 0),
};

const EMERGENCY: VerticalContent = VerticalContent {
    title: "EMERGENCY",
    headline: "EMERGENCY SIGNALING SYSTEM",
    points: &[
        "SOS & Exit Direction Arrows",
        "Universal Safety Symbols Active",
        "Floor: Evacuation Route Highlighted",
        "Smoke Detection: Sensors Active",
        "First Responder Coordination",
    ],
    status: "STATUS: DRILL MODE | All Systems Operational",
    accent: Color::Rgb(255, 80, 80),
};

const INDUSTRIAL: VerticalContent = VerticalContent {
    title: "INDUSTRIAL",
    headline: "INDUSTRIAL AUTOMATION & SAFETY",
    points: &[
        "Warehouse: Forklift Hazard Zones",
        "Pick Path: Navigation Arrows on Floor",
        "Assembly: Torque Spec Overlays",
        "Workforce Training: Step-by-Step",
        "Line Throughput: 412 units/hr",
    ],
    status: "Efficiency: +15% | Safety: 100%",
    accent: Color::Rgb(0, 255, 180),
};

/// Smart Home vertical.
pub fn home(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&HOME, args)))
}

/// Auto HUD vertical.
pub fn automotive(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&AUTOMOTIVE, args)))
}

/// Clinical and wellness vertical.
pub fn clinical(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&CLINICAL, args)))
}

/// Education vertical.
pub fn education(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&EDUCATION, args)))
}

/// Security vertical.
pub fn security(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&SECURITY, args)))
}

/// Emergency vertical.
pub fn emergency(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&EMERGENCY, args)))
}

/// Industrial vertical.
pub fn industrial(args: &ModuleArgs) -> Result<Box<dyn ContentModule>> {
    Ok(Box::new(VerticalScreen::new(&INDUSTRIAL, args)))
}

/// Information screen driven by the shell.
#[derive(Debug)]
pub struct VerticalScreen {
    content: &'static VerticalContent,
    elapsed: Duration,
    revealed: usize,
    surface: Rect,
}

impl VerticalScreen {
    /// Creates a screen for `content`.
    #[must_use]
    pub fn new(content: &'static VerticalContent, args: &ModuleArgs) -> Self {
        Self {
            content,
            elapsed: Duration::ZERO,
            revealed: 0,
            surface: args.surface.unwrap_or_default(),
        }
    }

    /// Number of talking points currently visible.
    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    fn reveal_progress(&self) -> f64 {
        if self.content.points.is_empty() {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.revealed as f64 / self.content.points.len() as f64;
        ratio
    }
}

impl ContentModule for VerticalScreen {
    fn name(&self) -> &str {
        self.content.title
    }

    fn initialize(&mut self, surface: Rect) -> Result<()> {
        self.surface = surface;
        self.elapsed = Duration::ZERO;
        self.revealed = 0;
        Ok(())
    }

    fn update(&mut self, dt: Duration) -> Result<ModuleStatus> {
        self.elapsed += dt;
        let steps = (self.elapsed.as_millis() / REVEAL_STEP.as_millis()) as usize + 1;
        self.revealed = steps.min(self.content.points.len());
        Ok(ModuleStatus::Running)
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) -> Result<()> {
        let content = self.content;
        // Short surfaces drop the sync gauge
        let gauge_height = if self.surface.height.min(area.height) < 16 { 0 } else { 3 };
        let [header, body, progress, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(gauge_height),
            Constraint::Length(3),
        ])
        .areas(area);

        f.render_widget(Clear, area);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                content.title,
                Style::default()
                    .fg(content.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                content.headline,
                Style::default().fg(theme.text_secondary),
            )),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(content.accent)),
        );
        f.render_widget(title, header);

        let points: Vec<Line> = content
            .points
            .iter()
            .take(self.revealed)
            .map(|point| {
                Line::from(vec![
                    Span::styled("  > ", Style::default().fg(content.accent)),
                    Span::styled(*point, Style::default().fg(theme.text)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(points), body);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Sync "))
            .gauge_style(Style::default().fg(content.accent))
            .ratio(self.reveal_progress());
        if gauge_height > 0 {
            f.render_widget(gauge, progress);
        }

        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        let status = Paragraph::new(Line::from(vec![
            Span::styled(content.status, Style::default().fg(theme.success)),
            Span::styled(format!("  |  {clock}"), Style::default().fg(theme.text_muted)),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
        f.render_widget(status, footer);

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> ModuleStatus {
        match key.code {
            KeyCode::Enter => {
                self.revealed = self.content.points.len();
                let steps = u32::try_from(self.revealed).unwrap_or(u32::MAX);
                self.elapsed = REVEAL_STEP.saturating_mul(steps);
            }
            KeyCode::Char('r') => {
                self.elapsed = Duration::ZERO;
                self.revealed = 0;
            }
            _ => {}
        }
        ModuleStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn screen() -> VerticalScreen {
        VerticalScreen::new(&SECURITY, &ModuleArgs::hosted(Rect::new(0, 0, 80, 24)))
    }

    #[test]
    fn test_points_reveal_over_time() {
        let mut screen = screen();
        screen.update(Duration::ZERO).unwrap();
        assert_eq!(screen.revealed(), 1);

        screen.update(REVEAL_STEP * 2).unwrap();
        assert_eq!(screen.revealed(), 3);

        screen.update(REVEAL_STEP * 20).unwrap();
        assert_eq!(screen.revealed(), SECURITY.points.len());
    }

    #[test]
    fn test_enter_reveals_all_and_r_replays() {
        let mut screen = screen();
        screen.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(screen.revealed(), SECURITY.points.len());

        screen.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        assert_eq!(screen.revealed(), 0);
        screen.update(Duration::from_millis(10)).unwrap();
        assert_eq!(screen.revealed(), 1);
    }

    #[test]
    fn test_factories_build_hosted_screens() {
        let args = ModuleArgs::hosted(Rect::new(0, 0, 80, 24));
        let factories: [crate::modules::ModuleFactory; 7] = [
            home, automotive, clinical, education, security, emergency, industrial,
        ];
        for factory in factories {
            let module = factory(&args).unwrap();
            assert!(module.capabilities().satisfies_run_contract());
        }
    }
}
