//! Quick-settings and master-menu overlays.
//!
//! Overlays are drawn over whatever the live mode rendered. They only show
//! information; keys that are not global still reach the mode underneath.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, AppState, Theme};

const KEY_HELP: [(&str, &str); 7] = [
    ("Esc", "Close overlay / return to menu"),
    ("Space", "Toggle quick settings"),
    ("Tab", "Next vertical"),
    ("M", "Toggle master menu"),
    ("Ctrl+C", "Quit"),
    ("1-9", "Run vertical (menu)"),
    ("<- ->", "Change scene (ambient)"),
];

fn overlay_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.surface))
}

fn row<'a>(label: &'a str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{label:<18}"),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

/// Draws the quick-settings overlay: key help and the common settings.
pub fn render_quick_settings(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let popup = centered_rect(60, 60, area);

    let mut lines: Vec<Line> = KEY_HELP
        .iter()
        .map(|(key, help)| row(key, (*help).to_string(), theme))
        .collect();
    lines.push(Line::default());
    let brightness = state
        .settings
        .get_i64("Display", "brightness")
        .map_or_else(|| "-".to_string(), |v| format!("{v}%"));
    lines.push(row("Brightness", brightness, theme));
    lines.push(row(
        "Theme",
        state.settings.get_str("Visuals", "theme").unwrap_or("-").to_string(),
        theme,
    ));
    lines.push(row(
        "Scene",
        state.settings.active_scene().unwrap_or("-").to_string(),
        theme,
    ));

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(overlay_block(" Quick Settings ", theme)),
        popup,
    );
}

/// Draws the master-menu overlay: system status.
pub fn render_master_menu(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let popup = centered_rect(60, 60, area);

    let demo = if state.settings.demo_enabled() {
        format!("on ({})", state.settings.demo_profile().unwrap_or("-"))
    } else {
        "off".to_string()
    };
    let settings_path = state
        .settings
        .path()
        .map_or_else(|| "(not persisted)".to_string(), |p| p.display().to_string());

    let lines = vec![
        row("Mode", state.mode_kind().to_string(), theme),
        row(
            "Vertical",
            state.current_vertical().unwrap_or("-").to_string(),
            theme,
        ),
        row("Verticals", state.verticals.len().to_string(), theme),
        row("Scenes", state.scenes.registry().len().to_string(), theme),
        row(
            "Active scene",
            state.scenes.active_scene_name().unwrap_or("-").to_string(),
            theme,
        ),
        row("Auto demo", demo, theme),
        row("Settings file", settings_path, theme),
        row(
            "Version",
            state.settings.get_str("System", "version").unwrap_or("-").to_string(),
            theme,
        ),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(overlay_block(" Master Menu ", theme)),
        popup,
    );
}
