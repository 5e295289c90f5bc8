//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::StatusLevel;

/// Render the header bar with fleet health overview.
///
/// Displays: status indicator, unit counts by severity, active alarm
/// count, and the integrity warning count when non-zero.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref fleet) = app.fleet else {
        let line = Line::from(vec![
            Span::styled(" UNITWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let [ok, degraded, warning, critical] = fleet.counts_by_status();
    let total = fleet.units.len();
    let active_alarms = app.ledger.active_count();

    let status_style = app.theme.status_style(fleet.worst_status());

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("UNITWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", ok), Style::default().fg(app.theme.healthy)),
        Span::raw(" ok "),
        if degraded > 0 {
            Span::styled(format!("{}", degraded), Style::default().fg(app.theme.degraded))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" degr "),
        if warning > 0 {
            Span::styled(format!("{}", warning), Style::default().fg(app.theme.warning))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" warn "),
        if critical > 0 {
            Span::styled(
                format!("{}", critical),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" crit │ "),
        Span::styled(format!("{}", total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" units │ "),
        Span::styled(
            format!("{}", active_alarms),
            if active_alarms > 0 {
                app.theme.status_style(StatusLevel::Warning)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            },
        ),
        Span::raw(" alarms "),
        Span::styled(
            alarm_trend(&app.history.active_counts),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ];

    if app.warning_count > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} integrity", app.warning_count),
            Style::default().fg(app.theme.warning).add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Recent active-alarm counts as a small sparkline.
fn alarm_trend(counts: &std::collections::VecDeque<usize>) -> String {
    const CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let recent: Vec<usize> = counts.iter().rev().take(8).rev().copied().collect();
    let max = recent.iter().copied().max().unwrap_or(0).max(1);
    recent.iter().map(|&c| CHARS[(c * 7 / max).min(7)]).collect()
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Units "), Line::from(" 2:Alarms ")];

    let selected = match app.current_view {
        View::Units => 0,
        View::Alarms => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref fleet) = app.fleet {
        let elapsed = fleet.last_updated.elapsed();

        // Context-sensitive controls
        let controls = match app.current_view {
            View::Units => {
                if app.filter_active {
                    "Type to search | Enter:apply Esc:cancel"
                } else {
                    "/:search s:sort Tab:switch Enter:detail e:export ?:help q:quit"
                }
            }
            View::Alarms => "s:severity t:range m:unit c:reset e:export ?:help q:quit",
        };

        format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            elapsed.as_secs_f64(),
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Unit detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Units",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Alarms",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  s         Cycle severity filter"),
        Line::from("  t         Cycle time range"),
        Line::from("  m         Cycle unit filter"),
        Line::from("  c         Reset criteria"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export alarms to CSV"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 32u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
