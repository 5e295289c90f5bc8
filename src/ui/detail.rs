//! Detail overlay rendering.
//!
//! Displays a modal overlay with all 12 indicator readings for the
//! selected unit.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 20;

/// Render the unit detail as a modal overlay.
///
/// Shows the unit's aggregate severity, active alarm count, and every
/// indicator reading with severity coloring.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref fleet) = app.fleet else {
        return;
    };

    // Get the actual unit from the visual index
    let Some(raw_index) = app.get_selected_unit_raw_index() else {
        return;
    };
    let Some(unit) = fleet.units.get(raw_index) else {
        return;
    };

    let overlay_width = (area.width * 2 / 3).clamp(MIN_OVERLAY_WIDTH, 72);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(5), // Header with unit info
        Constraint::Min(14),   // Indicator table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(unit.status);
    let alarm_count = app.ledger.active_count_for(&unit.id);

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} · {} ", unit.id, unit.name),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} {}", unit.status.symbol(), unit.status.label()),
                status_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Active Alarms: "),
            Span::styled(
                alarm_count.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let header_block = Block::default()
        .title(" Unit Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== INDICATOR TABLE =====
    let table_header = Row::new(vec![Cell::from("Indicator"), Cell::from("Reading")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = unit
        .readings
        .iter()
        .map(|(indicator, level)| {
            let level_style = app.theme.status_style(level);
            Row::new(vec![
                Cell::from(indicator.label()),
                Cell::from(format!("{} {}", level.symbol(), level.label())).style(level_style),
            ])
        })
        .collect();

    let widths = [Constraint::Fill(1), Constraint::Length(16)];

    let table = Table::new(rows, widths).header(table_header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(" Esc to close ")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}
