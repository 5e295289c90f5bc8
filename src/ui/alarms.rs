//! Alarm view rendering.
//!
//! Shows the filter criteria bar plus two tables: active alarms (most
//! severe first) and cleared alarms (most recently resolved first).

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::duration::elapsed_since;
use crate::data::export::format_timestamp;
use crate::data::{AlarmRecord, StatusLevel};

/// Render the Alarms view: criteria bar, active table, cleared table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let set = app.alarms();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Criteria bar
        Constraint::Percentage(55),
        Constraint::Min(5),
    ])
    .split(area);

    render_criteria_bar(frame, app, chunks[0]);

    if set.is_empty() {
        render_no_alarms(frame, app, chunks[1].union(chunks[2]));
        return;
    }

    render_active_table(frame, app, &set.active, chunks[1]);
    render_cleared_table(frame, app, &set.cleared, chunks[2]);
}

/// Render the filter criteria bar.
fn render_criteria_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let value = |active: bool| {
        if active {
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let criteria = &app.criteria;
    let line = Line::from(vec![
        Span::styled(" Severity: ", dim),
        Span::styled(
            criteria.severity.label(),
            value(criteria.severity != crate::data::SeverityFilter::All),
        ),
        Span::styled(" │ Range: ", dim),
        Span::styled(
            criteria.time_range.label(),
            value(criteria.time_range != crate::data::TimeRange::All),
        ),
        Span::styled(" │ Unit: ", dim),
        Span::styled(
            criteria.unit.label().to_string(),
            value(criteria.unit != crate::data::UnitFilter::All),
        ),
        Span::styled("   s/t/m:cycle c:reset", dim),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_active_table(frame: &mut Frame, app: &App, active: &[AlarmRecord], area: Rect) {
    let now = Utc::now();

    let critical_count = active.iter().filter(|r| r.severity == StatusLevel::Critical).count();
    let warning_count = active.iter().filter(|r| r.severity == StatusLevel::Warning).count();

    let header = Row::new(vec![
        Cell::from("Severity"),
        Cell::from("Unit"),
        Cell::from("Indicator"),
        Cell::from("Triggered"),
        Cell::from("Elapsed"),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = active
        .iter()
        .map(|record| {
            let severity_style = app.theme.status_style(record.severity);
            Row::new(vec![
                Cell::from(record.severity.symbol()).style(severity_style),
                Cell::from(record.unit.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(record.indicator.label()),
                Cell::from(format_timestamp(record.activated_at)),
                Cell::from(elapsed_since(record.activated_at, now)).style(severity_style),
                Cell::from(record.message()).style(Style::default().add_modifier(Modifier::DIM)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),  // Severity
        Constraint::Fill(2),    // Unit
        Constraint::Fill(2),    // Indicator
        Constraint::Length(19), // Triggered
        Constraint::Length(8),  // Elapsed
        Constraint::Fill(3),    // Message
    ];

    let title = format!(
        " Active ({} crit, {} warn, {} total) ",
        critical_count,
        warning_count,
        active.len()
    );

    let border_color = if critical_count > 0 {
        app.theme.critical
    } else if warning_count > 0 {
        app.theme.warning
    } else {
        app.theme.border
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(border_color)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !active.is_empty() {
        state.select(Some(app.selected_alarm_index.min(active.len() - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_cleared_table(frame: &mut Frame, app: &App, cleared: &[AlarmRecord], area: Rect) {
    let header = Row::new(vec![
        Cell::from("Severity"),
        Cell::from("Unit"),
        Cell::from("Indicator"),
        Cell::from("Cleared"),
        Cell::from("Duration"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = cleared
        .iter()
        .map(|record| {
            let severity_style =
                app.theme.status_style(record.severity).add_modifier(Modifier::DIM);
            let cleared_info = record
                .cleared_at
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                Cell::from(record.severity.symbol()).style(severity_style),
                Cell::from(record.unit.clone()),
                Cell::from(record.indicator.label()),
                Cell::from(cleared_info),
                Cell::from(record.duration.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),  // Severity
        Constraint::Fill(2),    // Unit
        Constraint::Fill(2),    // Indicator
        Constraint::Length(19), // Cleared
        Constraint::Length(10), // Duration
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Cleared ({}) ", cleared.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

/// Render the "no alarms" notice when the filtered view is empty.
fn render_no_alarms(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Alarms ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.healthy));

    let message = if app.criteria.is_unfiltered() {
        "No alarms recorded."
    } else {
        "No alarms match the current filter."
    };

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(vec![
            Span::styled("    ✓ ", Style::default().fg(app.theme.healthy)),
            Span::styled(
                message,
                Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "      Adjust the criteria with s/t/m, or c to reset.",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
