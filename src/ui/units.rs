//! Units view rendering.
//!
//! Displays a table of all units with aggregate status, active alarm
//! counts, and severity trend sparklines.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{AlarmLedger, UnitHealth};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Column to sort by in the Units view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by unit id.
    #[default]
    Id,
    /// Sort by display name.
    Name,
    /// Sort by active alarm count.
    Alarms,
    /// Sort by aggregate severity.
    Status,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Id => SortColumn::Name,
            SortColumn::Name => SortColumn::Alarms,
            SortColumn::Alarms => SortColumn::Status,
            SortColumn::Status => SortColumn::Id,
        }
    }
}

/// Sort (raw index, unit) pairs by the given column.
pub fn sort_units_by(
    units: &mut [(usize, &UnitHealth)],
    ledger: &AlarmLedger,
    column: SortColumn,
    ascending: bool,
) {
    units.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Id => a.1.id.to_lowercase().cmp(&b.1.id.to_lowercase()),
            SortColumn::Name => a.1.name.to_lowercase().cmp(&b.1.name.to_lowercase()),
            SortColumn::Alarms => {
                ledger.active_count_for(&a.1.id).cmp(&ledger.active_count_for(&b.1.id))
            }
            SortColumn::Status => a.1.status.cmp(&b.1.status),
        };
        let primary = if ascending { primary } else { primary.reverse() };
        // Secondary sort by id for stability
        primary.then_with(|| a.1.id.cmp(&b.1.id))
    });
}

/// Render the Units view showing all units in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref fleet) = app.fleet else {
        return;
    };

    // Get filtered and sorted units
    let mut units: Vec<(usize, &UnitHealth)> =
        fleet.units.iter().enumerate().filter(|(_, u)| app.matches_filter(u)).collect();
    sort_units_by(&mut units, &app.ledger, app.sort_column, app.sort_ascending);

    let header = Row::new(vec![
        Cell::from(format_header("Unit", SortColumn::Id, app)),
        Cell::from(format_header("Name", SortColumn::Name, app)),
        Cell::from(format_header("Alarms", SortColumn::Alarms, app)),
        Cell::from("Trend"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = units
        .iter()
        .map(|(_, unit)| {
            let status_style = app.theme.status_style(unit.status);
            let alarm_count = app.ledger.active_count_for(&unit.id);
            let alarm_style = if alarm_count > 0 {
                app.theme.status_style(unit.status)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };

            let sparkline = render_sparkline(&app.history.status_trend(&unit.id));

            Row::new(vec![
                Cell::from(unit.id.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(unit.name.clone()),
                Cell::from(if alarm_count > 0 {
                    alarm_count.to_string()
                } else {
                    "-".to_string()
                })
                .style(alarm_style),
                Cell::from(sparkline),
                Cell::from(unit.status.symbol()).style(status_style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),  // Unit id
        Constraint::Fill(3),  // Name - gets the largest share
        Constraint::Length(8), // Alarms
        Constraint::Min(8),   // Trend - fixed for sparkline chars
        Constraint::Min(6),   // Status
    ];

    let selected_visual_index = app.selected_unit_index.min(units.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        SortColumn::Id => "unit",
        SortColumn::Name => "name",
        SortColumn::Alarms => "alarms",
        SortColumn::Status => "status",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !units.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, units.len())
    } else {
        String::new()
    };

    let title = format!(
        " Units [s:sort {}{}]{}{} ",
        sort_indicator, sort_dir, filter_info, position_info
    );

    let border_color = match fleet.worst_status() {
        crate::data::StatusLevel::Critical => app.theme.critical,
        crate::data::StatusLevel::Warning => app.theme.warning,
        _ => app.theme.border,
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
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Render sparkline levels (0-7) as block characters.
fn render_sparkline(levels: &[u8]) -> String {
    levels
        .iter()
        .rev()
        .take(8)
        .rev()
        .map(|&l| SPARKLINE_CHARS[(l as usize).min(7)])
        .collect()
}
