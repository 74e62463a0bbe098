use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::history::HistoryStats;
use crate::session::SessionRecord;
use crate::ui::band_color;
use crate::util::score_band;

/// `dd/mm/yyyy HH:MM` in local time.
pub fn format_date(record: &SessionRecord) -> String {
    record
        .timestamp
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

/// Pure presenter for a single history row
pub fn present_row(record: &SessionRecord) -> Row<'static> {
    let percent = record.score_percent();
    let color = band_color(score_band(percent));

    Row::new(vec![
        Cell::from(format_date(record)),
        Cell::from(format!(
            "{} → {}",
            record.source_language, record.target_language
        )),
        Cell::from(format!("{}/{}", record.correct_count, record.total_questions))
            .style(Style::default().fg(color)),
        Cell::from(format!("{percent}%")).style(Style::default().fg(color)),
    ])
}

fn stats_line(stats: &HistoryStats) -> Line<'static> {
    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Sessions ", label),
        Span::styled(stats.total_sessions.to_string(), value),
        Span::raw("   "),
        Span::styled("Moyenne ", label),
        Span::styled(format!("{}%", stats.average_score_percent), value),
        Span::raw("   "),
        Span::styled("Meilleur ", label),
        Span::styled(format!("{}%", stats.best_score_percent), value),
    ])
}

pub fn render_history(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Aggregate stats
            Constraint::Min(0),    // Sessions table
            Constraint::Length(2), // Instructions
        ])
        .split(f.area());

    let title = Paragraph::new("Historique")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let stats = Paragraph::new(stats_line(&app.stats)).alignment(Alignment::Center);
    f.render_widget(stats, chunks[1]);

    if app.history.is_empty() {
        let empty = Paragraph::new("Aucun quiz terminé pour l'instant")
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[2]);
    } else {
        let header = Row::new(vec!["Date", "Langues", "Score", "%"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        // borders and header take three rows
        let visible = chunks[2].height.saturating_sub(3) as usize;
        let offset = app
            .history_scroll
            .min(app.history.len().saturating_sub(visible.max(1)));
        let rows: Vec<Row> = app
            .history
            .iter()
            .skip(offset)
            .take(visible)
            .map(present_row)
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(5),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Sessions ({}/{})",
            (offset + 1).min(app.history.len()),
            app.history.len()
        )));
        f.render_widget(table, chunks[2]);
    }

    let mut help = vec![Line::from("↑↓ défiler • c effacer • Esc retour • q quitter")];
    if let Some(status) = &app.status {
        help.push(Line::styled(status.clone(), Style::default().fg(Color::Red)));
    }
    let instructions = Paragraph::new(help)
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[3]);
}
