pub mod history_view;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, HomeField};
use crate::quiz::QuizPhase;
use crate::render::SurfaceView;
use crate::session::{Language, QUESTION_COUNT_CHOICES};
use crate::util::{grade_message, round_percent, score_band, star_count, ScoreBand};

const HORIZONTAL_MARGIN: u16 = 2;
const ACCENT: Color = Color::Rgb(0x19, 0x76, 0xd2);
const PARTICLE_COLORS: [Color; 6] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Draw the screen for the app's current state.
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.state).render(app, f);
}

pub fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Good => Color::Green,
        ScoreBand::Fair => Color::Yellow,
        ScoreBand::Poor => Color::Red,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn help_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center)
}

fn choice_spans<T: PartialEq + Copy>(
    options: &[(T, String)],
    selected: T,
    focused: bool,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (value, label) in options {
        let style = if *value == selected {
            let base = Style::default().fg(Color::White).bg(ACCENT);
            if focused {
                base.add_modifier(Modifier::BOLD)
            } else {
                base
            }
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn render_home(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(9),
            Constraint::Length(2),
        ])
        .split(f.area());

    let title = Paragraph::new(vec![
        Line::styled(
            "AR Quiz Langues",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "Apprenez le vocabulaire en réalité augmentée",
            Style::default().add_modifier(Modifier::ITALIC),
        ),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    let home = &app.home;
    let languages = [Language::En, Language::Fr].map(|l| (l, l.native_name().to_string()));
    let counts = QUESTION_COUNT_CHOICES.map(|c| (c, c.to_string()));

    let row = |field: HomeField, label: &str, choices: Vec<Span<'static>>| {
        let marker = if home.focus == field { "▶ " } else { "  " };
        let mut spans = vec![
            Span::styled(marker.to_string(), Style::default().fg(ACCENT)),
            Span::styled(format!("{label:<22}"), Style::default().add_modifier(Modifier::BOLD)),
        ];
        spans.extend(choices);
        Line::from(spans)
    };

    let lines = vec![
        Line::default(),
        row(
            HomeField::Source,
            "Langue source",
            choice_spans(
                &languages,
                home.config.source_language,
                home.focus == HomeField::Source,
            ),
        ),
        Line::default(),
        row(
            HomeField::Target,
            "Langue cible",
            choice_spans(
                &languages,
                home.config.target_language,
                home.focus == HomeField::Target,
            ),
        ),
        Line::default(),
        row(
            HomeField::Count,
            "Nombre de questions",
            choice_spans(
                &counts,
                home.config.question_count,
                home.focus == HomeField::Count,
            ),
        ),
        Line::default(),
        Line::styled(
            "Entrée pour commencer le quiz",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ];
    f.render_widget(Paragraph::new(lines), chunks[1]);

    let mut help = vec![Line::from(
        "↑↓ champ • ←→ modifier • Entrée commencer • h historique • q quitter",
    )];
    if let Some(status) = &app.status {
        help.push(Line::styled(status.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center),
        chunks[2],
    );
}

/// Draws the object view: icon, caption and celebration particles.
struct SurfaceWidget<'a> {
    view: SurfaceView<'a>,
}

impl Widget for SurfaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.view;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", view.kind))
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if !view.ready {
            Paragraph::new("Initialisation AR...")
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .render(centered_rect(inner.width, 1, inner), buf);
            return;
        }

        let (r, g, b) = view.color;
        let mid = inner.y + inner.height / 2;
        let icon_y = (mid as i32 - 1 - view.bob as i32)
            .clamp(inner.y as i32, (inner.y + inner.height - 1) as i32) as u16;
        let icon_x = inner.x + inner.width.saturating_sub(view.icon.width() as u16) / 2;
        buf.set_string(icon_x, icon_y, view.icon, Style::default());

        let caption = format!("Objet: {}", view.caption);
        let caption_y = (mid + 1).min(inner.y + inner.height - 1);
        let caption_x = inner.x + inner.width.saturating_sub(caption.width() as u16) / 2;
        buf.set_string(
            caption_x,
            caption_y,
            caption,
            Style::default()
                .fg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::BOLD),
        );

        for p in view.particles {
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let (x, y) = (inner.x + p.x as u16, inner.y + p.y as u16);
            // wide glyphs need two cells
            if x + 1 < inner.x + inner.width && y < inner.y + inner.height {
                let color = PARTICLE_COLORS[p.color_index % PARTICLE_COLORS.len()];
                buf.set_string(
                    x,
                    y,
                    p.symbol.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                );
            }
        }
    }
}

pub fn render_quiz(app: &App, f: &mut Frame) {
    let engine = &app.engine;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // counter and score
            Constraint::Length(1), // progress
            Constraint::Min(6),    // object view
            Constraint::Length(2), // prompt
            Constraint::Length(3), // input
            Constraint::Length(1), // help
        ])
        .split(f.area());

    let (shown, total) = engine.progress();
    let header = Line::from(vec![
        Span::styled(
            format!("Question {shown}/{total}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled(
            format!("Score: {}", engine.score()),
            Style::default().fg(Color::Green),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let ratio = if total > 0 {
        shown as f64 / total as f64
    } else {
        0.0
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(ACCENT))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(""),
        chunks[1],
    );

    f.render_widget(
        SurfaceWidget {
            view: app.surface.view(),
        },
        chunks[2],
    );

    let prompt = engine.prompt().unwrap_or_default();
    f.render_widget(
        Paragraph::new(prompt)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[3],
    );

    let input_block = Block::default().borders(Borders::ALL).title(" Réponse ");
    let input_inner = input_block.inner(chunks[4]);
    let input = if app.input.is_empty() {
        Paragraph::new(Span::styled(
            "Tapez votre réponse...",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
    } else {
        Paragraph::new(app.input.as_str())
    };
    f.render_widget(input.block(input_block), chunks[4]);
    if engine.phase() == QuizPhase::InProgress {
        let cursor_x = input_inner.x + (app.input.width() as u16).min(input_inner.width);
        f.set_cursor_position((cursor_x, input_inner.y));
    }

    f.render_widget(
        help_line("Entrée valider • Esc quitter le quiz"),
        chunks[5],
    );

    if let Some(feedback) = engine.pending_feedback() {
        let area = centered_rect(36, 5, f.area());
        let (headline, color) = if feedback.is_correct {
            ("✓ Correct !", Color::Green)
        } else {
            ("✗ Incorrect", Color::Red)
        };
        let mut lines = vec![Line::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if !feedback.is_correct {
            lines.push(Line::from(format!(
                "Bonne réponse : {}",
                feedback.expected_answer
            )));
        }
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            area,
        );
    }
}

pub fn render_results(app: &App, f: &mut Frame) {
    let (correct, total) = app
        .engine
        .record()
        .map_or((0, 0), |r| (r.correct_count, r.total_questions));
    let percent = round_percent(correct, total);
    let color = band_color(score_band(percent));
    let stars = star_count(percent);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new("🏆 Quiz Terminé !")
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::default(),
        Line::styled(format!("{correct}/{total}"), bold.fg(color)),
        Line::styled(format!("{percent}%"), Style::default().add_modifier(Modifier::DIM)),
        Line::default(),
        Line::styled(grade_message(percent), bold.fg(color)),
        Line::from(vec![
            Span::styled("★".repeat(stars), Style::default().fg(Color::Yellow)),
            Span::styled("☆".repeat(5usize.saturating_sub(stars)), Style::default().add_modifier(Modifier::DIM)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::raw("Bonnes réponses "),
            Span::styled(correct.to_string(), Style::default().fg(Color::Green)),
            Span::raw("   Mauvaises réponses "),
            Span::styled((total - correct).to_string(), Style::default().fg(Color::Red)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );

    let mut help = vec![Line::from(
        "r rejouer • h historique • n accueil • q quitter",
    )];
    if let Some(status) = &app.status {
        help.push(Line::styled(status.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center),
        chunks[2],
    );
}
