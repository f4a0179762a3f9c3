use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{plan, progress, today};
use super::{App, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab_titles = vec!["Today", "Progress", "Plan"];
    let selected = match app.view {
        View::Today => 0,
        View::Progress => 1,
        View::Plan => 2,
    };

    let title = format!(" Streakwell ({}) ", app.user);
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Today => today::draw(f, app, area),
        View::Progress => progress::draw(f, app, area),
        View::Plan => plan::draw(f, app, area),
    }
}

fn key(k: &str) -> Span<'_> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![key("h/l"), Span::raw(" Views  ")];

    match app.view {
        View::Today => {
            spans.extend(vec![
                key("j/k"),
                Span::raw(" Nav  "),
                key("<Space>"),
                Span::raw(" Tick  "),
                key("[/]"),
                Span::raw(" Day  "),
                key("t"),
                Span::raw(" Today  "),
                key("L"),
                Span::raw(" Level  "),
            ]);
        }
        View::Progress => {
            spans.extend(vec![
                key("</>"),
                Span::raw(" Month  "),
                key("^r"),
                Span::raw(" Refresh  "),
            ]);
        }
        View::Plan => {
            spans.extend(vec![
                key("j/k"),
                Span::raw(" Day  "),
                key("L"),
                Span::raw(" Level  "),
            ]);
        }
    }

    spans.extend(vec![key("q"), Span::raw(" Quit")]);

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
