use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(0)])
        .split(area);

    draw_days(f, app, chunks[0]);
    draw_day_detail(f, app, chunks[1]);
}

fn draw_days(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .days
        .items
        .iter()
        .map(|day| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", day.name), Style::default().fg(Color::White)),
                Span::styled(day.focus, Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Week ({}) ", app.record.level.label()))
        .title_style(Style::default().fg(Color::Cyan));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.days.selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_day_detail(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Routine ")
        .title_style(Style::default().fg(Color::Yellow));

    let Some(day) = app.selected_day() else {
        f.render_widget(Paragraph::new("No day selected").block(block), area);
        return;
    };

    let level = app.record.level;
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}: {}", day.name, day.focus),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(day.description, Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{} ({})", level.label(), level.estimated_time()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for step in day.routine(level) {
        let tags: Vec<&str> = step.exercise.categories().iter().map(|c| c.label()).collect();
        lines.push(Line::from(Span::raw(step.text)));
        lines.push(Line::from(Span::styled(
            format!("    {} [{}]", step.exercise.name(), tags.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
