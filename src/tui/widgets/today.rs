use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::ledger::format_date;
use crate::session::SessionState;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Routine header
            Constraint::Min(0),    // Checklist
            Constraint::Length(3), // Step gauge
        ])
        .split(area);

    draw_header(f, app, chunks[0]);
    draw_checklist(f, app, chunks[1]);
    draw_gauge(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let sel = &app.selection;
    let routine = &sel.routine;
    let date_label = if sel.date == app.today {
        format!("{} (today)", format_date(sel.date))
    } else {
        format_date(sel.date)
    };

    let (state_color, state_text) = match sel.state {
        SessionState::Committed => (Color::Green, sel.state.label()),
        SessionState::Opened => (Color::Yellow, sel.state.label()),
    };

    let text = vec![
        Line::from(vec![
            Span::styled(
                format!("{}: {}", routine.day_name, routine.focus),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(state_text, Style::default().fg(state_color)),
        ]),
        Line::from(Span::styled(
            routine.description,
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("Date: ", Style::default().fg(Color::Gray)),
            Span::styled(date_label, Style::default().fg(Color::White)),
            Span::styled("   Level: ", Style::default().fg(Color::Gray)),
            Span::styled(sel.level.label(), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(" ({})", sel.level.estimated_time()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(match &app.status {
            Some(msg) => Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
            None => Span::raw(""),
        }),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Routine ")
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_checklist(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .steps
        .items
        .iter()
        .zip(app.selection.done.iter())
        .map(|(step, done)| {
            let (mark, style) = if *done {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(step.text, style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Checklist ")
        .title_style(Style::default().fg(Color::Yellow));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.steps.selected);
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_gauge(f: &mut Frame, app: &App, area: Rect) {
    let done = app.selection.completed_count();
    let total = app.selection.steps().len();
    let ratio = if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("{}/{} steps", done, total));

    f.render_widget(gauge, area);
}
