use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::ledger::{self, format_date};
use crate::models::WeekdayPattern;
use crate::tui::App;

/// Heat colors for weekday intensity 0..=4.
const HEAT: [Color; 5] = [
    Color::DarkGray,
    Color::Indexed(22),
    Color::Indexed(28),
    Color::Indexed(34),
    Color::Indexed(40),
];

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Stats + calendar row
            Constraint::Min(6),     // 30-day chart
            Constraint::Length(4),  // Weekday pattern
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[0]);

    draw_stats(f, app, top_chunks[0]);
    draw_calendar(f, app, top_chunks[1]);
    draw_history(f, app, chunks[1]);
    draw_pattern(f, app, chunks[2]);
}

fn stat_line<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let s = app.summary();
    let consistency = match s.consistency {
        Some(p) => format!("{}%", p),
        None => "n/a".to_string(),
    };

    let text = vec![
        stat_line("Streak: ", format!("{} days", s.streak), Color::Yellow),
        stat_line("Best streak: ", format!("{} days", s.best_streak), Color::White),
        stat_line("Workouts: ", s.total_completed.to_string(), Color::White),
        stat_line(
            "Level goal: ",
            format!(
                "{}/{} ({}%)",
                s.total_completed.min(s.goal),
                s.goal,
                s.goal_progress
            ),
            Color::Cyan,
        ),
        stat_line("This month: ", format!("{} days", s.this_month), Color::White),
        stat_line("Consistency: ", consistency, Color::Green),
        Line::from(Span::styled(
            format!("{} ({})", s.level.label(), s.level.estimated_time()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stats ")
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_calendar(f: &mut Frame, app: &App, area: Rect) {
    let (year, month0) = app.calendar_month();
    let title = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|d| format!(" {} ", d.format("%B %Y")))
        .unwrap_or_else(|| " Calendar ".to_string());

    let mut lines = vec![Line::from(Span::styled(
        WeekdayPattern::LABELS.join(" "),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))];

    // Month comes from the bounded pager, so this only fails on corrupt state.
    let cells = ledger::calendar_month(&app.record.completed_dates, year, month0).unwrap_or_default();
    for week in cells.chunks(7) {
        let spans: Vec<Span> = week
            .iter()
            .map(|cell| match (cell.day, cell.date) {
                (Some(day), Some(date)) => {
                    let mut style = if cell.completed {
                        Style::default().fg(Color::Black).bg(Color::Green)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    if date == app.today {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    Span::styled(format!("{:>3} ", day), style)
                }
                _ => Span::raw("    "),
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Magenta));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let series = ledger::last_30_days_series(&app.record.completed_dates, app.today);
    let bars: Vec<Bar> = series
        .iter()
        .map(|p| {
            let color = if p.completed == 1 {
                Color::Green
            } else {
                Color::DarkGray
            };
            Bar::default()
                .value(u64::from(p.completed))
                .text_value(String::new())
                .style(Style::default().fg(color))
        })
        .collect();

    let title = match series.first() {
        Some(first) => format!(
            " Last 30 days: {} .. {} ",
            format_date(first.date),
            format_date(app.today)
        ),
        None => " Last 30 days ".to_string(),
    };

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(Style::default().fg(Color::Yellow)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .max(1);

    f.render_widget(chart, area);
}

fn draw_pattern(f: &mut Frame, app: &App, area: Rect) {
    let pattern = ledger::weekday_intensity(&app.record.completed_dates);

    let labels: Vec<Span> = WeekdayPattern::LABELS
        .iter()
        .map(|l| Span::styled(format!("{} ", l), Style::default().fg(Color::Gray)))
        .collect();
    let cells: Vec<Span> = pattern
        .intensities()
        .iter()
        .map(|i| Span::styled(" ██ ", Style::default().fg(HEAT[*i as usize])))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Weekday Pattern ")
        .title_style(Style::default().fg(Color::Green));

    f.render_widget(
        Paragraph::new(vec![Line::from(labels), Line::from(cells)]).block(block),
        area,
    );
}
