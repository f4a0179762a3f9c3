mod ui;
mod widgets;

use std::io;
use std::time::Duration;

use chrono::{Datelike, Days, Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use crate::catalog::{get_weekly_plan, weekday_index};
use crate::db::{Database, ProgressStore};
use crate::error::Result;
use crate::ledger::{self, month_options};
use crate::models::{CompletionRecord, Step, WeekdayPlan};
use crate::session::{DailySelection, SessionState};

/// Months offered by the calendar pager, newest first.
const MONTH_OPTIONS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Today,
    Progress,
    Plan,
}

impl View {
    fn next(&self) -> Self {
        match self {
            View::Today => View::Progress,
            View::Progress => View::Plan,
            View::Plan => View::Today,
        }
    }

    fn prev(&self) -> Self {
        match self {
            View::Today => View::Plan,
            View::Progress => View::Today,
            View::Plan => View::Progress,
        }
    }
}

pub struct StatefulList<T> {
    pub items: Vec<T>,
    pub selected: Option<usize>,
}

impl<T> StatefulList<T> {
    fn with_items(items: Vec<T>) -> Self {
        let selected = if items.is_empty() { None } else { Some(0) };
        Self { items, selected }
    }

    fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    fn selected_item(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }
}

pub struct App {
    db: Database,
    pub user: String,
    pub view: View,
    pub today: NaiveDate,
    pub record: CompletionRecord,
    pub selection: DailySelection,
    pub steps: StatefulList<Step>,
    pub days: StatefulList<&'static WeekdayPlan>,
    pub months: Vec<(i32, u32)>,
    pub month_idx: usize,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(db: Database, user: String, today: NaiveDate) -> Result<Self> {
        let record = db.load(&user)?;
        let selection = DailySelection::open_for(record.level, today, &record);
        let steps = StatefulList::with_items(selection.steps().to_vec());
        let mut days = StatefulList::with_items(get_weekly_plan().iter().collect());
        days.selected = Some(weekday_index(today));

        Ok(Self {
            db,
            user,
            view: View::Today,
            today,
            record,
            selection,
            steps,
            days,
            months: month_options(today, MONTH_OPTIONS),
            month_idx: 0,
            status: None,
            should_quit: false,
        })
    }

    /// Calendar month currently shown, as (year, zero-based month).
    pub fn calendar_month(&self) -> (i32, u32) {
        self.months
            .get(self.month_idx)
            .copied()
            .unwrap_or((self.today.year(), self.today.month0()))
    }

    pub fn selected_day(&self) -> Option<&'static WeekdayPlan> {
        self.days.selected_item().copied()
    }

    /// Reopens the checklist for `date` at the stored level. Unsaved ticks
    /// are dropped.
    fn open_day(&mut self, date: NaiveDate) {
        self.selection = DailySelection::open_for(self.record.level, date, &self.record);
        self.steps = StatefulList::with_items(self.selection.steps().to_vec());
    }

    pub fn refresh_data(&mut self) -> Result<()> {
        self.record = self.db.load(&self.user)?;
        self.open_day(self.selection.date);
        self.status = Some("Reloaded".to_string());
        Ok(())
    }

    fn toggle_selected(&mut self) -> Result<()> {
        let Some(index) = self.steps.selected else {
            return Ok(());
        };
        self.selection.toggle_step(index)?;

        if self.selection.is_fully_complete() && self.selection.state == SessionState::Opened {
            let selection = &mut self.selection;
            self.record = self
                .db
                .update(&self.user, |current| selection.commit_if_complete(current))?;
            info!(date = %self.selection.date, streak = self.record.streak, "routine completed");
            self.status = Some(format!(
                "Routine complete! Streak: {} days",
                self.record.streak
            ));
        }
        Ok(())
    }

    fn shift_day(&mut self, forward: bool) {
        let date = self.selection.date;
        let target = if forward {
            date.checked_add_days(Days::new(1))
        } else {
            date.checked_sub_days(Days::new(1))
        };
        match target {
            Some(d) if d <= self.today => {
                debug!(date = %d, "switching day");
                self.open_day(d);
                self.status = None;
            }
            _ => {}
        }
    }

    fn cycle_level(&mut self) -> Result<()> {
        let level = self.record.level.next();
        self.record = self.db.set_level(&self.user, level)?;
        self.open_day(self.selection.date);
        self.status = Some(format!(
            "Level: {} ({}), goal {} workouts",
            level.label(),
            level.estimated_time(),
            level.goal()
        ));
        Ok(())
    }

    fn shift_month(&mut self, older: bool) {
        if older {
            if self.month_idx + 1 < self.months.len() {
                self.month_idx += 1;
            }
        } else {
            self.month_idx = self.month_idx.saturating_sub(1);
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.refresh_data()?;
            }

            KeyCode::Char('h') | KeyCode::Left => self.view = self.view.prev(),
            KeyCode::Char('l') | KeyCode::Right => self.view = self.view.next(),
            KeyCode::Tab => {
                if modifiers.contains(KeyModifiers::SHIFT) {
                    self.view = self.view.prev();
                } else {
                    self.view = self.view.next();
                }
            }
            KeyCode::BackTab => self.view = self.view.prev(),

            KeyCode::Char('L') => self.cycle_level()?,

            KeyCode::Char('j') | KeyCode::Down => match self.view {
                View::Today => self.steps.next(),
                View::Plan => self.days.next(),
                View::Progress => {}
            },
            KeyCode::Char('k') | KeyCode::Up => match self.view {
                View::Today => self.steps.previous(),
                View::Plan => self.days.previous(),
                View::Progress => {}
            },

            KeyCode::Char(' ') | KeyCode::Enter if self.view == View::Today => {
                self.toggle_selected()?;
            }
            KeyCode::Char('[') if self.view == View::Today => self.shift_day(false),
            KeyCode::Char(']') if self.view == View::Today => self.shift_day(true),
            KeyCode::Char('t') if self.view == View::Today => {
                self.open_day(self.today);
                self.status = None;
            }

            KeyCode::Char('<') | KeyCode::Char(',') if self.view == View::Progress => {
                self.shift_month(true)
            }
            KeyCode::Char('>') | KeyCode::Char('.') if self.view == View::Progress => {
                self.shift_month(false)
            }

            _ => {}
        }
        Ok(())
    }

    pub fn summary(&self) -> ledger::Summary {
        ledger::summarize(&self.record, self.today)
    }
}

pub fn run(db: Database, user: String) -> Result<()> {
    let mut app = App::new(db, user, Local::now().date_naive())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
