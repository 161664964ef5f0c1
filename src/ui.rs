use anyhow::Result;
use carbon_garden::{
    report::{self, CHART_TITLE, CHART_UNIT, EMPTY_GARDEN},
    CatalogError, CatalogSource, Registration, Session, SessionError,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

/// What the keyboard currently drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,

    /// Statistics popup
    Stats,

    /// First prompt of the "new tree" flow
    EnterName { input: String },

    /// Second prompt, name already collected
    EnterRate { name: String, input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Status {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Status {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

pub struct App<'a> {
    pub session: &'a mut Session,
    pub list_state: ListState,
    pub mode: Mode,
    pub status: Option<Status>,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        let mut list_state = ListState::default();
        if !session.catalog().is_empty() {
            list_state.select(Some(0));
        }

        // The alternate screen hides stderr, so a fallback is reported here
        let status = match session.source() {
            CatalogSource::Fallback { reason } => Some(Status::error(format!(
                "Catalog unreadable, using built-in trees (saving disabled): {}",
                reason
            ))),
            _ => None,
        };

        Self {
            session,
            list_state,
            mode: Mode::Browse,
            status,
            should_quit: false,
        }
    }

    /// Catalog name under the cursor
    pub fn selected_name(&self) -> Option<String> {
        let names = self.session.catalog().names();
        self.list_state
            .selected()
            .and_then(|i| names.get(i).map(|name| name.to_string()))
    }

    pub fn next(&mut self) {
        let len = self.session.catalog().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.session.catalog().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_name(&mut self, name: &str) {
        let index = self.session.catalog().names().iter().position(|n| *n == name);
        self.list_state.select(index);
    }

    pub fn add_selected(&mut self) {
        let Some(name) = self.selected_name() else {
            return;
        };

        match self.session.add(&name) {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(Status::error(e.to_string())),
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(name) = self.selected_name() else {
            return;
        };

        if self.session.remove(&name).applied() {
            self.status = None;
        } else {
            self.status = Some(Status::info(format!("No {} in the garden", name)));
        }
    }

    pub fn clear_garden(&mut self) {
        self.session.clear_garden();
        self.status = Some(Status::info("Garden cleared"));
    }

    pub fn save(&mut self) {
        self.status = Some(match self.session.save() {
            Ok(()) => Status::info(format!(
                "Catalog saved to {}",
                self.session.catalog_path().display()
            )),
            Err(e) => Status::error(e.to_string()),
        });
    }

    fn finish_registration(&mut self, name: String, rate_input: String) {
        self.mode = Mode::Browse;

        self.status = Some(
            match self
                .session
                .register_from_input(Some(name.as_str()), Some(rate_input.as_str()))
            {
                Ok(registration) => {
                    let name = name.trim().to_string();
                    self.select_name(&name);
                    match registration {
                        Registration::Added => Status::info(format!("{} was added successfully!", name)),
                        Registration::Replaced { previous_rate } => Status::info(format!(
                            "{} rate updated (was {:.1} {})",
                            name, previous_rate, CHART_UNIT
                        )),
                    }
                }
                Err(SessionError::Catalog(CatalogError::InvalidRate(input))) => {
                    Status::error(format!("{:?} is not a valid rate, {} not added", input, name.trim()))
                }
                Err(e) => Status::error(e.to_string()),
            },
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);

        self.mode = match mode {
            Mode::Browse => {
                self.handle_browse_key(key);
                // handle_browse_key may have switched mode itself
                return;
            }
            Mode::Stats => Mode::Browse,
            Mode::EnterName { mut input } => match key.code {
                KeyCode::Esc => Mode::Browse,
                KeyCode::Enter if input.trim().is_empty() => Mode::Browse,
                KeyCode::Enter => Mode::EnterRate {
                    name: input,
                    input: String::new(),
                },
                KeyCode::Backspace => {
                    input.pop();
                    Mode::EnterName { input }
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    Mode::EnterName { input }
                }
                _ => Mode::EnterName { input },
            },
            Mode::EnterRate { name, mut input } => match key.code {
                KeyCode::Esc => Mode::Browse,
                KeyCode::Enter => {
                    self.finish_registration(name, input);
                    return;
                }
                KeyCode::Backspace => {
                    input.pop();
                    Mode::EnterRate { name, input }
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    Mode::EnterRate { name, input }
                }
                _ => Mode::EnterRate { name, input },
            },
        };
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char('+') | KeyCode::Char('a') => self.add_selected(),
            KeyCode::Char('-') | KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('c') | KeyCode::Enter => self.mode = Mode::Stats,
            KeyCode::Char('n') => {
                self.status = None;
                self.mode = Mode::EnterName {
                    input: String::new(),
                };
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('x') => self.clear_garden(),
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            debug!(code = ?key.code, mode = ?app.mode, "key");
            app.handle_key(key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Catalog + garden
            Constraint::Percentage(60), // Chart
        ])
        .split(chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(content_chunks[0]);

    render_catalog(f, left_chunks[0], app);
    render_garden(f, left_chunks[1], app);
    render_chart(f, content_chunks[1], app);
    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::Browse => {}
        Mode::Stats => render_stats_popup(f, app),
        Mode::EnterName { input } => {
            render_prompt(f, "Tree name:", input);
        }
        Mode::EnterRate { name, input } => {
            let label = format!("CO2 absorption rate for {} ({}):", name.trim(), CHART_UNIT);
            render_prompt(f, &label, input);
        }
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.session.stats();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " 🌳 Carbon Garden ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!(
                "{} trees, {} types",
                stats.total_count,
                app.session.garden().distinct()
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{:.2} {}", stats.total_rate, CHART_UNIT),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_catalog(f: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = app
        .session
        .catalog()
        .iter()
        .map(|tree| {
            let count = app.session.garden().count(tree.name());
            let count_span = if count > 0 {
                Span::styled(format!(" ×{}", count), Style::default().fg(Color::Green))
            } else {
                Span::raw("")
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<14}", tree.name())),
                Span::styled(
                    format!("{:>6.1} {}", tree.rate(), CHART_UNIT),
                    Style::default().fg(Color::DarkGray),
                ),
                count_span,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tree type "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_garden(f: &mut Frame, area: Rect, app: &App) {
    let garden = Paragraph::new(report::garden_line(app.session.garden()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Garden "));

    f.render_widget(garden, area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", CHART_TITLE, CHART_UNIT));

    let chart_bars = report::chart_bars(app.session.garden());

    if chart_bars.is_empty() {
        let empty = Paragraph::new(EMPTY_GARDEN)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    // BarChart works in integers; tenths keep one decimal of resolution
    let bars: Vec<Bar> = chart_bars
        .into_iter()
        .map(|bar| {
            Bar::default()
                .value((bar.value * 10.0).round().max(0.0) as u64)
                .label(Line::from(bar.label))
                .text_value(bar.text)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));

    f.render_widget(chart, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", status.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(vec![
            Span::styled(" ↑↓", Style::default().fg(Color::Cyan)),
            Span::raw(" select  "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" plant/remove  "),
            Span::styled("c", Style::default().fg(Color::Cyan)),
            Span::raw(" statistics  "),
            Span::styled("n", Style::default().fg(Color::Cyan)),
            Span::raw(" new tree  "),
            Span::styled("s", Style::default().fg(Color::Cyan)),
            Span::raw(" save  "),
            Span::styled("x", Style::default().fg(Color::Cyan)),
            Span::raw(" clear  "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]),
    };

    let status_bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, area);
}

fn render_stats_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(50, 60, f.size());
    let text = report::summary(&app.session.stats());

    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Carbon capture statistics (any key to close) "),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn render_prompt(f: &mut Frame, label: &str, input: &str) {
    let area = centered_rect(50, 20, f.size());

    let content = vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::raw("> "), Span::raw(input.to_string()), Span::raw("_")]),
    ];

    let prompt = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" New tree (Enter to confirm, Esc to cancel) "),
    );

    f.render_widget(Clear, area);
    f.render_widget(prompt, area);
}

/// Rect of the given percentage size, centered in `area`
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
