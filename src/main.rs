use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use env_logger::Env;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph,
    Row, Table,
};

use squad_pulse::aggregate::position_share;
use squad_pulse::config::DashboardConfig;
use squad_pulse::dataset;
use squad_pulse::export;
use squad_pulse::priority::TrackingStatus;
use squad_pulse::state::{DashboardState, View};

struct App {
    state: DashboardState,
    config: DashboardConfig,
    side: dataset::SideData,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.view = View::Overview,
            KeyCode::Char('2') | KeyCode::Enter => self.state.view = View::Player,
            KeyCode::Char('3') => self.state.view = View::Performance,
            KeyCode::Char('b') | KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.state.view = View::Overview;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.toggle_help(),
            _ => {}
        }
    }

    fn export(&mut self) {
        let path = self.config.export_path.clone();
        match export::export_workbook_with_side(
            &path,
            self.state.records(),
            &self.side,
            self.config.recovery_window_days,
            self.config.top_n,
        ) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} rows / {} players ({} sheets) to {}",
                report.records,
                report.players,
                report.sheets,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = DashboardConfig::from_env().with_args(&args);
    let records = dataset::load_or_empty(&config.source, config.http_timeout_secs);
    let side = dataset::load_side_tables(&config.tables);
    let mut state = DashboardState::new(records, config.top_n, config.source.label());
    state.set_side_data(&side, config.recovery_window_days);
    let mut app = App {
        state,
        config,
        side,
        should_quit: false,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.view {
        View::Performance => render_performance(frame, chunks[1], state),
        _ if state.records().is_empty() => {
            let empty = Paragraph::new("No squad data loaded")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, chunks[1]);
        }
        View::Overview => render_overview(frame, chunks[1], state),
        View::Player => render_player(frame, chunks[1], state),
    }

    let footer = Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &DashboardState) -> String {
    let view = match state.view {
        View::Overview => "Team Overview",
        View::Player => "Player Data",
        View::Performance => "Performance",
    };
    format!(
        "SQUAD PULSE | {view} | Source: {}\n{} rows loaded | Seasons: {}",
        state.source_label,
        state.records().len(),
        state.overview().season_span()
    )
}

fn footer_text(state: &DashboardState) -> String {
    let keys = match state.view {
        View::Overview => "1 Overview | 2/Enter Players | 3 Performance | e Export | ? Help | q Quit",
        View::Player => "1 Overview | j/k/↑/↓ Player | 3 Performance | e Export | ? Help | q Quit",
        View::Performance => "1 Overview | 2 Players | e Export | ? Help | q Quit",
    };
    let last = state.logs.back().map(String::as_str).unwrap_or("");
    format!("{keys}\n{last}")
}

fn render_overview(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8), Constraint::Length(9)])
        .split(area);

    render_totals(frame, rows[0], state);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    render_top_minutes(frame, middle[0], state);
    render_positions(frame, middle[1], state);

    render_ages(frame, rows[2], state);
}

fn render_totals(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let totals = &state.overview().totals;
    let avg_age = totals
        .average_age
        .map(|a| format!("{a:.1}"))
        .unwrap_or_else(|| "-".to_string());
    let cards = [
        ("Players", totals.players.to_string()),
        ("Total Minutes", totals.total_minutes.to_string()),
        ("Total Games", totals.total_games.to_string()),
        ("Average Age", avg_age),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);
    for (idx, (title, value)) in cards.into_iter().enumerate() {
        let card = Paragraph::new(value)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(card, columns[idx]);
    }
}

fn render_top_minutes(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let bars = state
        .overview()
        .top_minutes
        .iter()
        .map(|(player, minutes)| {
            Bar::default()
                .label(Line::from(player.clone()))
                .value((*minutes).max(0) as u64)
                .text_value(format!("{minutes} min"))
                .style(Style::default().fg(Color::Blue))
        })
        .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!("Top {} Players by Minutes", state.top_n))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn render_positions(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let positions = &state.overview().positions;
    let rows = positions
        .iter()
        .zip(position_share(positions))
        .map(|((position, count), (_, share))| {
            Row::new(vec![
                Cell::from(position.clone()),
                Cell::from(count.to_string()),
                Cell::from(format!("{share:.1}%")),
            ])
        })
        .collect::<Vec<_>>();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["Position", "Rows", "Share"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Position Distribution").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_ages(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let bars = state
        .overview()
        .ages
        .buckets()
        .map(|(label, count)| {
            Bar::default()
                .label(Line::from(label))
                .value(count as u64)
                .style(Style::default().fg(Color::LightBlue))
        })
        .collect::<Vec<_>>();

    let chart = BarChart::default()
        .block(Block::default().title("Age Distribution").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2);
    frame.render_widget(chart, area);
}

fn render_player(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(1)])
        .split(area);

    let items = state
        .players()
        .iter()
        .map(|name| ListItem::new(name.clone()))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(Block::default().title("Players").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, columns[0], &mut list_state);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(1)])
        .split(columns[1]);

    let profile_text = match state.selected_profile() {
        Some(p) => format!(
            "{}  [{}]\nNationality: {} ({})\nFlag: {}\nCareer: {} games, {} minutes over {} seasons",
            p.name,
            p.position,
            p.nationality,
            p.country_code,
            p.flag_url.as_deref().unwrap_or("-"),
            p.total_games,
            p.total_minutes,
            p.seasons
        ),
        None => "No player selected".to_string(),
    };
    let profile =
        Paragraph::new(profile_text).block(Block::default().title("Profile").borders(Borders::ALL));
    frame.render_widget(profile, detail[0]);

    render_season_table(frame, detail[1], state);
}

fn render_season_table(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let rows = state
        .selected_seasons()
        .into_iter()
        .map(|r| {
            Row::new(vec![
                r.season.clone(),
                r.position.clone(),
                r.age.clone(),
                r.games.clone(),
                r.games_starts.clone(),
                r.minutes.clone(),
                r.minutes_90s.clone(),
            ])
        })
        .collect::<Vec<_>>();

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(
            Row::new(vec![
                "Season", "Position", "Age", "Games", "Starts", "Minutes", "90s",
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title("Player Season Data").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_performance(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let perf = state.performance();
    if perf.is_empty() {
        let empty = Paragraph::new(
            "No performance tables loaded (set SQUAD_GPS_PATH, SQUAD_RECOVERY_PATH, SQUAD_PRIORITY_PATH)",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(8), Constraint::Length(10)])
        .split(area);

    let latest = perf
        .latest_recovery
        .as_ref()
        .map(|(date, score)| format!("{score:.0} ({date})"))
        .unwrap_or_else(|| "-".to_string());
    let cards = [
        ("Sessions", perf.load.sessions.to_string()),
        ("Distance (km)", format!("{:.1}", perf.load.total_distance / 1000.0)),
        ("Sprint (m)", format!("{:.0}", perf.load.sprint_distance)),
        ("HI Minutes", format!("{:.1}", perf.load.high_intensity_minutes)),
        ("Recovery", latest),
    ];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20); 5])
        .split(rows[0]);
    for (idx, (title, value)) in cards.into_iter().enumerate() {
        let card = Paragraph::new(value)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(card, columns[idx]);
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let bars = perf
        .weekly
        .iter()
        .map(|week| {
            Bar::default()
                .label(Line::from(week.week.clone()))
                .value(week.distance.max(0.0).round() as u64)
                .text_value(format!("{:.1} km", week.distance / 1000.0))
                .style(Style::default().fg(Color::Blue))
        })
        .collect::<Vec<_>>();
    let chart = BarChart::default()
        .block(Block::default().title("Weekly Load").borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0);
    frame.render_widget(chart, middle[0]);

    let recovery = [
        ("Overall", perf.recovery.overall),
        ("Sleep", perf.recovery.sleep),
        ("Soreness", perf.recovery.soreness),
        ("Subjective", perf.recovery.subjective),
        ("Bio", perf.recovery.bio),
    ]
    .into_iter()
    .map(|(label, score)| Row::new(vec![label.to_string(), format!("{score:.1}")]))
    .collect::<Vec<_>>();
    let table = Table::new(recovery, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(
            Row::new(vec!["Recovery", "Score"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(format!(
                    "Last {} days ({} entries)",
                    perf.recovery_window_days, perf.recovery_days
                ))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, middle[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let areas = perf
        .priorities
        .iter()
        .map(|a| {
            Row::new(vec![
                a.priority.clone(),
                a.category.clone(),
                a.area.clone(),
                a.tracking.clone(),
            ])
        })
        .collect::<Vec<_>>();
    let table = Table::new(
        areas,
        [
            Constraint::Length(8),
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["Priority", "Category", "Area", "Tracking"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title("Priority Areas").borders(Borders::ALL));
    frame.render_widget(table, bottom[0]);

    let mut lines = vec![TrackingStatus::ALL
        .iter()
        .map(|status| format!("{} {:.0}%", status.label(), perf.progress.percent(*status)))
        .collect::<Vec<_>>()
        .join(" | ")];
    for (category, counts) in &perf.categories {
        lines.push(format!(
            "{category}: {} achieved, {} on track, {} behind, {} not started",
            counts.achieved, counts.on_track, counts.behind, counts.not_started
        ));
    }
    let progress = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Progress").borders(Borders::ALL));
    frame.render_widget(progress, bottom[1]);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Squad Pulse - Help",
        "",
        "  1            Team overview",
        "  2 / Enter    Player data",
        "  3            GPS load, recovery, priorities",
        "  j/k or ↑/↓   Select player",
        "  e            Export workbook",
        "  b / Esc      Back",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
