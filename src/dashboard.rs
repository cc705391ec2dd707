// Terminal dashboard: interface header, raw counter deltas, Rx/Tx utilization charts.

use crate::models::{CounterDelta, InterfaceInfo};
use crate::worker::DashboardState;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use num_format::{Locale, ToFormattedString};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, watch};

/// How long to wait for a key press between redraws.
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Header fields wider than this are truncated.
const HEADER_FIELD_WIDTH: usize = 31;

/// Static part of the dashboard, fixed at startup.
pub struct DashboardView {
    info: InterfaceInfo,
    capacity: usize,
    started: Instant,
}

enum Exit {
    Quit,
    WorkerStopped,
}

impl DashboardView {
    pub fn new(info: InterfaceInfo, capacity: usize) -> Self {
        Self {
            info,
            capacity: capacity.max(2),
            started: Instant::now(),
        }
    }

    /// Blocking UI loop. Returns when the user quits (after signalling `shutdown_tx`) or
    /// when the worker goes away. The terminal is restored either way.
    pub fn run(
        &self,
        mut state_rx: watch::Receiver<DashboardState>,
        shutdown_tx: oneshot::Sender<()>,
    ) -> anyhow::Result<()> {
        let mut terminal = ratatui::try_init()?;
        let result = self.event_loop(&mut terminal, &mut state_rx);
        ratatui::restore();

        if let Ok(Exit::Quit) = result {
            tracing::info!("quit requested");
            let _ = shutdown_tx.send(());
        }
        result.map(|_| ())
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        state_rx: &mut watch::Receiver<DashboardState>,
    ) -> anyhow::Result<Exit> {
        loop {
            if state_rx.has_changed().is_err() {
                return Ok(Exit::WorkerStopped);
            }
            let state = state_rx.borrow_and_update().clone();
            terminal.draw(|frame| self.render(frame, &state))?;

            if event::poll(POLL_INTERVAL)?
                && let Event::Key(key) = event::read()?
                && is_quit(&key)
            {
                return Ok(Exit::Quit);
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &DashboardState) {
        let [header, raw, charts, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [rx_area, tx_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(charts);

        frame.render_widget(
            Paragraph::new(header_lines(&self.info)).block(Block::bordered().title("Interface")),
            header,
        );
        frame.render_widget(
            Paragraph::new(raw_data_lines(state.delta.as_ref()))
                .block(Block::bordered().title("Raw Data")),
            raw,
        );
        self.render_chart(frame, rx_area, "Rx Utilization (%)", &state.rx_history);
        self.render_chart(frame, tx_area, "Tx Utilization (%)", &state.tx_history);
        self.render_footer(frame, footer, state);
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect, title: &str, series: &[f64]) {
        let points: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();
        let dataset = Dataset::default()
            .name("rate")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&points);
        let chart = Chart::new(vec![dataset])
            .block(Block::bordered().title(title.to_string()))
            .legend_position(None)
            .x_axis(Axis::default().bounds([0.0, (self.capacity - 1) as f64]))
            .y_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .labels(["0", "50", "100"]),
            );
        frame.render_widget(chart, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let elapsed = format_elapsed(self.started.elapsed().as_secs());
        let clock = format!("{elapsed:>11} (press q to quit)");
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(clock.len() as u16)])
                .areas(area);
        if let Some(err) = &state.last_error {
            frame.render_widget(
                Paragraph::new(format!("last error: {err}")).style(Style::default().fg(Color::Red)),
                left,
            );
        }
        frame.render_widget(Paragraph::new(clock).alignment(Alignment::Right), right);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn bold(s: &'static str) -> Span<'static> {
    Span::styled(s, Style::default().add_modifier(Modifier::BOLD))
}

pub fn header_lines(info: &InterfaceInfo) -> Vec<Line<'static>> {
    let id = &info.identity;
    vec![
        Line::from(vec![
            bold("sysName: "),
            Span::raw(format!(
                "{:<width$} ",
                trim_to(&info.sys_name, HEADER_FIELD_WIDTH),
                width = HEADER_FIELD_WIDTH
            )),
            bold("ifName:  "),
            Span::raw(id.name.clone()),
        ]),
        Line::from(vec![
            bold("ifAlias: "),
            Span::raw(format!(
                "{:<width$} ",
                trim_to(&id.alias, HEADER_FIELD_WIDTH),
                width = HEADER_FIELD_WIDTH
            )),
            bold("ifSpeed: "),
            Span::raw(format!("{} Mbps", format_thousands(id.speed_mbps))),
        ]),
    ]
}

/// Counter deltas, or "-" before the first delta exists.
pub fn raw_data_lines(delta: Option<&CounterDelta>) -> Vec<Line<'static>> {
    let cell = |pick: fn(&CounterDelta) -> u64| {
        delta
            .map(|d| format_thousands(pick(d)))
            .unwrap_or_else(|| "-".to_string())
    };
    let row = |in_label: &'static str, in_val: String, out_label: &'static str, out_val: String| {
        Line::from(vec![
            bold(in_label),
            Span::raw(format!("{in_val:>21}     ")),
            bold(out_label),
            Span::raw(format!("{out_val:>21}")),
        ])
    };
    vec![
        row(
            "ifHCInOctets:  ",
            cell(|d| d.in_octets),
            "ifHCOutOctets: ",
            cell(|d| d.out_octets),
        ),
        row(
            "ifInDiscards:  ",
            cell(|d| d.in_discards),
            "ifOutDiscards: ",
            cell(|d| d.out_discards),
        ),
        row(
            "ifInErrors:    ",
            cell(|d| d.in_errors),
            "ifOutErrors:   ",
            cell(|d| d.out_errors),
        ),
    ]
}

/// 1234567 -> "1,234,567".
pub fn format_thousands(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Truncates to `width` characters, marking the cut with an ellipsis.
pub fn trim_to(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// 75 -> "1m15s", 3600 -> "1h0m0s".
pub fn format_elapsed(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}
