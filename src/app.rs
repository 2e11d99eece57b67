use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::executor::LocalPool;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::bootstrap::ReadyHandler;
use crate::bootstrap::sink::{AlertSink, PaneSurface};
use crate::host::{HostFunctions, ThreadedHost};
use crate::lifecycle::{Lifecycle, LifecycleEvent, Registration};
use crate::model::config::AppConfig;
use crate::model::mode::Mode;
use crate::model::view::ViewState;
use crate::msg::Msg;

pub struct App {
    pub config: AppConfig,
    pub view: Rc<RefCell<ViewState>>,
    lifecycle: Lifecycle,
    executor: LocalPool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, event_tx: mpsc::Sender<Msg>) -> Result<Self> {
        let view = Rc::new(RefCell::new(ViewState::new(config.view.panes.iter().cloned())));

        let host = ThreadedHost::new(
            HostFunctions::register_all(),
            config.host.latency(),
            event_tx,
        );
        let handler = ReadyHandler::new(
            config.bootstrap.clone(),
            Rc::new(host),
            Rc::new(PaneSurface::new(Rc::clone(&view))),
            Rc::new(AlertSink::new(Rc::clone(&view))),
        );

        let mut lifecycle = Lifecycle::new();
        if lifecycle.register(LifecycleEvent::Ready, Rc::new(handler)) != Registration::Bound {
            return Err(anyhow!("ready handler could not be registered"));
        }

        Ok(Self {
            config,
            view,
            lifecycle,
            executor: LocalPool::new(),
            should_quit: false,
        })
    }

    pub fn mode(&self) -> Mode {
        self.view.borrow().mode()
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Lifecycle(event) => {
                self.lifecycle
                    .dispatch(event, &self.executor.spawner())
                    .map_err(|err| anyhow!("dispatching {event:?}: {err:?}"))?;
            }
            Msg::Resize(width, height) => {
                tracing::debug!("view resized to {width}x{height}");
            }
            // Nothing to do beyond polling below.
            Msg::HostSettled => {}
        }

        self.executor.run_until_stalled();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode() {
            Mode::Alert => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.view.borrow_mut().acknowledge_alert();
                }
            }
            Mode::Normal => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
        }
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // panes
                Constraint::Length(1), // status bar
            ])
            .split(frame.area());

        self.render_panes(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);

        if let Some(alert) = self.view.borrow().current_alert() {
            render_alert_overlay(frame, alert);
        }
    }

    fn render_panes(&self, frame: &mut Frame, area: Rect) {
        let view = self.view.borrow();
        let pane_count = view.panes().count().max(1) as u32;
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..pane_count).map(|_| Constraint::Ratio(1, pane_count)))
            .split(area);

        for ((id, log), pane_area) in view.panes().zip(areas.iter()) {
            let text = if log.is_empty() {
                Text::from(Line::from(Span::styled(
                    "(waiting)",
                    Style::default().fg(Color::DarkGray),
                )))
            } else {
                Text::from(log.render_text())
            };

            let pane = Paragraph::new(text).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title(format!(" {id} "))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(pane, *pane_area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode = self.mode();
        let mode_style = match mode {
            Mode::Normal => Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            Mode::Alert => Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        };

        let target = &self.config.bootstrap.display_target;
        let (message_count, last) = self
            .view
            .borrow()
            .pane(target)
            .map(|log| (log.len(), log.entries().last().cloned()))
            .unwrap_or((0, None));
        let last = last.map(|entry| format!(" | last: {entry}")).unwrap_or_default();
        let hint = match mode {
            Mode::Normal => "q quit",
            Mode::Alert => "enter dismiss",
        };

        let info = Span::styled(
            format!(
                " {}  {target}: {message_count} messages{last} | {hint} ",
                self.config.view.title
            ),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        );

        let bar = Line::from(vec![Span::styled(format!(" {} ", mode.label()), mode_style), info]);
        let status = Paragraph::new(bar).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}

fn render_alert_overlay(frame: &mut Frame, alert: &str) {
    let area = centered_rect(60, 25, frame.area());
    frame.render_widget(Clear, area);

    let body = Paragraph::new(vec![
        Line::from(alert.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[enter] ok",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(Color::Rgb(24, 15, 15))),
    );
    frame.render_widget(body, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
