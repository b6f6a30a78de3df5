//! Main TUI application state and logic
//!
//! [`App`] is the host of the library components. It owns the breakpoint
//! set and the trace cursor, feeds each step's snapshot to the
//! [`DiagramRenderer`] and mirrors breakpoints and the execution line onto
//! the [`MarkerOverlay`].

use super::canvas::TerminalCanvas;
use super::panes::{
    render_heap_pane, render_source_pane, render_stack_pane, render_status_bar, ListScrollState,
    StatusRenderData, GUTTER_WIDTH,
};
use super::source_view::TerminalSourceView;
use crate::config::Config;
use crate::error::RenderError;
use crate::overlay::{MarkerOutcome, MarkerOverlay, OverlayEvent};
use crate::render::DiagramRenderer;
use crate::snapshot::Trace;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::collections::BTreeSet;
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Stack,
    Heap,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> stack -> heap)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Heap,
            FocusedPane::Heap => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    trace: Trace,
    renderer: DiagramRenderer<TerminalCanvas>,
    overlay: MarkerOverlay<TerminalSourceView>,

    /// Authoritative breakpoint lines; the overlay only displays them
    breakpoints: BTreeSet<usize>,

    config: Config,
    focused_pane: FocusedPane,
    stack_scroll: ListScrollState,
    heap_scroll: ListScrollState,

    /// Source pane area of the last frame, for mapping mouse clicks
    source_area: Rect,
    /// Center the current line once the pane height is known
    center_pending: bool,

    should_quit: bool,
    status_message: String,
    is_playing: bool,
    last_play_time: Instant,
    last_space_press: Instant,
}

impl App {
    pub fn new(trace: Trace, config: Config) -> Self {
        Self::with_canvas(trace, config, TerminalCanvas::new())
    }

    pub fn with_canvas(trace: Trace, config: Config, canvas: TerminalCanvas) -> Self {
        let mut overlay = MarkerOverlay::new(&config.overlay);
        overlay.replace_text(trace.source());
        overlay.editor_ready(TerminalSourceView::default());

        let now = Instant::now();
        let mut app = App {
            renderer: DiagramRenderer::with_config(canvas, config.renderer.clone()),
            overlay,
            breakpoints: BTreeSet::new(),
            focused_pane: FocusedPane::Source,
            stack_scroll: ListScrollState::default(),
            heap_scroll: ListScrollState::default(),
            source_area: Rect::default(),
            center_pending: true,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
            trace,
            config,
        };

        let recorded: Vec<usize> = app.trace.initial_breakpoints().to_vec();
        for line in recorded {
            match app.overlay.mark_breakpoint(line) {
                MarkerOutcome::OutOfRange { .. } => {}
                _ => {
                    app.breakpoints.insert(line);
                }
            }
        }
        app.handle_overlay_events();
        app.show_current_step();
        app
    }

    pub fn breakpoints(&self) -> &BTreeSet<usize> {
        &self.breakpoints
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn renderer(&self) -> &DiagramRenderer<TerminalCanvas> {
        &self.renderer
    }

    pub fn overlay(&self) -> &MarkerOverlay<TerminalSourceView> {
        &self.overlay
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.config.player.play_interval() {
                if self.trace.step_forward() {
                    self.status_message = "Playing...".to_string();
                    self.show_current_step();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    Event::Resize(..) => self.handle_resize(),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        self.source_area = columns[0];
        if let Some(view) = self.overlay.view_mut() {
            view.set_viewport_height(columns[0].height.saturating_sub(2).max(1) as usize);
        }
        if self.center_pending {
            self.center_pending = false;
            if let Some(step) = self.trace.current() {
                let line = step.line;
                if self.overlay.scroll_line_into_view(line) == MarkerOutcome::Applied {
                    // Keyboard cursor follows execution so `b` acts on what is shown
                    if let Some(view) = self.overlay.view_mut() {
                        view.move_cursor_to(line);
                    }
                }
            }
        }

        if let Some(view) = self.overlay.view_mut() {
            render_source_pane(
                frame,
                columns[0],
                view,
                &self.config.overlay.current_line_glyph,
                self.focused_pane == FocusedPane::Source,
            );
        }

        let scene = self.renderer.canvas().scene();
        render_stack_pane(
            frame,
            right_rows[0],
            scene,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );
        render_heap_pane(
            frame,
            right_rows[1],
            scene,
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.trace.position(),
                total_steps: self.trace.len(),
                breakpoints: self.breakpoints.len(),
                is_playing: self.is_playing,
                is_degraded: !self.renderer.is_enabled(),
            },
        );
    }

    /// Render the current step's snapshot and move the execution marker.
    fn show_current_step(&mut self) {
        let Some(step) = self.trace.current() else {
            return;
        };
        let line = step.line;

        if self.renderer.is_enabled() {
            match self.renderer.render_snapshot(step.snapshot.clone()) {
                Ok(report) => {
                    if let Some(diagnostic) = report.diagnostics.first() {
                        self.status_message = diagnostic.to_string();
                    }
                }
                Err(err) => self.status_message = err.to_string(),
            }
        }

        if let Some(diagnostic) = self.overlay.set_current_line(line).diagnostic() {
            self.status_message = diagnostic.to_string();
        }
        self.center_pending = true;
    }

    /// Apply what the overlay reported. Gutter clicks become toggles here.
    fn handle_overlay_events(&mut self) {
        while let Some(event) = self.overlay.poll_event() {
            match event {
                OverlayEvent::Ready => {
                    tracing::debug!("source view attached");
                }
                OverlayEvent::InitializationFailed(reason) => {
                    self.status_message = format!("Source view unavailable: {}", reason);
                }
                OverlayEvent::GutterClick(line) => {
                    self.overlay.toggle_breakpoint(line);
                }
                OverlayEvent::BreakpointToggled { line, set } => {
                    if set {
                        self.breakpoints.insert(line);
                        self.status_message = format!("Breakpoint set on line {}", line);
                    } else {
                        self.breakpoints.remove(&line);
                        self.status_message = format!("Breakpoint cleared on line {}", line);
                    }
                    tracing::info!(line, set, "breakpoint toggled");
                }
            }
        }
    }

    fn handle_resize(&mut self) {
        self.center_pending = true;
        if self.renderer.is_enabled() {
            return;
        }

        match self.renderer.reinitialize() {
            Ok(()) => {
                // Only the newest step was kept while disabled; flush it, then show the current one
                if let Err(err) = self.renderer.drain() {
                    tracing::warn!(%err, "failed to flush queued snapshots");
                }
                self.status_message = "Rendering restored".to_string();
                self.show_current_step();
            }
            Err(RenderError::Initialization(reason)) => {
                self.status_message = format!("Rendering disabled: {}", reason);
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let inner_x = self.source_area.x + 1;
        let inner_y = self.source_area.y + 1;
        let in_gutter = mouse.column >= inner_x && mouse.column < inner_x + GUTTER_WIDTH;
        let in_rows = mouse.row >= inner_y
            && mouse.row < self.source_area.y + self.source_area.height.saturating_sub(1);
        if !(in_gutter && in_rows) {
            return;
        }

        let pane_row = (mouse.row - inner_y) as usize;
        let view_row = self
            .overlay
            .view()
            .and_then(|view| view.row_to_view_row(pane_row));
        if let Some(view_row) = view_row {
            self.overlay.gutter_click(view_row);
            self.handle_overlay_events();
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                if self.trace.step_backward() {
                    self.status_message = "Stepped backward".to_string();
                    self.show_current_step();
                } else {
                    self.status_message = "Already at the first step".to_string();
                }
            }
            KeyCode::Right => {
                self.is_playing = false;
                if self.trace.step_forward() {
                    self.status_message = "Stepped forward".to_string();
                    self.show_current_step();
                } else {
                    self.status_message = "Already at the last step".to_string();
                }
            }
            KeyCode::Char('c') => {
                self.is_playing = false;
                let hit = self.trace.continue_to(&self.breakpoints);
                self.status_message = match self.trace.current() {
                    Some(step) if hit => format!("Hit breakpoint on line {}", step.line),
                    _ => "No breakpoint hit; at the last step".to_string(),
                };
                self.show_current_step();
            }
            KeyCode::Char('b') => {
                if let Some(line) = self.overlay.view().map(TerminalSourceView::cursor) {
                    self.overlay.toggle_breakpoint(line);
                    self.handle_overlay_events();
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(view) = self.overlay.view_mut() {
                        view.cursor_up();
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll.offset = self.heap_scroll.offset.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(view) = self.overlay.view_mut() {
                        view.cursor_down();
                    }
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_add(1);
                }
                FocusedPane::Heap => {
                    self.heap_scroll.offset = self.heap_scroll.offset.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Debounce key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        let now = Instant::now();
                        self.last_play_time = now
                            .checked_sub(self.config.player.play_interval())
                            .unwrap_or(now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.trace.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.show_current_step();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.trace.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.show_current_step();
            }
            _ => {}
        }
    }
}
