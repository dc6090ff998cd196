// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Draws the pipeline board (ratatui + crossterm) with the overlay panels in a sidebar. All
//! overlay state changes happen on the UI thread: key presses and drained ingest completions.

use std::{
    collections::BTreeMap,
    error::Error,
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ingest::{IngestCompletion, IngestService};
use crate::layout::{BoardSize, LayoutTracker};
use crate::model::{PipelineDiagram, Rgb};
use crate::overlay::{panel_lines, CompletionOutcome, OverlayCategory, OverlayController};
use crate::render::{
    initialize_connectors, render_board, AnchorPaint, ArrowDirection, RenderedBoard,
    RenderedConnectorSet,
};

const FOCUS_COLOR: Color = Color::LightGreen;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "pipegraph ";
const CONNECTOR_COLOR: Color = Color::Gray;
const ARROW_COLOR: Color = Color::White;
const ERROR_COLOR: Color = Color::LightRed;
const TOAST_TTL: Duration = Duration::from_secs(3);
const PAN_STEP_X: u16 = 4;
const PAN_STEP_Y: u16 = 2;
const PANEL_PAGE: u16 = 10;

/// Runs the interactive terminal UI until the user quits.
///
/// `preload` files are ingested through the same path as files picked in the UI.
pub fn run(
    diagram: PipelineDiagram,
    ingest: IngestService,
    preload: Vec<(OverlayCategory, PathBuf)>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(diagram, ingest);
    for (category, path) in preload {
        app.begin_load(category, path);
    }
    tracing::info!("tui started");

    while !app.should_quit {
        app.drain_ingest();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    tracing::info!("tui stopped");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let status_area = layout[1];

    let panels = app.overlays.mounted_panels().map(|(category, _)| category).collect::<Vec<_>>();
    let compact_footer = footer_uses_compact_mode(main_area, panels.len());
    let (board_area, sidebar_area) = if panels.is_empty() {
        (main_area, None)
    } else {
        let direction = if stack_main_panes_vertically(main_area, panels.len()) {
            Direction::Vertical
        } else {
            Direction::Horizontal
        };
        let panes = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_area);
        (panes[0], Some(panes[1]))
    };

    // Opening or closing a panel changes this viewport, which is what moves the anchors.
    let viewport = (board_area.width.saturating_sub(2), board_area.height.saturating_sub(2));
    app.refresh_board(viewport);

    let board_title = board_view_title(
        app.focus == Focus::Board,
        app.diagram.anchors().len(),
        app.connectors.visible_count(),
        app.connectors.len(),
    );
    let board = Paragraph::new(app.board_text.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(board_title)
                .border_style(panel_border_style_for_focus(app.focus, Focus::Board)),
        )
        .scroll((app.pan_y, app.pan_x));
    frame.render_widget(board, board_area);

    if let Some(sidebar_area) = sidebar_area {
        let constraints = panels
            .iter()
            .map(|_| Constraint::Ratio(1, panels.len() as u32))
            .collect::<Vec<_>>();
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(sidebar_area);
        for (category, slot) in panels.iter().copied().zip(slots.iter().copied()) {
            let state = app.overlays.state(category);
            let inner_width = usize::from(slot.width.saturating_sub(2));
            let inner_height = usize::from(slot.height.saturating_sub(2));
            let text = wrap_panel_text(
                panel_text(state.payload(), app.overlays.last_error(category)),
                inner_width,
            );
            let max_scroll = text.lines.len().saturating_sub(inner_height);
            let title = panel_title(category, app.loaded_from.get(&category).map(PathBuf::as_path));
            app.set_panel_max_scroll(category, u16::try_from(max_scroll).unwrap_or(u16::MAX));
            let panel = Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(panel_border_style_for_focus(
                            app.focus,
                            Focus::Panel(category),
                        )),
                )
                .scroll((app.panel_scroll(category), 0));
            frame.render_widget(panel, slot);
        }
    }

    let toast_snapshot = app.toast.as_ref().map(|toast| (toast.message.clone(), toast.expires_at));
    let toast_suffix = match toast_snapshot {
        Some((message, expires_at)) if expires_at > Instant::now() => format!(" | {message}"),
        Some(_) => {
            app.toast = None;
            String::new()
        }
        None => String::new(),
    };

    if let Some(prompt) = &app.prompt {
        frame.render_widget(Paragraph::new(prompt_footer_line(prompt)), status_area);
        let cursor_x = status_area
            .x
            .saturating_add((prompt_prefix_width(prompt) + prompt.input.chars().count()) as u16)
            .min(status_area.x.saturating_add(status_area.width.saturating_sub(1)));
        frame.set_cursor_position((cursor_x, status_area.y));
    } else {
        let status = Paragraph::new(footer_help_line(app, &toast_suffix, compact_footer));
        frame.render_widget(status, status_area);
        let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
        frame.render_widget(brand, status_area);
    }

    if app.show_help {
        render_help(frame, main_area);
    }
}

// Extracted panel/header/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Footer prompt asking for the file to load into `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathPrompt {
    category: OverlayCategory,
    input: String,
}

struct App {
    diagram: PipelineDiagram,
    layout: LayoutTracker,
    connectors: RenderedConnectorSet,
    board: Option<RenderedBoard>,
    board_text: Text<'static>,
    viewport: (u16, u16),
    pan_x: u16,
    pan_y: u16,
    overlays: OverlayController,
    ingest: IngestService,
    loaded_from: BTreeMap<OverlayCategory, PathBuf>,
    panel_scroll: BTreeMap<OverlayCategory, u16>,
    panel_max_scroll: BTreeMap<OverlayCategory, u16>,
    focus: Focus,
    prompt: Option<PathPrompt>,
    toast: Option<Toast>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    fn new(diagram: PipelineDiagram, ingest: IngestService) -> Self {
        let connectors = initialize_connectors(diagram.connectors());
        Self {
            diagram,
            layout: LayoutTracker::new(),
            connectors,
            board: None,
            board_text: Text::default(),
            viewport: (0, 0),
            pan_x: 0,
            pan_y: 0,
            overlays: OverlayController::new(),
            ingest,
            loaded_from: BTreeMap::new(),
            panel_scroll: BTreeMap::new(),
            panel_max_scroll: BTreeMap::new(),
            focus: Focus::Board,
            prompt: None,
            toast: None,
            show_help: false,
            should_quit: false,
        }
    }

    /// Observes the board at the current viewport and redraws it when any anchor moved.
    fn refresh_board(&mut self, viewport: (u16, u16)) {
        self.viewport = viewport;
        let size = BoardSize::for_viewport(usize::from(viewport.0), usize::from(viewport.1));
        self.layout.observe(self.diagram.anchors(), size);
        let rerouted = self.connectors.sync(&self.layout);
        if rerouted || self.board.is_none() {
            self.redraw_board();
        }
        self.clamp_pan();
    }

    fn redraw_board(&mut self) {
        let Some(layout) = self.layout.layout() else {
            return;
        };
        match render_board(self.diagram.anchors(), layout, &self.connectors) {
            Ok(board) => {
                self.board_text = board_text(&board);
                self.board = Some(board);
            }
            Err(err) => {
                tracing::warn!(error = %err, "board render failed");
                self.board = None;
                self.board_text = Text::default();
            }
        }
    }

    fn clamp_pan(&mut self) {
        let size = self.layout.layout().map(|layout| layout.size()).unwrap_or_default();
        let max_x = size.width.saturating_sub(usize::from(self.viewport.0));
        let max_y = size.height.saturating_sub(usize::from(self.viewport.1));
        self.pan_x = self.pan_x.min(u16::try_from(max_x).unwrap_or(u16::MAX));
        self.pan_y = self.pan_y.min(u16::try_from(max_y).unwrap_or(u16::MAX));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    /// Returns `true` when the key asks to quit.
    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.cycle_focus(1),
            KeyCode::BackTab => self.cycle_focus(-1),
            KeyCode::Char('x') => self.hide_focused_panel(),
            KeyCode::Char(ch) if pick_category(ch).is_some() => {
                if let Some(category) = pick_category(ch) {
                    self.open_prompt(category);
                }
            }
            KeyCode::Char(ch) if toggle_category(ch).is_some() => {
                if let Some(category) = toggle_category(ch) {
                    self.toggle_panel(category);
                }
            }
            _ => match self.focus {
                Focus::Board => self.handle_board_key(code),
                Focus::Panel(category) => self.handle_panel_key(category, code),
            },
        }

        false
    }

    fn handle_board_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.pan_x = self.pan_x.saturating_sub(PAN_STEP_X),
            KeyCode::Right | KeyCode::Char('l') => self.pan_x = self.pan_x.saturating_add(PAN_STEP_X),
            KeyCode::Up | KeyCode::Char('k') => self.pan_y = self.pan_y.saturating_sub(PAN_STEP_Y),
            KeyCode::Down | KeyCode::Char('j') => self.pan_y = self.pan_y.saturating_add(PAN_STEP_Y),
            KeyCode::Home => {
                self.pan_x = 0;
                self.pan_y = 0;
            }
            _ => return,
        }
        self.clamp_pan();
    }

    fn handle_panel_key(&mut self, category: OverlayCategory, code: KeyCode) {
        let current = self.panel_scroll(category);
        let next = match code {
            KeyCode::Down | KeyCode::Char('j') => current.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => current.saturating_sub(1),
            KeyCode::PageDown => current.saturating_add(PANEL_PAGE),
            KeyCode::PageUp => current.saturating_sub(PANEL_PAGE),
            KeyCode::Home => 0,
            _ => return,
        };
        let max = self.panel_max_scroll.get(&category).copied().unwrap_or(0);
        self.panel_scroll.insert(category, next.min(max));
    }

    /// Records how far `category` can scroll at its last drawn size and clamps the offset.
    fn set_panel_max_scroll(&mut self, category: OverlayCategory, max: u16) {
        self.panel_max_scroll.insert(category, max);
        if let Some(scroll) = self.panel_scroll.get_mut(&category) {
            *scroll = (*scroll).min(max);
        }
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, category: OverlayCategory) {
        let input = self
            .loaded_from
            .get(&category)
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        self.prompt = Some(PathPrompt { category, input });
    }

    fn submit_prompt(&mut self, prompt: PathPrompt) {
        let path = prompt.input.trim();
        if path.is_empty() {
            self.set_toast("No file given");
            return;
        }
        self.begin_load(prompt.category, PathBuf::from(path));
    }

    /// Starts an ingest into `category`; any earlier one still in flight is superseded.
    fn begin_load(&mut self, category: OverlayCategory, path: PathBuf) {
        let ticket = self.overlays.begin_ingest(category);
        self.set_toast(format!("Loading {}…", display_file_name(&path)));
        self.ingest.ingest(category, ticket, path);
    }

    fn drain_ingest(&mut self) {
        for completion in self.ingest.poll_completions() {
            self.apply_ingest_completion(completion);
        }
    }

    fn apply_ingest_completion(&mut self, completion: IngestCompletion) {
        let category = completion.category;
        let path = completion.path.clone();
        match self.overlays.apply_completion(completion) {
            CompletionOutcome::Applied => {
                self.set_toast(format!(
                    "Loaded {} into {}",
                    display_file_name(&path),
                    category.title()
                ));
                self.loaded_from.insert(category, path);
                self.panel_scroll.remove(&category);
            }
            CompletionOutcome::Failed { message } => self.set_toast(message),
            CompletionOutcome::Stale => {}
        }
    }

    fn toggle_panel(&mut self, category: OverlayCategory) {
        if self.overlays.toggle(category) {
            self.focus = Focus::Panel(category);
        } else if self.focus == Focus::Panel(category) {
            self.focus = Focus::Board;
        }
    }

    fn hide_focused_panel(&mut self) {
        let Focus::Panel(category) = self.focus else {
            self.set_toast("No panel focused");
            return;
        };
        self.overlays.set_visible(category, false);
        self.focus = Focus::Board;
    }

    fn cycle_focus(&mut self, step: isize) {
        let order = self.focus_order();
        self.focus = self.focus.cycle_in(&order, step);
    }

    fn focus_order(&self) -> Vec<Focus> {
        std::iter::once(Focus::Board)
            .chain(self.overlays.mounted_panels().map(|(category, _)| Focus::Panel(category)))
            .collect()
    }

    fn panel_scroll(&self, category: OverlayCategory) -> u16 {
        self.panel_scroll.get(&category).copied().unwrap_or(0)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }
}

fn pick_category(ch: char) -> Option<OverlayCategory> {
    OverlayCategory::ALL.into_iter().find(|category| category.pick_key() == ch)
}

fn toggle_category(ch: char) -> Option<OverlayCategory> {
    OverlayCategory::ALL.into_iter().find(|category| category.toggle_key() == ch)
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Styled board rows; runs of equally styled cells share one span.
fn board_text(board: &RenderedBoard) -> Text<'static> {
    let lines = board
        .rows()
        .iter()
        .enumerate()
        .map(|(y, row)| {
            let mut spans = Vec::<Span<'static>>::new();
            let mut run = String::new();
            let mut run_style = None::<Style>;
            for (x, ch) in row.chars().enumerate() {
                let style = style_for_board_cell(ch, board.anchor_at(x, y));
                if run_style != Some(style) {
                    if let Some(prev) = run_style {
                        spans.push(Span::styled(std::mem::take(&mut run), prev));
                    }
                    run_style = Some(style);
                }
                run.push(ch);
            }
            if let Some(style) = run_style {
                spans.push(Span::styled(run, style));
            }
            Line::from(spans)
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
