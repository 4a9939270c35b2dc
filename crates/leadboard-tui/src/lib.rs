// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use leadboard_app::{
    AppCommand, AppMode, AppState, BoardError, BoardEvent, BulkMutator, LeadBoard, LeadField,
    LeadId, Notice, OwnerId, PickOption, PickerKind, RecordSource, Severity, StatusClass,
    ValidationReason, ViewLead,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use std::cmp::Ordering;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const SELECTED_MARK: &str = "●";
const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(4);

/// Host knobs that come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptions {
    pub status_ttl: Duration,
    pub initial_filter: Option<String>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            status_ttl: DEFAULT_STATUS_TTL,
            initial_filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortSpec {
    column: LeadField,
    direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TableUiState {
    selected_row: usize,
    selected_col: usize,
    sort: Option<SortSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PickerUiState {
    cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    CycleSort,
    ClearSort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableStatus {
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    table_state: TableUiState,
    picker: PickerUiState,
    search_input: String,
    status_token: u64,
    status_ttl: Duration,
}

impl ViewData {
    fn new(options: &HostOptions) -> Self {
        Self {
            table_state: TableUiState::default(),
            picker: PickerUiState::default(),
            search_input: String::new(),
            status_token: 0,
            status_ttl: options.status_ttl,
        }
    }
}

pub fn run_app<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    options: &HostOptions,
) -> Result<()>
where
    R: RecordSource + BulkMutator,
{
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    load_initial(
        state,
        board,
        runtime,
        &mut view_data,
        &internal_tx,
        options.initial_filter.as_deref(),
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, board, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, board, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn load_initial<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    initial_filter: Option<&str>,
) where
    R: RecordSource + ?Sized,
{
    let mut notices = Vec::new();
    let loaded = board.load(runtime, &mut notices);

    if let Some(filter) = initial_filter.filter(|filter| !filter.is_empty()) {
        view_data.search_input = filter.to_owned();
        board.apply_filter(filter);
    }
    sync_board_events(board, view_data);

    if loaded.is_ok() {
        let summary = board.summary();
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("{} leads loaded", summary.total),
        );
    }
    flush_notices(state, view_data, internal_tx, notices);
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, ttl: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(ttl);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token, view_data.status_ttl);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    bump_status_token(view_data, internal_tx);
}

fn emit_notice(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    notice: Notice,
) {
    debug!(severity = notice.severity.as_str(), title = %notice.title, "notice");
    state.dispatch(AppCommand::Notify(notice));
    bump_status_token(view_data, internal_tx);
}

fn flush_notices(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    notices: Vec<Notice>,
) {
    for notice in notices {
        emit_notice(state, view_data, internal_tx, notice);
    }
}

fn sync_board_events(board: &mut LeadBoard, view_data: &mut ViewData) {
    for event in board.take_events() {
        match event {
            BoardEvent::LeadsChanged { total, visible } => {
                debug!(total, visible, "lead table changed");
                clamp_table_cursor(board, view_data);
            }
            BoardEvent::Failed(error) => debug!(%error, "board reported failure"),
            BoardEvent::SelectionChanged { .. }
            | BoardEvent::LoadingChanged(_)
            | BoardEvent::OptionsChanged => {}
        }
    }
}

fn handle_key_event<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool
where
    R: RecordSource + BulkMutator + ?Sized,
{
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            state.dispatch(AppCommand::ToggleHelp);
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    let quit = match state.mode {
        AppMode::Search => {
            handle_search_key(state, board, view_data, internal_tx, key);
            false
        }
        AppMode::Pick(kind) => {
            handle_picker_key(state, board, runtime, view_data, internal_tx, kind, key);
            false
        }
        AppMode::Nav => handle_nav_key(state, board, runtime, view_data, internal_tx, key),
    };
    sync_board_events(board, view_data);
    quit
}

fn handle_nav_key<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool
where
    R: RecordSource + BulkMutator + ?Sized,
{
    if handle_table_key(state, board, view_data, internal_tx, key) {
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char(' '), _) => toggle_current_row(state, board, view_data, internal_tx),
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            let ids = projection(board, &view_data.table_state)
                .into_iter()
                .map(|lead| lead.id.clone())
                .collect::<Vec<_>>();
            board.select(ids);
            emit_selection_status(state, board, view_data, internal_tx);
        }
        (KeyCode::Char('A'), _) => {
            board.select(Vec::<LeadId>::new());
            emit_status(state, view_data, internal_tx, "selection cleared");
        }
        (KeyCode::Char('/'), _) => {
            state.dispatch(AppCommand::EnterSearch);
        }
        (KeyCode::Char('u'), KeyModifiers::NONE) => {
            open_picker(state, board, view_data, internal_tx, PickerKind::Status);
        }
        (KeyCode::Char('o'), KeyModifiers::NONE) => {
            open_picker(state, board, view_data, internal_tx, PickerKind::Owner);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            refresh_board(state, board, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('?'), _) => {
            state.dispatch(AppCommand::ToggleHelp);
        }
        _ => {}
    }
    false
}

fn handle_search_key(
    state: &mut AppState,
    board: &mut LeadBoard,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.search_input.clear();
            board.apply_filter("");
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, "filter cleared");
        }
        KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
            let message = if view_data.search_input.is_empty() {
                "filter cleared".to_owned()
            } else {
                format!(
                    "filter \"{}\": {} shown",
                    view_data.search_input,
                    board.visible_leads().len()
                )
            };
            emit_status(state, view_data, internal_tx, message);
        }
        KeyCode::Backspace => {
            if view_data.search_input.pop().is_some() {
                board.apply_filter(&view_data.search_input);
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search_input.push(ch);
            board.apply_filter(&view_data.search_input);
        }
        _ => {}
    }
}

fn picker_options(board: &LeadBoard, kind: PickerKind) -> &[PickOption] {
    match kind {
        PickerKind::Status => &board.options().statuses,
        PickerKind::Owner => &board.options().owners,
    }
}

fn open_picker(
    state: &mut AppState,
    board: &LeadBoard,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PickerKind,
) {
    if !board.can_bulk_update() {
        let reason = if board.is_loading() {
            ValidationReason::Busy
        } else {
            ValidationReason::NoSelection
        };
        let notice = BoardError::ValidationFailed { reason }.notice();
        emit_notice(state, view_data, internal_tx, notice);
        return;
    }

    if picker_options(board, kind).is_empty() {
        let notice = Notice::warning(
            "Nothing to pick",
            format!("no {} options loaded, press r to reload", kind.label()),
        );
        emit_notice(state, view_data, internal_tx, notice);
        return;
    }

    view_data.picker = PickerUiState::default();
    state.dispatch(AppCommand::OpenPicker(kind));
}

fn handle_picker_key<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PickerKind,
    key: KeyEvent,
) where
    R: RecordSource + BulkMutator + ?Sized,
{
    let option_count = picker_options(board, kind).len();
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::ExitToNav);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} picker closed", kind.label()),
            );
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.picker.cursor =
                (view_data.picker.cursor + 1).min(option_count.saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.picker.cursor = view_data.picker.cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            let Some(option) = picker_options(board, kind)
                .get(view_data.picker.cursor)
                .cloned()
            else {
                return;
            };
            state.dispatch(AppCommand::ExitToNav);
            apply_bulk(state, board, runtime, view_data, internal_tx, kind, option);
        }
        _ => {}
    }
}

fn apply_bulk<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PickerKind,
    option: PickOption,
) where
    R: RecordSource + BulkMutator + ?Sized,
{
    let mut notices = Vec::new();
    let outcome = match kind {
        PickerKind::Status => board.bulk_update_status(runtime, &mut notices, &option.value),
        PickerKind::Owner => {
            board.bulk_update_owner(runtime, &mut notices, &OwnerId::new(option.value))
        }
    };
    match outcome {
        Ok(count) => info!(count, field = kind.label(), "bulk update applied"),
        Err(error) => debug!(%error, field = kind.label(), "bulk update did not apply"),
    }
    flush_notices(state, view_data, internal_tx, notices);
}

fn refresh_board<R>(
    state: &mut AppState,
    board: &mut LeadBoard,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) where
    R: RecordSource + ?Sized,
{
    let mut notices = Vec::new();
    if let Err(error) = board.refresh(runtime, &mut notices) {
        debug!(%error, "refresh did not complete");
    }

    // A failed first load leaves the pickers empty; retry them here.
    let options = board.options();
    if options.statuses.is_empty() || options.owners.is_empty() {
        if let Err(error) = board.load_options(runtime, &mut notices) {
            debug!(%error, "option lists still unavailable");
        }
    }
    flush_notices(state, view_data, internal_tx, notices);
}

fn toggle_current_row(
    state: &mut AppState,
    board: &mut LeadBoard,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(id) = current_lead_id(board, &view_data.table_state) else {
        emit_status(state, view_data, internal_tx, "no lead under cursor");
        return;
    };

    let mut selection = board.selection().to_vec();
    match selection.iter().position(|selected| selected == &id) {
        Some(index) => {
            selection.remove(index);
        }
        None => selection.push(id),
    }
    board.select(selection);
    emit_selection_status(state, board, view_data, internal_tx);
}

fn emit_selection_status(
    state: &mut AppState,
    board: &LeadBoard,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let selected = board.selection().len();
    emit_status(state, view_data, internal_tx, format!("{selected} selected"));
}

fn current_lead_id(board: &LeadBoard, table_state: &TableUiState) -> Option<LeadId> {
    projection(board, table_state)
        .get(table_state.selected_row)
        .map(|lead| lead.id.clone())
}

fn handle_table_key(
    state: &mut AppState,
    board: &LeadBoard,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let Some(command) = table_command_for_key(key) else {
        return false;
    };

    let event = apply_table_command(board, view_data, command);
    if let TableEvent::Status(status) = event {
        emit_status(state, view_data, internal_tx, status.message());
    }
    true
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(TableCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(TableCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(TableCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(TableCommand::MoveColumn(1)),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(TableCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(TableCommand::JumpLastRow),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(TableCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(TableCommand::ClearSort),
        _ => None,
    }
}

fn apply_table_command(
    board: &LeadBoard,
    view_data: &mut ViewData,
    command: TableCommand,
) -> TableEvent {
    let row_count = board.visible_leads().len();
    let table_state = &mut view_data.table_state;
    match command {
        TableCommand::MoveRow(delta) => {
            table_state.selected_row =
                step(table_state.selected_row, delta).min(row_count.saturating_sub(1));
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            table_state.selected_col =
                step(table_state.selected_col, delta).min(LeadField::ALL.len() - 1);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            table_state.selected_row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            table_state.selected_row = row_count.saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => TableEvent::Status(cycle_sort(table_state)),
        TableCommand::ClearSort => {
            table_state.sort = None;
            TableEvent::Status(TableStatus::SortCleared)
        }
    }
}

fn step(current: usize, delta: isize) -> usize {
    if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    }
}

fn cycle_sort(table_state: &mut TableUiState) -> TableStatus {
    let column = LeadField::ALL[table_state.selected_col.min(LeadField::ALL.len() - 1)];
    let label = column.label();

    table_state.sort = match table_state.sort {
        Some(sort) if sort.column == column => match sort.direction {
            SortDirection::Asc => Some(SortSpec {
                column,
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortSpec {
            column,
            direction: SortDirection::Asc,
        }),
    };

    match table_state.sort.map(|sort| sort.direction) {
        Some(SortDirection::Asc) => TableStatus::SortAsc(label),
        Some(SortDirection::Desc) => TableStatus::SortDesc(label),
        None => TableStatus::SortCleared,
    }
}

fn clamp_table_cursor(board: &LeadBoard, view_data: &mut ViewData) {
    let row_count = board.visible_leads().len();
    view_data.table_state.selected_row = view_data
        .table_state
        .selected_row
        .min(row_count.saturating_sub(1));
}

/// Rows in display order. Sorting only reorders this projection.
fn projection<'a>(board: &'a LeadBoard, table_state: &TableUiState) -> Vec<&'a ViewLead> {
    let mut rows = board.visible_leads().iter().collect::<Vec<_>>();
    if let Some(sort) = table_state.sort {
        rows.sort_by(|left, right| {
            let ordering = compare_text(left.field(sort.column), right.field(sort.column));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    rows
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    board: &LeadBoard,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(board))
        .block(Block::default().title("leadboard").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], board, view_data);

    let status_style = match state.status_line.as_ref().and_then(|line| line.severity) {
        Some(severity) => Style::default().fg(severity_color(severity)),
        None => Style::default().fg(Color::Yellow),
    };
    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let AppMode::Pick(kind) = state.mode {
        let area = centered_rect(50, 50, frame.area());
        frame.render_widget(Clear, area);
        let picker = Paragraph::new(render_picker_text(board, view_data, kind))
            .block(Block::default().title(picker_title(kind)).borders(Borders::ALL));
        frame.render_widget(picker, area);
    }

    if state.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    board: &LeadBoard,
    view_data: &ViewData,
) {
    let table_state = &view_data.table_state;
    let rows = projection(board, table_state);

    let mut widths = vec![Constraint::Length(2)];
    widths.extend(LeadField::ALL.iter().map(|_| Constraint::Min(8)));

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(LeadField::ALL.iter().map(|field| {
        Cell::from(header_label(*field, table_state.sort)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let header = Row::new(header_cells);

    let body = rows.iter().enumerate().map(|(row_index, lead)| {
        let cursor_row = row_index == table_state.selected_row;
        let mark = if board.is_selected(&lead.id) {
            SELECTED_MARK
        } else {
            ""
        };
        let mut cells = vec![Cell::from(mark).style(Style::default().fg(Color::Cyan))];
        cells.extend(
            LeadField::ALL
                .iter()
                .enumerate()
                .map(|(column_index, field)| {
                    let mut style = Style::default();
                    if *field == LeadField::Status {
                        style = status_style(lead.status_class);
                    }
                    if cursor_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if cursor_row && column_index == table_state.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(lead.field(*field).to_owned()).style(style)
                }),
        );
        Row::new(cells)
    });

    let title = if board.is_loading() {
        "leads (loading)"
    } else {
        "leads"
    };
    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    let mut scroll = TableState::default().with_selected(Some(table_state.selected_row));
    frame.render_stateful_widget(table, area, &mut scroll);
}

fn header_label(field: LeadField, sort: Option<SortSpec>) -> String {
    match sort {
        Some(sort) if sort.column == field => {
            let arrow = match sort.direction {
                SortDirection::Asc => "↑",
                SortDirection::Desc => "↓",
            };
            format!("{} {arrow}", field.label())
        }
        _ => field.label().to_owned(),
    }
}

fn status_style(class: StatusClass) -> Style {
    match class {
        StatusClass::Success => Style::default().fg(Color::Green),
        StatusClass::Error => Style::default().fg(Color::Red),
        StatusClass::Weak => Style::default().fg(Color::DarkGray),
        StatusClass::None => Style::default(),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn header_text(board: &LeadBoard) -> String {
    let summary = board.summary();
    let mut parts = vec![
        format!("{} leads", summary.total),
        format!("{} shown", summary.visible),
        format!("{} selected", summary.selected),
    ];
    if !summary.filter.is_empty() {
        parts.push(format!("filter \"{}\"", summary.filter));
    }
    if summary.loading {
        parts.push("loading".to_owned());
    }
    parts.join(" | ")
}

fn picker_title(kind: PickerKind) -> &'static str {
    match kind {
        PickerKind::Status => "set status",
        PickerKind::Owner => "assign owner",
    }
}

fn render_picker_text(board: &LeadBoard, view_data: &ViewData, kind: PickerKind) -> String {
    let selected = board.selection().len();
    let mut lines = vec![
        format!("apply to {selected} selected"),
        String::new(),
    ];
    lines.extend(
        picker_options(board, kind)
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let cursor = if index == view_data.picker.cursor {
                    ">"
                } else {
                    " "
                };
                format!("{cursor} {}", option.label)
            }),
    );
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let (mode, hints) = match state.mode {
        AppMode::Nav => (
            "NAV".to_owned(),
            "j/k/h/l g/G | space/a/A select | / search | s/S sort | u status | o owner | r refresh | ? help | q quit",
        ),
        AppMode::Search => (
            format!("SEARCH /{}", view_data.search_input),
            "type to filter | enter keep | esc clear",
        ),
        AppMode::Pick(_) => ("PICK".to_owned(), "j/k move | enter apply | esc cancel"),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {} | {hints}", status.text),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
nav: j/k rows | h/l columns | g/G first/last | q quit\n\
select: space toggle row | a all shown | A clear\n\
search: / start | type to filter | backspace | enter keep | esc clear\n\
sort: s cycle asc/desc/off on column | S clear\n\
bulk: u set status | o assign owner (needs a selection)\n\
picker: j/k move | enter apply | esc cancel\n\
misc: r refresh | ? help"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
