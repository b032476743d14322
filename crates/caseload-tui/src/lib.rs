// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use caseload_app::{
    Category, ColumnPreset, EditorState, FieldValue, GridCommand, GridEvent, GridState, Record,
    RecordRepository, category_fields, current_slice,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const STATUS_CLEAR_SECS: u64 = 4;
const EDIT_MARK: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Text entry for one cell of the row under edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct InputUiState {
    field: String,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    records: Vec<Record>,
    fields: Vec<String>,
    selected_row: usize,
    selected_col: usize,
    input: Option<InputUiState>,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
}

pub fn run_app<R: RecordRepository>(state: &mut GridState, repo: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh(state, repo, &mut view_data) {
        emit_status(&mut view_data, &internal_tx, format!("load failed: {error}"));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, repo, &mut view_data, &internal_tx, key) {
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

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(STATUS_CLEAR_SECS));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Reloads the active category from the repository and re-clamps the cursor
/// and cell selection against what came back.
fn refresh<R: RecordRepository>(
    state: &mut GridState,
    repo: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    let category = state.active_category();
    view_data.records = repo.list(category)?;
    view_data.fields = category_fields(&view_data.records);

    let events = state.dispatch(
        repo,
        OffsetDateTime::now_utc(),
        GridCommand::SetPage(state.cursor(category).page()),
    )?;
    debug_assert!(matches!(events.as_slice(), [GridEvent::PageChanged { .. }]));

    let page_len = page_records(state, view_data).len();
    if page_len == 0 {
        view_data.selected_row = 0;
    } else if view_data.selected_row >= page_len {
        view_data.selected_row = page_len - 1;
    }

    let columns = visible_fields(state, view_data).len();
    if columns == 0 {
        view_data.selected_col = 0;
    } else if view_data.selected_col >= columns {
        view_data.selected_col = columns - 1;
    }
    Ok(())
}

fn page_records<'a>(state: &GridState, view_data: &'a ViewData) -> &'a [Record] {
    let cursor = state.cursor(state.active_category());
    current_slice(&cursor, &view_data.records)
}

fn visible_fields(state: &GridState, view_data: &ViewData) -> Vec<String> {
    let visible = state
        .visibility(state.active_category())
        .visible_columns(&view_data.fields);
    if visible.is_empty() {
        return view_data.fields.clone();
    }
    visible
}

fn selected_record<'a>(state: &GridState, view_data: &'a ViewData) -> Option<&'a Record> {
    page_records(state, view_data).get(view_data.selected_row)
}

fn dispatch_and_report<R: RecordRepository>(
    state: &mut GridState,
    repo: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: GridCommand,
) {
    let events = match state.dispatch(repo, OffsetDateTime::now_utc(), command) {
        Ok(events) => events,
        Err(error) => {
            emit_status(view_data, internal_tx, format!("operation failed: {error}"));
            return;
        }
    };
    for event in &events {
        if let GridEvent::Notice(message) = event {
            emit_status(view_data, internal_tx, message.clone());
        }
    }
    if let Err(error) = refresh(state, repo, view_data) {
        emit_status(view_data, internal_tx, format!("reload failed: {error}"));
    }
}

fn handle_key_event<R: RecordRepository>(
    state: &mut GridState,
    repo: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.input.is_some() {
        handle_input_key(state, repo, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('?') => {
            view_data.help_visible = true;
        }
        KeyCode::Tab | KeyCode::Char(']') => {
            view_data.selected_row = 0;
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::NextCategory);
        }
        KeyCode::BackTab | KeyCode::Char('[') => {
            view_data.selected_row = 0;
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::PrevCategory);
        }
        KeyCode::Char('n') => {
            view_data.selected_row = 0;
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::NextPage);
        }
        KeyCode::Char('p') => {
            view_data.selected_row = 0;
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::PrevPage);
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let page = (digit as u8 - b'0') as usize;
            view_data.selected_row = 0;
            dispatch_and_report(
                state,
                repo,
                view_data,
                internal_tx,
                GridCommand::SetPage(page),
            );
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = page_records(state, view_data).len();
            if rows > 0 && view_data.selected_row + 1 < rows {
                view_data.selected_row += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let columns = visible_fields(state, view_data).len();
            if columns > 0 && view_data.selected_col + 1 < columns {
                view_data.selected_col += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_data.selected_col = view_data.selected_col.saturating_sub(1);
        }
        KeyCode::Char('v') => {
            let next = next_preset(state.visibility(state.active_category()).preset());
            view_data.selected_col = 0;
            dispatch_and_report(
                state,
                repo,
                view_data,
                internal_tx,
                GridCommand::ApplyPreset(next),
            );
            emit_status(view_data, internal_tx, format!("preset {}", next.as_str()));
        }
        KeyCode::Char('x') => {
            let fields = visible_fields(state, view_data);
            if let Some(field) = fields.get(view_data.selected_col) {
                let command = GridCommand::ToggleColumn(field.clone());
                view_data.selected_col = view_data.selected_col.min(fields.len().saturating_sub(2));
                dispatch_and_report(state, repo, view_data, internal_tx, command);
            }
        }
        KeyCode::Char('e') => {
            if let Some(record) = selected_record(state, view_data) {
                let command = GridCommand::BeginEdit(record.id().clone());
                dispatch_and_report(state, repo, view_data, internal_tx, command);
            }
        }
        KeyCode::Char('a') => {
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::AddRecord);
            let rows = page_records(state, view_data).len();
            view_data.selected_row = rows.saturating_sub(1);
        }
        KeyCode::Char('d') => {
            if let Some(record) = selected_record(state, view_data) {
                let command = GridCommand::DeleteRecord(record.id().clone());
                dispatch_and_report(state, repo, view_data, internal_tx, command);
            }
        }
        KeyCode::Char('s') => {
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::SaveEdit);
        }
        KeyCode::Esc => {
            dispatch_and_report(state, repo, view_data, internal_tx, GridCommand::CancelEdit);
        }
        KeyCode::Enter => {
            open_cell_input(state, view_data, internal_tx);
        }
        _ => {}
    }

    false
}

/// Opens the text input over the selected cell. Only while a row is under
/// edit, and never for the id column or complex fields.
fn open_cell_input(
    state: &GridState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let category = state.active_category();
    let EditorState::Editing { id, buffer } = state.editor(category) else {
        return;
    };

    let fields = visible_fields(state, view_data);
    let Some(field) = fields.get(view_data.selected_col).cloned() else {
        return;
    };

    let Some(record) = view_data.records.iter().find(|record| record.id() == id) else {
        return;
    };
    let value = buffer
        .get(&field)
        .cloned()
        .or_else(|| record.field(&field));
    let Some(value) = value else {
        return;
    };

    if field == "id" || value.is_complex() {
        emit_status(view_data, internal_tx, format!("{field} is read-only"));
        return;
    }

    view_data.input = Some(InputUiState {
        field,
        text: value.display(),
    });
}

fn handle_input_key<R: RecordRepository>(
    state: &mut GridState,
    repo: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.input = None;
        }
        KeyCode::Enter => {
            if let Some(input) = view_data.input.take() {
                let command =
                    GridCommand::ChangeField(input.field, FieldValue::Text(input.text));
                dispatch_and_report(state, repo, view_data, internal_tx, command);
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = view_data.input.as_mut() {
                input.text.pop();
            }
        }
        KeyCode::Char(ch) => {
            if let Some(input) = view_data.input.as_mut() {
                input.text.push(ch);
            }
        }
        _ => {}
    }
}

const fn next_preset(current: ColumnPreset) -> ColumnPreset {
    match current {
        ColumnPreset::Essential => ColumnPreset::Standard,
        ColumnPreset::Standard => ColumnPreset::All,
        ColumnPreset::All | ColumnPreset::Custom => ColumnPreset::Essential,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &GridState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = Category::ALL
        .iter()
        .position(|category| *category == state.active_category())
        .unwrap_or(0);
    let tab_titles = Category::ALL
        .iter()
        .map(|category| category.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("caseload").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    render_grid(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(input) = &view_data.input {
        let area = centered_rect(60, 20, frame.area());
        frame.render_widget(Clear, area);
        let editor = Paragraph::new(format!("{}\n> {}_", input.field, input.text)).block(
            Block::default()
                .title("edit field")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(editor, area);
    }

    if view_data.help_visible {
        let area = centered_rect(76, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, state: &GridState, view_data: &ViewData) {
    let category = state.active_category();
    let rows_on_page = page_records(state, view_data);
    let columns = visible_fields(state, view_data);

    if rows_on_page.is_empty() || columns.is_empty() {
        let empty = Paragraph::new("no records; press a to add one").block(
            Block::default()
                .borders(Borders::ALL)
                .title(grid_title(state, view_data)),
        );
        frame.render_widget(empty, area);
        return;
    }

    let widths = vec![Constraint::Min(8); columns.len()];
    let header_cells = columns.iter().map(|field| {
        Cell::from(field.clone()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let editor = state.editor(category);
    let rows = rows_on_page.iter().enumerate().map(|(row_index, record)| {
        let selected_row = row_index == view_data.selected_row;
        let under_edit = editor.editing_id() == Some(record.id());

        let cells = columns
            .iter()
            .enumerate()
            .map(|(column_index, field)| {
                let staged = if under_edit {
                    editor.buffer().and_then(|buffer| buffer.get(field))
                } else {
                    None
                };
                let mut text = match staged {
                    Some(value) => format!("{}{EDIT_MARK}", value.display()),
                    None => record
                        .field(field)
                        .map(|value| value.display())
                        .unwrap_or_default(),
                };
                if text.is_empty() {
                    text = "-".to_owned();
                }

                let mut style = Style::default();
                if under_edit {
                    style = style.fg(Color::Magenta);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column_index == view_data.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(text).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(grid_title(state, view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn grid_title(state: &GridState, view_data: &ViewData) -> String {
    let category = state.active_category();
    let cursor = state.cursor(category);
    let total = cursor.total_pages(view_data.records.len());
    format!(
        "{} · page {}/{} · {} records · preset {}",
        category.label(),
        cursor.page(),
        total,
        view_data.records.len(),
        state.visibility(category).preset().as_str(),
    )
}

fn status_text(state: &GridState, view_data: &ViewData) -> String {
    if let Some(message) = &view_data.status_line {
        return message.clone();
    }
    if matches!(state.editor(state.active_category()), EditorState::Editing { .. }) {
        return "editing: enter edit cell · s save · esc cancel".to_owned();
    }
    "?: help · tab: category · n/p: page · e: edit · a: add · d: delete".to_owned()
}

fn help_overlay_text() -> String {
    [
        "tab / ]    next category",
        "S-tab / [  previous category",
        "n / p      next / previous page",
        "1-9        jump to page",
        "arrows     move selection (hjkl)",
        "v          cycle column preset",
        "x          hide/show selected column",
        "e          edit selected row",
        "enter      edit selected cell (while editing)",
        "s          save edit",
        "esc        cancel edit",
        "a          add record",
        "d          delete selected row",
        "ctrl-q     quit",
    ]
    .join("\n")
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
