// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use funddesk_app::{
    Account, AppCommand, AppMode, AppState, ConfirmDecision, ConfirmOutcome, ConfirmTarget,
    ConfirmWorkflow, FetchSequence, Fund, ListCommand, ListController, ListDefaults,
    DEFAULT_PAGE_SIZE, Page, PageQuery, Security, SortHeader, StateStore, TabKind, Transaction,
    header_cycle_command, sync_headers,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const PAGE_SIZE_STEP: u32 = 5;
const MIN_PAGE_SIZE: u32 = 5;

/// One fetched page, tagged with the tab it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageSnapshot {
    Securities(Page<Security>),
    Accounts(Page<Account>),
    Funds(Page<Fund>),
    Transactions(Page<Transaction>),
}

impl PageSnapshot {
    pub fn empty(tab: TabKind) -> Self {
        match tab {
            TabKind::Securities => Self::Securities(Page::default()),
            TabKind::Accounts => Self::Accounts(Page::default()),
            TabKind::Funds => Self::Funds(Page::default()),
            TabKind::Transactions => Self::Transactions(Page::default()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Securities(page) => page.items.len(),
            Self::Accounts(page) => page.items.len(),
            Self::Funds(page) => page.items.len(),
            Self::Transactions(page) => page.items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn total_count(&self) -> u64 {
        match self {
            Self::Securities(page) => page.total_count,
            Self::Accounts(page) => page.total_count,
            Self::Funds(page) => page.total_count,
            Self::Transactions(page) => page.total_count,
        }
    }

    pub fn page_count(&self, page_size: u32) -> u32 {
        match self {
            Self::Securities(page) => page.page_count(page_size),
            Self::Accounts(page) => page.page_count(page_size),
            Self::Funds(page) => page.page_count(page_size),
            Self::Transactions(page) => page.page_count(page_size),
        }
    }

    pub fn row_id(&self, index: usize) -> Option<i64> {
        match self {
            Self::Securities(page) => page.items.get(index).map(|row| row.id.get()),
            Self::Accounts(page) => page.items.get(index).map(|row| row.id.get()),
            Self::Funds(page) => page.items.get(index).map(|row| row.id.get()),
            Self::Transactions(page) => page.items.get(index).map(|row| row.id.get()),
        }
    }

    /// Short human label for one row, used in the confirm dialog and in
    /// status messages.
    pub fn row_label(&self, index: usize) -> Option<String> {
        match self {
            Self::Securities(page) => page.items.get(index).map(|row| row.ticker.clone()),
            Self::Accounts(page) => page.items.get(index).map(|row| row.code.clone()),
            Self::Funds(page) => page.items.get(index).map(|row| row.code.clone()),
            Self::Transactions(page) => page.items.get(index).map(|row| row.trade_ref.clone()),
        }
    }

    fn row_cells(&self, index: usize) -> Vec<String> {
        match self {
            Self::Securities(page) => page.items.get(index).map_or_else(Vec::new, |row| {
                vec![
                    row.ticker.clone(),
                    row.name.clone(),
                    row.asset_class.as_str().to_owned(),
                    row.exchange.clone(),
                    row.currency.clone(),
                    active_marker(row.active),
                ]
            }),
            Self::Accounts(page) => page.items.get(index).map_or_else(Vec::new, |row| {
                vec![
                    row.code.clone(),
                    row.name.clone(),
                    row.owner.clone(),
                    row.base_currency.clone(),
                    active_marker(row.active),
                ]
            }),
            Self::Funds(page) => page.items.get(index).map_or_else(Vec::new, |row| {
                vec![
                    row.code.clone(),
                    row.name.clone(),
                    row.manager.clone(),
                    row.base_currency.clone(),
                    row.nav_cents.map(format_money).unwrap_or_default(),
                    active_marker(row.active),
                ]
            }),
            Self::Transactions(page) => page.items.get(index).map_or_else(Vec::new, |row| {
                vec![
                    row.trade_ref.clone(),
                    row.trade_date.to_string(),
                    row.fund_code.clone(),
                    row.ticker.clone(),
                    row.side.as_str().to_owned(),
                    row.quantity.to_string(),
                    format_money(row.amount_cents),
                    row.status.as_str().to_owned(),
                ]
            }),
        }
    }
}

fn active_marker(active: bool) -> String {
    if active { "yes" } else { "no" }.to_owned()
}

fn format_money(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let whole = abs / 100;
    let fraction = abs % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

/// Persistence key plus neutral sort for each entity list. A screen
/// never hardcodes its sort; it reads this registry.
pub fn list_defaults(tab: TabKind) -> ListDefaults {
    match tab {
        TabKind::Securities => ListDefaults {
            storage_key: "list.securities",
            sort_column: "ticker",
            sort_direction: funddesk_app::SortDirection::Asc,
            page_size: DEFAULT_PAGE_SIZE,
            sortable_columns: &["ticker", "name", "asset_class", "exchange"],
        },
        TabKind::Accounts => ListDefaults {
            storage_key: "list.accounts",
            sort_column: "code",
            sort_direction: funddesk_app::SortDirection::Asc,
            page_size: DEFAULT_PAGE_SIZE,
            sortable_columns: &["code", "name", "owner", "base_currency"],
        },
        TabKind::Funds => ListDefaults {
            storage_key: "list.funds",
            sort_column: "name",
            sort_direction: funddesk_app::SortDirection::Asc,
            page_size: DEFAULT_PAGE_SIZE,
            sortable_columns: &["name", "code", "manager", "nav"],
        },
        TabKind::Transactions => ListDefaults {
            storage_key: "list.transactions",
            sort_column: "trade_date",
            sort_direction: funddesk_app::SortDirection::Desc,
            page_size: DEFAULT_PAGE_SIZE,
            sortable_columns: &["trade_date", "trade_ref", "fund_code", "ticker", "amount"],
        },
    }
}

fn tab_headers(tab: TabKind) -> Vec<SortHeader> {
    match tab {
        TabKind::Securities => vec![
            SortHeader::new("ticker", "Ticker"),
            SortHeader::new("name", "Name"),
            SortHeader::new("asset_class", "Class"),
            SortHeader::new("exchange", "Exchange"),
            SortHeader::new("currency", "Ccy"),
            SortHeader::new("active", "Active"),
        ],
        TabKind::Accounts => vec![
            SortHeader::new("code", "Code"),
            SortHeader::new("name", "Name"),
            SortHeader::new("owner", "Owner"),
            SortHeader::new("base_currency", "Ccy"),
            SortHeader::new("active", "Active"),
        ],
        TabKind::Funds => vec![
            SortHeader::new("code", "Code"),
            SortHeader::new("name", "Name"),
            SortHeader::new("manager", "Manager"),
            SortHeader::new("base_currency", "Ccy"),
            SortHeader::new("nav", "NAV"),
            SortHeader::new("active", "Active"),
        ],
        TabKind::Transactions => vec![
            SortHeader::new("trade_ref", "Ref"),
            SortHeader::new("trade_date", "Date"),
            SortHeader::new("fund_code", "Fund"),
            SortHeader::new("ticker", "Ticker"),
            SortHeader::new("side", "Side"),
            SortHeader::new("quantity", "Qty"),
            SortHeader::new("amount", "Amount"),
            SortHeader::new("status", "Status"),
        ],
    }
}

/// Everything one tab needs to show and refetch its list. The
/// [`FetchSequence`] belongs to the screen, so switching tabs never
/// lets one list's stale response land on another.
pub struct ListScreen<S: StateStore> {
    pub tab: TabKind,
    pub controller: ListController<S>,
    pub headers: Vec<SortHeader>,
    pub snapshot: PageSnapshot,
    pub sequence: FetchSequence,
    pub selected_row: usize,
    pub selected_col: usize,
    pub loading: bool,
    pub primed: bool,
}

impl<S: StateStore> ListScreen<S> {
    pub fn new(tab: TabKind, store: S, default_page_size: u32) -> Self {
        let mut defaults = list_defaults(tab);
        defaults.page_size = default_page_size.max(1);
        let controller = ListController::new(defaults, store);
        let mut headers = tab_headers(tab);
        sync_headers(controller.state(), &mut headers);
        Self {
            tab,
            controller,
            headers,
            snapshot: PageSnapshot::empty(tab),
            sequence: FetchSequence::new(),
            selected_row: 0,
            selected_col: 0,
            loading: false,
            primed: false,
        }
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::from_state(self.controller.state())
    }

    pub fn page_count(&self) -> u32 {
        self.snapshot.page_count(self.controller.page_size())
    }

    fn apply_snapshot(&mut self, snapshot: PageSnapshot) {
        self.snapshot = snapshot;
        if self.snapshot.is_empty() {
            self.selected_row = 0;
        } else {
            self.selected_row = self.selected_row.min(self.snapshot.len() - 1);
        }
    }

    fn selected_column_key(&self) -> &'static str {
        self.headers
            .get(self.selected_col)
            .map_or("", |header| header.column_key)
    }

    fn selected_column_sortable(&self) -> bool {
        let key = self.selected_column_key();
        self.controller
            .defaults()
            .sortable_columns
            .iter()
            .any(|column| *column == key)
    }
}

/// Backend seam for the UI. The blanket `spawn_fetch` runs the fetch
/// inline and posts the tagged result over the channel; a runtime that
/// owns real I/O can override it to move the work off-thread. Either
/// way results come back as [`PageEvent`]s, so the event loop is the
/// only writer of screen state.
pub trait ApiRuntime {
    fn fetch_page(&mut self, tab: TabKind, query: &PageQuery) -> Result<PageSnapshot>;
    fn deactivate(&mut self, tab: TabKind, id: i64) -> Result<()>;
    fn spawn_fetch(&mut self, tab: TabKind, seq: u64, query: &PageQuery, tx: Sender<PageEvent>) {
        let result = self.fetch_page(tab, query).map_err(|error| error.to_string());
        let _ = tx.send(PageEvent::Loaded { tab, seq, result });
    }
}

/// Result of one fetch, tagged with the sequence number it was issued
/// under. Stale tags are dropped on receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Loaded {
        tab: TabKind,
        seq: u64,
        result: Result<PageSnapshot, String>,
    },
    ClearStatus {
        token: u64,
    },
}

pub struct ViewData<S: StateStore> {
    pub screens: Vec<ListScreen<S>>,
    pub search_input: String,
    pub confirm: Option<ConfirmWorkflow>,
    pub help_visible: bool,
    pub status_token: u64,
}

impl<S: StateStore + Clone> ViewData<S> {
    pub fn new(store: S, default_page_size: u32) -> Self {
        let screens = TabKind::ALL
            .iter()
            .map(|tab| ListScreen::new(*tab, store.clone(), default_page_size))
            .collect();
        Self {
            screens,
            search_input: String::new(),
            confirm: None,
            help_visible: false,
            status_token: 0,
        }
    }
}

impl<S: StateStore> ViewData<S> {
    pub fn screen(&self, tab: TabKind) -> &ListScreen<S> {
        self.screens
            .iter()
            .find(|screen| screen.tab == tab)
            .expect("screen exists for every tab")
    }

    pub fn screen_mut(&mut self, tab: TabKind) -> &mut ListScreen<S> {
        self.screens
            .iter_mut()
            .find(|screen| screen.tab == tab)
            .expect("screen exists for every tab")
    }
}

pub fn run_app<R: ApiRuntime, S: StateStore + Clone>(
    state: &mut AppState,
    runtime: &mut R,
    store: S,
    default_page_size: u32,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(store, default_page_size);
    let (internal_tx, internal_rx) = mpsc::channel();

    request_fetch(runtime, view_data.screen_mut(state.active_tab), &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    // Anything still in flight at shutdown is dropped, not applied.
    for screen in &mut view_data.screens {
        screen.sequence.close();
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn request_fetch<R: ApiRuntime, S: StateStore>(
    runtime: &mut R,
    screen: &mut ListScreen<S>,
    tx: &Sender<PageEvent>,
) {
    let seq = screen.sequence.issue();
    screen.loading = true;
    screen.primed = true;
    let query = screen.query();
    runtime.spawn_fetch(screen.tab, seq, &query, tx.clone());
}

fn process_internal_events<S: StateStore>(
    state: &mut AppState,
    view_data: &mut ViewData<S>,
    tx: &Sender<PageEvent>,
    rx: &Receiver<PageEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            PageEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            PageEvent::ClearStatus { .. } => {}
            PageEvent::Loaded { tab, seq, result } => {
                handle_page_loaded(state, view_data, tx, tab, seq, result);
            }
        }
    }
}

fn handle_page_loaded<S: StateStore>(
    state: &mut AppState,
    view_data: &mut ViewData<S>,
    tx: &Sender<PageEvent>,
    tab: TabKind,
    seq: u64,
    result: Result<PageSnapshot, String>,
) {
    let screen = view_data.screen_mut(tab);
    if !screen.sequence.accepts(seq) {
        return;
    }
    screen.loading = false;

    match result {
        Ok(snapshot) => screen.apply_snapshot(snapshot),
        Err(message) => {
            // Keep the last good page on screen; only the status line
            // reports the failure.
            emit_status(state, view_data, tx, format!("load failed: {message}"));
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<PageEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(PageEvent::ClearStatus { token });
    });
}

fn emit_status<S: StateStore>(
    state: &mut AppState,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: ApiRuntime, S: StateStore>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
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

    match state.mode {
        AppMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Confirm => {
            handle_confirm_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_search_key<R: ApiRuntime, S: StateStore>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.search_input.clear();
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Enter => {
            let term = view_data.search_input.trim().to_owned();
            view_data.search_input.clear();
            state.dispatch(AppCommand::ExitToNav);

            let tab = state.active_tab;
            let screen = view_data.screen_mut(tab);
            screen.controller.dispatch(ListCommand::SetSearchTerm(term));
            request_fetch(runtime, screen, internal_tx);
        }
        KeyCode::Backspace => {
            view_data.search_input.pop();
        }
        KeyCode::Char(ch) => view_data.search_input.push(ch),
        _ => {}
    }
}

fn handle_confirm_key<R: ApiRuntime, S: StateStore>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
    key: KeyEvent,
) {
    let decision = match key.code {
        KeyCode::Char('y') | KeyCode::Enter => ConfirmDecision::Confirm,
        KeyCode::Char('n') | KeyCode::Esc => ConfirmDecision::Dismiss,
        _ => return,
    };

    let Some(workflow) = view_data.confirm.take() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };
    state.dispatch(AppCommand::ExitToNav);

    let tab = state.active_tab;
    let label = workflow.target().label.clone();
    let outcome = workflow.resolve(decision, |id| runtime.deactivate(tab, id));

    match outcome {
        ConfirmOutcome::Success => {
            emit_status(state, view_data, internal_tx, format!("{label} deactivated"));
            let screen = view_data.screen_mut(tab);
            request_fetch(runtime, screen, internal_tx);
        }
        ConfirmOutcome::Failure(message) => {
            emit_status(state, view_data, internal_tx, message);
        }
        ConfirmOutcome::Dismissed => {}
    }
}

fn handle_nav_key<R: ApiRuntime, S: StateStore>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Tab => {
            state.dispatch(AppCommand::NextTab);
            prime_tab(state, runtime, view_data, internal_tx);
        }
        KeyCode::BackTab => {
            state.dispatch(AppCommand::PrevTab);
            prime_tab(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('/') => {
            view_data.search_input = view_data
                .screen(state.active_tab)
                .controller
                .search_term()
                .to_owned();
            state.dispatch(AppCommand::EnterSearch);
        }
        KeyCode::Up => {
            let screen = view_data.screen_mut(state.active_tab);
            screen.selected_row = screen.selected_row.saturating_sub(1);
        }
        KeyCode::Down => {
            let screen = view_data.screen_mut(state.active_tab);
            if !screen.snapshot.is_empty() {
                screen.selected_row = (screen.selected_row + 1).min(screen.snapshot.len() - 1);
            }
        }
        KeyCode::Left => {
            let screen = view_data.screen_mut(state.active_tab);
            screen.selected_col = screen.selected_col.saturating_sub(1);
        }
        KeyCode::Right => {
            let screen = view_data.screen_mut(state.active_tab);
            if !screen.headers.is_empty() {
                screen.selected_col = (screen.selected_col + 1).min(screen.headers.len() - 1);
            }
        }
        KeyCode::Char('s') => cycle_sort(state, runtime, view_data, internal_tx),
        KeyCode::Char('S') => {
            let screen = view_data.screen_mut(state.active_tab);
            screen.controller.dispatch(ListCommand::ResetSort);
            let list_state = screen.controller.state().clone();
            sync_headers(&list_state, &mut screen.headers);
            request_fetch(runtime, screen, internal_tx);
            emit_status(state, view_data, internal_tx, "sort reset");
        }
        KeyCode::Char('[') => {
            let screen = view_data.screen_mut(state.active_tab);
            let page = screen.controller.page();
            if page > 1 {
                screen.controller.dispatch(ListCommand::SetPage(page - 1));
                request_fetch(runtime, screen, internal_tx);
            }
        }
        KeyCode::Char(']') => {
            let screen = view_data.screen_mut(state.active_tab);
            let page = screen.controller.page();
            if page < screen.page_count() {
                screen.controller.dispatch(ListCommand::SetPage(page + 1));
                request_fetch(runtime, screen, internal_tx);
            }
        }
        KeyCode::Char('+') => {
            let screen = view_data.screen_mut(state.active_tab);
            let size = screen.controller.page_size() + PAGE_SIZE_STEP;
            screen.controller.dispatch(ListCommand::SetPageSize(size));
            request_fetch(runtime, screen, internal_tx);
        }
        KeyCode::Char('-') => {
            let screen = view_data.screen_mut(state.active_tab);
            let size = screen.controller.page_size();
            if size > MIN_PAGE_SIZE {
                let size = (size - PAGE_SIZE_STEP).max(MIN_PAGE_SIZE);
                screen.controller.dispatch(ListCommand::SetPageSize(size));
                request_fetch(runtime, screen, internal_tx);
            }
        }
        KeyCode::Char('r') => {
            let screen = view_data.screen_mut(state.active_tab);
            request_fetch(runtime, screen, internal_tx);
        }
        KeyCode::Char('d') => open_confirm(state, view_data, internal_tx),
        _ => {}
    }
    false
}

fn prime_tab<R: ApiRuntime, S: StateStore>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
) {
    let screen = view_data.screen_mut(state.active_tab);
    if !screen.primed {
        request_fetch(runtime, screen, internal_tx);
    }
}

fn cycle_sort<R: ApiRuntime, S: StateStore>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
) {
    let tab = state.active_tab;
    let screen = view_data.screen_mut(tab);
    if !screen.selected_column_sortable() {
        let label = screen
            .headers
            .get(screen.selected_col)
            .map_or("column", |header| header.label);
        let message = format!("cannot sort by {label}");
        emit_status(state, view_data, internal_tx, message);
        return;
    }

    let command = header_cycle_command(screen.controller.state(), screen.selected_column_key());
    screen.controller.dispatch(command);
    let list_state = screen.controller.state().clone();
    sync_headers(&list_state, &mut screen.headers);
    request_fetch(runtime, screen, internal_tx);

    let message = format!(
        "sort {} {}",
        list_state.sort_column,
        list_state.sort_direction.as_str()
    );
    emit_status(state, view_data, internal_tx, message);
}

fn open_confirm<S: StateStore>(
    state: &mut AppState,
    view_data: &mut ViewData<S>,
    internal_tx: &Sender<PageEvent>,
) {
    let tab = state.active_tab;
    if !tab.supports_deactivate() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "transactions are read-only",
        );
        return;
    }

    let screen = view_data.screen(tab);
    let index = screen.selected_row;
    let (Some(id), Some(label)) = (screen.snapshot.row_id(index), screen.snapshot.row_label(index))
    else {
        emit_status(state, view_data, internal_tx, "no row selected");
        return;
    };

    view_data.confirm = Some(ConfirmWorkflow::open(ConfirmTarget::new(id, label)));
    state.dispatch(AppCommand::OpenConfirm);
}

fn render<S: StateStore>(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData<S>,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("funddesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(workflow) = &view_data.confirm {
        let area = centered_rect(44, 20, frame.area());
        frame.render_widget(Clear, area);
        let prompt = format!(
            "Deactivate {}?\n\n[y] confirm    [n] cancel",
            workflow.target().label
        );
        let dialog = Paragraph::new(prompt).block(
            Block::default()
                .title("confirm")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(dialog, area);
    }

    if view_data.help_visible {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table<S: StateStore>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData<S>,
) {
    let screen = view_data.screen(state.active_tab);

    let header_cells = screen.headers.iter().enumerate().map(|(index, header)| {
        let text = format!("{} {}", header.label, header.indicator.glyph());
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if index == screen.selected_col {
            style = style.fg(Color::Cyan);
        }
        Cell::from(text.trim_end().to_owned()).style(style)
    });
    let header = Row::new(header_cells);

    let rows = (0..screen.snapshot.len()).map(|index| {
        let cells = screen
            .snapshot
            .row_cells(index)
            .into_iter()
            .map(Cell::from);
        let row = Row::new(cells);
        if index == screen.selected_row {
            row.style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            row
        }
    });

    let widths = column_widths(screen.headers.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(table_title(screen)).borders(Borders::ALL));
    frame.render_widget(table, area);
}

/// Equal column widths. Ratio constraints split the full table width
/// without the remainder an integer percentage would drop.
fn column_widths(column_count: usize) -> Vec<Constraint> {
    let column_count = column_count.max(1);
    vec![Constraint::Ratio(1, column_count as u32); column_count]
}

fn table_title<S: StateStore>(screen: &ListScreen<S>) -> String {
    let mut title = format!(
        "{} · page {}/{} · {} rows",
        screen.tab.label(),
        screen.controller.page(),
        screen.page_count(),
        screen.snapshot.total_count(),
    );
    if !screen.controller.search_term().is_empty() {
        title.push_str(&format!(" · search \"{}\"", screen.controller.search_term()));
    }
    if screen.loading {
        title.push_str(" · loading…");
    }
    title
}

fn status_text<S: StateStore>(state: &AppState, view_data: &ViewData<S>) -> String {
    if state.mode == AppMode::Search {
        return format!("/{}▏", view_data.search_input);
    }
    if let Some(message) = &state.status_line {
        return message.clone();
    }
    "tab switch · / search · ←→ column · s sort · [ ] page · +/- size · d deactivate · r refresh · ? help · q quit"
        .to_owned()
}

fn help_overlay_text() -> String {
    [
        "tab / shift-tab   switch entity tab",
        "/                 edit search, enter applies, esc cancels",
        "← →               select column",
        "s                 cycle sort: asc, desc, default",
        "S                 reset sort to the entity default",
        "[ ]               previous / next page",
        "+ -               grow / shrink page size",
        "↑ ↓               select row",
        "d                 deactivate selected row (y confirms, n cancels)",
        "r                 refetch the current page",
        "?                 toggle this help",
        "q / ctrl-q        quit",
    ]
    .join("\n")
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
