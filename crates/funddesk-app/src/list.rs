// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::model::SortDirection;

pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Per-list configuration: where the list persists itself and what its
/// neutral sort looks like. Screens own one of these per entity; the
/// controller never hardcodes a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDefaults {
    pub storage_key: &'static str,
    pub sort_column: &'static str,
    pub sort_direction: SortDirection,
    pub page_size: u32,
    pub sortable_columns: &'static [&'static str],
}

impl ListDefaults {
    pub fn initial_state(&self) -> ListState {
        ListState {
            search_term: String::new(),
            page: 1,
            page_size: self.page_size,
            sort_column: self.sort_column.to_owned(),
            sort_direction: self.sort_direction,
        }
    }
}

/// Canonical search/sort/page state for one entity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    pub search_term: String,
    pub page: u32,
    pub page_size: u32,
    pub sort_column: String,
    pub sort_direction: SortDirection,
}

/// Flat persisted snapshot of [`ListState`]. Every field is optional so
/// records written before a field existed still load; missing fields
/// fall back to the entity defaults on merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedListState {
    pub search_term: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_column: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl PersistedListState {
    pub fn snapshot(state: &ListState) -> Self {
        Self {
            search_term: Some(state.search_term.clone()),
            page: Some(state.page),
            page_size: Some(state.page_size),
            sort_column: Some(state.sort_column.clone()),
            sort_direction: Some(state.sort_direction),
        }
    }

    /// Loaded fields win; missing fields keep the defaults. Out-of-range
    /// values (page 0, page size 0) are treated as absent.
    pub fn merge_onto(self, defaults: &ListDefaults) -> ListState {
        let mut state = defaults.initial_state();
        if let Some(term) = self.search_term {
            state.search_term = term;
        }
        if let Some(page) = self.page
            && page >= 1
        {
            state.page = page;
        }
        if let Some(size) = self.page_size
            && size >= 1
        {
            state.page_size = size;
        }
        if let Some(column) = self.sort_column {
            state.sort_column = column;
        }
        if let Some(direction) = self.sort_direction {
            state.sort_direction = direction;
        }
        state
    }
}

/// Session-scoped persistence for list state. Implementations must not
/// surface failures: a broken store degrades to in-memory-only
/// operation, never to an error the controller sees.
pub trait StateStore {
    fn load(&self, key: &str) -> Option<PersistedListState>;
    fn save(&self, key: &str, state: &PersistedListState);
}

/// No-op store for screens that opt out of persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStateStore;

impl StateStore for NullStateStore {
    fn load(&self, _key: &str) -> Option<PersistedListState> {
        None
    }

    fn save(&self, _key: &str, _state: &PersistedListState) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    SetSearchTerm(String),
    SetPage(u32),
    SetPageSize(u32),
    SetSort {
        column: String,
        direction: SortDirection,
    },
    ResetSort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    SearchChanged(String),
    PageChanged(u32),
    PageSizeChanged(u32),
    SortChanged {
        column: String,
        direction: SortDirection,
    },
}

/// Owns one list's [`ListState`], re-persisting the full snapshot after
/// every mutation. Mutation and persistence are a single step: by the
/// time dispatch returns its events, the store already holds the new
/// snapshot.
pub struct ListController<S: StateStore> {
    defaults: ListDefaults,
    state: ListState,
    store: S,
}

impl<S: StateStore> ListController<S> {
    pub fn new(defaults: ListDefaults, store: S) -> Self {
        let state = match store.load(defaults.storage_key) {
            Some(persisted) => persisted.merge_onto(&defaults),
            None => defaults.initial_state(),
        };
        Self {
            defaults,
            state,
            store,
        }
    }

    pub fn defaults(&self) -> &ListDefaults {
        &self.defaults
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn page_size(&self) -> u32 {
        self.state.page_size
    }

    pub fn sort_column(&self) -> &str {
        &self.state.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.state.sort_direction
    }

    pub fn dispatch(&mut self, command: ListCommand) -> Vec<ListEvent> {
        let events = match command {
            ListCommand::SetSearchTerm(term) => {
                self.state.search_term = term;
                self.state.page = 1;
                vec![
                    ListEvent::SearchChanged(self.state.search_term.clone()),
                    ListEvent::PageChanged(1),
                ]
            }
            ListCommand::SetPage(page) => {
                self.state.page = page.max(1);
                vec![ListEvent::PageChanged(self.state.page)]
            }
            ListCommand::SetPageSize(size) => {
                self.state.page_size = size.max(1);
                self.state.page = 1;
                vec![
                    ListEvent::PageSizeChanged(self.state.page_size),
                    ListEvent::PageChanged(1),
                ]
            }
            ListCommand::SetSort { column, direction } => {
                self.state.sort_column = column;
                self.state.sort_direction = direction;
                self.state.page = 1;
                vec![
                    ListEvent::SortChanged {
                        column: self.state.sort_column.clone(),
                        direction,
                    },
                    ListEvent::PageChanged(1),
                ]
            }
            ListCommand::ResetSort => {
                self.state.sort_column = self.defaults.sort_column.to_owned();
                self.state.sort_direction = self.defaults.sort_direction;
                self.state.page = 1;
                vec![
                    ListEvent::SortChanged {
                        column: self.state.sort_column.clone(),
                        direction: self.state.sort_direction,
                    },
                    ListEvent::PageChanged(1),
                ]
            }
        };

        self.store.save(
            self.defaults.storage_key,
            &PersistedListState::snapshot(&self.state),
        );
        events
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_PAGE_SIZE, ListCommand, ListController, ListDefaults, ListEvent,
        PersistedListState, StateStore,
    };
    use crate::model::SortDirection;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    const DEFAULTS: ListDefaults = ListDefaults {
        storage_key: "list.securities",
        sort_column: "ticker",
        sort_direction: SortDirection::Asc,
        page_size: DEFAULT_PAGE_SIZE,
        sortable_columns: &["ticker", "name", "asset_class"],
    };

    #[derive(Debug, Clone, Default)]
    struct MemoryStore {
        records: Rc<RefCell<HashMap<String, PersistedListState>>>,
    }

    impl StateStore for MemoryStore {
        fn load(&self, key: &str) -> Option<PersistedListState> {
            self.records.borrow().get(key).cloned()
        }

        fn save(&self, key: &str, state: &PersistedListState) {
            self.records
                .borrow_mut()
                .insert(key.to_owned(), state.clone());
        }
    }

    fn controller() -> ListController<MemoryStore> {
        ListController::new(DEFAULTS, MemoryStore::default())
    }

    #[test]
    fn search_page_size_and_sort_all_reset_page() {
        let mut controller = controller();
        controller.dispatch(ListCommand::SetPage(4));
        assert_eq!(controller.page(), 4);

        controller.dispatch(ListCommand::SetSearchTerm("AAPL".to_owned()));
        assert_eq!(controller.page(), 1);

        controller.dispatch(ListCommand::SetPage(3));
        controller.dispatch(ListCommand::SetPageSize(50));
        assert_eq!(controller.page(), 1);

        controller.dispatch(ListCommand::SetPage(2));
        controller.dispatch(ListCommand::SetSort {
            column: "name".to_owned(),
            direction: SortDirection::Desc,
        });
        assert_eq!(controller.page(), 1);

        controller.dispatch(ListCommand::SetPage(5));
        controller.dispatch(ListCommand::ResetSort);
        assert_eq!(controller.page(), 1);
    }

    #[test]
    fn set_page_changes_nothing_else() {
        let mut controller = controller();
        controller.dispatch(ListCommand::SetSearchTerm("VTI".to_owned()));
        controller.dispatch(ListCommand::SetSort {
            column: "name".to_owned(),
            direction: SortDirection::Desc,
        });

        let events = controller.dispatch(ListCommand::SetPage(7));
        assert_eq!(events, vec![ListEvent::PageChanged(7)]);
        assert_eq!(controller.search_term(), "VTI");
        assert_eq!(controller.sort_column(), "name");
        assert_eq!(controller.sort_direction(), SortDirection::Desc);
        assert_eq!(controller.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn reset_sort_restores_entity_defaults() {
        let mut controller = controller();
        controller.dispatch(ListCommand::SetSort {
            column: "asset_class".to_owned(),
            direction: SortDirection::Desc,
        });

        let events = controller.dispatch(ListCommand::ResetSort);
        assert_eq!(controller.sort_column(), "ticker");
        assert_eq!(controller.sort_direction(), SortDirection::Asc);
        assert_eq!(
            events,
            vec![
                ListEvent::SortChanged {
                    column: "ticker".to_owned(),
                    direction: SortDirection::Asc,
                },
                ListEvent::PageChanged(1),
            ],
        );
    }

    #[test]
    fn persisted_state_round_trips_through_a_new_controller() {
        let store = MemoryStore::default();
        let mut first = ListController::new(DEFAULTS, store.clone());
        first.dispatch(ListCommand::SetSearchTerm("AAPL".to_owned()));
        first.dispatch(ListCommand::SetPageSize(50));
        first.dispatch(ListCommand::SetSort {
            column: "ticker".to_owned(),
            direction: SortDirection::Desc,
        });
        first.dispatch(ListCommand::SetPage(3));
        drop(first);

        let second = ListController::new(DEFAULTS, store);
        assert_eq!(second.search_term(), "AAPL");
        assert_eq!(second.page(), 3);
        assert_eq!(second.page_size(), 50);
        assert_eq!(second.sort_column(), "ticker");
        assert_eq!(second.sort_direction(), SortDirection::Desc);
    }

    #[test]
    fn partial_persisted_record_merges_defaults_for_missing_fields() {
        let store = MemoryStore::default();
        store.save(
            DEFAULTS.storage_key,
            &PersistedListState {
                search_term: Some("AAPL".to_owned()),
                page: Some(3),
                page_size: None,
                sort_column: None,
                sort_direction: Some(SortDirection::Desc),
            },
        );

        let controller = ListController::new(DEFAULTS, store);
        assert_eq!(controller.search_term(), "AAPL");
        assert_eq!(controller.page(), 3);
        assert_eq!(controller.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(controller.sort_column(), "ticker");
        assert_eq!(controller.sort_direction(), SortDirection::Desc);
    }

    #[test]
    fn out_of_range_persisted_values_fall_back_to_defaults() {
        let store = MemoryStore::default();
        store.save(
            DEFAULTS.storage_key,
            &PersistedListState {
                page: Some(0),
                page_size: Some(0),
                ..PersistedListState::default()
            },
        );

        let controller = ListController::new(DEFAULTS, store);
        assert_eq!(controller.page(), 1);
        assert_eq!(controller.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn every_dispatch_persists_the_full_snapshot() {
        let store = MemoryStore::default();
        let mut controller = ListController::new(DEFAULTS, store.clone());
        controller.dispatch(ListCommand::SetSearchTerm("VWRL".to_owned()));

        let persisted = store
            .load(DEFAULTS.storage_key)
            .expect("snapshot persisted on dispatch");
        assert_eq!(persisted.search_term.as_deref(), Some("VWRL"));
        assert_eq!(persisted.page, Some(1));
        assert_eq!(persisted.page_size, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(persisted.sort_column.as_deref(), Some("ticker"));
        assert_eq!(persisted.sort_direction, Some(SortDirection::Asc));
    }
}
