// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::list::ListState;
use crate::model::SortDirection;

/// Wire-level pagination parameters derived from a [`ListState`].
/// Deciding how the backend encodes `filter` into its query grammar is
/// the API client's job; this type only records whether a filter exists
/// and what the term is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub offset: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub filter: Option<String>,
}

impl PageQuery {
    /// Pure projection: no I/O, deterministic given the state.
    pub fn from_state(state: &ListState) -> Self {
        Self {
            limit: state.page_size,
            offset: state
                .page
                .saturating_sub(1)
                .saturating_mul(state.page_size),
            sort_by: state.sort_column.clone(),
            sort_direction: state.sort_direction,
            filter: if state.search_term.is_empty() {
                None
            } else {
                Some(state.search_term.clone())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PageQuery;
    use crate::list::{ListDefaults, ListState, PersistedListState};
    use crate::model::SortDirection;

    fn state() -> ListState {
        ListState {
            search_term: String::new(),
            page: 1,
            page_size: 15,
            sort_column: "ticker".to_owned(),
            sort_direction: SortDirection::Asc,
        }
    }

    #[test]
    fn offset_is_page_minus_one_times_page_size() {
        let mut state = state();
        state.page = 3;
        let query = PageQuery::from_state(&state);
        assert_eq!(query.limit, 15);
        assert_eq!(query.offset, 30);
    }

    #[test]
    fn first_page_has_zero_offset() {
        let query = PageQuery::from_state(&state());
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn huge_persisted_page_saturates_instead_of_overflowing() {
        let defaults = ListDefaults {
            storage_key: "list.securities",
            sort_column: "ticker",
            sort_direction: SortDirection::Asc,
            page_size: 15,
            sortable_columns: &["ticker"],
        };
        let persisted = PersistedListState {
            page: Some(u32::MAX),
            ..PersistedListState::default()
        };
        let state = persisted.merge_onto(&defaults);
        let query = PageQuery::from_state(&state);
        assert_eq!(query.offset, u32::MAX);
    }

    #[test]
    fn empty_search_term_omits_the_filter() {
        let query = PageQuery::from_state(&state());
        assert_eq!(query.filter, None);
    }

    #[test]
    fn non_empty_search_term_becomes_the_filter() {
        let mut state = state();
        state.search_term = "AAPL".to_owned();
        let query = PageQuery::from_state(&state);
        assert_eq!(query.filter.as_deref(), Some("AAPL"));
    }

    #[test]
    fn sort_fields_pass_through() {
        let mut state = state();
        state.sort_column = "name".to_owned();
        state.sort_direction = SortDirection::Desc;
        let query = PageQuery::from_state(&state);
        assert_eq!(query.sort_by, "name");
        assert_eq!(query.sort_direction, SortDirection::Desc);
    }
}
