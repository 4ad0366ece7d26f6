// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::list::{ListCommand, ListState};
use crate::model::SortDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortIndicator {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortIndicator {
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::None => " ",
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

impl From<SortDirection> for SortIndicator {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// One independently rendered column header. The indicator slot is
/// written only by [`sync_headers`]; exactly one header shows a non-none
/// indicator at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortHeader {
    pub column_key: &'static str,
    pub label: &'static str,
    pub indicator: SortIndicator,
}

impl SortHeader {
    pub const fn new(column_key: &'static str, label: &'static str) -> Self {
        Self {
            column_key,
            label,
            indicator: SortIndicator::None,
        }
    }
}

/// Project the controller's sort state onto the header row. Runs after
/// every sort mutation and whenever the header set changes, so headers
/// mounted late still pick up the active sort.
pub fn sync_headers(state: &ListState, headers: &mut [SortHeader]) {
    for header in headers {
        header.indicator = if header.column_key == state.sort_column {
            SortIndicator::from(state.sort_direction)
        } else {
            SortIndicator::None
        };
    }
}

/// Next command for a header's three-step sort cycle:
/// inactive → asc → desc → neutral. The neutral step issues
/// [`ListCommand::ResetSort`] so the entity default comes back instead
/// of an unspecified sort.
pub fn header_cycle_command(state: &ListState, column_key: &str) -> ListCommand {
    if state.sort_column != column_key {
        return ListCommand::SetSort {
            column: column_key.to_owned(),
            direction: SortDirection::Asc,
        };
    }
    match state.sort_direction {
        SortDirection::Asc => ListCommand::SetSort {
            column: column_key.to_owned(),
            direction: SortDirection::Desc,
        },
        SortDirection::Desc => ListCommand::ResetSort,
    }
}
