// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Sequence guard for one list's asynchronous fetches.
///
/// Every issued fetch is tagged with a fresh sequence number; when a
/// response arrives, only the number matching the latest issue may be
/// applied. A slow response that was overtaken by a newer request is
/// dropped instead of overwriting fresher rows. Closing the tracker
/// (screen tear-down) invalidates everything still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchSequence {
    latest: u64,
    closed: bool,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new fetch. Invalidates all previously issued tags.
    pub fn issue(&mut self) -> u64 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    /// Whether a response carrying `seq` is the one that may win.
    pub fn accepts(&self, seq: u64) -> bool {
        !self.closed && seq == self.latest
    }

    /// Discard every in-flight response from now on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}
