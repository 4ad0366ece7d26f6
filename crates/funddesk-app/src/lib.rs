// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod confirm;
pub mod headers;
pub mod ids;
pub mod inflight;
pub mod list;
pub mod model;
pub mod query;
pub mod state;

pub use confirm::*;
pub use headers::*;
pub use ids::*;
pub use inflight::*;
pub use list::*;
pub use model::*;
pub use query::*;
pub use state::*;
