// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

pub mod editor;
pub mod ids;
pub mod model;
pub mod paging;
pub mod repo;
pub mod state;
pub mod visibility;

pub use editor::*;
pub use ids::*;
pub use model::*;
pub use paging::*;
pub use repo::*;
pub use state::*;
pub use visibility::*;
