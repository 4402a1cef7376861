// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dispute;
pub mod filter;
pub mod ids;
pub mod model;
pub mod paginate;
pub mod selection;
pub mod sort;
pub mod state;
pub mod validation;
pub mod view;

pub use dispute::*;
pub use filter::{FilterState, FilterValue, distinct_values, filter_records, matches};
pub use ids::*;
pub use model::*;
pub use paginate::{DEFAULT_PAGE_SIZE, Page, PageSummary, PaginationState, paginate};
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortState, compare_fields, sort_records};
pub use state::*;
pub use validation::{ValidationError, ValidationResult};
pub use view::{View, compute_view};
