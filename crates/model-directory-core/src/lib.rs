#[cfg(feature = "network")]
pub mod api;
#[cfg(feature = "network")]
pub mod cache;
pub mod calculator;
pub mod catalog;
pub mod directory;
pub mod error;
pub mod mode;
pub mod model;
pub mod provider;
pub mod route;
pub mod snippet;
pub mod suggest;
#[cfg(feature = "network")]
pub mod sync;

pub use calculator::{calculate_cost, visible_fields, CalculationInput, CostResult};
pub use directory::{DirectoryState, Filters, Scope, Selection, SortKey, SortState};
pub use error::CatalogError;
pub use mode::Mode;
pub use model::{ModelData, ProcessedModel};
pub use suggest::{suggest, SearchBox, Suggestion};
