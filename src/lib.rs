//! Incident timeline core.
//!
//! Loads a historical incident CSV once, normalizes its dates, and answers
//! region/city/year-range selections with a per-year incident count plus the
//! matching incidents.

pub mod error;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod query;
pub mod session;
pub mod types;
pub mod util;

pub use error::{DateConstructionError, LoadError, OutputError, QueryError};
pub use normalize::{normalize, Dataset, NormalizeReport};
pub use query::{query, QueryResult};
pub use types::{Incident, RawRow, Selection, YearCount};
