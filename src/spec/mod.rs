mod build;
mod document;
mod errors;
mod load;
mod schema;
mod types;

pub use build::*;
pub use document::*;
pub use errors::{error_catalog, error_schema, ErrorShape};
pub use load::*;
pub use schema::Schema;
pub use types::*;
