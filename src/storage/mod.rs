pub mod reader;
mod schema;
pub mod writer;

pub use reader::{DatasetMeta, load_dashboard};
pub use schema::SCHEMA_VERSION;
pub use writer::Storage;
