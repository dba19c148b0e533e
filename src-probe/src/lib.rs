pub mod probe;
pub mod resources;
pub mod schema;
pub mod utils;

pub use probe::{ProbeReport, ProbeRequest};
pub use resources::{ResourceSource, SourceKind};
pub use schema::{SchemaDocument, SchemaDraft, SerializeStyle};
