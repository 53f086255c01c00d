pub mod aggregate;
pub mod ingest;
pub mod serve;

pub use aggregate::handle_aggregate;
pub use ingest::handle_ingest;
pub use serve::handle_serve;
