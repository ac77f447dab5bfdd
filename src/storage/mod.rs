//! Table persistence, table metadata, and per-run audit records.

pub mod audit;
mod metadata;
mod table_store;

pub use audit::{write_audit_record, AuditRecord};
pub use metadata::TableMetadata;
pub use table_store::{StorageConfig, TableStore};
