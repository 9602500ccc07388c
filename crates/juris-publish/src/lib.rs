//! Staged publication of normalized batches.
//!
//! A dataset version moves through three phases:
//!
//! 1. **Create** — allocate a draft with the next monotonic number.
//! 2. **Stage** — bulk-write the validated rows in chunks, keyed by the
//!    session checksum so a retried upload never duplicates rows.
//! 3. **Publish** — an atomic swap that retires the previously active
//!    version and makes the new one visible, refused outright when the
//!    staged count disagrees with the validated count.
//!
//! The storage backend is abstracted behind [`VersionStore`]; this crate
//! ships an in-memory reference store and a directory-backed JSON store.
//!
//! # Example
//!
//! ```no_run
//! use juris_model::NormalizedBatch;
//! use juris_publish::{Publisher, PublisherConfig, MemoryStore};
//!
//! async fn import(batch: NormalizedBatch, checksum: &str, valid: usize) -> juris_publish::Result<()> {
//!     let publisher = Publisher::new(MemoryStore::new(), PublisherConfig::default());
//!     let version = publisher.create_version().await?;
//!     publisher.stage(&version.id, &batch, checksum).await?;
//!     let result = publisher.publish(&version.id, valid).await?;
//!     println!("published version {}", result.version_number);
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod publisher;
pub mod retry;
pub mod store;

pub use checksum::{batch_checksum, bytes_checksum};
pub use error::{PublishError, Result};
pub use publisher::{Publisher, PublisherConfig};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use store::{JsonStore, MemoryStore, VersionStore};
