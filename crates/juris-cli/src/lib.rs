//! Shared CLI components for the juris importer.

pub mod logging;
pub mod pipeline;
