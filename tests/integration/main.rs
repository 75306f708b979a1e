//! Integration tests for graft

mod local_ingest;
mod messaging_bus;
mod readme_export;
