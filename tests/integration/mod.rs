//! Integration tests for the module ownership registry

mod support;

mod directory_index;
mod export;
mod hashes;
mod people_sync;
mod query;
mod registry_store;
mod validation;
