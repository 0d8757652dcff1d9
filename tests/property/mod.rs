//! Property-based tests for query merging and name generation

mod machine_names;
