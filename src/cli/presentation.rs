//! CLI presentation: text and json formatters per command family.

mod module;
mod people;
mod query;
mod registry;

pub use module::{
    format_module_list_json, format_module_list_text, format_module_show_json,
    format_module_show_text,
};
pub use people::{format_people_search_json, format_people_search_text};
pub use query::{format_query_json, format_query_text};
pub use registry::{
    format_clean_report, format_hash_check, format_init_summary, format_validation_result,
};
