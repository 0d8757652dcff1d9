//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ModuleCommands, PeopleCommands};
pub use presentation::{
    format_clean_report, format_hash_check, format_init_summary, format_module_list_json,
    format_module_list_text, format_module_show_json, format_module_show_text,
    format_people_search_json, format_people_search_text, format_query_json, format_query_text,
    format_validation_result,
};
pub use route::{CommandOutcome, RunContext};
