//! People directory presentation.

use crate::people::Profile;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_people_search_text(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No matching people found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Nick", "Real name", "Email"]);
    for profile in profiles {
        table.add_row(vec![
            profile.id.to_string(),
            profile.nick.clone(),
            profile.real_name.clone(),
            profile.email.clone().unwrap_or_default(),
        ]);
    }
    format!("{}\n\nTotal: {} match(es)", table, profiles.len())
}

pub fn format_people_search_json(profiles: &[Profile]) -> String {
    let out = json!({ "people": profiles, "total": profiles.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
