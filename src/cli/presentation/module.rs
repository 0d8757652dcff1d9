//! Module presentation: list table and single-module details.

use crate::directory::Directory;
use crate::module::Module;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_module_list_text(directory: &Directory) -> String {
    let modules = directory.modules();
    if modules.is_empty() {
        return "No modules defined.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Machine name", "Name", "Owners", "Peers", "Submodules"]);
    for module in modules {
        table.add_row(vec![
            module.machine_name.clone(),
            module.display_name().to_string(),
            directory.nicks(&module.owners).join(", "),
            directory.nicks(&module.peers).join(", "),
            module.submodules.len().to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} module(s)", table, modules.len())
}

pub fn format_module_list_json(directory: &Directory) -> String {
    let modules: Vec<_> = directory
        .modules()
        .iter()
        .map(|module| {
            json!({
                "machine_name": module.machine_name,
                "name": module.name,
                "owners": directory.nicks(&module.owners),
                "peers": directory.nicks(&module.peers),
                "submodules": module
                    .submodules
                    .iter()
                    .map(|sub| sub.machine_name.as_str())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    let out = json!({ "modules": modules, "total": modules.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        out.push_str(&format!("  {}: (none)\n", label));
        return;
    }
    out.push_str(&format!("  {}:\n", label));
    for item in items {
        out.push_str(&format!("    - {}\n", item));
    }
}

pub fn format_module_show_text(directory: &Directory, module: &Module) -> String {
    let mut output = format!("Module: {}\n", module.machine_name);
    output.push_str(&format!("  Name: {}\n", module.display_name()));
    if let Some(description) = &module.description {
        output.push_str(&format!("  Description: {}\n", description.trim()));
    }
    if let Some(parent) = &module.parent {
        output.push_str(&format!("  Parent: {}\n", parent));
    }
    push_list(&mut output, "Owners", &directory.nicks(&module.owners));
    push_list(&mut output, "Peers", &directory.nicks(&module.peers));
    push_list(&mut output, "Includes", &module.includes);
    push_list(&mut output, "Excludes", &module.excludes);
    if let Some(group) = &module.meta.group {
        output.push_str(&format!("  Review group: #{}\n", group));
    }
    let submodules: Vec<String> = module
        .submodules
        .iter()
        .map(|sub| sub.machine_name.clone())
        .collect();
    push_list(&mut output, "Submodules", &submodules);
    output.trim_end().to_string()
}

pub fn format_module_show_json(directory: &Directory, module: &Module) -> String {
    let out = json!({
        "machine_name": module.machine_name,
        "name": module.name,
        "description": module.description,
        "parent": module.parent,
        "owners": directory.nicks(&module.owners),
        "peers": directory.nicks(&module.peers),
        "includes": module.includes,
        "excludes": module.excludes,
        "group": module.meta.group,
        "exclude_module_paths": module.exclude_module_paths,
        "exclude_submodule_paths": module.exclude_submodule_paths,
        "submodules": module
            .submodules
            .iter()
            .map(|sub| sub.machine_name.as_str())
            .collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
