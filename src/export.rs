//! Documentation export
//!
//! Renders the module tree and its people as reStructuredText or Markdown.

use crate::config::ExportSettings;
use crate::directory::Directory;
use crate::error::ApiError;
use crate::module::{EmeritusEntry, Module};
use crate::people::{Person, PersonId};
use crate::registry::ExportConfig;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const RST_LIST_TABLE_INDENT: usize = 8;
const MD_LIST_INDENT: usize = 4;
const TITLE: &str = "Module Ownership";
/// RST section underlines, one per nesting depth. The document title uses `=`.
const RST_UNDERLINES: [char; 5] = ['~', '-', '^', '"', '\''];

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Rst,
    Md,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Rst => "rst",
            ExportFormat::Md => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rst" => Ok(ExportFormat::Rst),
            "md" => Ok(ExportFormat::Md),
            _ => Err(ApiError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Escape reStructuredText inline markup. Backslashes go first.
pub fn escape_for_rst(value: &str) -> String {
    escape(value, "\\*`")
}

/// Escape Markdown inline markup. Backslashes go first.
pub fn escape_for_md(value: &str) -> String {
    escape(value, "\\`*_{}[]<>()#+-.!|")
}

/// Escape the text of a Markdown link. Only brackets and backslashes can end the label.
pub fn escape_for_md_link(value: &str) -> String {
    escape(value, "\\[]")
}

fn escape(value: &str, special: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Names from an emeritus list, comma separated. Person entries use the roster's record
/// when the roster knows the id.
pub fn format_emeritus(entries: &[EmeritusEntry], lookup: impl Fn(PersonId) -> Option<Person>) -> String {
    entries
        .iter()
        .filter_map(|entry| match entry {
            EmeritusEntry::Name(name) => Some(name.clone()),
            EmeritusEntry::Person(person) => {
                let person = lookup(person.id).unwrap_or_else(|| person.clone());
                if !person.name.is_empty() {
                    Some(person.name)
                } else if !person.nick.is_empty() {
                    Some(person.nick)
                } else {
                    None
                }
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a [`Directory`] into documentation text.
pub struct Exporter<'a> {
    directory: &'a Directory,
    config: &'a ExportConfig,
    settings: &'a ExportSettings,
}

impl<'a> Exporter<'a> {
    pub fn new(
        directory: &'a Directory,
        config: &'a ExportConfig,
        settings: &'a ExportSettings,
    ) -> Self {
        Self {
            directory,
            config,
            settings,
        }
    }

    pub fn render(&self, format: ExportFormat) -> String {
        let mut out = String::new();
        match format {
            ExportFormat::Rst => {
                let rule = "=".repeat(TITLE.len());
                out.push_str(&format!("{rule}\n{TITLE}\n{rule}\n\n"));
                out.push_str(".. This file is generated from the module registry. Edit the registry instead.\n\n");
                for module in self.directory.modules() {
                    self.rst_module(&mut out, module, 0);
                }
            }
            ExportFormat::Md => {
                out.push_str(&format!("# {TITLE}\n\n"));
                out.push_str("<!-- This file is generated from the module registry. Edit the registry instead. -->\n\n");
                for module in self.directory.modules() {
                    self.md_module(&mut out, module, 2);
                }
            }
        }
        debug!(%format, bytes = out.len(), "Rendered export");
        format!("{}\n", out.trim_end())
    }

    fn people(&self, ids: &[PersonId]) -> Vec<&Person> {
        self.directory.people().resolve(ids)
    }

    fn emeritus(&self, entries: &[EmeritusEntry]) -> String {
        format_emeritus(entries, |id| self.directory.people().get(id).cloned())
    }

    fn person_url(&self, person: &Person) -> String {
        let key = if person.nick.is_empty() {
            person.id.to_string()
        } else {
            person.nick.clone()
        };
        format!("{}{}", self.settings.people_search_url, key)
    }

    fn searchfox_url(&self, path: &str) -> String {
        format!(
            "{}/{}/search?q=&path={}",
            self.settings.searchfox_base_url.trim_end_matches('/'),
            self.directory.repo(),
            path
        )
    }

    fn review_group_url(&self, group: &str) -> String {
        format!(
            "{}/tag/{}/",
            self.settings.review_group_base_url.trim_end_matches('/'),
            group
        )
    }

    fn rst_module(&self, out: &mut String, module: &Module, depth: usize) {
        let underline = RST_UNDERLINES[depth.min(RST_UNDERLINES.len() - 1)];
        let title = escape_for_rst(module.display_name());
        out.push_str(&format!(
            "{}\n{}\n",
            title,
            underline.to_string().repeat(title.chars().count())
        ));
        if let Some(description) = &module.description {
            out.push_str(&format!("{}\n", escape_for_rst(description.trim())));
        }
        out.push_str("\n.. list-table::\n    :stub-columns: 1\n    :widths: 30 70\n\n");

        let link = |text: &str, url: &str| format!("`{} <{}>`__", text, url);
        let indent = " ".repeat(RST_LIST_TABLE_INDENT);
        let block = |items: Vec<String>| {
            items
                .iter()
                .map(|item| format!("\n{}| {}", indent, item))
                .collect::<String>()
        };
        let row = |out: &mut String, label: &str, value: String| {
            out.push_str(&format!("    * - {}\n      - {}\n", label, value.trim_start()));
        };

        let people = |ids: &[PersonId]| {
            block(
                self.people(ids)
                    .into_iter()
                    .map(|p| link(&escape_for_rst(&p.label()), &self.person_url(p)))
                    .collect(),
            )
        };
        let paths = |patterns: &[String]| {
            block(
                patterns
                    .iter()
                    .map(|pattern| {
                        let path = pattern.replace('*', "\\*");
                        if self.config.searchfox_enabled {
                            link(&path, &self.searchfox_url(&path))
                        } else {
                            path
                        }
                    })
                    .collect(),
            )
        };

        if !module.owners.is_empty() {
            row(out, "Owner(s)", people(&module.owners));
        }
        if !module.meta.owners_emeritus.is_empty() {
            row(out, "Owner(s) Emeritus", self.emeritus(&module.meta.owners_emeritus));
        }
        if !module.peers.is_empty() {
            row(out, "Peer(s)", people(&module.peers));
        }
        if !module.meta.peers_emeritus.is_empty() {
            row(out, "Peer(s) Emeritus", self.emeritus(&module.meta.peers_emeritus));
        }
        if !module.includes.is_empty() {
            row(out, "Includes", paths(&module.includes));
        }
        if !module.excludes.is_empty() {
            row(out, "Excludes", paths(&module.excludes));
        }
        if let Some(group) = &module.meta.group {
            row(
                out,
                "Group",
                link(&format!("#{}", group), &self.review_group_url(group)),
            );
        }
        out.push('\n');

        for submodule in &module.submodules {
            self.rst_module(out, submodule, depth + 1);
        }
    }

    fn md_module(&self, out: &mut String, module: &Module, level: usize) {
        out.push_str(&format!(
            "{} {}\n\n",
            "#".repeat(level.min(6)),
            escape_for_md(module.display_name())
        ));
        if let Some(description) = &module.description {
            out.push_str(&format!("{}\n\n", escape_for_md(description.trim())));
        }

        let link = |text: &str, url: &str| format!("[{}]({})", text, url);
        let indent = " ".repeat(MD_LIST_INDENT);
        let list = |items: Vec<String>| {
            items
                .iter()
                .map(|item| format!("\n{}* {}", indent, item))
                .collect::<String>()
        };
        let people = |ids: &[PersonId]| {
            list(
                self.people(ids)
                    .into_iter()
                    .map(|p| link(&escape_for_md_link(&p.label()), &self.person_url(p)))
                    .collect(),
            )
        };
        let paths = |patterns: &[String]| {
            list(
                patterns
                    .iter()
                    .map(|pattern| {
                        let path = pattern.replace('*', "\\*");
                        if self.config.searchfox_enabled {
                            link(&path, &self.searchfox_url(&path))
                        } else {
                            path
                        }
                    })
                    .collect(),
            )
        };

        if !module.owners.is_empty() {
            out.push_str(&format!("* Owner(s):{}\n", people(&module.owners)));
        }
        if !module.meta.owners_emeritus.is_empty() {
            out.push_str(&format!(
                "* Owner(s) Emeritus: {}\n",
                self.emeritus(&module.meta.owners_emeritus)
            ));
        }
        if !module.peers.is_empty() {
            out.push_str(&format!("* Peer(s):{}\n", people(&module.peers)));
        }
        if !module.meta.peers_emeritus.is_empty() {
            out.push_str(&format!(
                "* Peer(s) Emeritus: {}\n",
                self.emeritus(&module.meta.peers_emeritus)
            ));
        }
        if !module.includes.is_empty() {
            out.push_str(&format!("* Includes:{}\n", paths(&module.includes)));
        }
        if !module.excludes.is_empty() {
            out.push_str(&format!("* Excludes:{}\n", paths(&module.excludes)));
        }
        if let Some(group) = &module.meta.group {
            out.push_str(&format!(
                "* Group: {}\n",
                link(&format!("#{}", group), &self.review_group_url(group))
            ));
        }
        out.push('\n');

        for submodule in &module.submodules {
            self.md_module(out, submodule, level + 1);
        }
    }
}

/// Render `directory` in the named format.
pub fn export_to_format(
    directory: &Directory,
    config: &ExportConfig,
    settings: &ExportSettings,
    format: &str,
) -> Result<String, ApiError> {
    let format: ExportFormat = format.parse()?;
    Ok(Exporter::new(directory, config, settings).render(format))
}
