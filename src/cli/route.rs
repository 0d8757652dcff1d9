//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::config::{ConfigLoader, Settings};
use crate::directory::Directory;
use crate::error::ApiError;
use crate::export::{ExportFormat, Exporter};
use crate::module::ModuleSpec;
use crate::people::{BugzillaClient, PeopleLookup, Person, PersonId};
use crate::registry::store::write_atomic;
use crate::registry::{self, FileRegistry};
use crate::utils::generate_machine_readable_name;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::cli::parse::{Commands, ModuleCommands, PeopleCommands};
use crate::cli::presentation::{
    format_clean_report, format_hash_check, format_init_summary, format_module_list_json,
    format_module_list_text, format_module_show_json, format_module_show_text,
    format_people_search_json, format_people_search_text, format_query_json, format_query_text,
    format_validation_result,
};

/// Text to print and whether the command found the registry in a good state.
/// `success` is false for `validate` and `check-hashes` when they report problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub output: String,
    pub success: bool,
}

impl CommandOutcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: settings, the registry file and the people directory.
pub struct RunContext {
    settings: Settings,
    registry: FileRegistry,
    lookup: Option<Box<dyn PeopleLookup>>,
}

impl RunContext {
    /// Load settings and open the registry. Uses ConfigLoader only.
    ///
    /// A missing directory API key is not an error here: commands that only read the
    /// registry work without it, and the ones that need the directory report it.
    pub fn new(
        registry_path: Option<PathBuf>,
        settings_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let settings = ConfigLoader::load(settings_path.as_deref())?;
        if let Err(errors) = settings.validate() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }

        let registry_path = registry_path.unwrap_or_else(|| settings.registry_file.clone());
        let registry = FileRegistry::new(registry_path)?;

        let lookup: Option<Box<dyn PeopleLookup>> =
            match BugzillaClient::new(&settings.directory) {
                Ok(client) => Some(Box::new(client)),
                Err(e) if e.is_missing_credentials() => None,
                Err(e) => return Err(e),
            };

        Ok(Self {
            settings,
            registry,
            lookup,
        })
    }

    /// Replace the people directory, e.g. with an in-memory one.
    pub fn with_lookup(mut self, lookup: Box<dyn PeopleLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    fn optional_lookup(&self) -> Option<&dyn PeopleLookup> {
        self.lookup.as_deref()
    }

    fn required_lookup(&self) -> Result<&dyn PeopleLookup, ApiError> {
        self.lookup.as_deref().ok_or_else(|| {
            ApiError::MissingCredentials("no API key configured for the people directory".into())
        })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutcome, ApiError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutcome, ApiError> {
        match command {
            Commands::Init => {
                let doc = self.registry.init()?;
                Ok(CommandOutcome::ok(format_init_summary(
                    self.registry.path(),
                    &doc.repo,
                )))
            }
            Commands::Module { command } => self.handle_module_command(command),
            Commands::Validate { repo_path } => {
                let value = self.registry.read_value()?;
                let repo_path = repo_path
                    .clone()
                    .unwrap_or_else(|| self.registry.repo_path().to_path_buf());
                let result = registry::validate(&value, &repo_path);
                Ok(CommandOutcome {
                    output: format_validation_result(&result),
                    success: result.is_ok(),
                })
            }
            Commands::CheckHashes => {
                let doc = self.registry.load()?;
                let mismatches = registry::check_hashes(&doc, self.registry.repo_path())?;
                Ok(CommandOutcome {
                    output: format_hash_check(&mismatches),
                    success: mismatches.is_empty(),
                })
            }
            Commands::Clean { dry_run } => {
                let (_, report) = registry::clean(
                    &self.registry,
                    self.required_lookup()?,
                    &self.settings.export,
                    !dry_run,
                )?;
                Ok(CommandOutcome::ok(format_clean_report(&report, *dry_run)))
            }
            Commands::Query { paths, format } => {
                let directory = self.load_directory(false)?;
                let result = directory.query(paths.as_slice());
                let output = match format.as_str() {
                    "json" => format_query_json(&result)?,
                    _ => format_query_text(&directory, &result),
                };
                Ok(CommandOutcome::ok(output))
            }
            Commands::Export { format, output } => self.handle_export(format.as_deref(), output),
            Commands::People { command } => self.handle_people_command(command),
        }
    }

    fn load_directory(&self, full_paths: bool) -> Result<Directory, ApiError> {
        let doc = self.registry.load()?;
        let mut directory = Directory::new(&doc, self.registry.repo_path());
        directory.load(full_paths, self.optional_lookup())?;
        Ok(directory)
    }

    fn handle_module_command(&self, command: &ModuleCommands) -> Result<CommandOutcome, ApiError> {
        match command {
            ModuleCommands::List { format } => {
                let doc = self.registry.load()?;
                let directory = Directory::new(&doc, self.registry.repo_path());
                let output = match format.as_str() {
                    "json" => format_module_list_json(&directory),
                    _ => format_module_list_text(&directory),
                };
                Ok(CommandOutcome::ok(output))
            }
            ModuleCommands::Show {
                machine_name,
                format,
            } => {
                let doc = self.registry.load()?;
                let directory = Directory::new(&doc, self.registry.repo_path());
                let module = directory
                    .module(machine_name)
                    .ok_or_else(|| ApiError::ModuleNotFound(machine_name.clone()))?;
                let output = match format.as_str() {
                    "json" => format_module_show_json(&directory, module),
                    _ => format_module_show_text(&directory, module),
                };
                Ok(CommandOutcome::ok(output))
            }
            ModuleCommands::Add {
                machine_name,
                name,
                description,
                includes,
                excludes,
                owners,
                peers,
                parent,
                dry_run,
            } => {
                let machine_name = match (machine_name, name) {
                    (Some(machine_name), _) => machine_name.clone(),
                    (None, Some(name)) => generate_machine_readable_name(name),
                    (None, None) => {
                        return Err(ApiError::ConfigError(
                            "a module needs --machine-name or --name".to_string(),
                        ))
                    }
                };
                let reference = |id: &u64| Person::reference(PersonId(*id));
                let spec = ModuleSpec {
                    machine_name: machine_name.clone(),
                    name: name.clone(),
                    description: description.clone(),
                    includes: includes.clone(),
                    excludes: excludes.clone(),
                    owners: owners.iter().map(reference).collect(),
                    peers: peers.iter().map(reference).collect(),
                    ..ModuleSpec::default()
                };
                registry::add(&self.registry, spec, parent.as_deref(), !dry_run)?;
                let location = match parent {
                    Some(parent) => format!(" under {}", parent),
                    None => String::new(),
                };
                let verb = if *dry_run { "Would add" } else { "Added" };
                Ok(CommandOutcome::ok(format!(
                    "{} module {}{}",
                    verb, machine_name, location
                )))
            }
        }
    }

    fn handle_export(
        &self,
        format: Option<&str>,
        output: &Option<PathBuf>,
    ) -> Result<CommandOutcome, ApiError> {
        let doc = self.registry.load()?;
        let format: ExportFormat = format
            .or(doc.export.format.as_deref())
            .unwrap_or(self.settings.export.default_format.as_str())
            .parse()?;
        let directory = Directory::new(&doc, self.registry.repo_path());
        let rendered = Exporter::new(&directory, &doc.export, &self.settings.export).render(format);

        match output {
            Some(path) => {
                write_atomic(path, rendered.as_bytes())?;
                info!(path = %path.display(), %format, "Export written");
                Ok(CommandOutcome::ok(format!(
                    "Exported {} to {}",
                    format,
                    path.display()
                )))
            }
            None => Ok(CommandOutcome::ok(rendered.trim_end().to_string())),
        }
    }

    fn handle_people_command(&self, command: &PeopleCommands) -> Result<CommandOutcome, ApiError> {
        match command {
            PeopleCommands::Search { query, format } => {
                let profiles = self.required_lookup()?.search_people(query)?;
                let output = match format.as_str() {
                    "json" => format_people_search_json(&profiles),
                    _ => format_people_search_text(&profiles),
                };
                Ok(CommandOutcome::ok(output))
            }
            PeopleCommands::Refresh { full, dry_run } => {
                let updated = registry::refresh_people(
                    &self.registry,
                    self.required_lookup()?,
                    *full,
                    !dry_run,
                )?;
                let verb = if *dry_run { "Would update" } else { "Updated" };
                Ok(CommandOutcome::ok(format!(
                    "{} {} person record(s)",
                    verb, updated
                )))
            }
        }
    }
}
