//! CLI command implementations
//!
//! Every command loads the catalog (and optional config), runs one
//! resolution or compilation, and writes a single JSON response. Failures
//! about the requested type are reported in the response; failures to load
//! the catalog or config are returned as `CliError`.

use std::path::Path;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::association::{AssociationDescriptor, AssociationError, AssociationResult, TypeRegistry};
use crate::config::AdminConfig;
use crate::filter::{CompiledCondition, FilterSpec};
use crate::model::AdminModel;
use crate::schema::Catalog;

use super::args::{Command, Target};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Catalog, registry and config a command runs against
pub struct Workspace {
    catalog: Catalog,
    registry: TypeRegistry,
    config: AdminConfig,
}

impl Workspace {
    /// Loads the catalog file and, when given, the config file
    pub fn load(catalog_path: &Path, config_path: Option<&Path>) -> CliResult<Self> {
        let catalog = Catalog::load(catalog_path)?;
        let config = match config_path {
            Some(path) => AdminConfig::load(path)?,
            None => AdminConfig::default(),
        };
        Ok(Self::new(catalog, config))
    }

    /// Registers every catalog type, in declaration order
    pub fn new(catalog: Catalog, config: AdminConfig) -> Self {
        let registry = catalog.registry();
        Self {
            catalog,
            registry,
            config,
        }
    }

    fn model(&self, type_name: &str) -> AssociationResult<AdminModel<'_, Catalog>> {
        AdminModel::lookup(type_name, &self.catalog, &self.registry, &self.config)
    }

    /// Fields and associations of a type, with related types resolved by name
    pub fn describe(&self, type_name: &str) -> AssociationResult<Value> {
        let model = self.model(type_name)?;
        let associations = model
            .associations()?
            .iter()
            .map(|association| self.describe_association(association))
            .collect::<Vec<_>>();

        Ok(json!({
            "type": type_name,
            "table": model.table_name(),
            "primary_key": model.primary_key(),
            "fields": model.properties(),
            "associations": associations,
        }))
    }

    fn describe_association(&self, association: &AssociationDescriptor) -> Value {
        let child = association
            .resolve_child_type(&self.registry)
            .map(|t| json!(t.name()));
        let parents = association
            .resolve_parent_types(&self.registry, &self.catalog)
            .map(|types| json!(types.iter().map(|t| t.name()).collect::<Vec<_>>()));

        let mut value = match serde_json::to_value(association) {
            Ok(value) => value,
            Err(err) => return unserializable_value(&association.name, &CliError::from(err)),
        };
        if let Some(object) = value.as_object_mut() {
            object.insert("collection".to_string(), json!(association.kind.is_collection()));
            object.insert("resolved_child_type".to_string(), resolution_value(child));
            object.insert("resolved_parent_types".to_string(), resolution_value(parents));
        }
        value
    }

    /// Compiled filter condition
    pub fn filter(&self, type_name: &str, spec: &FilterSpec) -> AssociationResult<Value> {
        let condition = self.model(type_name)?.filter_conditions(spec)?;
        Ok(self.condition_value(&condition))
    }

    /// Compiled search condition
    pub fn search(&self, type_name: &str, term: &str) -> AssociationResult<Value> {
        let condition = self.model(type_name)?.query_conditions(term)?;
        Ok(self.condition_value(&condition))
    }

    fn condition_value(&self, condition: &CompiledCondition) -> Value {
        json!({
            "sql": condition.sql(),
            "bindings": condition.bindings(),
            "rendered": condition.render_placeholders(self.config.dialect),
            "dialect": self.config.dialect.name(),
        })
    }
}

fn error_value(code: &str, message: &str) -> Value {
    json!({"error": {"code": code, "message": message}})
}

fn resolution_value(result: AssociationResult<Value>) -> Value {
    match result {
        Ok(value) => value,
        Err(err) => error_value(err.code(), &err.to_string()),
    }
}

/// Inline entry for an association that could not be rendered
fn unserializable_value(name: &str, err: &CliError) -> Value {
    let mut value = error_value(err.code_str(), err.message());
    if let Some(object) = value.as_object_mut() {
        object.insert("name".to_string(), json!(name));
    }
    value
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default level
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adminql=warn")),
        )
        .try_init();
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    init_logging();
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Describe { target } => {
            let workspace = open(&target)?;
            respond(workspace.describe(&target.type_name))
        }
        Command::Filter { target } => {
            let workspace = open(&target)?;
            let spec: FilterSpec = serde_json::from_value(read_request()?)
                .map_err(|e| CliError::invalid_input(format!("Invalid filter map: {}", e)))?;
            respond(workspace.filter(&target.type_name, &spec))
        }
        Command::Search { target, term } => {
            let workspace = open(&target)?;
            respond(workspace.search(&target.type_name, &term))
        }
    }
}

fn open(target: &Target) -> CliResult<Workspace> {
    Workspace::load(&target.catalog, target.config.as_deref())
}

fn respond(result: Result<Value, AssociationError>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(data),
        Err(err) => write_error(err.code(), &err.to_string()),
    }
}
