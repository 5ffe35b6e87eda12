use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use oats_core::config::{self, CONFIG_FILE_NAME, OatsConfig};
use oats_core::parse;
use oats_core::registry::OperationSummary;
use oats_core::{Document, OpenApiVersion, Output, TransformOptions};
use oats_typescript::{generate_document_sections, generate_module, generate_sections};

#[derive(Parser)]
#[command(
    name = "oats",
    about = "OpenAPI 2/3 to TypeScript types with Express route contracts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a TypeScript module from an OpenAPI document
    Generate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file, `-` for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Summarize the sections and operations produced for a document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Initialize a new oats configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

/// Flags that override the `options` block of the config file.
#[derive(Args, Default)]
struct TransformArgs {
    /// Force the document version (2 or 3) instead of reading the version tag
    #[arg(long = "openapi-version", value_parser = parse_version)]
    openapi_version: Option<OpenApiVersion>,

    /// Mark generated members readonly
    #[arg(long)]
    immutable_types: bool,

    /// Treat the input as a flat map of schema objects
    #[arg(long)]
    raw_schema: bool,
}

impl TransformArgs {
    fn apply(&self, mut options: TransformOptions) -> TransformOptions {
        if self.openapi_version.is_some() {
            options.version = self.openapi_version;
        }
        options.immutable_types |= self.immutable_types;
        options.raw_schema |= self.raw_schema;
        options
    }
}

fn parse_version(value: &str) -> Result<OpenApiVersion, String> {
    let major: u8 = value
        .parse()
        .map_err(|_| format!("expected 2 or 3, got `{value}`"))?;
    OpenApiVersion::try_from(major)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            transform,
        } => cmd_generate(input, output, &transform),

        Commands::Inspect {
            input,
            format,
            transform,
        } => cmd_inspect(input, format, &transform),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oats", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Project config from the working directory, or defaults when absent.
fn project_config() -> Result<OatsConfig> {
    let cfg = config::load_config(Path::new(CONFIG_FILE_NAME))?;
    Ok(cfg.unwrap_or_default())
}

/// Decode a document file into a generic tree. `.json` files are read as
/// JSON, everything else as YAML.
fn load_value(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    let value = match ext {
        "json" => parse::value_from_json(&content),
        _ => parse::value_from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    transform: &TransformArgs,
) -> Result<()> {
    let cfg = project_config()?;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let options = transform.apply(cfg.options.clone());
    debug!("generating {} with {:?}", input.display(), options);

    let value = load_value(&input)?;
    let module = generate_module(value, &options)
        .with_context(|| format!("failed to generate types from {}", input.display()))?;

    if output.as_os_str() == "-" {
        print!("{module}");
        return Ok(());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(&output, &module).with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("Generated {} from {}", output.display(), input.display());
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat, transform: &TransformArgs) -> Result<()> {
    let cfg = project_config()?;
    let options = transform.apply(cfg.options);
    let value = load_value(&input)?;

    let (document, output, operations) = if options.raw_schema {
        let output = generate_sections(value, &options)
            .with_context(|| format!("failed to transform {}", input.display()))?;
        (None, output, Vec::new())
    } else {
        let document = parse::from_value(value, options.version)
            .with_context(|| format!("failed to parse {}", input.display()))?;
        let (output, operations) = generate_document_sections(&document, &options)
            .with_context(|| format!("failed to transform {}", input.display()))?;
        (Some(document), output, operations)
    };

    let summary = build_inspect_summary(document.as_ref(), &output, &operations, &options);

    let rendered = match format {
        InspectFormat::Yaml => serde_yaml_ng::to_string(&summary)?,
        InspectFormat::Json => serde_json::to_string_pretty(&summary)? + "\n",
    };
    print!("{rendered}");
    Ok(())
}

fn build_inspect_summary(
    document: Option<&Document>,
    output: &Output,
    operations: &[OperationSummary],
    options: &TransformOptions,
) -> serde_json::Value {
    let version = document
        .map(Document::version)
        .or(options.version)
        .unwrap_or(OpenApiVersion::V3);

    let sections: Vec<serde_json::Value> = output
        .iter()
        .map(|(section, text)| {
            serde_json::json!({
                "name": section.as_str(),
                "lines": if text.is_empty() { 0 } else { text.lines().count() },
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "id": op.id,
                "method": op.method.as_str(),
                "path": op.path,
                "scope": op.scope.as_str(),
            })
        })
        .collect();

    let info = document.and_then(Document::info).map(|info| {
        serde_json::json!({
            "title": info.title,
            "version": info.version,
        })
    });

    serde_json::json!({
        "info": info,
        "version": u8::from(version),
        "raw_schema": options.raw_schema,
        "sections": sections,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists, pass --force to replace it");
    }
    fs::write(path, config::default_config_content())
        .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
    eprintln!("Wrote {CONFIG_FILE_NAME}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oats_core::Section;

    #[test]
    fn test_flags_override_config() {
        let file = TransformOptions {
            version: Some(OpenApiVersion::V2),
            immutable_types: true,
            raw_schema: false,
        };

        let unset = TransformArgs::default();
        assert_eq!(unset.apply(file.clone()), file);

        let flags = TransformArgs {
            openapi_version: Some(OpenApiVersion::V3),
            immutable_types: false,
            raw_schema: true,
        };
        let merged = flags.apply(file);
        assert_eq!(merged.version, Some(OpenApiVersion::V3));
        assert!(merged.immutable_types);
        assert!(merged.raw_schema);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("2"), Ok(OpenApiVersion::V2));
        assert_eq!(parse_version("3"), Ok(OpenApiVersion::V3));
        assert!(parse_version("4").is_err());
        assert!(parse_version("three").is_err());
    }

    #[test]
    fn test_cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "oats",
            "generate",
            "-i",
            "api.yaml",
            "-o",
            "-",
            "--openapi-version",
            "2",
            "--immutable-types",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                input,
                output,
                transform,
            } => {
                assert_eq!(input, Some(PathBuf::from("api.yaml")));
                assert_eq!(output, Some(PathBuf::from("-")));
                assert_eq!(transform.openapi_version, Some(OpenApiVersion::V2));
                assert!(transform.immutable_types);
                assert!(!transform.raw_schema);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_load_value_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("api.json");
        fs::write(&json, r#"{ "openapi": "3.0.0" }"#).unwrap();
        let yaml = dir.path().join("api.yml");
        fs::write(&yaml, "swagger: '2.0'\n").unwrap();

        assert_eq!(load_value(&json).unwrap()["openapi"], "3.0.0");
        assert_eq!(load_value(&yaml).unwrap()["swagger"], "2.0");
        assert!(load_value(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_inspect_summary() {
        let value = serde_json::json!({
            "openapi": "3.1.0",
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": { "/pets/{id}": { "get": {}, "delete": { "operationId": "removePet" } } },
            "webhooks": { "ping": { "post": { "operationId": "onPing" } } }
        });
        let options = TransformOptions::default();
        let document = parse::from_value(value, None).unwrap();
        let (output, operations) = generate_document_sections(&document, &options).unwrap();
        let summary = build_inspect_summary(Some(&document), &output, &operations, &options);

        assert_eq!(summary["version"], 3);
        assert_eq!(summary["info"]["title"], "Pets");
        let ids: Vec<&str> = summary["operations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|op| op["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["getPetsById", "removePet", "onPing"]);
        assert_eq!(summary["operations"][2]["scope"], "webhooks");

        let sections = summary["sections"].as_array().unwrap();
        assert_eq!(sections.len(), output.len());
        assert_eq!(sections[0]["name"], Section::Paths.as_str());
        assert_eq!(sections[2]["name"], "components");
        assert_eq!(sections[2]["lines"], 0);
    }

    #[test]
    fn test_inspect_lists_registered_operations_once() {
        let value = serde_json::json!({
            "openapi": "3.0.0",
            "paths": {
                "/a": { "get": { "operationId": "same" } },
                "/b": { "get": { "operationId": "same" } }
            }
        });
        let options = TransformOptions::default();
        let document = parse::from_value(value, None).unwrap();
        let (output, operations) = generate_document_sections(&document, &options).unwrap();
        let summary = build_inspect_summary(Some(&document), &output, &operations, &options);

        let listed = summary["operations"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], "same");
        assert_eq!(listed[0]["path"], "/b");
        assert_eq!(
            output.get(Section::Operations).unwrap().matches("\"same\": {").count(),
            1
        );
    }
}
