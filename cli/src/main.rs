use crate::cli::{Args, Command};
use anyhow::{Context, bail};
use clap::Parser;
use oxhydra::model::ApiDocumentation;
use oxhydra::query::find_model;
use oxhydra::{ApiConfig, PrefixTable, to_json_ld, to_shacl, to_shacl_shapes};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Write, stdin, stdout};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);
    let mut resolver = PrefixTable::standard();
    for (name, iri) in args.prefix {
        resolver = resolver
            .with_prefix(name.as_str(), iri.as_str())
            .with_context(|| format!("The namespace of the prefix {name} is not a valid IRI"))?;
    }
    match args.command {
        Command::Check { file } => {
            let api = load(file.as_deref(), &resolver)?;
            writeln!(
                stdout().lock(),
                "{} is valid: entrypoint {} of class {}, {} supported classes",
                api.id(),
                api.entrypoint(),
                api.entrypoint_class(),
                api.supported_classes().len()
            )?;
            Ok(())
        }
        Command::Jsonld { file, pretty } => {
            let api = load(file.as_deref(), &resolver)?;
            print_json(&to_json_ld(&api, &resolver)?, pretty)
        }
        Command::Shacl { file, pretty } => {
            let api = load(file.as_deref(), &resolver)?;
            print_json(&Value::Array(to_shacl_shapes(&api, &resolver)?), pretty)
        }
        Command::Find {
            file,
            id,
            shacl,
            pretty,
        } => {
            let api = load(file.as_deref(), &resolver)?;
            let Some(model) = find_model(&api, &id) else {
                bail!("No class, supported property or property has the identifier {id}")
            };
            tracing::info!(id = id.as_str(), kind = %model.kind(), "found an entity");
            if shacl {
                let Some(shape) = to_shacl(model, &resolver)? else {
                    bail!("The {} {id} has no SHACL constraints", model.kind())
                };
                print_json(&shape, pretty)
            } else {
                print_json(&to_json_ld(model, &resolver)?, pretty)
            }
        }
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Reads and builds an API description file, or stdin if there is no file.
fn load(file: Option<&Path>, resolver: &PrefixTable) -> anyhow::Result<ApiDocumentation> {
    let config = if let Some(file) = file {
        let reader = BufReader::new(
            File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
        );
        ApiConfig::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", file.display()))?
    } else {
        ApiConfig::from_reader(stdin().lock()).context("Failed to parse stdin")?
    };
    let api = config
        .build(resolver)
        .context("The API description is not valid")?;
    tracing::info!(
        id = api.id().as_str(),
        classes = api.supported_classes().len(),
        "loaded the API documentation"
    );
    Ok(api)
}

fn print_json(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}
