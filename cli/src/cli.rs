use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "oxhydra")]
/// Oxhydra command line toolkit for Hydra API documentations
pub struct Args {
    /// Additional vocabulary prefix
    ///
    /// It is given as NAME=IRI, like `schema=http://schema.org/`, and overrides the standard
    /// `hydra`, `rdf`, `rdfs`, `xsd`, `sh` and `owl` prefixes if the name is the same.
    #[arg(long, global = true, value_name = "NAME=IRI", value_parser = parse_prefix)]
    pub prefix: Vec<(String, String)>,
    /// Write logs to stderr as JSON lines
    ///
    /// The log level is read from the RUST_LOG environment variable and defaults to `warn`.
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that an API description file builds into a valid API documentation
    Check {
        /// The API description file
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    /// Print the JSON-LD serialization of the API documentation
    Jsonld {
        /// The API description file
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the SHACL node shapes of all the supported classes
    Shacl {
        /// The API description file
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the class, supported property or property with a given identifier
    ///
    /// Classes are looked up first, then supported properties, then properties.
    Find {
        /// The API description file
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// The identifier to look for
        #[arg(long)]
        id: String,
        /// Print the SHACL constraints of the entity instead of its JSON-LD serialization
        #[arg(long)]
        shacl: bool,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
}

fn parse_prefix(value: &str) -> Result<(String, String), String> {
    let (name, iri) = value
        .split_once('=')
        .ok_or_else(|| format!("{value} is not of the form NAME=IRI"))?;
    if name.is_empty() || name.contains(':') {
        return Err(format!("{name:?} is not a valid prefix name"));
    }
    Ok((name.to_owned(), iri.to_owned()))
}
