use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparqldb")]
/// SPARQL-to-SQL quad store command line toolkit
pub struct Args {
    /// TOML configuration file: db_url, table_name, aliases, prefixes, endpoints
    #[arg(short, long, value_hint = ValueHint::FilePath, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse an RDF file and bulk-load it into a context
    Load {
        /// File to parse
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Named graph to load the quads into
        #[arg(long)]
        context: String,
        /// RDF format (extension like "ttl" or a MIME type); guessed from
        /// the file extension when omitted
        #[arg(long)]
        format: Option<String>,
    },
    /// Run a SPARQL SELECT query and print its bindings
    Query {
        /// SPARQL query text; reads from stdin when omitted
        #[arg(long)]
        sparql: Option<String>,
    },
    /// Walk LDF resource paths declared in a TOML file
    Mirror {
        /// TOML file describing the resource paths to mirror
        #[arg(value_hint = ValueHint::FilePath)]
        paths: PathBuf,
        /// Named graph to mirror quads into
        #[arg(long)]
        context: String,
    },
}
