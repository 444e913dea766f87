#![allow(clippy::print_stdout, clippy::print_stderr)]

use crate::cli::{Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use oxrdfio::RdfFormat;
use sparqldb::SparqlDb;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod config;
mod paths;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config file {}", args.config.display()))?;
    let config: config::CliConfig =
        toml::from_str(&config_text).context("parsing config file as TOML")?;

    let db = SparqlDb::connect(config.store_config(), config.mirror_config())
        .await
        .context("connecting to the quad store")?;

    match args.command {
        Command::Load {
            file,
            context,
            format,
        } => load(&db, &file, format.as_deref(), &context).await,
        Command::Query { sparql } => {
            let sparql = match sparql {
                Some(sparql) => sparql,
                None => {
                    let mut buf = String::new();
                    io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading SPARQL query from stdin")?;
                    buf
                }
            };
            run_query(&db, &sparql).await
        }
        Command::Mirror { paths, context } => run_mirror(&db, &paths, &context).await,
    }
}

async fn load(db: &SparqlDb, file: &Path, format: Option<&str>, context: &str) -> anyhow::Result<()> {
    let format = match format {
        Some(name) => rdf_format_from_name(name)?,
        None => rdf_format_from_path(file)?,
    };
    let reader = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    db.parse(reader, format, context)
        .await
        .with_context(|| format!("loading {} into context {context}", file.display()))?;
    println!("loaded {} into {context}", file.display());
    Ok(())
}

async fn run_query(db: &SparqlDb, sparql: &str) -> anyhow::Result<()> {
    let results = db.query(sparql).await.context("running SPARQL query")?;
    for solution in &results.bindings {
        let row: Vec<String> = results
            .vars
            .iter()
            .map(|var| match solution.get(var) {
                Some(term) => format!("{var}={term}"),
                None => format!("{var}=unbound"),
            })
            .collect();
        println!("{}", row.join(" "));
    }
    eprintln!("{} binding(s)", results.len());
    Ok(())
}

async fn run_mirror(db: &SparqlDb, paths_file: &Path, context: &str) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(paths_file)
        .with_context(|| format!("reading resource path file {}", paths_file.display()))?;
    let parsed: paths::ResourcePathsFile =
        toml::from_str(&text).context("parsing resource path file as TOML")?;
    let resource_paths: Vec<_> = parsed.paths.iter().map(paths::to_resource_path).collect();
    db.mirror(&resource_paths, context)
        .await
        .context("mirroring LDF resource paths")?;
    println!("mirrored {} resource path(s) into {context}", resource_paths.len());
    Ok(())
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        bail!(
            "the path {} has no extension to guess a file format from; pass --format",
            path.display()
        )
    };
    RdfFormat::from_extension(ext)
        .with_context(|| format!("the file extension '{ext}' is unknown"))
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(format) = RdfFormat::from_extension(name) {
        return Ok(format);
    }
    if let Some(format) = RdfFormat::from_media_type(name) {
        return Ok(format);
    }
    bail!("the RDF format '{name}' is unknown")
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;
        crate::cli::Args::command().debug_assert();
    }

    #[test]
    fn cli_help() {
        let mut cmd = Command::cargo_bin("sparqldb").unwrap();
        cmd.arg("--help").assert().success();
    }
}
