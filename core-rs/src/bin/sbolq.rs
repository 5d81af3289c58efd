//! sbolq - SBOL part search CLI
//!
//! Command-line interface for searching parts and reading composite structure

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use sbolq_core::config::CONFIG_FILE;
use sbolq_core::{
    Endpoint, HttpEndpoint, Iri, LocalEndpoint, ResultRecord, Row, SbolClient, SbolqConfig, SearchRequest,
};

#[derive(Parser)]
#[command(name = "sbolq")]
#[command(version)]
#[command(about = "Search SBOL part knowledge bases over SPARQL", long_about = None)]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// SPARQL endpoint URL (overrides config and SBOLQ_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Query a local Turtle file instead of a remote endpoint
    #[arg(long, global = true, conflicts_with = "endpoint")]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No log output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Search parts by keyword, category or type
    Search {
        /// Matched case-insensitively against display id, name and description
        keyword: Option<String>,
        /// Parts Registry category (e.g. promoter, cds, rbs)
        #[arg(long)]
        category: Option<String>,
        /// Type label (rdfs:label of the part type)
        #[arg(long)]
        label: Option<String>,
        /// Maximum number of parts (0 for no limit; default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Also fetch nucleotide sequences
        #[arg(long)]
        sequence: bool,
        /// Print the query instead of running it
        #[arg(long)]
        print: bool,
    },
    /// Show one part
    Show {
        /// Part IRI
        iri: String,
        /// List every statement about the part
        #[arg(long)]
        raw: bool,
    },
    /// List the sub-components of a composite part in order
    Order {
        /// Part IRI
        iri: String,
        /// Expand nested composites down to basic parts
        #[arg(long)]
        flatten: bool,
    },
    /// Tell whether a part is composite
    Composite {
        /// Part IRI
        iri: String,
    },
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        match cli.verbose {
            0 => tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
            1 => tracing_subscriber::EnvFilter::new("info"),
            _ => tracing_subscriber::EnvFilter::new("debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = SbolqConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    config.apply_env().context("Invalid SBOLQ_* environment override")?;
    if let Some(url) = &cli.endpoint {
        config.endpoint.url = url.clone();
        config.validate()?;
    }

    if let Commands::Search {
        keyword,
        category,
        label,
        limit,
        sequence,
        print: true,
    } = &cli.command
    {
        let request = search_request(keyword, category, label, limit.unwrap_or(config.search.default_limit), *sequence);
        println!("{}", request.build()?.compile_pretty());
        return Ok(());
    }

    let endpoint: Box<dyn Endpoint> = match &cli.data {
        Some(path) => {
            let local = LocalEndpoint::new()?;
            local
                .load_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Box::new(local)
        }
        None => Box::new(HttpEndpoint::from_config(&config.endpoint)?),
    };
    let client = SbolClient::new(endpoint);

    match cli.command {
        Commands::Search {
            keyword,
            category,
            label,
            limit,
            sequence,
            ..
        } => {
            let request = search_request(
                &keyword,
                &category,
                &label,
                limit.unwrap_or(config.search.default_limit),
                sequence,
            );
            let records = client.search(&request)?;
            print_records(&records, cli.format)?;
        }

        Commands::Show { iri, raw } => {
            let iri = parse_iri(&iri)?;
            if raw {
                let rows = client.describe(&iri)?;
                print_rows(&rows, cli.format)?;
                return Ok(());
            }
            match client.fetch(&iri)? {
                Some(record) => print_records(std::slice::from_ref(&record), cli.format)?,
                None => anyhow::bail!("Part not found: {}", iri.as_str()),
            }
        }

        Commands::Order { iri, flatten } => {
            let iri = parse_iri(&iri)?;
            let parts = if flatten {
                client.flatten(&iri)?
            } else {
                client.subcomponents(&iri)?
            };
            print_parts(&parts, cli.format)?;
        }

        Commands::Composite { iri } => {
            let iri = parse_iri(&iri)?;
            let composite = client.is_composite(&iri)?;
            match cli.format {
                Format::Table => {
                    let verdict = if composite { "composite".green() } else { "basic".yellow() };
                    println!("{} is {}", iri.as_str().cyan(), verdict);
                }
                Format::Json => println!("{}", serde_json::json!({ "iri": iri.as_str(), "composite": composite })),
                Format::Yaml => print!("iri: {}\ncomposite: {}\n", iri.as_str(), composite),
            }
        }
    }

    Ok(())
}

fn search_request(
    keyword: &Option<String>,
    category: &Option<String>,
    label: &Option<String>,
    limit: usize,
    sequence: bool,
) -> SearchRequest {
    SearchRequest {
        keyword: keyword.clone(),
        category: category.clone(),
        type_label: label.clone(),
        limit,
        with_sequence: sequence,
    }
}

fn parse_iri(text: &str) -> Result<Iri> {
    Iri::new(text).with_context(|| format!("Not a part IRI: {}", text))
}

fn print_records(records: &[ResultRecord], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(records)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(records)?),
        Format::Table => {
            if records.is_empty() {
                println!("No parts found matching query.");
                return Ok(());
            }
            for record in records {
                let id = record.get("displayId").unwrap_or("-");
                println!("{}", id.bold());
                if let Some(identity) = record.identity() {
                    println!("  {:<12} {}", "uri", identity.cyan());
                }
                for (field, value) in record.attributes().iter().filter(|(f, _)| *f != "displayId") {
                    println!("  {:<12} {}", field, value);
                }
            }
            println!("\n{} part(s)", records.len());
        }
    }
    Ok(())
}

fn print_rows(rows: &[Row], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(rows)?),
        Format::Table => {
            for row in rows {
                let cells: Vec<&str> = row.iter().map(|(_, v)| v).collect();
                println!("{}", cells.join("  "));
            }
        }
    }
    Ok(())
}

fn print_parts(parts: &[String], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(parts)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(parts)?),
        Format::Table => {
            if parts.is_empty() {
                println!("Basic part (no sub-components).");
            }
            for (i, part) in parts.iter().enumerate() {
                println!("{:>3}. {}", i + 1, part.cyan());
            }
        }
    }
    Ok(())
}
