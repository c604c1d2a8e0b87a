use clap::{Parser, Subcommand};
use kumitate::prelude::*;
use std::fs;
use std::path::PathBuf;

mod logger;

/// Inspect, instantiate, validate and repair workflow graphs stored as JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Store settings JSON applied to the graph store
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every registered node type with its ports
    Catalog,
    /// List the built-in templates
    Templates {
        /// Only show templates carrying this category tag
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Create a new graph from a template
    Instantiate {
        template_id: String,
        /// Write the graph here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a graph file; exits with status 1 when it has errors
    Validate {
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply every automatic fix to a graph file
    Fix {
        path: PathBuf,
        /// Write the repaired graph here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let catalog = NodeCatalog::new();
    let store_config = cli.config.as_ref().map(load_store_config).unwrap_or_default();

    match cli.command {
        Command::Catalog => print_catalog(&catalog),
        Command::Templates { category } => print_templates(&catalog, category.as_deref()),
        Command::Instantiate {
            template_id,
            output,
        } => {
            let registry = TemplateRegistry::builtin();
            let graph = TemplateLoader::new(&catalog, &registry)
                .with_suffix_length(store_config.id_suffix_length)
                .instantiate(&template_id)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            write_graph(&graph, output);
        }
        Command::Validate { path, json } => {
            let graph = load_graph(&path, &catalog);
            let report = Validator::new(&catalog).report(&graph);
            if json {
                let out = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
                    exit_with_error(&format!("Failed to serialize report: {}", e))
                });
                println!("{}", out);
            } else {
                print_report(&graph, &report);
            }
            if !report.is_valid {
                std::process::exit(1);
            }
        }
        Command::Fix { path, output } => {
            let graph = load_graph(&path, &catalog);
            let mut store = GraphStore::builder(&catalog)
                .config(store_config)
                .graph(graph)
                .build();
            let applied = Validator::new(&catalog).fix_all(&mut store);
            log::info!("Applied {} fix(es) to '{}'", applied, path.display());
            write_graph(store.graph(), output);
        }
    }
}

fn print_catalog(catalog: &NodeCatalog) {
    for descriptor in catalog.iter() {
        let ports = |defs: &[kumitate::catalog::PortDefinition]| {
            defs.iter()
                .map(|p| {
                    if p.required {
                        format!("{}*", p.name)
                    } else {
                        p.name.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!(
            "{:<24} {:<12} in: [{}] out: [{}]",
            descriptor.node_type.as_str(),
            format!("{:?}", descriptor.category),
            ports(descriptor.inputs),
            ports(descriptor.outputs)
        );
    }
}

fn print_templates(catalog: &NodeCatalog, category: Option<&str>) {
    let registry = TemplateRegistry::builtin();
    let loader = TemplateLoader::new(catalog, &registry);
    for summary in loader.list_templates(category) {
        println!(
            "{:<20} {} ({} nodes, {} connections) [{}]",
            summary.id,
            summary.name,
            summary.node_count,
            summary.connection_count,
            summary.categories.join(", ")
        );
    }
}

fn print_report(graph: &Graph, report: &ValidationReport) {
    println!(
        "'{}': {} node(s), {} connection(s)",
        graph.name,
        graph.node_count(),
        graph.connection_count()
    );
    for issue in &report.issues {
        let target = issue.node_id.as_deref().unwrap_or("graph");
        println!("  [{:?}] {}: {}", issue.severity, target, issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("      -> {}", suggestion);
        }
    }
    println!(
        "{} error(s), {} warning(s), {} info",
        report.errors().len(),
        report.warnings().len(),
        report.infos().len()
    );
}

fn load_store_config(path: &PathBuf) -> StoreConfig {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    });
    StoreConfig::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn load_graph(path: &PathBuf, catalog: &NodeCatalog) -> Graph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            path.display(),
            e
        ))
    });
    Graph::from_json(&json, catalog).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load '{}': {}", path.display(), e))
    })
}

fn write_graph(graph: &Graph, output: Option<PathBuf>) {
    let json = graph
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
    match output {
        Some(path) => fs::write(&path, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
        }),
        None => println!("{}", json),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
