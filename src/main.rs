//! SGraph Layout CLI
//!
//! Usage:
//!   sgraph-layout [OPTIONS] <MODEL> [ACTION]
//!
//! Options:
//!   -c, --config <FILE>  Resize configuration (TOML format)
//!   --strict             Fail on resize entries for unknown elements
//!   --compact            Print the model on a single line
//!   --log <FILTER>       Tracing filter, e.g. `debug` or `sgraph_layout=trace`
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sgraph_layout::{
    apply_resize_action_with_config, parse_action, parse_graph, InputError, InputKind,
    ResizeConfig, UnknownIdPolicy,
};

#[derive(Parser)]
#[command(name = "sgraph-layout")]
#[command(about = "Apply resize actions to diagram models")]
struct Cli {
    /// Model file (JSON, graph root)
    model: PathBuf,

    /// Resize action file (JSON); reads from stdin if not provided
    action: Option<PathBuf>,

    /// Resize configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when a resize entry names an unknown element
    #[arg(long)]
    strict: bool,

    /// Print the updated model on a single line
    #[arg(long)]
    compact: bool,

    /// Tracing filter directive
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() {
    let cli = Cli::parse();
    install_tracing(&cli.log);

    let mut config = match &cli.config {
        Some(path) => match ResizeConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => ResizeConfig::default(),
    };
    if cli.strict {
        config = config.with_unknown_ids(UnknownIdPolicy::Error);
    }

    let model_source = read_input(InputKind::Model, Some(&cli.model));
    let action_source = read_input(InputKind::Action, cli.action.as_deref());

    let model_name = cli.model.display().to_string();
    let action_name = cli
        .action
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let mut graph = parse_graph(&model_source)
        .unwrap_or_else(|e| exit_with_input_error(&e, &model_source, &model_name));
    let action = parse_action(&action_source)
        .unwrap_or_else(|e| exit_with_input_error(&e, &action_source, &action_name));

    match apply_resize_action_with_config(&mut graph, &action, &config) {
        Ok(report) => tracing::info!(%report, "resize applied"),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let output = if cli.compact {
        serde_json::to_string(&graph)
    } else {
        serde_json::to_string_pretty(&graph)
    };
    match output {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing model: {}", e);
            process::exit(1);
        }
    }
}

fn install_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn read_input(kind: InputKind, path: Option<&Path>) -> String {
    let result = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| InputError::io(kind, path, e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map(|_| buffer)
                .map_err(|e| InputError::io(kind, "<stdin>", e))
        }
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    })
}

fn exit_with_input_error(error: &InputError, source: &str, filename: &str) -> ! {
    eprint!("{}", error.format(source, filename));
    process::exit(1);
}
