//! Command-line interface for stache
//! This binary tokenizes mustache-style templates and prints the token tree in different formats.
//!
//! Usage:
//!   stache `<path>` [--format `<format>`] [--delimiters "`<open>` `<close>`"]  - Print the token tree
//!   stache `<path>` --partials                                             - List referenced partials
//!   stache `<path>` --resolve                                              - Load every partial, transitively
//!   stache --list-formats                                                  - List all available formats

use clap::{Arg, ArgAction, ArgMatches, Command};
use stache_config::{Loader, StacheConfig};
use stache_parser::stache::error::format_source_context;
use stache_parser::stache::formats::{to_treeviz_str_with_params, FormatError, FormatRegistry};
use stache_parser::stache::loader::{LoaderError, TemplateLoader};
use stache_parser::stache::parsing::{tokenize, Options};
use stache_parser::stache::token::{Delimiters, Template};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// File picked up from the working directory when present
const LOCAL_CONFIG: &str = "stache.toml";

fn main() {
    let matches = Command::new("stache")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting mustache-style templates")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the template file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: treeviz)"),
        )
        .arg(
            Arg::new("delimiters")
                .long("delimiters")
                .short('d')
                .help("Initial delimiters as \"OPEN CLOSE\", e.g. \"<% %>\""),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("partials")
                .long("partials")
                .help("Print the partials the template references, in source order")
                .action(ArgAction::SetTrue)
                .conflicts_with("resolve"),
        )
        .arg(
            Arg::new("resolve")
                .long("resolve")
                .help("Load every referenced partial, transitively, and print the resolved names")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log tokenizer activity to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_config(&matches);
    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing formats");

    if matches.get_flag("resolve") {
        handle_resolve_command(path, &config);
    } else {
        handle_tokenize_command(path, &config, matches.get_flag("partials"));
    }
}

/// Log to stderr, filtered by `STACHE_LOG` unless `-v` asks for debug output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STACHE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer the local config file, `--config`, and command-line flags over the defaults
fn load_config(matches: &ArgMatches) -> StacheConfig {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }

    let mut overrides: Vec<(&str, String)> = Vec::new();
    if let Some(format) = matches.get_one::<String>("format") {
        overrides.push(("output.format", format.clone()));
    }
    if let Some(pair) = matches.get_one::<String>("delimiters") {
        let delimiters = Delimiters::parse(pair).unwrap_or_else(|| {
            eprintln!("Invalid delimiters '{pair}': expected two markers separated by whitespace");
            std::process::exit(1);
        });
        overrides.push(("parser.open", delimiters.open));
        overrides.push(("parser.close", delimiters.close));
    }

    let result = overrides
        .into_iter()
        .try_fold(loader, |loader, (key, value)| loader.set_override(key, value))
        .and_then(Loader::build);

    result.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    })
}

fn options_from(config: &StacheConfig) -> Options {
    let delimiters = Delimiters::new(config.parser.open.as_str(), config.parser.close.as_str());
    if !delimiters.is_default() {
        tracing::debug!(%delimiters, "using custom initial delimiters");
    }
    Options {
        delimiters: Some(delimiters),
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {path}: {e}");
        std::process::exit(1);
    })
}

/// Tokenize a file, printing the error with source context on failure
fn tokenize_file(path: &str, config: &StacheConfig) -> Template {
    let source = read_source(path);
    tracing::debug!(path, bytes = source.len(), "read template");

    tokenize(&source, &options_from(config)).unwrap_or_else(|e| {
        eprintln!("{path}: {e}");
        eprintln!();
        eprint!("{}", format_source_context(&source, e.position()));
        std::process::exit(1);
    })
}

/// Handle the default command: print the token tree or the partial list
fn handle_tokenize_command(path: &str, config: &StacheConfig, partials_only: bool) {
    let template = tokenize_file(path, config);

    if partials_only {
        for partial in &template.partials {
            println!("{partial}");
        }
        return;
    }

    let format = config.output.format.as_str();
    let output = if format == "treeviz" {
        let params = HashMap::from([(
            "max-label".to_string(),
            config.treeviz.max_label_width.to_string(),
        )]);
        Ok(to_treeviz_str_with_params(&template, &params))
    } else {
        FormatRegistry::with_defaults().serialize(&template, format)
    };

    match output {
        Ok(text) => print!("{text}"),
        Err(FormatError::FormatNotFound(name)) => {
            eprintln!("Format '{name}' not found");
            eprintln!(
                "Available formats: {}",
                FormatRegistry::with_defaults().list_formats().join(", ")
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error formatting template: {e}");
            std::process::exit(1);
        }
    }
}

/// Handle --resolve: load the template's partials, and theirs, from the partials directory
fn handle_resolve_command(path: &str, config: &StacheConfig) {
    let template = tokenize_file(path, config);

    let directory = config.partials.directory().unwrap_or_else(|| {
        Path::new(path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let loader = TemplateLoader::new(directory)
        .with_extension(config.partials.extension.clone())
        .with_options(options_from(config));

    let mut resolved = BTreeSet::new();
    for name in template.partial_names() {
        if resolved.contains(name) {
            continue;
        }
        let set = loader.load_with_partials(name).unwrap_or_else(|e| {
            report_loader_error(&e);
            std::process::exit(1);
        });
        resolved.extend(set.names().into_iter().map(str::to_string));
    }

    for name in &resolved {
        println!("{name}");
    }
}

fn report_loader_error(error: &LoaderError) {
    eprintln!("{error}");
    if let LoaderError::Tokenize { source, error, .. } = error {
        eprintln!();
        eprint!("{}", format_source_context(source, error.position()));
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");

    for name in registry.list_formats() {
        println!("  {name}");
        if let Some(formatter) = registry.get(&name) {
            println!("    {}", formatter.description());
        }
        println!();
    }
}
