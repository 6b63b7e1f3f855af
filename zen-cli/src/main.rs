//! Command-line interface for zen
//! This binary expands abbreviations, wraps text with them and shows how they are read.
//!
//! Usage:
//!   zen expand `<abbreviation>`                   - Expand an abbreviation
//!   zen wrap `<abbreviation>` [--input `<file>`]  - Wrap a file (or stdin) with an abbreviation
//!   zen tokens `<abbreviation>`                   - Show the lexer's tokens
//!   zen check `<abbreviation>`                    - Report whether an abbreviation expands
//!   zen list                                      - List generators, filters and contexts
//!
//! Global options pick the context (`--context`), layer a config file (`--config`) and
//! choose the output format (`--format template|text|json|yaml`). Logging goes to stderr and
//! is controlled with `ZEN_LOG` (e.g. `ZEN_LOG=zen=debug`).

use clap::{Arg, ArgMatches, Command};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use zen::zen::{lex, CompositeTemplate, ContextKind, Expansion, Host, NoTemplates};
use zen_config::{Loader, ZenConfig};

fn main() {
    init_logging();

    let matches = Command::new("zen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Expand markup abbreviations into templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("context")
                .long("context")
                .short('x')
                .help("Document context: html, xml, xsl, haml, plain-text (default from config)")
                .value_parser(|s: &str| s.parse::<ContextKind>())
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .global(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["template", "text", "json", "yaml"])
                .default_value("template")
                .global(true),
        )
        .subcommand(
            Command::new("expand")
                .about("Expand an abbreviation")
                .arg(abbreviation_arg()),
        )
        .subcommand(
            Command::new("wrap")
                .about("Wrap text with an abbreviation")
                .arg(abbreviation_arg())
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .help("File holding the text to wrap (default: stdin)"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Show the tokens of an abbreviation")
                .arg(abbreviation_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Check whether an abbreviation expands")
                .arg(abbreviation_arg()),
        )
        .subcommand(Command::new("list").about("List generators, filters and contexts"))
        .get_matches();

    let config = load_config(&matches);
    let context = matches
        .get_one::<ContextKind>("context")
        .copied()
        .unwrap_or(config.expansion.context);
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("template");

    tracing::debug!(
        command = matches.subcommand_name().unwrap_or_default(),
        context = %context,
        format,
        "dispatching command"
    );

    match matches.subcommand() {
        Some(("expand", sub)) => handle_expand_command(&config, context, abbreviation(sub), format),
        Some(("wrap", sub)) => handle_wrap_command(&config, context, sub, format),
        Some(("tokens", sub)) => handle_tokens_command(abbreviation(sub), format),
        Some(("check", sub)) => handle_check_command(&config, context, abbreviation(sub)),
        Some(("list", _)) => handle_list_command(&config),
        _ => fail("no command given"),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("ZEN_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn abbreviation_arg() -> Arg {
    Arg::new("abbreviation")
        .help("The abbreviation, e.g. 'ul>li.item$*3'")
        .required(true)
        .index(1)
}

fn abbreviation(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("abbreviation")
        .map(String::as_str)
        .unwrap_or_default()
}

fn load_config(matches: &ArgMatches) -> ZenConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        tracing::debug!(path = %path, "layering configuration file");
        loader = loader.with_file(path);
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)))
}

fn fail(message: &str) -> ! {
    tracing::debug!(reason = message, "command failed");
    eprintln!("{}", message);
    std::process::exit(1);
}

/// Handle the expand command
fn handle_expand_command(config: &ZenConfig, context: ContextKind, key: &str, format: &str) {
    let engine = config.engine();
    let mut host = config.host(context, key);
    let expansion = engine
        .expand(key, &mut host)
        .unwrap_or_else(|e| fail(&format!("Expansion error: {}", e)));

    match expansion {
        Expansion::Inserted(template) => print_template(&template, format),
        Expansion::Deferred => {
            eprintln!("'{}' has several host templates:", key);
            for template in host.find_applicable_templates(key) {
                println!("{}", template);
            }
        }
    }
}

/// Handle the wrap command
fn handle_wrap_command(config: &ZenConfig, context: ContextKind, sub: &ArgMatches, format: &str) {
    let text = match sub.get_one::<String>("input") {
        Some(path) => std::fs::read_to_string(path)
            .unwrap_or_else(|e| fail(&format!("Cannot read {}: {}", path, e))),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .unwrap_or_else(|e| fail(&format!("Cannot read stdin: {}", e)));
            text
        }
    };
    let text = text.strip_suffix('\n').unwrap_or(&text);

    let engine = config.engine();
    let mut host = config.host(context, text);
    host.select(0..text.len());
    let template = engine
        .wrap(abbreviation(sub), &mut host)
        .unwrap_or_else(|e| fail(&format!("Wrap error: {}", e)));
    print_template(&template, format);
}

/// Handle the tokens command
fn handle_tokens_command(abbreviation: &str, format: &str) {
    let tokens = lex(abbreviation).unwrap_or_else(|e| fail(&format!("Lexing error: {}", e)));
    match format {
        "json" | "yaml" => print_serialized(&tokens, format),
        _ => println!(
            "{}",
            tokens
                .iter()
                .map(|token| token.to_string())
                .collect::<Vec<_>>()
                .join("")
        ),
    }
}

/// Handle the check command
fn handle_check_command(config: &ZenConfig, context: ContextKind, abbreviation: &str) {
    let host = config.host(context, "");
    match config
        .engine()
        .expand_to_template(abbreviation, None, context, &host)
    {
        Ok(_) => println!("ok"),
        Err(e) => fail(&format!("{}", e)),
    }
}

/// Handle the list command
fn handle_list_command(config: &ZenConfig) {
    let engine = config.engine();
    let registry = engine.registry();

    println!("Generators:\n");
    for generator in registry.generators() {
        let defaults: Vec<&str> = ContextKind::ALL
            .iter()
            .filter(|context| generator.is_default_for(**context))
            .map(|context| context.name())
            .collect();
        println!("  {}", generator.name());
        println!("    {}", generator.description());
        if let Some(suffix) = generator.suffix() {
            println!("    suffix: |{}", suffix);
        }
        println!("    default for: {}", defaults.join(", "));
        println!();
    }

    println!("Filters:\n");
    for filter in registry.filters() {
        println!("  |{}", filter.suffix());
        println!("    {}", filter.description());
        println!();
    }

    println!("Contexts:\n");
    for context in ContextKind::ALL {
        let applicable = engine
            .expand_to_template("div", None, context, &NoTemplates)
            .is_ok();
        println!(
            "  {}{}",
            context,
            if applicable { "" } else { " (needs an explicit |suffix)" }
        );
    }
}

fn print_template(template: &CompositeTemplate, format: &str) {
    match format {
        "text" => println!("{}", template.text()),
        "json" | "yaml" => print_serialized(template, format),
        _ => println!("{}", template),
    }
}

fn print_serialized<T: Serialize>(value: &T, format: &str) {
    let serialized = if format == "yaml" {
        serde_yaml::to_string(value).map_err(|e| e.to_string())
    } else {
        serde_json::to_string_pretty(value).map_err(|e| e.to_string())
    };
    match serialized {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => fail(&format!("Error formatting output: {}", e)),
    }
}
