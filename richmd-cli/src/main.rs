// Command-line interface for richmd
//
// This binary moves documents between markdown and the editor state a rich-text editor persists
// (a JSON tree of paragraphs, lists and text runs carrying formatting flags).
// The conversions themselves live in the richmd-babel crate; this crate only deals with files,
// configuration and diagnostics.
//
// Usage:
//  richmd import <input.md> [--output <file>]      - Markdown to editor-state JSON
//  richmd export <input.json> [--output <file>]    - Editor-state JSON to markdown
//  richmd roundtrip <input.md> [--check]           - Markdown through the editor tree and back
//  richmd inspect <input.md> [<transform>]         - Show the AST or the editor tree
//
// Configuration:
//
// Serializer options and the default log level come from richmd.toml in the working directory,
// when present, layered over the built-in defaults. --config <path> layers one more file on top.
// RUST_LOG overrides the configured log level.

mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use richmd_babel::editor::SerializedNode;
use richmd_babel::{
    export_markdown_with_options, import_markdown, EditorTree, SerializeOptions, VisitorRegistry,
};
use richmd_config::{Loader, RichmdConfig};
use std::fs;

fn build_cli() -> Command {
    Command::new("richmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between markdown and rich-text editor state")
        .long_about(
            "richmd converts documents between markdown and the JSON state of a rich-text editor.\n\n\
            Commands:\n  \
            - import:    Markdown to editor-state JSON\n  \
            - export:    Editor-state JSON to markdown\n  \
            - roundtrip: Markdown through the editor tree and back\n  \
            - inspect:   View the intermediate representations\n\n\
            Examples:\n  \
            richmd import notes.md -o notes.json     # Load markdown into editor state\n  \
            richmd export notes.json                 # Print markdown for editor state\n  \
            richmd roundtrip notes.md --check        # Fail if notes.md does not survive"
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a richmd.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("import")
                .about("Convert markdown to editor-state JSON")
                .arg(input_arg("Markdown file"))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Convert editor-state JSON to markdown")
                .long_about(
                    "Convert editor-state JSON to markdown.\n\n\
                    The input must hold a single root node, as written by `richmd import`.\n\
                    Markers and indentation follow the [markdown] section of the configuration."
                )
                .arg(input_arg("Editor-state JSON file"))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("Import markdown and export it again")
                .long_about(
                    "Import a markdown file into an editor tree and export it again.\n\n\
                    The result is the markdown an editor would save for this document.\n\
                    With --check nothing is printed; the command fails when the result\n\
                    differs from the input (ignoring leading and trailing whitespace)."
                )
                .arg(input_arg("Markdown file"))
                .arg(output_arg())
                .arg(
                    Arg::new("check")
                        .long("check")
                        .help("Fail instead of printing when the document changes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect intermediate representations of a markdown file")
                .long_about(
                    "View a markdown file at the different import stages.\n\n\
                    Transforms:\n  \
                    - ast:     Markdown AST as JSON (formatting as wrapper nodes)\n  \
                    - editor:  Editor state as JSON (formatting as flags, default)\n\n\
                    Examples:\n  \
                    richmd inspect notes.md          # Editor state\n  \
                    richmd inspect notes.md ast      # Markdown AST"
                )
                .arg(input_arg("Markdown file"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'editor'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn input_arg(help: &'static str) -> Arg {
    Arg::new("input")
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_tracing(&config.logging.level);
    let options = SerializeOptions::from(&config.markdown);

    match matches.subcommand() {
        Some(("import", sub_matches)) => {
            let (input, output) = io_args(sub_matches);
            handle_import_command(input, output);
        }
        Some(("export", sub_matches)) => {
            let (input, output) = io_args(sub_matches);
            handle_export_command(input, output, &options);
        }
        Some(("roundtrip", sub_matches)) => {
            let (input, output) = io_args(sub_matches);
            let check = sub_matches.get_flag("check");
            handle_roundtrip_command(input, output, check, &options);
        }
        Some(("inspect", sub_matches)) => {
            let (input, _) = io_args(sub_matches);
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            handle_inspect_command(input, transform);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn io_args(sub_matches: &ArgMatches) -> (&str, Option<&str>) {
    let input = sub_matches
        .get_one::<String>("input")
        .expect("input is required");
    let output = sub_matches
        .try_get_one::<String>("output")
        .ok()
        .flatten()
        .map(|s| s.as_str());
    (input.as_str(), output)
}

/// Handle the import command
fn handle_import_command(input: &str, output: Option<&str>) {
    let source = read_input(input);
    let tree = import_tree(&source);

    let state = tree.to_serialized(tree.root()).unwrap_or_else(|e| {
        eprintln!("Import error: {e}");
        std::process::exit(1);
    });
    let json = serde_json::to_string_pretty(&state).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    write_output(output, &(json + "\n"));
}

/// Handle the export command
fn handle_export_command(input: &str, output: Option<&str>, options: &SerializeOptions) {
    let source = read_input(input);

    let state: SerializedNode = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing editor state '{input}': {e}");
        std::process::exit(1);
    });
    let tree = EditorTree::from_serialized(&state).unwrap_or_else(|e| {
        eprintln!("Invalid editor state '{input}': {e}");
        std::process::exit(1);
    });

    write_output(output, &export_tree(&tree, options));
}

/// Handle the roundtrip command
fn handle_roundtrip_command(
    input: &str,
    output: Option<&str>,
    check: bool,
    options: &SerializeOptions,
) {
    let source = read_input(input);
    let markdown = export_tree(&import_tree(&source), options);

    if !check {
        write_output(output, &markdown);
        return;
    }

    if markdown.trim() != source.trim() {
        eprintln!("Round trip changed '{input}'. Exported markdown:");
        eprint!("{markdown}");
        std::process::exit(1);
    }
    tracing::info!(input, "round trip preserved the document");
}

/// Handle the inspect command
fn handle_inspect_command(input: &str, transform: &str) {
    let source = read_input(input);

    let output = transforms::execute_transform(&source, transform).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

fn import_tree(source: &str) -> EditorTree {
    let mut tree = EditorTree::new();
    let root = tree.root();
    import_markdown(&mut tree, root, source, &VisitorRegistry::default()).unwrap_or_else(|e| {
        eprintln!("Import error: {e}");
        std::process::exit(1);
    });
    tree
}

fn export_tree(tree: &EditorTree, options: &SerializeOptions) -> String {
    export_markdown_with_options(tree, tree.root(), &VisitorRegistry::default(), options)
        .unwrap_or_else(|e| {
            eprintln!("Export error: {e}");
            std::process::exit(1);
        })
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
            tracing::debug!(path, bytes = text.len(), "wrote output");
        }
        None => print!("{text}"),
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> RichmdConfig {
    let loader = Loader::new().with_optional_file("richmd.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
