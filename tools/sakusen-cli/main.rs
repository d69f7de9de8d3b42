use clap::Parser;
use sakusen::prelude::*;
use std::fs;
use std::process;
use std::time::Instant;
use tracing::Level;

/// Compiles a node graph saved by the editor into a script
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the editor's graph JSON file
    graph_path: String,

    /// Write the script here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Also save the compiled program as a bincode artifact
    #[arg(long)]
    artifact: Option<String>,

    /// Print the intermediate representation as JSON and exit.
    ///
    /// The dump is for inspection only: JSON has no `undefined`, so unset
    /// literals are written as `null` and map keys come out sorted.
    #[arg(long)]
    emit_ir: bool,

    /// Treat warnings as errors
    #[arg(long)]
    deny_warnings: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_diagnostics(label: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}: {}", label, diagnostic);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();
    let ui_json = fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Could not read '{}': {}", cli.graph_path, e))
    });
    let compiler = Compiler::from_json(&ui_json).unwrap_or_else(|e| exit_with_error(&e.to_string()));

    if cli.emit_ir {
        match compiler.build_ir() {
            Ok((ir, warnings)) => {
                print_diagnostics("warning", &warnings);
                match serde_json::to_string_pretty(&ir) {
                    Ok(json) => println!("{}", json),
                    Err(e) => exit_with_error(&format!("Could not serialize IR: {}", e)),
                }
            }
            Err(e) => {
                let diagnostics = e.diagnostics();
                print_diagnostics("warning", &diagnostics.warnings);
                print_diagnostics("error", &diagnostics.errors);
                process::exit(1);
            }
        }
        return;
    }

    let program = match compiler.compile() {
        Ok(program) => program,
        Err(e) => {
            let diagnostics = e.diagnostics();
            print_diagnostics("warning", &diagnostics.warnings);
            print_diagnostics("error", &diagnostics.errors);
            exit_with_error(&e.to_string());
        }
    };
    print_diagnostics("warning", &program.warnings);

    if cli.deny_warnings && program.has_warnings() {
        exit_with_error(&format!(
            "{} warning(s) with --deny-warnings",
            program.warnings.len()
        ));
    }

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &program.source) {
                exit_with_error(&format!("Could not write '{}': {}", path, e));
            }
            eprintln!(
                "Compiled '{}' -> '{}' in {:?}",
                cli.graph_path,
                path,
                total_start.elapsed()
            );
        }
        None => print!("{}", program.source),
    }

    if let Some(path) = &cli.artifact {
        if let Err(e) = program.save(path) {
            exit_with_error(&e.to_string());
        }
        eprintln!("Saved artifact to '{}'", path);
    }
}
