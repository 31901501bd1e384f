//! p0 Compiler Driver
//!
//! Reads a p0 syntax tree serialized as JSON by the parser, translates and
//! compiles it, and either writes the module or runs it on the p0 VM.

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use p0_bytecode::Module;
use p0_common::CompilerError;
use p0_frontend::Frontend;
use p0_vm::{VmOptions, VM};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MODULE_EXTENSION: &str = "p0m";
const DEFAULT_MODULE_NAME: &str = "Main";

#[derive(Parser)]
#[command(name = "p0c")]
#[command(about = "p0 Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log compiler phases to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a syntax tree to a bytecode module
    Compile {
        /// Input syntax tree (JSON)
        input: PathBuf,

        /// Output module file, defaults to the input with a .p0m extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Module name, defaults to the input file stem
        #[arg(long)]
        module_name: Option<String>,

        /// Print the typed syntax tree as JSON
        #[arg(long)]
        print_tst: bool,

        /// Print the module listing
        #[arg(long)]
        print_module: bool,
    },

    /// Compile a syntax tree and run it immediately
    Run {
        /// Input syntax tree (JSON)
        input: PathBuf,

        /// Module name, defaults to the input file stem
        #[arg(long)]
        module_name: Option<String>,

        /// Abort when routines nest deeper than this
        #[arg(long)]
        max_call_depth: Option<usize>,
    },

    /// Run a compiled module
    Exec {
        /// Input module file
        input: PathBuf,

        /// Abort when routines nest deeper than this
        #[arg(long)]
        max_call_depth: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .init();

    let result = match cli.command {
        Commands::Compile { input, output, module_name, print_tst, print_module } => {
            compile_command(&input, output.as_deref(), module_name, print_tst, print_module)
        }
        Commands::Run { input, module_name, max_call_depth } => run_command(&input, module_name, max_call_depth),
        Commands::Exec { input, max_call_depth } => exec_command(&input, max_call_depth),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compile_command(
    input_path: &Path,
    output_path: Option<&Path>,
    module_name: Option<String>,
    print_tst: bool,
    print_module: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let module_name = module_name.unwrap_or_else(|| default_module_name(input_path));
    let source = fs::read_to_string(input_path)?;
    let program = Frontend::parse_json(&source)?;

    let typed = report(input_path, Frontend::translate(&program))?;
    if print_tst {
        println!("{}", serde_json::to_string_pretty(&typed)?);
    }

    let module = report(input_path, p0_frontend::compile(&typed, &module_name))?;
    if print_module {
        print!("{}", module.to_text());
    }

    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_path.with_extension(MODULE_EXTENSION));
    fs::write(&output_path, module.to_binary())?;

    info!("module '{}' written to {}", module.name, output_path.display());
    Ok(())
}

fn run_command(
    input_path: &Path,
    module_name: Option<String>,
    max_call_depth: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let module_name = module_name.unwrap_or_else(|| default_module_name(input_path));
    let source = fs::read_to_string(input_path)?;
    let program = Frontend::parse_json(&source)?;
    let module = report(input_path, Frontend::compile(&program, &module_name))?;

    execute(module, max_call_depth)
}

fn exec_command(input_path: &Path, max_call_depth: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let binary = fs::read(input_path)?;
    let module = Module::from_binary(&binary)?;

    execute(module, max_call_depth)
}

fn execute(module: Module, max_call_depth: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = VmOptions::default();
    if let Some(depth) = max_call_depth {
        options.max_call_depth = depth;
    }

    let mut vm = VM::with_options(module, options);
    vm.run(&mut io::stdout().lock())?;
    Ok(())
}

/// Print every diagnostic prefixed with its file; the error itself carries the summary
fn report<T>(input_path: &Path, result: Result<T, CompilerError>) -> Result<T, CompilerError> {
    if let Err(e) = &result {
        for diagnostic in e.diagnostics() {
            eprintln!("{}:{}", input_path.display(), diagnostic);
        }
    }
    result
}

fn default_module_name(input_path: &Path) -> String {
    input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_MODULE_NAME)
        .to_string()
}
