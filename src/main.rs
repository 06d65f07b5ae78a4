use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gqlc::codegen::js;
use gqlc::parse_schema;

/// Compiles a schema DSL file into JavaScript client-call sources: one file
/// of GraphQL document constants and one file of sendGQL call functions.
#[derive(Parser)]
struct Cli {
    /// Path to the schema source file
    schema: PathBuf,
    #[arg(long, default_value = "operations.js", help = "Output path for the generated query constants")]
    consts_out: PathBuf,
    #[arg(long, default_value = "client.js", help = "Output path for the generated call functions")]
    funcs_out: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("gqlc: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = fs::read_to_string(&cli.schema)
        .map_err(|e| format!("cannot read {}: {}", cli.schema.display(), e))?;
    let schema = parse_schema(&source).map_err(|e| e.to_string())?;
    fs::write(&cli.consts_out, js::operation_consts(&schema))
        .map_err(|e| format!("cannot write {}: {}", cli.consts_out.display(), e))?;
    fs::write(&cli.funcs_out, js::call_functions(&schema))
        .map_err(|e| format!("cannot write {}: {}", cli.funcs_out.display(), e))?;
    Ok(())
}
