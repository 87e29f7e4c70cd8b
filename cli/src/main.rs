//! Rigsmith CLI binary.
//!
//! Subcommands: `serve` (HTTP API) and `build` (plan one build and print it).

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use cli::{format_outcome, outcome_json};
use rigsmith::{build_planner, config};

const APP_NAME: &str = "rigsmith";

#[derive(Parser, Debug)]
#[command(name = "rigsmith")]
#[command(about = "Rigsmith: budget PC builds checked against live marketplace prices")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Directory holding the project `.env` (default: current directory and parents)
    #[arg(long, global = true, value_name = "DIR")]
    env_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP server (POST /api/build, GET /health)
    Serve(ServeArgs),
    /// Plan one build and print it
    Build(BuildArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address
    #[arg(long, env = "RIGSMITH_ADDR", default_value = "127.0.0.1:8080")]
    addr: String,
}

#[derive(clap::Args, Debug, Clone)]
struct BuildArgs {
    /// Budget in whole currency units
    #[arg(short, long)]
    budget: u64,

    /// Output the result as JSON (same shape as the HTTP API)
    #[arg(long)]
    json: bool,

    /// What the build is for, e.g. "quiet 1440p gaming PC"
    #[arg(required = true, trailing_var_arg = true)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = config::load(APP_NAME, args.env_dir.as_deref())?;
    logging::init()?;

    let planner = Arc::new(build_planner(&config)?);

    match args.cmd {
        Command::Serve(serve_args) => serve::run_serve(Some(&serve_args.addr), planner).await,
        Command::Build(build_args) => {
            let prompt = build_args.prompt.join(" ");
            let outcome = planner.run(&prompt, build_args.budget).await?;
            if build_args.json {
                println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
            } else {
                println!("{}", format_outcome(&outcome));
            }
            Ok(())
        }
    }
}
