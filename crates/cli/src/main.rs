//! claimcheck CLI - Compare self-reported model benchmarks with measured ones

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

use commands::{
  CompareArgs, Context, cmd_batch, cmd_compare, cmd_config_init, cmd_config_show, cmd_info, cmd_leaderboard, cmd_paper,
  cmd_popular, cmd_scrape, cmd_search_papers,
};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "claimcheck")]
#[command(version, about = "Compare self-reported model benchmarks with independently measured scores")]
#[command(after_help = "\
QUICK START:
  claimcheck scrape meta-llama/Llama-2-7b           # Extract reported scores
  claimcheck compare meta-llama/Llama-2-7b \\
    --actual results/llama2.json                    # Check them against measurements

COMMON WORKFLOWS:
  claimcheck popular --limit 20 --scrape            # Scrape the most downloaded models
  claimcheck leaderboard mmlu                       # Research leaderboard for a task
  claimcheck config init                            # Write ./claimcheck.toml")]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Directory scraped model data is stored in (overrides config)
  #[arg(long, global = true, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Show the effective configuration and where it was loaded from
  Show,
  /// Write a commented ./claimcheck.toml with default settings
  Init {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand)]
enum Commands {
  /// Scrape one model page and store its reported benchmarks
  Scrape {
    /// Model id, e.g. meta-llama/Llama-2-7b
    model_id: String,
    /// Also write the model data to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print the model data as JSON
    #[arg(long)]
    json: bool,
  },

  /// Scrape several models concurrently
  #[command(after_help = "\
EXAMPLES:
  claimcheck batch gpt2 bigscience/bloom-560m
  claimcheck batch --from models.txt -o data/run.json")]
  Batch {
    /// Model ids
    model_ids: Vec<String>,
    /// Read more model ids from a file, one per line (# starts a comment)
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,
    /// Combined results file
    #[arg(short, long, default_value = "data/batch_results.json")]
    output: PathBuf,
  },

  /// List the most downloaded models
  Popular {
    #[arg(short, long, default_value = "50")]
    limit: usize,
    /// Only models with this pipeline tag
    #[arg(long)]
    pipeline: Option<String>,
    #[arg(short, long, default_value = "data/popular_models.json")]
    output: PathBuf,
    /// Scrape every listed model as well
    #[arg(long)]
    scrape: bool,
  },

  /// Show hub details and model card for a model
  Info {
    model_id: String,
    #[arg(long)]
    json: bool,
  },

  /// Show the research leaderboard for a task
  Leaderboard {
    /// Task slug, e.g. multi-task-language-understanding-on-mmlu
    task: String,
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
  },

  /// Search research papers
  SearchPapers {
    query: String,
    #[arg(short, long, default_value = "10")]
    limit: usize,
  },

  /// Show a paper's abstract, code link and results
  Paper {
    /// Paper slug or URL
    paper: String,
    #[arg(long)]
    json: bool,
  },

  /// Compare a model's stored reported scores with measured scores
  #[command(after_help = "\
MEASURED SCORES FILE:
  Either a model export ({\"model_id\": ..., \"benchmarks\": [...]}), an array
  of them, or a flat map: {\"org/model\": {\"mmlu\": 63.1, \"humaneval\": 12.0}}

EXIT STATUS:
  1 when any compared task is overclaimed")]
  Compare {
    model_id: String,
    #[command(flatten)]
    args: CompareArgs,
  },

  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  let mut ctx = Context::load();
  if let Some(dir) = cli.data_dir {
    ctx.config.storage.data_dir = dir;
  }
  let _guard = init_logging(&ctx.config.logging, cli.verbose);

  match cli.command {
    Commands::Scrape { model_id, output, json } => cmd_scrape(&ctx, &model_id, output.as_deref(), json).await?,
    Commands::Batch {
      model_ids,
      from,
      output,
    } => cmd_batch(&ctx, model_ids, from.as_deref(), &output).await?,
    Commands::Popular {
      limit,
      pipeline,
      output,
      scrape,
    } => cmd_popular(&ctx, limit, pipeline.as_deref(), &output, scrape).await?,
    Commands::Info { model_id, json } => cmd_info(&ctx, &model_id, json).await?,
    Commands::Leaderboard { task, output } => cmd_leaderboard(&ctx, &task, output.as_deref()).await?,
    Commands::SearchPapers { query, limit } => cmd_search_papers(&ctx, &query, limit).await?,
    Commands::Paper { paper, json } => cmd_paper(&ctx, &paper, json).await?,
    Commands::Compare { model_id, args } => return cmd_compare(&ctx, &model_id, &args),
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&ctx)?,
      ConfigCommand::Init { force } => cmd_config_init(force)?,
    },
  }

  Ok(ExitCode::SUCCESS)
}
