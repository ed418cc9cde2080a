use std::path::Path;

use clap::{Parser, Subcommand};

use ngram_cli::commands::{config_ops, predict_ops, table_ops};
use ngram_cli::trace_init::init_tracing;

#[derive(Parser)]
#[command(name = "ngramtool", about = "Next-character prediction table tool")]
struct Cli {
    /// Custom settings TOML (see `settings-export`)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Write JSON traces to this directory (requires --features trace)
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a prediction table from corpus text files
    Compile {
        /// Longest key in grapheme clusters (default: build.max_depth)
        #[arg(long)]
        depth: Option<u32>,
        /// Drop keys seen fewer times (default: build.min_count)
        #[arg(long)]
        min_count: Option<u64>,
        /// Output table file
        output_file: String,
        /// Corpus text files (UTF-8)
        #[arg(required = true)]
        corpus: Vec<String>,
    },
    /// Show table header and section layout
    Info {
        /// Table file
        table_file: String,
    },
    /// Predict the next character after a context
    Predict {
        /// Table file
        table_file: String,
        /// Context text; reads one context per line from stdin when omitted
        context: Option<String>,
        /// Show weights and the context length behind each prediction
        #[arg(long)]
        scores: bool,
    },
    /// Look up the weight of an exact key
    Lookup {
        /// Table file
        table_file: String,
        /// Key (context + predicted character)
        key: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let _guard = init_tracing(cli.log_dir.as_deref().map(Path::new));
    if let Some(file) = &cli.settings {
        config_ops::settings_load(file);
    }

    match cli.command {
        Command::Compile {
            depth,
            min_count,
            output_file,
            corpus,
        } => {
            let opts = table_ops::CompileOptions {
                max_depth: depth,
                min_count,
            };
            table_ops::compile(&corpus, &output_file, &opts);
        }
        Command::Info { table_file } => table_ops::info(&table_file),
        Command::Predict {
            table_file,
            context: Some(context),
            scores,
        } => predict_ops::predict(&table_file, &context, scores),
        Command::Predict {
            table_file,
            context: None,
            ..
        } => predict_ops::predict_stdin(&table_file),
        Command::Lookup { table_file, key } => table_ops::lookup(&table_file, &key),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
