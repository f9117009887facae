use clap::Parser;
use config::{Config, Environment, File};
use csvql::QueryExecutor;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// csvql interactive shell
#[derive(Parser, Debug)]
#[command(name = "csvql")]
#[command(about = "SQLite-style query shell for delimited text files", long_about = None)]
struct Args {
    /// Prompt string
    #[arg(long)]
    prompt: Option<String>,

    /// History file path
    #[arg(long)]
    history: Option<PathBuf>,
}

/// Shell configuration
#[derive(Debug, Deserialize)]
struct ShellConfig {
    #[serde(default = "default_prompt")]
    prompt: String,
    #[serde(default)]
    history_file: Option<PathBuf>,
}

fn default_prompt() -> String {
    "csvql > ".to_string()
}

impl ShellConfig {
    /// Load configuration with priority: CLI args > ENV > config file > defaults
    fn load(args: &Args) -> Self {
        let mut builder = Config::builder();
        if Path::new("./csvql.toml").exists() {
            builder = builder.add_source(File::with_name("./csvql.toml"));
        }
        builder = builder.add_source(Environment::with_prefix("CSVQL"));

        let base = builder
            .build()
            .ok()
            .and_then(|c| c.try_deserialize::<Self>().ok())
            .unwrap_or_else(|| Self { prompt: default_prompt(), history_file: None });

        Self {
            prompt: args.prompt.clone().unwrap_or(base.prompt),
            history_file: args.history.clone().or(base.history_file),
        }
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::home_dir().map(|mut p| {
                p.push(".csvql_history");
                p
            })
        })
    }
}

const USAGE: &str = "\
Commands:
  SELECT [column, ...]|* FROM [file] [WHERE/AND/OR [column] [=|!=|>|<] [value]] \
[JOIN [file2] ON [colA] = [colB]] [ORDER [column] [asc|desc]]
  INSERT INTO [file] ([column], ...) VALUES ([value], ...)
  INSERT INTO [file] VALUES ([value], ...)
  UPDATE [file] SET [column] = [value], ... [WHERE [column] [=|!=|>|<] [value]]
  DELETE FROM [file] WHERE [column] [=|!=|>|<] [value]
  help
  quit";

fn run_command(line: &str) {
    match QueryExecutor::execute_command(line) {
        Ok(lines) => {
            for out in lines {
                println!("{out}");
            }
        }
        Err(err) => {
            println!("{err}");
            if err.is_syntax() {
                println!("{USAGE}");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = ShellConfig::load(&args);

    println!("csvql version {}", env!("CARGO_PKG_VERSION"));

    let mut rl = DefaultEditor::new()?;
    let history_file = config.history_path();
    if let Some(ref path) = history_file {
        // Ignore error if the file doesn't exist yet
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                match line {
                    "quit" | "exit" => break,
                    "help" => println!("{USAGE}"),
                    _ => run_command(line),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Input error: {err}");
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = rl.save_history(path);
    }
    Ok(())
}
