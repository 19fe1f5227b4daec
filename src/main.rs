use clap::Parser;
use eyre::Result;
use std::io;
use std::path::PathBuf;
use todotrack::{AuditLog, Shell, TaskStore};

#[derive(Parser)]
#[command(name = "todotrack")]
#[command(about = "Interactive TODO tracker with urgency levels, exports and an audit log")]
#[command(version)]
struct Cli {
    /// Path to the audit log file
    #[arg(short, long, default_value = "todo_log.txt")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    println!("=== Welcome to Interactive TODO App ===");
    println!("Your tasks will be logged to '{}'", cli.log_file.display());

    let mut store = TaskStore::new(AuditLog::new(&cli.log_file))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock());
    shell.run(&mut store)?;

    Ok(())
}
