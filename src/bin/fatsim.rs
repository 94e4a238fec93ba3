//! fatsim CLI
//!
//! One-shot subcommands plus an interactive menu shell.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fatsim::{Command, Config, ExistingFilePolicy, FatError, FatSystem, FileSummary, Outcome};
use tracing_subscriber::{fmt, EnvFilter};

/// fatsim
#[derive(Parser, Debug)]
#[command(name = "fatsim")]
#[command(about = "Simulated File Allocation Table over JSON record files")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./fatsim_data")]
    data_dir: String,

    /// Let `create` replace an existing file instead of failing
    #[arg(long)]
    overwrite: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a file
    Create {
        /// The file name
        name: String,

        /// The file content
        data: String,
    },

    /// Print a file's content
    Read {
        /// The file name
        name: String,
    },

    /// Replace a file's content
    Modify {
        /// The file name
        name: String,

        /// The new content
        data: String,
    },

    /// Move a file to the recycle bin
    Delete {
        /// The file name
        name: String,
    },

    /// Restore a file from the recycle bin
    Recover {
        /// The file name
        name: String,
    },

    /// List files
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List files in the recycle bin
    ListDeleted {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Interactive menu
    Shell,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,fatsim=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let policy = if args.overwrite {
        ExistingFilePolicy::Overwrite
    } else {
        ExistingFilePolicy::Reject
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .on_existing(policy)
        .build();

    let fat = match FatSystem::open(config) {
        Ok(fat) => fat,
        Err(e) => {
            tracing::error!("Failed to open data directory: {}", e);
            return ExitCode::from(2);
        }
    };

    let (command, json) = match args.command {
        Commands::Shell => {
            return match run_shell(&fat) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("shell error: {}", e);
                    ExitCode::FAILURE
                }
            };
        }
        Commands::Create { name, data } => (Command::Create { name, data }, false),
        Commands::Read { name } => (Command::Read { name }, false),
        Commands::Modify { name, data } => (Command::Modify { name, data }, false),
        Commands::Delete { name } => (Command::Delete { name }, false),
        Commands::Recover { name } => (Command::Recover { name }, false),
        Commands::List { json } => (Command::List, json),
        Commands::ListDeleted { json } => (Command::ListDeleted, json),
    };

    let deleted_view = matches!(command, Command::ListDeleted);

    match fat.execute(command) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Content(content)) => {
            println!("{}", content);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Files(files)) if json => match serde_json::to_string_pretty(&files) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        },
        Ok(Outcome::Files(files)) => {
            print_listing(&files, deleted_view);
            ExitCode::SUCCESS
        }
        Err(e) => report(&e),
    }
}

/// Print an error; user mistakes exit with 1, storage trouble with 2
fn report(error: &FatError) -> ExitCode {
    eprintln!("error: {}", error);
    if error.is_user_error() {
        ExitCode::from(1)
    } else {
        ExitCode::from(2)
    }
}

fn print_listing(files: &[FileSummary], deleted_view: bool) {
    if files.is_empty() {
        println!("(no files)");
        return;
    }

    for (index, file) in files.iter().enumerate() {
        let when = if deleted_view {
            format!(
                "deleted: {}",
                file.deleted_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string())
            )
        } else {
            format!(
                "created: {} - modified: {}",
                file.created_at.format("%Y-%m-%d %H:%M:%S"),
                file.modified_at.format("%Y-%m-%d %H:%M:%S")
            )
        };
        println!(
            "{}. {} - size: {} chars - {}",
            index + 1,
            file.name,
            file.length,
            when
        );
    }
}

// =============================================================================
// Interactive Shell
// =============================================================================

const MENU: &str = "\
1. Create a file
2. List files
3. Open a file
4. Modify a file
5. Delete a file
6. Recover a file
7. List deleted files
8. Exit";

/// Numbered menu loop over stdin/stdout; errors are reported and the loop continues
///
/// End of input exits the shell like option 8.
fn run_shell(fat: &FatSystem) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("{}", MENU);
        match shell_step(fat, &mut input) {
            Ok(true) => continue,
            Ok(false) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

/// Run one menu choice; `Ok(false)` means exit
fn shell_step(fat: &FatSystem, input: &mut impl BufRead) -> io::Result<bool> {
    let command = match prompt_name(input, "> ")?.as_str() {
        "1" => Command::Create {
            name: prompt_name(input, "File name: ")?,
            data: prompt(input, "Data (text): ")?,
        },
        "2" => Command::List,
        "3" => Command::Read {
            name: prompt_name(input, "File to open: ")?,
        },
        "4" => Command::Modify {
            name: prompt_name(input, "File to modify: ")?,
            data: prompt(input, "New data: ")?,
        },
        "5" => Command::Delete {
            name: prompt_name(input, "File to delete: ")?,
        },
        "6" => Command::Recover {
            name: prompt_name(input, "File to recover: ")?,
        },
        "7" => Command::ListDeleted,
        "8" => return Ok(false),
        other => {
            println!("Unknown option '{}'", other);
            return Ok(true);
        }
    };

    let read_name = match &command {
        Command::Read { name } => name.clone(),
        _ => String::new(),
    };
    let deleted_view = matches!(command, Command::ListDeleted);

    match fat.execute(command) {
        Ok(Outcome::Done) => println!("OK"),
        Ok(Outcome::Content(content)) => println!("Content of {}: {}", read_name, content),
        Ok(Outcome::Files(files)) => print_listing(&files, deleted_view),
        Err(e) => println!("error: {}", e),
    }

    Ok(true)
}

/// Print `label` and read one line without its terminator
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
    }

    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Like `prompt`, trimmed (menu choices and file names)
fn prompt_name(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    Ok(prompt(input, label)?.trim().to_string())
}
