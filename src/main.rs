use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use blood_calculator::{
    process, read_input, BloodGroup, CalculatorError, CompatibilityResolver, ReportFormat,
    ReportGenerator, Request,
};

/// Blood group compatibility and donation availability calculator
#[derive(Parser, Debug)]
#[command(
    name = "blood-calculator",
    version,
    about = "Answers blood compatibility, donation search and availability requests",
    long_about = r#"
Reads one JSON request from standard input and writes one JSON response to
standard output. Supported operations:
- check_compatibility     {"donor": "O-", "recipient": "A+"}
- search_donations        {"donations": [...], "blood_group", "location", "available_only"}
- calculate_availability  {"donations": [...]}

On failure the response is {"error": "<message>"} and the exit status is 1.
"#
)]
struct Cli {
    /// Read the request from a file instead of stdin
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Prompt for donor and recipient groups and run a compatibility check
    #[arg(long)]
    interactive: bool,

    /// Enable verbose logging (on stderr)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions
    Completions { shell: Shell },
    /// Print the blood group compatibility table
    Groups,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Pretty,
    Csv,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> ReportFormat {
        match format {
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Pretty => ReportFormat::Pretty,
            OutputFormat::Csv => ReportFormat::Csv,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return Ok(ExitCode::SUCCESS);
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Groups) => {
            list_groups();
            return Ok(ExitCode::SUCCESS);
        }
        None => {}
    }

    init_logging(cli.verbose);

    let generator = ReportGenerator::new(cli.format.into());

    if cli.interactive {
        let request = run_interactive_mode()?;
        let text = generator.render(&request.execute())?;
        io::stdout().write_all(text.as_bytes())?;
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = read_input(cli.input.as_deref())
        .and_then(|input| process(&input))
        .and_then(|response| generator.render(&response));

    respond(&generator, outcome)
}

/// Write the response or the error object; nothing else reaches stdout
fn respond(
    generator: &ReportGenerator,
    outcome: Result<String, CalculatorError>,
) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match outcome {
        Ok(text) => {
            stdout.write_all(text.as_bytes())?;
            info!("Request completed");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(kind = err.kind(), "{}", err);
            stdout.write_all(generator.render_error(&err).as_bytes())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn list_groups() {
    println!("{}", style("Blood Group Compatibility:").bold().cyan());
    println!();

    let resolver = CompatibilityResolver::new();

    for group in BloodGroup::ALL {
        let entry = resolver.entry(group);
        let donates_to: Vec<&str> = resolver
            .compatible_recipients(group)
            .iter()
            .map(|g| g.as_str())
            .collect();

        let mut tags = Vec::new();
        if entry.is_universal_donor {
            tags.push("universal donor");
        }
        if entry.is_universal_recipient {
            tags.push("universal recipient");
        }

        println!(
            "  {:<4} {} {}",
            style(group).green().bold(),
            style(group.label()).yellow(),
            style(tags.join(", ")).magenta()
        );
        println!("         {}", style(entry.description).dim());
        println!(
            "         {}",
            style(format!("Can donate to {}", donates_to.join(", "))).dim()
        );
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("blood_calculator={}", level))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Prompts and banner go to stderr; stdout only ever carries the response
fn run_interactive_mode() -> Result<Request> {
    eprintln!(
        "{}",
        style("╔══════════════════════════════════════════════════════════════╗")
            .for_stderr()
            .cyan()
    );
    eprintln!(
        "{}",
        style("║        Blood Compatibility Check - Interactive Mode          ║")
            .for_stderr()
            .cyan()
            .bold()
    );
    eprintln!(
        "{}",
        style("╚══════════════════════════════════════════════════════════════╝")
            .for_stderr()
            .cyan()
    );
    eprintln!();

    let theme = ColorfulTheme::default();
    let groups: Vec<String> = BloodGroup::ALL
        .iter()
        .map(|g| format!("{:<4} {}", g.as_str(), g.label()))
        .collect();

    let donor_idx = Select::with_theme(&theme)
        .with_prompt("Donor blood group")
        .default(0)
        .items(&groups)
        .interact()?;

    let recipient_idx = Select::with_theme(&theme)
        .with_prompt("Recipient blood group")
        .default(0)
        .items(&groups)
        .interact()?;

    Ok(Request::CheckCompatibility {
        donor: BloodGroup::ALL[donor_idx].to_string(),
        recipient: BloodGroup::ALL[recipient_idx].to_string(),
    })
}
