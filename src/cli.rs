//! Command-line interface implementation for pipen-filters.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};

/// Command-line arguments structure for pipen-filters.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pipen-filters: render templates with the pipen filter catalog",
    long_about = None
)]
pub struct Args {
    /// Path to a template file, or inline template text
    #[arg(value_name = "TEMPLATE", required_unless_present = "list")]
    pub template: Option<String>,

    /// Render context: a JSON, TOML or YAML file, or inline JSON
    #[arg(short, long, value_name = "CONTEXT")]
    pub context: Option<String>,

    /// List every available filter with its aliases and exit
    #[arg(short, long)]
    pub list: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
