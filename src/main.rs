//! pipen-filters command-line entry point.
//! Renders a template with every filter of the catalog available, using a
//! context loaded from a configuration file or inline JSON.

use std::path::Path;

use log::debug;
use pipen_filters::{
    cli::{get_args, Args},
    config::load_file,
    error::{default_error_handler, Result},
    registry::registry,
    renderer::{MiniJinjaRenderer, TemplateRenderer},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Loads the render context from a file, or parses it as inline JSON.
///
/// # Errors
/// * A read or parse error of the context file or text
fn get_context(context: Option<&str>) -> Result<serde_json::Value> {
    match context {
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
        Some(context) if Path::new(context).is_file() => load_file(context, None),
        Some(context) => {
            debug!("Parsing context as inline JSON");
            Ok(serde_json::from_str(context)?)
        }
    }
}

/// Reads the template from a file, or takes the argument as template text.
fn get_template(template: &str) -> Result<String> {
    let path = Path::new(template);
    if path.is_file() {
        debug!("Reading template from {}", path.display());
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(template.to_string())
    }
}

/// Prints every primary filter name followed by its aliases.
fn list_filters() {
    for (name, aliases) in registry().groups() {
        if aliases.is_empty() {
            println!("{name}");
        } else {
            println!("{name} ({})", aliases.join(", "));
        }
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Lists the filters and returns when `--list` is given
/// 2. Loads the render context
/// 3. Reads the template
/// 4. Renders the template and prints the result
fn run(args: Args) -> Result<()> {
    if args.list {
        list_filters();
        return Ok(());
    }

    let context = get_context(args.context.as_deref())?;
    let Some(template) = args.template else {
        return Ok(());
    };
    let template = get_template(&template)?;

    let renderer = MiniJinjaRenderer::new();
    let rendered = renderer.render(&template, &context)?;
    println!("{rendered}");
    Ok(())
}
