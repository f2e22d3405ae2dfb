//! Stencil command line: resolve placeholders in text.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use stencil_application::{Environment, PropertyResolver};
use stencil_domain::placeholder::{DEFAULT_PREFIX, DEFAULT_SUFFIX, PlaceholderSyntax};
use stencil_domain::property::{MapPropertySource, MutablePropertySources};
use stencil_infrastructure::{add_file_sources, standard_environment_with_syntax};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the source holding `--set` values.
const COMMAND_LINE_PROPERTY_SOURCE_NAME: &str = "commandLineArgs";

/// Resolve `${...}` placeholders in text against property files and the
/// process environment.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to resolve; read from stdin when neither TEXT nor --file is given
    text: Option<String>,

    /// Read the text to resolve from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Property file (.json, .yaml, .yml, .properties); earlier files win
    #[arg(short, long = "source", value_name = "PATH")]
    sources: Vec<PathBuf>,

    /// Property override, taking precedence over every source
    #[arg(short = 'D', long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    values: Vec<(String, String)>,

    /// Profile to activate
    #[arg(short, long = "profile", value_name = "NAME")]
    profiles: Vec<String>,

    /// Fail on placeholders that cannot be resolved
    #[arg(long)]
    strict: bool,

    /// Do not read properties from the process environment
    #[arg(long)]
    no_system_env: bool,

    /// Placeholder prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Placeholder suffix
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Separator between a key and its default value
    #[arg(long, default_value = ":")]
    separator: String,

    /// Disable default values
    #[arg(long, conflicts_with = "separator")]
    no_separator: bool,

    /// Character that escapes a placeholder prefix or separator
    #[arg(long, default_value_t = '\\')]
    escape: char,

    /// Disable escaping
    #[arg(long, conflicts_with = "escape")]
    no_escape: bool,
}

/// Parse a single key-value pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))
}

impl Args {
    fn syntax(&self) -> Result<PlaceholderSyntax> {
        let syntax = PlaceholderSyntax::new(&self.prefix, &self.suffix)?;
        let syntax = if self.no_separator {
            syntax.without_separator()
        } else {
            syntax.with_separator(&self.separator)?
        };
        Ok(if self.no_escape {
            syntax.without_escape()
        } else {
            syntax.with_escape(self.escape)
        })
    }

    fn environment(&self) -> Result<Environment> {
        let syntax = self.syntax().context("invalid placeholder syntax")?;
        let environment = if self.no_system_env {
            let sources = Arc::new(MutablePropertySources::new());
            Environment::with_resolver(PropertyResolver::with_syntax(sources, syntax))
        } else {
            standard_environment_with_syntax(syntax)
        };

        add_file_sources(&environment, &self.sources).context("failed to load property sources")?;
        if !self.values.is_empty() {
            environment
                .property_sources()
                .add_first(Arc::new(MapPropertySource::from_pairs(
                    COMMAND_LINE_PROPERTY_SOURCE_NAME,
                    self.values.iter().cloned(),
                )));
        }
        if !self.profiles.is_empty() {
            environment
                .set_active_profiles(&self.profiles)
                .context("invalid profile")?;
        }

        tracing::debug!(
            sources = ?environment.property_sources().names(),
            profiles = ?environment.active_profiles(),
            "environment ready"
        );
        Ok(environment)
    }

    fn input(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }

        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    }
}

fn run(args: &Args) -> Result<String> {
    let environment = args.environment()?;
    let text = args.input()?;

    let resolved = if args.strict {
        environment.resolve_required_placeholders(&text)
    } else {
        environment.resolve_placeholders(&text)
    };
    resolved.context("failed to resolve placeholders")
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let mut output = run(&args)?;
    if args.text.is_some() && !output.ends_with('\n') {
        output.push('\n');
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
