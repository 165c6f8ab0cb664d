use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sitemark::config::{CONFIG_FILE_NAME, Config, OutputFormat};
use sitemark::page::{DEFAULT_TEMPLATE, render_page};
use sitemark::renderer::HtmlRenderer;
use sitemark::{normalize_line_endings, parse_document};

#[derive(Parser)]
#[command(name = "sitemark")]
#[command(about = "Convert Markdown documents to HTML")]
struct Cli {
    /// Input Markdown file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Output file (writes stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump the parsed node tree as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// Wrap the output in an HTML page template
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Config file (defaults to sitemark.toml next to the input)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the built-in page template
    #[arg(long, conflicts_with = "template")]
    page: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicitly named config file must exist; the implicit one is optional
    let (config_path, config) = match (&cli.config, &cli.input) {
        (Some(path), _) => (path.clone(), Config::load_required(path)?),
        (None, input) => {
            let path = input
                .as_deref()
                .map(Config::path_for_input)
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            let config = Config::load(&path)?;
            (path, config)
        }
    };

    init_logging(&config.log.level);
    debug!(config = %config_path.display(), "loaded configuration");

    let markdown = read_input(cli.input.as_deref())?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    let template = match choose_template(cli.page, cli.template, config.page.template) {
        TemplateChoice::File(path) => Some(
            fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template {}", path.display()))?,
        ),
        TemplateChoice::Builtin => Some(DEFAULT_TEMPLATE.to_string()),
        TemplateChoice::Bare => None,
    };

    let rendered = match (format, template) {
        (OutputFormat::Json, _) => {
            let tree = parse_document(&markdown)?;
            HtmlRenderer::new().render_json(&tree)?
        }
        (OutputFormat::Html, Some(template)) => render_page(&template, &markdown)?,
        (OutputFormat::Html, None) => parse_document(&markdown)?.to_html()?,
    };

    match cli.output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(output = %path.display(), "wrote output");
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum TemplateChoice {
    Builtin,
    File(PathBuf),
    Bare,
}

/// Command line choices win over the config file
fn choose_template(
    page: bool,
    flag: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> TemplateChoice {
    if page {
        return TemplateChoice::Builtin;
    }
    match flag.or(configured) {
        Some(path) => TemplateChoice::File(path),
        None => TemplateChoice::Bare,
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let input = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            input
        }
    };
    Ok(normalize_line_endings(&input))
}

/// Log to stderr so stdout carries only the rendered document
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_flag_beats_configured_template() {
        assert_eq!(
            choose_template(true, None, Some(PathBuf::from("site.html"))),
            TemplateChoice::Builtin
        );
    }

    #[test]
    fn test_template_flag_beats_configured_template() {
        assert_eq!(
            choose_template(
                false,
                Some(PathBuf::from("cli.html")),
                Some(PathBuf::from("site.html"))
            ),
            TemplateChoice::File(PathBuf::from("cli.html"))
        );
    }

    #[test]
    fn test_configured_template_is_used_without_flags() {
        assert_eq!(
            choose_template(false, None, Some(PathBuf::from("site.html"))),
            TemplateChoice::File(PathBuf::from("site.html"))
        );
        assert_eq!(choose_template(false, None, None), TemplateChoice::Bare);
    }
}
