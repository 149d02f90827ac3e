// SPDX-License-Identifier: MIT
//
// wl-brand: white-label theming from the command line.
//
// This is the binary that wires the crates together:
//
//   wl-color → hex / RGB / HSL conversions
//   wl-theme → palettes, CSS sanitizing, ThemeService + Document sink
//
// It stands in for the storefront's config fetcher: a tenant config
// envelope is read from a file or stdin and applied to a fresh Document,
// whose head markup is printed to stdout. Logs go to stderr so the output
// can be piped.
//
//   wl-brand apply tenant.json --title "Home | Storefront"
//   wl-brand palette '#9333ea' --prefix brand
//   wl-brand sanitize custom.css --report

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wl_color::Rgb;
use wl_theme::sanitize::sanitize_report;
use wl_theme::{
    Document, TenantConfig, ThemeOptions, ThemeService, generate_palette, palette_to_css,
};

#[derive(Parser)]
#[command(name = "wl-brand")]
#[command(version)]
#[command(about = "Derive brand palettes and sanitize tenant CSS", long_about = None)]
struct Cli {
    /// Log filter (e.g. `debug`, `wl_theme=trace`); overrides RUST_LOG
    #[arg(long, global = true, env = "WL_BRAND_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a tenant config envelope and print the resulting page head
    Apply {
        /// Tenant config JSON (`-` for stdin)
        input: PathBuf,

        /// Starting document title
        #[arg(long, default_value = "Storefront")]
        title: String,

        /// Theme options JSON overriding the platform defaults
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Print the 11-shade palette of a color as CSS custom properties
    Palette {
        /// Base color, `#rgb` or `#rrggbb`
        color: String,

        /// Custom-property prefix
        #[arg(long, default_value = "wl-brand")]
        prefix: String,

        /// Print a JSON shade map instead of CSS
        #[arg(long)]
        json: bool,
    },
    /// Sanitize a tenant stylesheet and print the result
    Sanitize {
        /// Stylesheet (`-` for stdin)
        input: PathBuf,

        /// Also list the rules that fired and anything suspicious (stderr)
        #[arg(long)]
        report: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(err) = run(cli.command) {
        eprintln!("wl-brand: {err:#}");
        process::exit(1);
    }
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Apply { input, title, options } => {
            let options = match options {
                Some(path) => {
                    let text = read_input(&path)?;
                    ThemeOptions::from_json(&text)
                        .with_context(|| format!("reading options from {}", path.display()))?
                }
                None => ThemeOptions::default(),
            };
            print!("{}", apply(&read_input(&input)?, &title, options)?);
        }
        Command::Palette { color, prefix, json } => {
            let base: Rgb = color
                .parse()
                .with_context(|| format!("invalid color {color:?}"))?;
            let palette = generate_palette(base);
            if json {
                println!("{}", serde_json::to_string_pretty(&palette)?);
            } else {
                println!("{}", palette_to_css(&palette, &prefix));
            }
        }
        Command::Sanitize { input, report } => {
            let sanitized = sanitize_report(&read_input(&input)?);
            print!("{}", sanitized.css);
            if report {
                eprintln!("rules fired: {:?}", sanitized.rules);
                eprintln!("suspicious: {:?}", sanitized.suspicions);
            }
        }
    }
    Ok(())
}

/// Apply a tenant envelope to a fresh document and render its head.
fn apply(json: &str, title: &str, options: ThemeOptions) -> Result<String> {
    let config = TenantConfig::from_json(json).context("decoding tenant config")?;
    let mut service = ThemeService::new(Document::new(title), options);

    match &config.branding {
        Some(branding) => {
            let report = service.apply(branding);
            debug!(?report, "apply finished");
        }
        None => debug!(tenant = ?config.tenant_id, "no branding, keeping platform defaults"),
    }

    Ok(service.into_sink().render_head())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
