//! sdkconfig — inspect and normalise annotated `sdk_config.h` headers.
//!
//! Subcommands:
//!
//! - **format**: parse and re-emit a header (`sdkconfig format < in.h > out.h`)
//! - **show**: print a header as header text, JSON, or `NAME=VALUE` lines
//! - **check**: parse many headers and report the malformed ones
//! - **diff**: list settings missing from a master header (`$SDK` fallback)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sdkconfig::parser::{self, Dispatch, ParseOptions, DEFAULT_MAX_DEPTH};
use sdkconfig::render::{self, header::HeaderRenderer, Renderer};
use sdkconfig::{Document, Flattened};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sdkconfig",
    about = "Parse, normalise and compare annotated SDK configuration headers"
)]
struct Cli {
    /// Report a malformed element where it occurs instead of ending the
    /// enclosing group's body there
    #[arg(long, global = true)]
    strict: bool,

    /// Maximum nesting of <h>/<e> groups
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a header and write it back out in normalised form
    Format {
        /// Input header. If omitted, reads from stdin.
        input: Option<PathBuf>,

        /// Output file. If omitted, writes to stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print a parsed header
    Show {
        input: PathBuf,

        /// Output format: keys (default), json, header
        #[arg(short = 'f', long, default_value = "keys")]
        format: String,
    },

    /// Parse headers and report which ones are malformed
    Check {
        /// Header files, directories or glob patterns
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List settings present in INPUT but absent from the master header
    Diff {
        input: PathBuf,

        /// Master header to compare against
        #[arg(short = 'm', long)]
        master: Option<PathBuf>,

        /// SDK root; the master is then <SDK>/config/nrf52840/config/sdk_config.h
        #[arg(long, env = "SDK")]
        sdk: Option<PathBuf>,

        /// List settings of the master that INPUT lacks instead
        #[arg(short = 'r', long)]
        reverse: bool,
    },
}

/// Location of the master header inside an SDK checkout.
const SDK_MASTER_CONFIG: &str = "config/nrf52840/config/sdk_config.h";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = ParseOptions {
        dispatch: if cli.strict {
            Dispatch::Strict
        } else {
            Dispatch::Lenient
        },
        max_depth: cli.max_depth,
    };

    match &cli.command {
        Command::Format { input, output } => reformat(input.as_deref(), output.as_deref(), &options),
        Command::Show { input, format } => show(input, format, &options),
        Command::Check { files } => check(files, &options),
        Command::Diff {
            input,
            master,
            sdk,
            reverse,
        } => {
            let master = resolve_master(master.as_deref(), sdk.as_deref())?;
            diff(input, &master, *reverse, &options)
        }
    }
}

fn reformat(input: Option<&Path>, output: Option<&Path>, options: &ParseOptions) -> Result<()> {
    let doc = match input {
        Some(path) => load(path, options)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            parser::parse_str(&text, options).context("failed to parse stdin")?
        }
    };

    let rendered = HeaderRenderer.render(&doc)?;
    match output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn show(input: &Path, format: &str, options: &ParseOptions) -> Result<()> {
    let renderer = render::create_renderer(format)?;
    let doc = load(input, options)?;
    warn_duplicates(input, &doc.flatten());
    print!("{}", renderer.render(&doc)?);
    Ok(())
}

fn check(patterns: &[String], options: &ParseOptions) -> Result<()> {
    let files = expand_globs(patterns)?;
    if files.is_empty() {
        bail!("no header files to check");
    }

    let mut failed = 0;
    for path in &files {
        match load(path, options) {
            Ok(doc) => {
                warn_duplicates(path, &doc.flatten());
                println!("ok: {}", path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("error: {:#}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, files.len());
    }
    Ok(())
}

fn diff(input: &Path, master: &Path, reverse: bool, options: &ParseOptions) -> Result<()> {
    let doc = load(input, options)?.flatten();
    let reference = load(master, options)?.flatten();
    warn_duplicates(input, &doc);
    warn_duplicates(master, &reference);

    let missing = if reverse {
        reference.missing_from(&doc)
    } else {
        doc.missing_from(&reference)
    };
    for name in missing {
        println!("{}", name);
    }
    Ok(())
}

/// Pick the master header: an explicit path wins over the SDK root.
fn resolve_master(master: Option<&Path>, sdk: Option<&Path>) -> Result<PathBuf> {
    match (master, sdk) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(sdk)) if !sdk.as_os_str().is_empty() => Ok(sdk.join(SDK_MASTER_CONFIG)),
        _ => bail!("no master header: pass --master or set SDK"),
    }
}

fn load(path: &Path, options: &ParseOptions) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parser::parse_str(&text, options).with_context(|| format!("failed to parse {}", path.display()))
}

fn warn_duplicates(path: &Path, flat: &Flattened) {
    for name in flat.duplicates() {
        eprintln!("warning: {}: setting {} is defined more than once", path.display(), name);
    }
}

/// Expand the `check` arguments into header paths.
///
/// Files are taken as given, with a warning if they are not `.h`. Directories
/// are searched recursively, since SDKs keep one `sdk_config.h` per board
/// under `config/<board>/config/`. Anything else is a glob pattern.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            if !is_header(path) {
                eprintln!("warning: {} is not a .h file, checking anyway", path.display());
            }
            files.push(path.to_path_buf());
            continue;
        }
        let (pattern, none_found) = if path.is_dir() {
            (
                path.join("**").join("*.h").to_string_lossy().into_owned(),
                format!("no headers found under {}", path.display()),
            )
        } else {
            (pattern.clone(), format!("no files matched: {}", pattern))
        };
        let matches: Vec<_> = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: {}", none_found);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_header(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("h")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_path_wins_over_sdk() {
        let resolved = resolve_master(Some(Path::new("m.h")), Some(Path::new("/sdk"))).unwrap();
        assert_eq!(resolved, PathBuf::from("m.h"));
    }

    #[test]
    fn master_from_sdk_root() {
        let resolved = resolve_master(None, Some(Path::new("/opt/nRF5_SDK"))).unwrap();
        assert_eq!(
            resolved,
            PathBuf::from("/opt/nRF5_SDK/config/nrf52840/config/sdk_config.h")
        );
    }

    #[test]
    fn master_required() {
        assert!(resolve_master(None, None).is_err());
        assert!(resolve_master(None, Some(Path::new(""))).is_err());
    }

    #[test]
    fn header_extension() {
        assert!(is_header(Path::new("config/sdk_config.h")));
        assert!(!is_header(Path::new("notes.txt")));
        assert!(!is_header(Path::new("Makefile")));
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sdkconfig", "show", "a.h", "--strict", "-f", "json"]).unwrap();
        assert!(cli.strict);
        assert!(matches!(cli.command, Command::Show { ref format, .. } if format == "json"));
    }
}
