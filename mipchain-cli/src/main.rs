//! mipchain CLI - Command-line interface
//!
//! Generates the mip chain for one texture and writes every level as a PNG
//! next to the source (or into `--output-dir`).
//!
//! The short legacy switches `-N`, `-D` and `-ST` are accepted in any case
//! and mapped to their long forms before parsing.

mod commands;
mod error;
mod runner;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser};

use commands::common::FilterKind;
use commands::generate::{self, GenerateArgs};

/// Generate color-space-correct mip chains for textures.
#[derive(Debug, Parser)]
#[command(name = "mipchain", version, about, long_about = None)]
struct Cli {
    /// The source image to generate mips for
    source: Option<PathBuf>,

    /// Normal map: renormalizes each pixel of every level (-N)
    #[arg(short = 'N', long = "normal-map", overrides_with = "data")]
    normal_map: bool,

    /// Other data, e.g. roughness maps: avoids sRGB conversions (-D)
    #[arg(short = 'D', long, overrides_with = "normal_map")]
    data: bool,

    /// Single threaded processing (-ST)
    #[arg(long = "single-thread")]
    single_thread: bool,

    /// Resampling filter [default: from config, else box]
    #[arg(long, value_enum)]
    filter: Option<FilterKind>,

    /// Kaiser window alpha, 0 to 20 [default: 4]
    #[arg(long, value_name = "ALPHA")]
    kaiser_alpha: Option<f32>,

    /// Kaiser support radius in destination pixels, up to 64 [default: 3]
    #[arg(long, value_name = "RADIUS")]
    kaiser_radius: Option<f32>,

    /// Worker threads for parallel mode (0 = one per core)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Directory for the generated levels [default: next to the source]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Configuration file [default: <config dir>/mipchain/config.ini]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Map the case-insensitive legacy switches onto clap's flags.
fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let mapped = arg.to_str().and_then(|s| match s.to_ascii_lowercase().as_str() {
                "-n" => Some("--normal-map"),
                "-d" => Some("--data"),
                "-st" => Some("--single-thread"),
                _ => None,
            });
            match mapped {
                Some(flag) => OsString::from(flag),
                None => arg,
            }
        })
        .collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));

    // We need a source file at minimum
    let Some(source) = cli.source else {
        let mut cmd = Cli::command();
        // Usage output failing (closed stdout) does not change the outcome
        cmd.print_help().ok();
        println!();
        return ExitCode::from(1);
    };

    let args = GenerateArgs {
        source,
        normal_map: cli.normal_map,
        data: cli.data,
        single_thread: cli.single_thread,
        filter: cli.filter,
        kaiser_alpha: cli.kaiser_alpha,
        kaiser_radius: cli.kaiser_radius,
        threads: cli.threads,
        output_dir: cli.output_dir,
        config: cli.config,
        verbose: cli.verbose,
    };

    match generate::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("mipchain")
            .chain(args.iter().copied())
            .map(OsString::from);
        Cli::try_parse_from(normalize_legacy_flags(args)).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["rock.png"]);
        assert_eq!(cli.source, Some(PathBuf::from("rock.png")));
        assert!(!cli.normal_map);
        assert!(!cli.data);
        assert!(!cli.single_thread);
        assert_eq!(cli.filter, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_missing_source_parses() {
        assert_eq!(parse(&[]).source, None);
    }

    #[test]
    fn test_legacy_flags_any_case() {
        let cli = parse(&["-ST", "-N", "normals.png"]);
        assert!(cli.single_thread);
        assert!(cli.normal_map);

        let cli = parse(&["normals.png", "-st", "-n"]);
        assert!(cli.single_thread);
        assert!(cli.normal_map);

        let cli = parse(&["-d", "roughness.png"]);
        assert!(cli.data);
    }

    #[test]
    fn test_last_source_type_flag_wins() {
        let cli = parse(&["-N", "-D", "x.png"]);
        assert!(cli.data);
        assert!(!cli.normal_map);

        let cli = parse(&["-D", "-N", "x.png"]);
        assert!(cli.normal_map);
        assert!(!cli.data);
    }

    #[test]
    fn test_long_options() {
        let cli = parse(&[
            "--filter",
            "kaiser",
            "--kaiser-alpha",
            "5.5",
            "--kaiser-radius",
            "2",
            "--threads",
            "3",
            "-o",
            "out",
            "-vv",
            "x.png",
        ]);
        assert_eq!(cli.filter, Some(FilterKind::Kaiser));
        assert_eq!(cli.kaiser_alpha, Some(5.5));
        assert_eq!(cli.kaiser_radius, Some(2.0));
        assert_eq!(cli.threads, Some(3));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let out = normalize_legacy_flags(["-v", "-nx", "file-n.png"].map(OsString::from));
        assert_eq!(out, ["-v", "-nx", "file-n.png"].map(OsString::from).to_vec());
    }
}
