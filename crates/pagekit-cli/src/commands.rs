//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pagekit: lint and inspect object repository documents
#[derive(Parser, Debug)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Framework configuration file (YAML)
    #[arg(long, global = true, env = "PAGEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate repository files
    ///
    /// Resolves every element for every requested platform and reports
    /// each problem found: missing platform variants, missing attributes,
    /// unsupported locator types, duplicate and empty names.
    Check(CheckArgs),

    /// Print the compiled locator for one element
    Resolve(ResolveArgs),

    /// List elements and the platforms each declares
    ///
    /// Quiet mode drops the header line; element lines always print.
    List(ListArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Repository files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Platforms to check (default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub platform: Vec<PlatformArg>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Repository file; looked up in the configured repository directory
    /// when it does not exist as given
    pub file: PathBuf,

    /// Element name
    pub name: String,

    /// Target platform
    #[arg(short, long)]
    pub platform: PlatformArg,

    /// Placeholder value, as TOKEN=VALUE (repeatable, applied in order)
    #[arg(short = 's', long = "set", value_parser = parse_token)]
    pub set: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Repository file
    pub file: PathBuf,
}

/// Platform argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformArg {
    /// Mobile iOS
    Ios,
    /// Mobile Android
    Android,
    /// Web browser
    Web,
}

impl From<PlatformArg> for pagekit::Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::Android => Self::Android,
            PlatformArg::Web => Self::Web,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Parse `TOKEN=VALUE`, splitting on the first `=`
fn parse_token(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((token, value)) if !token.is_empty() => Ok((token.to_string(), value.to_string())),
        _ => Err(format!("expected TOKEN=VALUE, got '{input}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_check_with_platforms() {
            let cli = Cli::parse_from(["pagekit", "check", "a.xml", "b.xml", "-p", "web,ios"]);
            if let Commands::Check(args) = cli.command {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.platform, vec![PlatformArg::Web, PlatformArg::Ios]);
            } else {
                panic!("expected Check command");
            }
        }

        #[test]
        fn test_check_requires_files() {
            assert!(Cli::try_parse_from(["pagekit", "check"]).is_err());
        }

        #[test]
        fn test_parse_resolve_with_tokens() {
            let cli = Cli::parse_from([
                "pagekit",
                "resolve",
                "LoginPage.xml",
                "lblCountry",
                "--platform",
                "web",
                "--set",
                "$$countryName$$=USA",
                "-s",
                "$$city$$=a=b",
                "--format",
                "json",
            ]);
            if let Commands::Resolve(args) = cli.command {
                assert_eq!(args.name, "lblCountry");
                assert_eq!(args.platform, PlatformArg::Web);
                assert_eq!(
                    args.set,
                    vec![
                        ("$$countryName$$".to_string(), "USA".to_string()),
                        ("$$city$$".to_string(), "a=b".to_string()),
                    ]
                );
                assert_eq!(args.format, FormatArg::Json);
            } else {
                panic!("expected Resolve command");
            }
        }

        #[test]
        fn test_resolve_requires_platform() {
            assert!(Cli::try_parse_from(["pagekit", "resolve", "a.xml", "x"]).is_err());
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from(["pagekit", "-vv", "-q", "--color", "never", "list", "a.xml"]);
            assert_eq!(cli.verbose, 2);
            assert!(cli.quiet);
            assert!(matches!(cli.color, ColorArg::Never));
            assert!(matches!(cli.command, Commands::List(_)));
        }
    }

    mod token_tests {
        use super::*;

        #[test]
        fn test_parse_token() {
            assert_eq!(
                parse_token("k=v").unwrap(),
                ("k".to_string(), "v".to_string())
            );
            assert_eq!(parse_token("k=").unwrap(), ("k".to_string(), String::new()));
            assert!(parse_token("novalue").is_err());
            assert!(parse_token("=v").is_err());
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_platform_conversion() {
            assert_eq!(pagekit::Platform::from(PlatformArg::Android), pagekit::Platform::Android);
            assert_eq!(pagekit::Platform::from(PlatformArg::Ios), pagekit::Platform::Ios);
            assert_eq!(pagekit::Platform::from(PlatformArg::Web), pagekit::Platform::Web);
        }
    }
}
