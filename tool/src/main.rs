//! hashcash: mint, check and estimate hashcash stamps from the command line.

mod config;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use config::ToolConfig;
use hashcash_types::Extensions;
use hashcash_utils::{format_duration, format_iso_millis, init_logging, LogFormat};
use hashcash_work::{Estimator, MintRequest, Token, TokenMinter};

#[derive(Parser, Debug)]
#[command(name = "hashcash", about = "Generate or verify a hashcash stamp", version)]
struct Cli {
    /// Echo the effective options and log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Resource to mint a stamp for.
    #[arg(short, long, env = "HASHCASH_RESOURCE")]
    resource: Option<String>,

    /// Bits to mint. When checking, suppresses the VALID / NOT VALID line,
    /// but only if given on the command line.
    #[arg(short, long, env = "HASHCASH_BITS")]
    bits: Option<u32>,

    /// Set when `-b` came from argv rather than the environment.
    #[arg(skip)]
    bits_flag_given: bool,

    /// Digest algorithm, e.g. SHA1 or SHA-256.
    #[arg(short = 'f', long, env = "HASHCASH_HASH_FUNCTION")]
    hash_function: Option<String>,

    /// Stamp format version to mint: 0 or 1.
    #[arg(long, env = "HASHCASH_TOKEN_VERSION")]
    token_version: Option<u32>,

    /// Extension to add, as `key=v1,v2` or a bare `key`. Repeatable.
    #[arg(short = 'x', long = "extension", value_name = "KEY=VALUES")]
    extensions: Vec<String>,

    /// Stamp to parse and check.
    #[arg(short = 'c', long = "check", value_name = "STAMP")]
    check: Option<String>,

    /// Print the expected time to mint a stamp of this many bits.
    #[arg(long, value_name = "BITS")]
    estimate: Option<u32>,

    /// Print the bit value mintable in about this many seconds.
    #[arg(long, value_name = "SECONDS")]
    budget: Option<u64>,

    /// Give up minting after this many seconds.
    #[arg(long, value_name = "SECONDS", env = "HASHCASH_TIMEOUT")]
    timeout: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HASHCASH_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HASHCASH_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML file with defaults. Flags and env vars override it.
    #[arg(long, env = "HASHCASH_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match cli_from_matches(&Cli::command().get_matches()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn cli_from_matches(matches: &ArgMatches) -> Result<Cli, clap::Error> {
    let mut cli = Cli::from_arg_matches(matches)?;
    cli.bits_flag_given = matches.value_source("bits") == Some(ValueSource::CommandLine);
    Ok(cli)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let file_config = match &cli.config {
        Some(path) => ToolConfig::from_toml_file(path)?,
        None => ToolConfig::default(),
    };
    let config = merge(cli, file_config);
    let log_format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    init_logging(log_format, &config.log_level);

    let mut out = io::stdout().lock();
    if cli.verbose {
        show_options(&mut out, cli, &config)?;
    }

    if let (Some(resource), Some(bits)) = (&cli.resource, config.bits) {
        let token = mint(resource, bits, &config, cli.timeout)?;
        writeln!(out, "{token}")?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(text) = &cli.check {
        check(&mut out, text, &config.hash_function, cli.bits_flag_given)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.estimate.is_some() || cli.budget.is_some() {
        let estimator = Estimator::global();
        if let Some(bits) = cli.estimate {
            estimate(&mut out, &estimator, bits)?;
        }
        if let Some(seconds) = cli.budget {
            budget(&mut out, &estimator, seconds)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("unrecognized.");
    eprintln!("{}", Cli::command().render_usage());
    Ok(ExitCode::from(2))
}

/// Flags win over the config file; `-v` forces debug logging.
fn merge(cli: &Cli, file: ToolConfig) -> ToolConfig {
    ToolConfig {
        hash_function: cli.hash_function.clone().unwrap_or(file.hash_function),
        bits: cli.bits.or(file.bits),
        token_version: cli.token_version.unwrap_or(file.token_version),
        extensions: if cli.extensions.is_empty() {
            file.extensions
        } else {
            cli.extensions.clone()
        },
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            cli.log_level.clone().unwrap_or(file.log_level)
        },
        log_format: cli
            .log_format
            .map(|f| f.to_string())
            .unwrap_or(file.log_format),
    }
}

fn show_options(out: &mut impl Write, cli: &Cli, config: &ToolConfig) -> io::Result<()> {
    writeln!(out, "options:")?;
    if let Some(resource) = &cli.resource {
        writeln!(out, "  resource: {resource}")?;
    }
    if let Some(bits) = config.bits {
        writeln!(out, "  bits: {bits}")?;
    }
    if let Some(text) = &cli.check {
        writeln!(out, "  check: {text}")?;
    }
    writeln!(out, "  hash function: {}", config.hash_function)?;
    writeln!(out, "  token version: {}", config.token_version)?;
    for extension in &config.extensions {
        writeln!(out, "  extension: {extension}")?;
    }
    Ok(())
}

fn mint(
    resource: &str,
    bits: u32,
    config: &ToolConfig,
    timeout: Option<u64>,
) -> anyhow::Result<Token> {
    let request = MintRequest::new(resource, bits)
        .version(config.token_version)
        .hash_function(config.hash_function.as_str())
        .extensions(parse_extensions(&config.extensions));
    let mut minter = TokenMinter::new();
    if let Some(secs) = timeout {
        minter = minter.deadline(Duration::from_secs(secs));
    }
    tracing::info!(resource, bits, hash_function = %config.hash_function, "minting");
    Ok(minter.mint(&request)?)
}

fn check(
    out: &mut impl Write,
    text: &str,
    hash_function: &str,
    bits_given: bool,
) -> anyhow::Result<()> {
    let token = Token::parse_with(text, hash_function)?;
    writeln!(out, "ver: {}", token.version())?;
    writeln!(out, "bits: {}", token.computed_bits())?;
    writeln!(out, "resource: {}", token.resource())?;
    writeln!(out, "date: {}", format_iso_millis(&token.minted_at()))?;
    if !bits_given {
        let verdict = if token.computed_bits() >= token.claimed_bits() {
            "VALID"
        } else {
            "NOT VALID"
        };
        writeln!(out, "{verdict}")?;
    }
    Ok(())
}

fn estimate(out: &mut impl Write, estimator: &Estimator, bits: u32) -> io::Result<()> {
    let expected = estimator.estimate_time(bits);
    writeln!(
        out,
        "{bits} bits: about {} ({} ms)",
        format_duration(expected.as_secs()),
        expected.as_millis()
    )
}

fn budget(out: &mut impl Write, estimator: &Estimator, seconds: u64) -> io::Result<()> {
    writeln!(
        out,
        "{seconds}s: about {} bits",
        estimator.estimate_value(seconds)
    )
}

/// `key=v1,v2` adds a valued key; a bare `key` adds a flag.
fn parse_extensions(entries: &[String]) -> Extensions {
    let mut extensions = Extensions::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((key, values)) => {
                extensions.insert(key, values.split(',').map(str::to_string).collect())
            }
            None => extensions.insert_flag(entry.as_str()),
        }
    }
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADAM: &str = "1:20:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi";

    fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "hashcash", "-v", "-r", "someone@example.org", "-b", "12", "-f", "SHA-256", "-x",
            "k=a,b", "-x", "flag",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.resource.as_deref(), Some("someone@example.org"));
        assert_eq!(cli.bits, Some(12));
        assert_eq!(cli.extensions, vec!["k=a,b", "flag"]);
    }

    #[test]
    fn test_bits_source_is_tracked() {
        let matches = Cli::command().get_matches_from(["hashcash", "-c", "x", "-b", "20"]);
        assert!(cli_from_matches(&matches).unwrap().bits_flag_given);

        let matches = Cli::command().get_matches_from(["hashcash", "-c", "x"]);
        assert!(!cli_from_matches(&matches).unwrap().bits_flag_given);
    }

    #[test]
    fn test_bits_from_env_keeps_verdict() {
        std::env::set_var("HASHCASH_TOOL_TEST_BITS", "20");
        let command = Cli::command().mut_arg("bits", |a| a.env("HASHCASH_TOOL_TEST_BITS"));
        let cli = cli_from_matches(&command.get_matches_from(["hashcash", "-c", ADAM])).unwrap();
        assert_eq!(cli.bits, Some(20));
        assert!(!cli.bits_flag_given);
        let text = output(|buf| check(buf, ADAM, "SHA1", cli.bits_flag_given).unwrap());
        assert!(text.ends_with("+0000\nVALID\n"));
    }

    #[test]
    fn test_bad_bits_rejected() {
        assert!(Cli::try_parse_from(["hashcash", "-b", "many"]).is_err());
        assert!(Cli::try_parse_from(["hashcash", "-r"]).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::try_parse_from(["hashcash", "-f", "SHA-512", "--log-format", "json"]).unwrap();
        let file = ToolConfig {
            hash_function: "SHA-256".into(),
            bits: Some(9),
            extensions: vec!["a=b".into()],
            ..ToolConfig::default()
        };
        let merged = merge(&cli, file);
        assert_eq!(merged.hash_function, "SHA-512");
        assert_eq!(merged.bits, Some(9));
        assert_eq!(merged.extensions, vec!["a=b"]);
        assert_eq!(merged.log_format, "json");
        assert_eq!(merged.log_level, "warn");
    }

    #[test]
    fn test_verbose_forces_debug() {
        let cli = Cli::try_parse_from(["hashcash", "-v", "--log-level", "error"]).unwrap();
        assert_eq!(merge(&cli, ToolConfig::default()).log_level, "debug");
    }

    #[test]
    fn test_check_output() {
        let text = output(|buf| check(buf, ADAM, "SHA1", false).unwrap());
        assert_eq!(
            text,
            "ver: 1\nbits: 20\nresource: adam@cypherspace.org\n\
             date: 2013-03-03T06:00:00.000+0000\nVALID\n"
        );
    }

    #[test]
    fn test_check_with_bits_omits_verdict() {
        let text = output(|buf| check(buf, ADAM, "SHA1", true).unwrap());
        assert!(!text.contains("VALID"));
        assert!(text.ends_with("+0000\n"));
    }

    #[test]
    fn test_check_not_valid() {
        let weak = "1:30:1303030600:adam@cypherspace.org::McMybZIhxKXu57jd:ckvi";
        let text = output(|buf| check(buf, weak, "SHA1", false).unwrap());
        assert!(text.ends_with("NOT VALID\n"));
    }

    #[test]
    fn test_check_malformed() {
        let err = check(&mut Vec::<u8>::new(), "seven", "SHA1", false).unwrap_err();
        assert_eq!(err.to_string(), "malformed token");
    }

    #[test]
    fn test_mint_uses_config() {
        let config = ToolConfig {
            hash_function: "SHA-256".into(),
            token_version: 0,
            extensions: vec!["k=a,b".into(), "flag".into()],
            ..ToolConfig::default()
        };
        let token = mint("someone@example.org", 6, &config, None).unwrap();
        assert!(token.as_str().starts_with("0:"));
        assert!(token.as_str().contains(":flag;k=a,b:"));
        let reparsed = Token::parse_with(token.as_str(), "SHA-256").unwrap();
        assert!(reparsed.computed_bits() >= 6);
    }

    #[test]
    fn test_mint_rejects_colon() {
        let err = mint("a:b", 4, &ToolConfig::default(), None).unwrap_err();
        assert_eq!(err.to_string(), "resource may not contain a colon");
    }

    #[test]
    fn test_estimate_lines() {
        let estimator = Estimator::with_baseline(Duration::from_secs(1));
        let text = output(|buf| estimate(buf, &estimator, 17).unwrap());
        assert_eq!(text, "17 bits: about 2s (2000 ms)\n");
        let text = output(|buf| budget(buf, &estimator, 64).unwrap());
        assert_eq!(text, "64s: about 22 bits\n");
    }

    #[test]
    fn test_parse_extensions() {
        let ext = parse_extensions(&["k=a,b".into(), "flag".into(), "e=".into()]);
        assert_eq!(ext.get("k"), Some(Some(&["a".to_string(), "b".to_string()][..])));
        assert_eq!(ext.get("flag"), Some(None));
        assert_eq!(ext.get("e").unwrap().unwrap(), &[String::new()][..]);
        assert_eq!(ext.encode().unwrap(), "e=;flag;k=a,b");
    }
}
