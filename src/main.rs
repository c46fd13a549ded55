use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use proxyselect::{logging, Config, ProxyResolver, Resolution};

#[derive(Parser, Debug)]
#[clap(version = env!("PROXYSELECT_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
/// Print the system proxy to use for a URI as TYPE://host:port
pub struct Opts {
    /// URI to resolve a proxy for
    uri: String,

    /// Configuration file (defaults to the user configuration directory)
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// PAC script location, overrides the configuration
    #[clap(long)]
    pac_url: Option<String>,

    /// Proxy to use for every URI, overrides the configuration
    #[clap(long, short = 'p')]
    proxy: Option<String>,

    /// Ignore proxy environment variables
    #[clap(long)]
    no_env: bool,

    /// Explain on stderr why no proxy was resolved
    #[clap(long)]
    explain: bool,

    /// Increase log verbosity
    #[clap(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Print the outcome and pick the exit status: 0 with a proxy, 1 without.
fn report(
    uri: &str,
    resolution: Resolution,
    explain: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    match resolution {
        Resolution::Resolved(proxy) => {
            writeln!(out, "{}", proxy)?;
            Ok(0)
        }
        Resolution::Unavailable(reason) => {
            if explain {
                writeln!(err, "no proxy for {}: {}", uri, reason)?;
            }
            Ok(1)
        }
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    logging::init(log_level(opts.verbose));

    let mut config = Config::load(opts.config.as_deref())?;
    config.apply_overrides(opts.pac_url, opts.proxy, opts.no_env);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let selector = runtime.block_on(config.build_selector())?;

    let resolver = ProxyResolver::new(Arc::new(selector));
    let resolution = resolver.resolve_detailed(&opts.uri);
    let code = report(&opts.uri, resolution, opts.explain, &mut io::stdout(), &mut io::stderr())?;
    Ok(ExitCode::from(code))
}
