//! Invite Forge - invite code generation and existence checking
//!
//! Generates candidate invite codes (or reads them from a file), tests each one
//! against the lookup endpoint and writes the invites that exist to a JSON file.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use invite_forge::{
    brute::BatchProgress,
    codes::{read_codes_from_file, write_codes_to_file, CodeGenerator},
    output::save_invites,
    transport::parse_proxy_list,
    types::{BruteConfig, ProxySelection, DEFAULT_INVITE_URL},
    InviteBrute,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Generate invite codes and check which ones exist
#[derive(Parser, Debug)]
#[command(name = "invite-forge", version)]
#[command(about = "Generate invite codes and check which ones exist")]
struct Cli {
    /// Number of codes to generate
    #[arg(long, env = "INVITE_FORGE_CODES", default_value_t = 10)]
    codes: usize,

    /// Proxies to rotate through, separated with ','
    #[arg(long, env = "INVITE_FORGE_PROXIES", default_value = "")]
    proxies: String,

    /// Lookup url; must include {code} as the code placeholder
    #[arg(long, env = "INVITE_FORGE_URL", default_value = DEFAULT_INVITE_URL)]
    url: String,

    /// Proxy order: in_order, reverse or random
    #[arg(long, env = "INVITE_FORGE_PROXY_SELECTION", default_value = "in_order")]
    proxy_selection: ProxySelection,

    /// Seconds to wait when a path receives a 429
    #[arg(long, env = "INVITE_FORGE_TIMEOUT_DELAY", default_value_t = 5)]
    timeout_delay: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "INVITE_FORGE_REQUEST_TIMEOUT", default_value_t = 15)]
    request_timeout: u64,

    /// Shortest generated code (inclusive)
    #[arg(long, default_value_t = 5)]
    min_length: usize,

    /// Longest generated code (exclusive)
    #[arg(long, default_value_t = 10)]
    max_length: usize,

    /// JSON file the found invites are written to
    #[arg(long, env = "INVITE_FORGE_OUT_PATH", default_value = "out.json")]
    out_path: PathBuf,

    /// Test the codes in this file (one per line) instead of generating
    #[arg(long, conflicts_with_all = ["save_codes", "min_length", "max_length"])]
    codes_file: Option<PathBuf>,

    /// Also write the generated codes to this file
    #[arg(long)]
    save_codes: Option<PathBuf>,
}

impl Cli {
    fn brute_config(&self) -> BruteConfig {
        BruteConfig::new()
            .with_invite_url(self.url.clone())
            .with_proxies(parse_proxy_list(&self.proxies))
            .with_proxy_selection(self.proxy_selection)
            .with_timeout_delay(Duration::from_secs(self.timeout_delay))
            .with_request_timeout(Duration::from_secs(self.request_timeout))
            .with_code_count(self.codes)
            .with_length_range(self.min_length, self.max_length)
    }
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads INVITE_FORGE_* variables
    if let Err(e) = invite_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invite_forge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.brute_config();
    config.validate()?;

    let codes = match &cli.codes_file {
        Some(path) => read_codes_from_file(path)
            .with_context(|| format!("reading codes from {}", path.display()))?,
        None => {
            let codes = CodeGenerator::new().generate_codes(
                config.code_count,
                config.min_length,
                config.max_length,
            )?;
            if let Some(path) = &cli.save_codes {
                write_codes_to_file(path, &codes)
                    .with_context(|| format!("saving codes to {}", path.display()))?;
            }
            codes
        }
    };

    println!("🔑 Invite Forge v{}", invite_forge::VERSION);
    println!(
        "🎯 Testing {} codes through {} ({} selection, {}s backoff)",
        codes.len(),
        if config.proxies.is_empty() {
            "direct egress".to_string()
        } else {
            format!("{} proxies", config.proxies.len())
        },
        config.proxy_selection,
        config.timeout_delay.as_secs()
    );

    let mut brute = InviteBrute::from_config(&config)?;

    let progress = ProgressBar::new(codes.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let outcome = brute
        .try_codes_with_progress(&codes, |p: &BatchProgress| {
            progress.set_position(p.current as u64);
            progress.set_message(format!("found {} | rate limited {}", p.found, p.rate_limited));
        })
        .await;
    progress.finish_and_clear();

    // Partial results are written even when the batch aborted
    let written = save_invites(&cli.out_path, &outcome.invites)
        .with_context(|| format!("writing invites to {}", cli.out_path.display()))?;

    println!();
    for invite in outcome.found() {
        let guild = invite.guild.as_ref().map_or("unknown", |g| g.name.as_str());
        println!("✅ {} → {}{}", invite.code, guild, if invite.is_nsfw() { " (nsfw)" } else { "" });
    }
    println!(
        "📊 {} attempted, {} found, {} rate limited, {} cooldown waits",
        outcome.invites.len(),
        outcome.stats.found,
        outcome.stats.rate_limited,
        outcome.stats.cooldown_waits
    );
    println!("💾 {} invites written to {}", written, cli.out_path.display());

    if let Some(err) = outcome.error {
        eprintln!("{}", err.user_message());
        return Err(err.into());
    }

    Ok(())
}
