//! Posse CLI - publish on your own site, syndicate elsewhere.
//!
//! ```text
//! posse truncate  [TEXT]   fit a note and its canonical URI into a character budget
//! posse prepare   [TEXT]   build the Twitter status update for an HTML post
//! posse syndicate [FILE]   syndicate a JSON post to Twitter, printing the updated post
//! ```
//!
//! TEXT and FILE default to stdin. Logs go to stderr (`RUST_LOG` overrides the
//! default `info` filter) so stdout stays machine-readable.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use posse_config::{PosseConfig, TwitterConfig};
use posse_syndication::{
    Post, Strategy, SyndicationOutcome, TwitterSyndicator, prepare_for_twitter,
};
use posse_types::{TruncateOptions, truncate};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
#[command(name = "posse", version, about)]
struct Cli {
    /// Config file (defaults to $POSSE_CONFIG, then ~/.posse/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Truncate text at a word boundary, appending an ellipsis and URI.
    Truncate(TruncateArgs),
    /// Show the Twitter status update an HTML post would become.
    Prepare(PrepareArgs),
    /// Syndicate a JSON post to Twitter according to its tags.
    Syndicate(SyndicateArgs),
}

#[derive(Debug, Args)]
struct TruncateArgs {
    text: Option<String>,
    /// Maximum length in characters.
    #[arg(long)]
    length: Option<usize>,
    /// Canonical URI to append.
    #[arg(long)]
    uri: Option<String>,
    /// Count every URL as this many characters.
    #[arg(long)]
    uri_len: Option<usize>,
    #[arg(long)]
    ellipsis: Option<String>,
    /// Append the URI without parentheses when nothing is cut.
    #[arg(long)]
    no_parens: bool,
}

impl TruncateArgs {
    fn apply(&self, mut options: TruncateOptions) -> TruncateOptions {
        if let Some(length) = self.length {
            options.length = length;
        }
        if let Some(uri) = &self.uri {
            options.uri = Some(uri.clone());
        }
        if self.uri_len.is_some() {
            options.uri_len = self.uri_len;
        }
        if let Some(ellipsis) = &self.ellipsis {
            options.ellipsis.clone_from(ellipsis);
        }
        if self.no_parens {
            options.parens = false;
        }
        options
    }
}

#[derive(Debug, Args)]
struct PrepareArgs {
    text: Option<String>,
    /// Canonical URL of the post.
    #[arg(long)]
    url: Option<String>,
    /// URL the post replies to.
    #[arg(long)]
    in_reply_to: Option<String>,
}

#[derive(Debug, Args)]
struct SyndicateArgs {
    /// JSON post (`url`, `tags`, `content`, `summary`, `in_reply_to`).
    file: Option<PathBuf>,
    /// Override the configured trigger tag.
    #[arg(long)]
    tag: Option<String>,
    /// Override the configured strategy, e.g. "syndicate unless tagged".
    #[arg(long)]
    strategy: Option<Strategy>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<PosseConfig> {
    if let Some(path) = explicit {
        return Ok(PosseConfig::load_from(path)?);
    }
    Ok(PosseConfig::load()?.unwrap_or_default())
}

fn read_text(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text.trim_end().to_string())
}

fn read_post(file: Option<&Path>) -> Result<Post> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read post from {}", path.display()))?,
        None => read_text(None)?,
    };
    serde_json::from_str(&raw).context("Post is not valid JSON")
}

async fn syndicate(config: &PosseConfig, args: SyndicateArgs) -> Result<()> {
    let mut post = read_post(args.file.as_deref())?;

    let twitter = config.twitter.as_ref();
    if twitter.and_then(|t| t.credentials.as_ref()).is_none() {
        tracing::warn!("No [twitter.credentials] configured; the API will reject the request");
    }

    let default_twitter = TwitterConfig::default();
    let mut syndicator = TwitterSyndicator::from_config(twitter.unwrap_or(&default_twitter))?;
    if let Some(tag) = &args.tag {
        syndicator = syndicator.with_tag(tag);
    }
    if let Some(strategy) = args.strategy {
        syndicator = syndicator.with_strategy(strategy);
    }

    match syndicator.syndicate(&mut post).await {
        SyndicationOutcome::Syndicated { url } => {
            tracing::info!(%url, "Syndicated to Twitter");
        }
        SyndicationOutcome::Failed => bail!("Twitter syndication failed"),
        skipped => {
            tracing::info!(outcome = ?skipped, "Post not syndicated");
        }
    }

    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Truncate(args) => {
            let options = args.apply(config.truncate_options());
            let text = read_text(args.text)?;
            println!("{}", truncate(&text, &options)?);
        }
        Command::Prepare(args) => {
            let text = read_text(args.text)?;
            let update = prepare_for_twitter(
                &text,
                args.url.as_deref(),
                args.in_reply_to.as_deref(),
            )?;
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
        Command::Syndicate(args) => syndicate(&config, args).await?,
    }

    Ok(())
}
