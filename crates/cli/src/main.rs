//! ipascribe CLI: English text to IPA (RP / General American).

use std::io::Read;
use std::path::PathBuf;
#[cfg(feature = "remote")]
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[cfg(feature = "remote")]
use ipascribe_core::cache::{PronunciationCache, default_cache_file};
use ipascribe_core::config::TranscriptionConfig;
#[cfg(feature = "remote")]
use ipascribe_core::resolve::CachedRemote;
use ipascribe_core::resolve::HybridResolver;
#[cfg(feature = "remote")]
use ipascribe_core::resolve::longman::LongmanDictionary;
use ipascribe_core::types::{Accent, ResolutionMode};
use ipascribe_core::{PhoneticTranscription, supported_accents};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ipascribe",
    about = "Transcribe English text into IPA for RP or General American",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe text (argument, --file, or stdin)
    Transcribe(TranscribeArgs),
    /// Resolve a single word and show where its pronunciation came from
    Word(WordArgs),
    /// List supported accents
    Accents,
}

// ─── Shared arguments (embedded in each subcommand) ──────────────

#[derive(Parser, Debug)]
struct EngineArgs {
    /// Accent: rp, american (aliases: gb, en-gb, british, ga, us, en-us)
    #[arg(short, long, default_value = "rp")]
    accent: String,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resolution mode (overrides config)
    #[arg(long, value_parser = ["hybrid", "direct"])]
    mode: Option<String>,

    /// Primary phonemizer (overrides config)
    #[arg(long, value_parser = ["auto", "espeak", "rules"])]
    engine: Option<String>,

    /// Query the Longman online dictionary for RP words
    #[arg(long, default_value_t = false)]
    remote: bool,

    /// Print resolution statistics to stderr when done
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct TranscribeArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Text to transcribe (reads stdin when omitted)
    text: Option<String>,

    /// Read text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Use strong forms only (no weak-form reduction)
    #[arg(long, default_value_t = false)]
    strong_only: bool,
}

#[derive(Parser, Debug)]
struct WordArgs {
    #[command(flatten)]
    engine: EngineArgs,

    /// Word to resolve
    word: String,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Transcribe(a) if a.engine.verbose => "debug",
        Command::Word(a) if a.engine.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Transcribe(args) => run_transcribe(args),
        Command::Word(args) => run_word(args),
        Command::Accents => run_accents(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Config file (if any) with command-line overrides applied.
fn load_config(args: &EngineArgs) -> Result<TranscriptionConfig> {
    let mut config = match &args.config {
        Some(path) => TranscriptionConfig::load(path)?,
        None => TranscriptionConfig::default(),
    };
    if let Some(mode) = &args.mode {
        config.mode = mode.parse::<ResolutionMode>().map_err(anyhow::Error::msg)?;
    }
    if let Some(engine) = &args.engine {
        config.engine = engine.clone();
    }
    if args.remote {
        config.remote.enabled = true;
    }
    Ok(config)
}

/// The engine plus a hook that persists the remote cache when done.
struct Engine {
    service: PhoneticTranscription,
    #[cfg(feature = "remote")]
    remote: Option<Arc<CachedRemote<LongmanDictionary>>>,
}

impl Engine {
    fn build(config: &TranscriptionConfig) -> Result<Self> {
        let resolver = HybridResolver::from_config(config)?;

        #[cfg(feature = "remote")]
        if config.remote.enabled {
            let cache = PronunciationCache::load(&default_cache_file())?;
            let remote = LongmanDictionary::cached(&config.remote, cache)
                .context("Failed to set up Longman dictionary")?;
            log::info!("Remote dictionary enabled ({} cached words)", remote.cache_size());
            let resolver = resolver.with_remote(remote.clone());
            return Ok(Self {
                service: PhoneticTranscription::from_shared(Arc::new(resolver)),
                remote: Some(remote),
            });
        }

        #[cfg(not(feature = "remote"))]
        if config.remote.enabled {
            bail!("This build has no remote dictionary support (feature `remote`)");
        }

        Ok(Self {
            service: PhoneticTranscription::new(resolver),
            #[cfg(feature = "remote")]
            remote: None,
        })
    }

    fn finish(&self, stats: bool) -> Result<()> {
        #[cfg(feature = "remote")]
        if let Some(remote) = &self.remote {
            remote.cache().save(&default_cache_file())?;
        }
        if stats {
            eprintln!("{}", self.service.statistics());
        }
        Ok(())
    }
}

fn read_input(args: &TranscribeArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_transcribe(args: TranscribeArgs) -> Result<()> {
    let config = load_config(&args.engine)?;
    let text = read_input(&args)?;
    let engine = Engine::build(&config)?;

    let ipa = engine
        .service
        .transcribe_to_ipa(&text, &args.engine.accent, !args.strong_only)?;
    println!("{}", ipa);

    engine.finish(args.engine.stats)
}

fn run_word(args: WordArgs) -> Result<()> {
    let accent: Accent = args.engine.accent.parse()?;
    let config = load_config(&args.engine)?;
    let engine = Engine::build(&config)?;

    let Some(resolution) = engine.service.resolver().get_pronunciation(&args.word, accent) else {
        bail!("No pronunciation found for '{}'", args.word);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}\t{}\t({})", args.word, resolution.ipa, resolution.source);
    }

    engine.finish(args.engine.stats)
}

fn run_accents() -> Result<()> {
    for code in supported_accents() {
        let accent: Accent = code.parse()?;
        println!("{:<10} {}", code, accent.description());
    }
    Ok(())
}
