//! `voxprint` — local-first voice profiling and draft generation.
//!
//! # Usage
//!
//! ```
//! voxprint import ./export.jsonl
//! voxprint profile --sample 300
//! voxprint generate tweet --topic "rust build times" --n 5
//! voxprint review --last 10 --auto-refine
//! voxprint serve --port 8765
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use settings::Settings;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use voxprint_api::{ApiState, api_router};
use voxprint_core::{
  draft::{Draft, DraftText, Engagement, ReplyIntent, ReplyTone},
  persona::Level,
  store::PersonaStore,
  suppress,
};
use voxprint_engine::{
  generator::{
    ReplySpec, ThreadSpec, TweetSpec, generate_replies, generate_thread,
    generate_tweets,
  },
  profiler::{ProfileOptions, build_persona},
  reviewer::review_recent,
};
use voxprint_import::{import_file, validate_file};
use voxprint_llm::{LlmClient, ProviderRole, build_provider};
use voxprint_store_sqlite::SqliteStore;

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
  name = "voxprint",
  about = "Local-first voice profiling and draft generation",
  version
)]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "voxprint.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import posts from an export file (JSONL or JSON).
  Import {
    path: PathBuf,
    /// Validate the file without importing.
    #[arg(long)]
    validate: bool,
  },
  /// Build or refresh the voice profile from stored posts.
  Profile {
    /// Number of posts to sample (200-400 recommended).
    #[arg(long, default_value_t = 300)]
    sample: usize,
    /// Rebuild even if a profile already exists.
    #[arg(long)]
    force: bool,
    /// Optional display label for the profile.
    #[arg(long)]
    persona_name: Option<String>,
    /// Optional account bio context.
    #[arg(long)]
    bio: Option<String>,
    /// Optional pinned-post context.
    #[arg(long)]
    pinned: Option<String>,
  },
  /// Generate drafts against the latest profile.
  Generate {
    #[command(subcommand)]
    what: GenerateCommand,
  },
  /// Review recent drafts for profile and algorithm alignment.
  Review {
    /// Review the last N drafts.
    #[arg(short = 'n', long, default_value_t = 5)]
    last: usize,
    /// Review every stored draft.
    #[arg(short, long)]
    all: bool,
    /// Generate revised versions for weak drafts.
    #[arg(long)]
    auto_refine: bool,
  },
  /// List recent drafts.
  Drafts {
    #[arg(long, default_value_t = 10)]
    limit: usize,
  },
  /// Run the deterministic suppression-risk check on a piece of text.
  Check { text: String },
  /// Serve the JSON API over HTTP.
  Serve {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Subcommand)]
enum GenerateCommand {
  /// Generate tweet drafts on a topic.
  Tweet {
    #[arg(long)]
    topic: String,
    #[arg(long, default_value_t = 5)]
    n: usize,
    /// Spice level: low, medium, high.
    #[arg(long, default_value = "medium")]
    spice: String,
    /// Include similar historical posts as style references.
    #[arg(long)]
    use_examples: bool,
    #[arg(long, default_value_t = 0)]
    min_chars: u32,
    #[arg(long, default_value_t = 280)]
    max_chars: u32,
    /// Target engagement: reply, like, repost, mixed.
    #[arg(long, default_value = "reply")]
    engagement: String,
  },
  /// Generate a thread outline or full thread drafts.
  Thread {
    #[arg(long)]
    topic: String,
    #[arg(long, default_value_t = 5)]
    tweets: usize,
    #[arg(long, default_value = "medium")]
    spice: String,
    /// Generate full drafts (otherwise an outline).
    #[arg(long)]
    draft: bool,
    #[arg(long, default_value_t = 0)]
    min_chars: u32,
    #[arg(long, default_value_t = 280)]
    max_chars: u32,
  },
  /// Generate reply drafts to an existing post.
  Reply {
    /// The post text being replied to.
    #[arg(short, long)]
    to: String,
    #[arg(long, default_value = "neutral")]
    tone: String,
    #[arg(long, default_value_t = 3)]
    n: usize,
    /// Additional context (who posted, thread info).
    #[arg(short, long)]
    context: Option<String>,
    /// Reply intent (agree_extend, disagree_reason, add_context, ...).
    #[arg(long)]
    intent: Option<String>,
    #[arg(long, default_value_t = 0)]
    min_chars: u32,
    #[arg(long, default_value_t = 280)]
    max_chars: u32,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  // The suppression check is pure; it needs neither store nor provider.
  if let Command::Check { text } = &cli.command {
    print_suppression_report(text);
    return Ok(());
  }

  let store_path = settings.store_path();
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating data directory {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Check { .. } => unreachable!("handled above"),

    Command::Import { path, validate } => {
      if validate {
        let (ok, message) = validate_file(&path)?;
        println!("{message}");
        if !ok {
          std::process::exit(1);
        }
        return Ok(());
      }

      let report = import_file(&store, &path).await?;
      println!("Import complete.");
      println!("  Imported:            {}", report.inserted);
      println!("  Skipped (invalid):   {}", report.skipped_invalid);
      println!("  Skipped (duplicate): {}", report.skipped_duplicate);
      println!("\nTotal posts in store: {}", report.total);
    }

    Command::Profile { sample, force, persona_name, bio, pinned } => {
      let provider = provider_for(&settings, ProviderRole::Profile)?;
      let persona = build_persona(
        &store,
        &provider,
        ProfileOptions {
          sample_size: sample,
          bio,
          pinned_post: pinned,
          display_name: persona_name,
          force,
        },
      )
      .await?;

      println!("Profile v{} ready.", persona.version);
      println!("Display name: {}", persona.display_name);
      println!(
        "Topics: {}",
        persona
          .topics
          .iter()
          .map(|t| t.name.as_str())
          .collect::<Vec<_>>()
          .join(", ")
      );
      println!(
        "Voice: {} directness, {} sentences",
        persona.voice_rules.directness.as_str(),
        persona.voice_rules.sentence_length.as_str()
      );
    }

    Command::Generate { what } => {
      run_generate(&store, &settings, what).await?;
    }

    Command::Review { last, all, auto_refine } => {
      let provider = provider_for(&settings, ProviderRole::Review)?;
      let limit = if all { 1000 } else { last };
      let reviews = review_recent(&store, &provider, limit, auto_refine).await?;

      if reviews.is_empty() {
        println!("No drafts to review. Generate some first.");
        return Ok(());
      }

      println!("Reviewed {} draft(s):\n", reviews.len());
      for review in &reviews {
        let id = review.draft_id.to_string();
        let violations = if review.violations.is_empty() {
          "-".to_string()
        } else {
          review.violations.join("; ")
        };
        let revised = if review.revised_text.is_some() { "yes" } else { "-" };
        println!(
          "  {}  score {:>3.0}  revised {revised}  {violations}",
          &id[..8],
          review.alignment_score
        );
      }
    }

    Command::Drafts { limit } => {
      let drafts = store.recent_drafts(limit).await?;
      if drafts.is_empty() {
        println!("No drafts stored yet.");
        return Ok(());
      }
      for draft in &drafts {
        print_draft(draft);
      }
    }

    Command::Serve { host, port } => {
      let host = host.unwrap_or_else(|| settings.host.clone());
      let port = port.unwrap_or(settings.port);

      let state = ApiState::new(store, settings.llm.clone());
      let app = api_router(state).layer(TraceLayer::new_for_http());
      let address = format!("{host}:{port}");

      tracing::info!("listening on http://{address}");
      println!("voxprint API listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}

// ─── Command helpers ─────────────────────────────────────────────────────────

fn provider_for(
  settings: &Settings,
  role: ProviderRole,
) -> anyhow::Result<LlmClient> {
  build_provider(&settings.llm, role).context("building provider")
}

fn parse_level(s: &str) -> anyhow::Result<Level> {
  match Level::parse(s) {
    Some(level) => Ok(level),
    None => bail!("invalid spice level {s:?}; expected low, medium, or high"),
  }
}

async fn run_generate(
  store: &SqliteStore,
  settings: &Settings,
  what: GenerateCommand,
) -> anyhow::Result<()> {
  let provider = provider_for(settings, ProviderRole::Generate)?;

  match what {
    GenerateCommand::Tweet {
      topic,
      n,
      spice,
      use_examples,
      min_chars,
      max_chars,
      engagement,
    } => {
      let Some(target_engagement) = Engagement::parse(&engagement) else {
        bail!(
          "invalid engagement {engagement:?}; expected reply, like, repost, or mixed"
        );
      };
      let spec = TweetSpec {
        topic,
        n,
        spice: parse_level(&spice)?,
        min_chars,
        max_chars,
        use_examples,
        target_engagement,
      };

      let drafts = generate_tweets(store, &provider, spec).await?;
      if drafts.is_empty() {
        println!("No drafts generated.");
        return Ok(());
      }
      println!("Generated {} draft(s):\n", drafts.len());
      for draft in &drafts {
        print_draft(draft);
      }
    }

    GenerateCommand::Thread {
      topic,
      tweets,
      spice,
      draft,
      min_chars,
      max_chars,
    } => {
      let spec = ThreadSpec {
        topic,
        tweet_count: tweets,
        spice: parse_level(&spice)?,
        full_draft: draft,
        min_chars,
        max_chars,
      };

      let items = generate_thread(store, &provider, spec).await?;
      if items.is_empty() {
        println!("No thread generated.");
        return Ok(());
      }
      println!("Generated {}-part thread:\n", items.len());
      for (i, item) in items.iter().enumerate() {
        println!("{}/{}:", i + 1, items.len());
        println!("  {}", item.text.flatten());
        println!();
      }
    }

    GenerateCommand::Reply {
      to,
      tone,
      n,
      context,
      intent,
      min_chars,
      max_chars,
    } => {
      let Some(tone) = ReplyTone::parse(&tone) else {
        bail!(
          "invalid tone {tone:?}; expected one of: {}",
          ReplyTone::ALL.join(", ")
        );
      };
      let intent = intent
        .as_deref()
        .map(|s| {
          ReplyIntent::parse(s)
            .ok_or_else(|| anyhow::anyhow!("invalid reply intent {s:?}"))
        })
        .transpose()?;

      let spec = ReplySpec {
        to_text: to.clone(),
        tone,
        n,
        min_chars,
        max_chars,
        context,
        intent,
      };

      let drafts = generate_replies(store, &provider, spec).await?;
      if drafts.is_empty() {
        println!("No replies generated.");
        return Ok(());
      }

      let preview: String = to.chars().take(100).collect();
      println!("Replying to: \"{preview}\"");
      println!("Tone: {}\n", tone.as_str());
      println!("Generated {} reply draft(s):\n", drafts.len());
      for draft in &drafts {
        print_draft(draft);
      }
    }
  }

  Ok(())
}

// ─── Output ──────────────────────────────────────────────────────────────────

fn print_draft(draft: &Draft) {
  match &draft.text {
    DraftText::Single(text) => println!("  {text}"),
    DraftText::Thread(parts) => {
      for (i, part) in parts.iter().enumerate() {
        println!("  {}/{} {part}", i + 1, parts.len());
      }
    }
  }
  if !draft.tags.is_empty() {
    println!("    tags: {}", draft.tags.join(", "));
  }
  println!("    confidence: {:.0}%", draft.confidence * 100.0);
  if let Some(algo) = &draft.algo
    && let Some(risk) = algo.suppression_risk
  {
    println!("    suppression risk: {}", risk.as_str());
  }
  println!();
}

fn print_suppression_report(text: &str) {
  let report = suppress::classify(text);
  println!("Risk: {}", report.risk.as_str());
  if report.patterns.is_empty() {
    println!("Patterns: none");
  } else {
    println!("Patterns:");
    for pattern in &report.patterns {
      println!("  - {pattern}");
    }
  }
  let recommendation = match report.recommendation {
    suppress::Recommendation::Ok => "ok",
    suppress::Recommendation::Review => "review",
  };
  println!("Recommendation: {recommendation}");
}
