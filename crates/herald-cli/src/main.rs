use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use herald_core::domain::{ContentKind, Platform, TaskStatus, TopicPillar, WorkerOutput};
use herald_core::platforms::{OAuthSigner, content_to_thread, dry_run_registry, live_registry};
use herald_core::ports::{Clock, IdGenerator, StaticTrendSource, SystemClock, TemplateGenerator, UlidGenerator};
use herald_core::supervisor::WarRoomDebate;
use herald_core::{HeraldConfig, PublisherLoop, PublishingQueue, SupervisorBuilder};

#[derive(Debug, Parser)]
#[command(name = "herald", version, about = "Marketing task orchestration and publishing")]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Blog,
    YoutubeShort,
    InstagramReel,
    FacebookStory,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Blog => ContentKind::Blog,
            KindArg::YoutubeShort => ContentKind::YoutubeShort,
            KindArg::InstagramReel => ContentKind::InstagramReel,
            KindArg::FacebookStory => ContentKind::FacebookStory,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the content roadmap for the given pillars as JSON
    Roadmap {
        /// `name` or `name:kw1,kw2` (repeatable)
        #[arg(short, long = "pillar", required = true)]
        pillars: Vec<String>,
        #[arg(short, long, default_value = "marketing leads")]
        audience: String,
    },
    /// Split text into a numbered tweet thread
    Thread {
        text: String,
        #[arg(long, default_value_t = herald_core::platforms::TWEET_LIMIT)]
        max_len: usize,
    },
    /// Print an OAuth 1.0a Authorization header using the configured Twitter credentials
    Sign {
        #[arg(long, default_value = "POST")]
        method: String,
        #[arg(long, default_value = "https://api.twitter.com/2/tweets")]
        url: String,
        /// Extra signed parameter `key=value` (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
        #[arg(long, requires = "timestamp")]
        nonce: Option<String>,
        #[arg(long, requires = "nonce")]
        timestamp: Option<String>,
    },
    /// Generate, review and publish one content item end to end
    Demo {
        #[arg(long, default_value = "AI marketing automation")]
        topic: String,
        #[arg(long, default_value = "growth teams")]
        audience: String,
        #[arg(long, value_enum, default_value_t = KindArg::Blog)]
        kind: KindArg,
        /// Target platforms (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "wordpress,facebook,twitter")]
        platforms: Vec<Platform>,
        /// Use the configured live adapters instead of dry-run ones
        #[arg(long)]
        live: bool,
        /// Publish after this many seconds through the background loop
        #[arg(long, default_value_t = 0)]
        delay_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    let config = HeraldConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("failed to load config: {}", path.display()),
        None => "invalid default config".to_string(),
    })?;

    match cli.command {
        Command::Roadmap { pillars, audience } => roadmap(&config, &pillars, &audience),
        Command::Thread { text, max_len } => {
            for chunk in content_to_thread(&text, max_len) {
                println!("{chunk}");
            }
            Ok(())
        }
        Command::Sign {
            method,
            url,
            params,
            nonce,
            timestamp,
        } => sign(&config, &method, &url, &params, nonce.zip(timestamp)),
        Command::Demo {
            topic,
            audience,
            kind,
            platforms,
            live,
            delay_secs,
        } => demo(config, &topic, &audience, kind.into(), platforms, live, delay_secs).await,
    }
}

fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("failed to initialize json logging")?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
            .context("failed to initialize pretty logging")?,
    }
    Ok(())
}

fn parse_pillar(raw: &str) -> TopicPillar {
    match raw.split_once(':') {
        Some((name, keywords)) => TopicPillar::new(
            name.trim(),
            keywords
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        None => TopicPillar::new(raw.trim(), Vec::new()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn roadmap(config: &HeraldConfig, pillars: &[String], audience: &str) -> Result<()> {
    let supervisor = SupervisorBuilder::new()
        .with_ramp(config.roadmap.clone())
        .build()?;
    let pillars: Vec<TopicPillar> = pillars.iter().map(|p| parse_pillar(p)).collect();
    print_json(&supervisor.generate_roadmap(&pillars, audience, None))
}

fn sign(
    config: &HeraldConfig,
    method: &str,
    url: &str,
    params: &[String],
    fixed: Option<(String, String)>,
) -> Result<()> {
    let creds = config
        .platforms
        .twitter
        .as_ref()
        .ok_or_else(|| anyhow!("no Twitter credentials configured (set HERALD_TWITTER_* or [platforms.twitter])"))?;
    let signer = OAuthSigner::from_credentials(creds)?;

    let params: Vec<(&str, &str)> = params
        .iter()
        .map(|p| {
            p.split_once('=')
                .ok_or_else(|| anyhow!("parameter must be key=value: {p}"))
        })
        .collect::<Result<_>>()?;

    let header = match fixed {
        Some((nonce, timestamp)) => signer.authorization_header(method, url, &params, &nonce, &timestamp)?,
        None => signer.sign_request(method, url, &params, SystemClock.now())?,
    };
    println!("{header}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoReport {
    task: herald_core::domain::Task,
    war_room: WarRoomDebate,
    published: Vec<herald_core::domain::PublishTask>,
}

async fn demo(
    config: HeraldConfig,
    topic: &str,
    audience: &str,
    kind: ContentKind,
    platforms: Vec<Platform>,
    live: bool,
    delay_secs: u64,
) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(Arc::clone(&clock)));

    let supervisor = SupervisorBuilder::new()
        .with_clock(Arc::clone(&clock))
        .with_ids(Arc::clone(&ids))
        .with_ramp(config.roadmap.clone())
        .with_default_workers(
            Arc::new(TemplateGenerator),
            Arc::new(StaticTrendSource::default()),
            &config.supervisor,
        )?
        .build()?;

    let pillar = TopicPillar::new(topic, vec![topic.to_lowercase()]);
    let task = supervisor
        .delegate_content_creation(&pillar, kind, audience)
        .await;
    if task.status() != TaskStatus::Completed {
        return Err(anyhow!(
            "content generation failed: {}",
            task.error().unwrap_or("unknown error")
        ));
    }
    let item = match task.result() {
        Some(WorkerOutput::Content(item)) => item.clone(),
        _ => return Err(anyhow!("seo worker returned no content item")),
    };

    let war_room = supervisor
        .start_war_room_debate(topic, kind.as_str())
        .await;

    let adapters = if live {
        live_registry(&config.platforms, &config.publishing, Arc::clone(&clock))?
    } else {
        dry_run_registry()
    };
    let queue = Arc::new(PublishingQueue::new(
        adapters,
        ids,
        Arc::clone(&clock),
        config.publishing.clone(),
    ));

    let scheduled_for = schedule_after(clock.now(), delay_secs)?;
    let queued = queue.add_to_queue(item, platforms, scheduled_for).await;

    let publisher = PublisherLoop::spawn(Arc::clone(&queue), Duration::from_millis(200));
    let published = loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        match queue.get_task(queued.id).await {
            Some(task) if task.status().is_terminal() => break vec![task],
            Some(_) => continue,
            None => break Vec::new(),
        }
    };
    publisher.shutdown_and_join().await;
    info!(stats = ?supervisor.get_worker_stats().await, "demo finished");

    print_json(&DemoReport {
        task,
        war_room,
        published,
    })
}

/// Dispatch time `delay_secs` from `now`; zero means publish right away.
fn schedule_after(
    now: chrono::DateTime<chrono::Utc>,
    delay_secs: u64,
) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    if delay_secs == 0 {
        return Ok(None);
    }
    let delay = i64::try_from(delay_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| anyhow!("--delay-secs {delay_secs} is out of range"))?;
    now.checked_add_signed(delay)
        .map(Some)
        .ok_or_else(|| anyhow!("--delay-secs {delay_secs} overflows the schedule time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_with_keywords() {
        let pillar = parse_pillar("Cloud costs: finops, budgets ,");
        assert_eq!(pillar.name, "Cloud costs");
        assert_eq!(pillar.keywords, vec!["finops", "budgets"]);
    }

    #[test]
    fn pillar_without_keywords() {
        let pillar = parse_pillar("Edge AI");
        assert_eq!(pillar.name, "Edge AI");
        assert!(pillar.keywords.is_empty());
    }

    #[test]
    fn cli_parses_demo_platform_list() {
        let cli = Cli::try_parse_from(["herald", "demo", "--platforms", "vk,WeChat"]).unwrap();
        let Command::Demo { platforms, .. } = cli.command else {
            panic!("expected demo");
        };
        assert_eq!(platforms, vec![Platform::Vk, Platform::Wechat]);
    }

    #[test]
    fn delay_is_added_to_now() {
        let now = chrono::Utc::now();

        assert_eq!(schedule_after(now, 0).unwrap(), None);
        assert_eq!(
            schedule_after(now, 90).unwrap(),
            Some(now + chrono::Duration::seconds(90))
        );
    }

    #[test]
    fn oversized_delay_is_an_error_not_a_panic() {
        let now = chrono::Utc::now();

        assert!(schedule_after(now, u64::MAX).is_err());
        assert!(schedule_after(now, i64::MAX as u64).is_err());
        assert!(schedule_after(now, 400_000 * 365 * 86_400).is_err());
    }

    #[test]
    fn sign_requires_nonce_and_timestamp_together() {
        assert!(Cli::try_parse_from(["herald", "sign", "--nonce", "n"]).is_err());
        assert!(Cli::try_parse_from(["herald", "sign", "--nonce", "n", "--timestamp", "1"]).is_ok());
    }
}
