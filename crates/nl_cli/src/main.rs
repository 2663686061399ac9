use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nl_core::options::ALLOWED_COUNTS;
use nl_core::{Config, Genre, NewsletterReport, NewsletterRequest, TimeUnit, TimeWindow, Tone};
use nl_inference::ModelKind;
use nl_scrapers::{init_logging, NewsletterManager};
use nl_storage::{DistanceMetric, MemoryConfig};
use nl_web::{create_app, AppState};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search the web and write a newsletter about it", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Inference backend
    #[arg(long, value_enum, default_value_t = ModelKind::Openai, global = true)]
    model: ModelKind,

    /// Distance used to rank chunks against the topic
    #[arg(long, value_enum, default_value_t = DistanceMetric::Euclidean, global = true)]
    metric: DistanceMetric,

    /// Chat model name, e.g. gpt-4o-mini
    #[arg(long, global = true)]
    chat_model: Option<String>,

    #[arg(long, global = true)]
    embedding_model: Option<String>,

    /// Sampling temperature, 0 to 2
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Overrides OPENAI_BASE_URL
    #[arg(long, global = true)]
    openai_base_url: Option<String>,

    /// Overrides SERPER_BASE_URL
    #[arg(long, global = true)]
    serper_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one newsletter and print it
    Generate {
        #[arg(short, long)]
        topic: String,

        /// How far back to search
        #[arg(long, value_enum, default_value_t = TimeUnit::Hour)]
        unit: TimeUnit,

        /// Number of units (1, 2 or 6)
        #[arg(long, default_value_t = 1, value_parser = parse_count)]
        count: u8,

        #[arg(long, value_enum, default_value_t = Genre::General)]
        genre: Genre,

        #[arg(long, value_enum, default_value_t = Tone::Informative)]
        tone: Tone,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// List the available tones
    Tones,
}

fn parse_count(s: &str) -> Result<u8, String> {
    let count: u8 = s.parse().map_err(|_| format!("{} is not a number", s))?;
    if ALLOWED_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(format!("count must be one of {:?}", ALLOWED_COUNTS))
    }
}

impl Cli {
    /// The dummy model never calls OpenAI, so it runs without an OpenAI key.
    fn requires_openai_key(&self) -> bool {
        self.model == ModelKind::Openai
    }

    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env_with(self.requires_openai_key())
            .context("reading configuration from the environment")?;
        if let Some(model) = &self.chat_model {
            config = config.with_chat_model(model);
        }
        if let Some(model) = &self.embedding_model {
            config = config.with_embedding_model(model);
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(url) = &self.openai_base_url {
            config = config.with_openai_base_url(url);
        }
        if let Some(url) = &self.serper_base_url {
            config = config.with_serper_base_url(url);
        }
        config.validate_with(self.requires_openai_key())?;
        Ok(config)
    }

    fn manager(&self) -> anyhow::Result<NewsletterManager> {
        let manager = NewsletterManager::from_config(self.model, &self.config()?)?;
        Ok(manager.with_memory_config(MemoryConfig::with_metric(self.metric)))
    }
}

fn print_report(report: &NewsletterReport) {
    println!("== Search results ==");
    for (i, hit) in report.search_results.iter().enumerate() {
        println!("{}. {}\n   {}", i + 1, hit.title, hit.url);
    }
    println!("\n== Best URLs ==");
    for url in &report.urls {
        println!("- {}", url);
    }
    println!("\n== Data ==\n{}", report.context);
    println!("\n== Newsletter thread ==\n{}", report.digest);
    println!("\n== Newsletter ==\n{}", report.newsletter);
}

fn print_tones() {
    for tone in Tone::ALL {
        let key = clap::ValueEnum::to_possible_value(&tone)
            .map(|value| value.get_name().to_string())
            .unwrap_or_default();
        println!("{:<12} {}\n             {}", key, tone.label(), tone.description());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });

    match &cli.command {
        Commands::Tones => print_tones(),
        Commands::Generate {
            topic,
            unit,
            count,
            genre,
            tone,
            json,
        } => {
            let request =
                NewsletterRequest::new(topic.clone(), TimeWindow::new(*unit, *count)?, *genre, *tone);
            request.validate()?;
            let manager = cli.manager()?;

            let report = tokio::select! {
                result = manager.run(&request) => result?,
                _ = tokio::signal::ctrl_c() => {
                    warn!("🛑 Interrupted, abandoning the run");
                    anyhow::bail!("interrupted");
                }
            };

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Serve { addr } => {
            let manager = cli.manager()?;
            let app = create_app(AppState::new(manager));
            let listener = tokio::net::TcpListener::bind(*addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            info!("🌐 Listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["nl", "generate", "--topic", "rust"]).unwrap();
        assert_eq!(cli.model, ModelKind::Openai);
        match cli.command {
            Commands::Generate {
                topic,
                unit,
                count,
                genre,
                tone,
                json,
            } => {
                assert_eq!(topic, "rust");
                assert_eq!(unit, TimeUnit::Hour);
                assert_eq!(count, 1);
                assert_eq!(genre, Genre::General);
                assert_eq!(tone, Tone::Informative);
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_generate_options() {
        let cli = Cli::try_parse_from([
            "nl", "generate", "--topic", "quantum computing", "--unit", "day", "--count", "6",
            "--genre", "news", "--tone", "humorous", "--model", "dummy", "--json",
        ])
        .unwrap();
        assert_eq!(cli.model, ModelKind::Dummy);
        assert!(matches!(
            cli.command,
            Commands::Generate { unit: TimeUnit::Day, count: 6, genre: Genre::News, tone: Tone::Humorous, json: true, .. }
        ));
    }

    #[test]
    fn test_dummy_model_skips_openai_key() {
        let cli =
            Cli::try_parse_from(["nl", "--model", "dummy", "--metric", "cosine", "tones"]).unwrap();
        assert!(!cli.requires_openai_key());
        assert_eq!(cli.metric, DistanceMetric::Cosine);

        let cli = Cli::try_parse_from(["nl", "tones"]).unwrap();
        assert!(cli.requires_openai_key());
        assert_eq!(cli.metric, DistanceMetric::Euclidean);
    }

    #[test]
    fn test_rejects_unknown_count() {
        assert!(Cli::try_parse_from(["nl", "generate", "--topic", "rust", "--count", "3"]).is_err());
    }

    #[test]
    fn test_serve_addr() {
        let cli = Cli::try_parse_from(["nl", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { addr } if addr.port() == 3000));
    }
}
