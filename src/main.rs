//! `story-playground` command line.
//!
//! Talks to the playground backend configured by `PLAYGROUND_API_URL`
//! (or `--api-url`).

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use story_playground::api::{PlaygroundApi, PlaygroundClient};
use story_playground::config::{parse_url, timeout_from_secs, Config};
use story_playground::conversation::{ChatSession, SendOutcome};
use story_playground::evaluation::{format_average, EvaluationPanel};
use story_playground::llm::ChatOptions;
use story_playground::pagination::{render_items, PageRequest};
use story_playground::prompt::{parse_float, parse_integer, provider_label, PromptForm};
use story_playground::story::{arc_label, StoryForm};
use story_playground::telemetry;

#[derive(Debug, Parser)]
#[command(name = "story-playground", version, about = "LLM playground and story workshop client")]
struct Cli {
    /// Backend base URL (overrides PLAYGROUND_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides PLAYGROUND_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Debug logging for this crate.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Sampling {
    /// Provider id; defaults to PLAYGROUND_PROVIDER, then the backend default.
    #[arg(short, long)]
    provider: Option<String>,

    /// Optional system message.
    #[arg(long)]
    system: Option<String>,

    #[arg(long)]
    temperature: Option<String>,

    #[arg(long)]
    max_tokens: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List available providers.
    Providers,
    /// Send a single prompt.
    Prompt {
        prompt: String,
        #[command(flatten)]
        sampling: Sampling,
    },
    /// Interactive multi-turn chat on stdin (/clear, /context, /quit).
    Chat {
        #[command(flatten)]
        sampling: Sampling,
    },
    /// Generate a story.
    Story(StoryArgs),
    /// Show story workspace options.
    Options,
    /// List canned experiments.
    Experiments,
    /// Print the pager window for a page.
    Pages { current: u32, total: u32 },
}

#[derive(Debug, Args)]
struct StoryArgs {
    /// Replay a canned experiment by id; explicit flags override its fields.
    #[arg(long)]
    experiment: Option<String>,
    #[arg(long)]
    plot: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    /// Narrative arc id, e.g. viaje_del_heroe.
    #[arg(long)]
    arc: Option<String>,
    /// Repeat for each character.
    #[arg(long = "character")]
    characters: Vec<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    mode: Option<String>,
    #[arg(long)]
    temperature: Option<String>,
    #[arg(long)]
    max_tokens: Option<String>,
    /// Rate the story afterwards on a 1-5 scale.
    #[arg(long)]
    evaluate: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::from_env().context("reading configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_url = parse_url(url)?;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = timeout_from_secs(&secs.to_string())?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(api_url = %config.api_url, "configuration loaded");
    let client = Arc::new(PlaygroundClient::from_config(&config)?);

    match cli.command {
        Command::Providers => {
            let providers = client.providers().await?;
            for provider in &providers.providers {
                let marker = if *provider == providers.default_provider { " (default)" } else { "" };
                println!("{}{}", provider_label(provider), marker);
            }
        }
        Command::Prompt { prompt, sampling } => {
            let form = PromptForm {
                prompt,
                provider: sampling.provider.or(config.provider).unwrap_or_default(),
                system: sampling.system.unwrap_or_default(),
                temperature: sampling.temperature.unwrap_or_default(),
                max_tokens: sampling.max_tokens.unwrap_or_default(),
            };
            let request = form.to_request()?;
            let reply = client.chat_prompt(&request).await?;
            println!("{}", reply.text());
            eprintln!("({} characters)", reply.text().chars().count());
        }
        Command::Chat { sampling } => run_chat(client, &config, sampling).await?,
        Command::Story(args) => run_story(client.as_ref(), args).await?,
        Command::Options => {
            let options = client.options().await?;
            println!("models: {}", options.models.join(", "));
            if let Some(model) = &options.default_model {
                println!("default model: {}", model);
            }
            println!("modes:");
            for mode in &options.modes {
                println!("  {} - {}: {}", mode.id, mode.name, mode.description);
            }
            println!("AOI: {}", options.aoi_names.join(", "));
            println!("strategies:");
            for strategy in &options.strategies {
                println!("  {} - {}", strategy.id, strategy.description);
            }
            println!("generation methods:");
            for method in &options.generation_methods {
                println!("  {} - {}", method.id, method.description);
            }
        }
        Command::Experiments => {
            for experiment in client.experiments().await? {
                let arc = experiment.arco.as_deref().map(arc_label).unwrap_or("-");
                println!("{}  {} [{}]", experiment.id, experiment.title, arc);
            }
        }
        Command::Pages { current, total } => {
            let request = PageRequest::clamped(current, total);
            let range = request.range();
            println!("{}", render_items(&range.items, request.current_page));
        }
    }

    Ok(())
}

async fn run_chat(
    client: Arc<PlaygroundClient>,
    config: &Config,
    sampling: Sampling,
) -> anyhow::Result<()> {
    let mut session = ChatSession::new(client);
    session.set_options(ChatOptions {
        temperature: parse_float(
            "temperature",
            sampling.temperature.as_deref().unwrap_or_default(),
        )?,
        max_tokens: parse_integer(
            "max_tokens",
            sampling.max_tokens.as_deref().unwrap_or_default(),
        )?,
    });
    if let Some(system) = sampling.system {
        session.set_system(system);
    }
    match sampling.provider.or_else(|| config.provider.clone()) {
        Some(provider) => session.set_provider(provider),
        None => {
            session.bootstrap_provider().await?;
        }
    }
    let Some(provider) = session.provider().map(str::to_string) else {
        bail!("no provider selected and the backend reported no default");
    };
    eprintln!("chatting with {} (/clear, /context, /quit)", provider_label(&provider));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/clear" => {
                session.clear();
                eprintln!("conversation cleared");
            }
            "/context" => {
                let summary = session.context_summary();
                eprintln!(
                    "{} messages in memory, sending last {}",
                    summary.message_count, summary.sent_count
                );
                if let Some(system) = summary.system_preview {
                    eprintln!("system: {}", system);
                }
            }
            text => match session.send(text).await {
                SendOutcome::Replied(message) => {
                    println!("[{}] {}", message.time_label(), message.content)
                }
                SendOutcome::Failed(message) => eprintln!("error: {}", message.content),
                SendOutcome::Skipped => {}
            },
        }
    }
    Ok(())
}

async fn run_story(api: &dyn PlaygroundApi, args: StoryArgs) -> anyhow::Result<()> {
    let mut form = StoryForm::default();

    if let Some(id) = &args.experiment {
        let experiments = api.experiments().await?;
        let experiment = experiments
            .iter()
            .find(|e| &e.id == id)
            .with_context(|| format!("unknown experiment {}", id))?;
        form.load_experiment(experiment);
    }

    if let Some(plot) = args.plot {
        form.plot = plot;
    }
    if let Some(genre) = args.genre {
        form.genre = genre;
    }
    if let Some(arc) = args.arc {
        form.arc = arc;
    }
    if !args.characters.is_empty() {
        form.characters = args.characters.join("\n");
    }
    form.temperature = args.temperature.unwrap_or_default();
    form.max_tokens = args.max_tokens.unwrap_or_default();
    form.model = args.model;
    form.mode = args.mode;

    match api.options().await {
        Ok(options) => form.apply_options(&options),
        Err(e) => tracing::warn!("could not load options, using backend defaults: {}", e),
    }

    let story = form.generate(api).await?;
    println!("{}", story.story);
    if let (Some(mode), Some(model)) = (&story.mode, &story.model) {
        eprintln!("(mode {}, model {})", mode, model);
    }

    if args.evaluate {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let panel = evaluate(&mut lines).await?;
        println!("average score: {}", format_average(panel.average()));
    }
    Ok(())
}

/// Ask for a rating per criterion; an empty answer leaves it unrated.
async fn evaluate(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<EvaluationPanel> {
    let mut panel = EvaluationPanel::default();
    let names: Vec<String> = panel.criteria().iter().map(|c| c.name.clone()).collect();
    for name in names {
        loop {
            eprint!("{} (1-5, blank to skip): ", name);
            let Some(line) = lines.next_line().await? else {
                return Ok(panel);
            };
            let answer = line.trim();
            if answer.is_empty() {
                break;
            }
            let rating = answer.parse::<u8>().ok();
            match rating.map(|r| panel.rate(&name, Some(r))) {
                Some(Ok(())) => break,
                Some(Err(e)) => eprintln!("{}", e),
                None => eprintln!("enter a whole number"),
            }
        }
    }
    Ok(panel)
}
