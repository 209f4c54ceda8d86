pub mod agents;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod crew;
pub mod gamification;
pub mod http_client;
pub mod lang_detect;
pub mod llm;
pub mod models;
pub mod reporter;
pub mod search;
pub mod url_validator;

use agents::{Agent, CopywriterAgent, ResearchAgent, SeoSpecialistAgent, UxAnalystAgent};
use anyhow::Result;
use cli::Cli;
use colored::*;
use config::Config;
use crawler::Crawler;
use crew::Crew;
use indicatif::{ProgressBar, ProgressStyle};
use llm::{ChatModel, LlmClient};
use reporter::Reporter;
use search::{DisabledSearchProvider, HttpSearchProvider, SearchProvider};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

pub async fn run(args: Cli, config: &Config) -> Result<()> {
    println!("{}", "Auditly - AI Website Audit".bright_cyan().bold());
    println!("{}", "=".repeat(50).bright_blue());
    println!();

    // Cheap scheme check before any collaborator is built; the SSRF
    // validator inside the crawler does the real work.
    if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
        anyhow::bail!("URL must start with http:// or https://");
    }

    println!("{} {}", "Auditing:".bright_white().bold(), args.url);
    println!(
        "{} {}s",
        "Fetch timeout:".bright_white().bold(),
        args.timeout
    );
    println!();

    let search: Arc<dyn SearchProvider> = match (&config.search_endpoint, args.no_search) {
        (Some(endpoint), false) => Arc::new(HttpSearchProvider::new(endpoint.clone())),
        _ => {
            if args.verbose {
                println!("{}", "Web search disabled".bright_yellow());
            }
            Arc::new(DisabledSearchProvider)
        }
    };

    let model: Option<Arc<dyn ChatModel>> = if args.no_llm {
        if args.verbose {
            println!("{}", "LLM analysis disabled".bright_yellow());
        }
        None
    } else {
        match config.resolve_llm_api_key() {
            Some(key) => {
                let base_url = config
                    .llm_base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
                let llm_model = config
                    .llm_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
                Some(Arc::new(LlmClient::new(key, base_url, llm_model)))
            }
            None => {
                tracing::warn!("no LLM API key configured, copywriter will degrade");
                None
            }
        }
    };

    // Researcher first: it produces the crawl data every later agent
    // reads from the shared context.
    let agent_list: Vec<Box<dyn Agent>> = vec![
        Box::new(ResearchAgent::new(Crawler::new(args.timeout)?, search)),
        Box::new(SeoSpecialistAgent::new()),
        Box::new(CopywriterAgent::new(model).reply_language(args.language.as_str())),
        Box::new(UxAnalystAgent::new()),
    ];

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner:.cyan} {msg}")
            .expect("Progress bar template should be valid"),
    );
    spinner.set_message("Running audit crew...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut crew = Crew::new(agent_list, &args.url);
    let results = crew.kickoff().await;

    spinner.finish_and_clear();

    // A run with degraded agents still reports; only a failed crawl
    // leaves nothing to audit.
    if crew.context().crawl_data.is_none() {
        let detail = results
            .first()
            .and_then(|r| r.insights.first())
            .cloned()
            .unwrap_or_else(|| "unknown error".to_string());
        anyhow::bail!("could not audit {}: {}", args.url, detail);
    }

    let degraded = results
        .iter()
        .filter(|r| r.score.is_none() && r.insights.iter().any(|i| i.starts_with("Error:")));
    for result in degraded {
        println!(
            "{} agent '{}' produced a degraded result",
            "Warning:".yellow().bold(),
            result.agent_name
        );
    }

    let report = Reporter::generate_report(&args.url, &results);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
