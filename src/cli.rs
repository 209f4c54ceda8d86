use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "auditly")]
#[command(about = "An AI-assisted website audit pipeline", long_about = None)]
pub struct Cli {
    /// The URL to audit
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Report language: fr or en
    #[arg(short, long, default_value = "fr")]
    pub language: String,

    /// Skip LLM-backed analysis (the copywriter degrades to a neutral score)
    #[arg(long)]
    pub no_llm: bool,

    /// Skip the supplementary web search
    #[arg(long)]
    pub no_search: bool,

    /// Page fetch timeout in seconds (default: 15)
    #[arg(short, long, default_value_t = 15)]
    pub timeout: u64,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
