use clap::Parser;
use std::{fs::File, io::BufReader, path::PathBuf};
use stream_eval::{
    config::EvaluationConfig,
    dataset::InMemoryDataset,
    learner::{BaselineKind, BaselineLearner, Learner},
    EvalError, Evaluation,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Dataset in JSON form
    #[arg(short, long)]
    data: PathBuf,

    /// Baseline learner to evaluate, repeatable
    #[arg(short, long = "learner", default_values = ["majority-class", "no-change"])]
    learners: Vec<BaselineKind>,

    /// Print the metric as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: &Cli) -> Result<(), EvalError> {
    let config = if cli.config.exists() {
        EvaluationConfig::from_file(&cli.config)?
    } else {
        EvaluationConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let file = File::open(&cli.data)
        .map_err(|e| EvalError::config(format!("Failed to open dataset: {}", e)))?;
    let dataset = InMemoryDataset::from_json_reader(BufReader::new(file))?;

    let mut learners: Vec<Box<dyn Learner>> = cli
        .learners
        .iter()
        .map(|&kind| Box::new(BaselineLearner::new(kind)) as Box<dyn Learner>)
        .collect();

    let metric = Evaluation::new(config)
        .run(&mut learners, Box::new(dataset))
        .await?;

    let names: Vec<&str> = learners.iter().map(|l| l.name()).collect();
    if cli.json {
        let rendered = serde_json::to_string_pretty(&metric)
            .map_err(|e| EvalError::internal(format!("Failed to serialise metric: {}", e)))?;
        println!("{}", rendered);
    } else {
        for (i, name) in names.iter().enumerate() {
            println!("learner {}: {}", i, name);
        }
        println!("{}", metric);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
