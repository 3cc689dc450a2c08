//! discogen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

mod directory;

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Input, Select};
use notify::{recommended_watcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use discogen_core::{Config, DiscoveryDocument, Generator};
use tokio::fs;
use url::Url;

#[derive(Parser)]
#[command(name = "discogen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a TypeScript client from a Discovery document
    Generate {
        /// What to generate: a `name:version` pair from the Discovery
        /// directory, an HTTP/HTTPS URL, or a local JSON file
        ///
        /// Example: discogen generate bigquery:v2
        /// Example: discogen generate ./spanner.json --output spanner.ts
        target: Option<String>,
        /// Output file (`-` for stdout; defaults to `<name>.ts`)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Canonical source URL embedded in the module header
        /// (defaults to the resolved document URL)
        #[arg(long)]
        self_url: Option<Url>,
        /// Batch configuration file (YAML) listing APIs to generate
        #[arg(long)]
        config: Option<PathBuf>,
        /// Watch a local document file for changes and regenerate automatically
        #[arg(long)]
        watch: bool,
    },
    /// List APIs available in the Discovery directory
    List {
        /// Only show entries whose id or title contains this string
        filter: Option<String>,
    },
    /// Interactive generation flow
    Init,
}

/// Arguments needed to generate one client
#[derive(Clone, Debug)]
struct GenerateArgs {
    target: String,
    output: Option<PathBuf>,
    self_url: Option<Url>,
}

/// Resolve the generation target to a loadable location.
async fn resolve_target(target: &str) -> anyhow::Result<String> {
    if target.starts_with("http://") || target.starts_with("https://") {
        return Ok(target.to_string());
    }
    if fs::metadata(target).await.is_ok() {
        return Ok(target.to_string());
    }
    if let Some((name, version)) = target.split_once(':') {
        return directory::resolve(name, version).await;
    }
    anyhow::bail!(
        "Target `{target}` is neither a readable file, a URL, nor a `name:version` pair"
    )
}

/// Execute the generation flow with the provided arguments
async fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    // Progress goes to stderr so `--output -` leaves stdout to the module
    let location = resolve_target(&args.target).await?;
    eprintln!("Loading Discovery document from: {location}");

    let doc = DiscoveryDocument::from_file_or_url(&location)
        .await
        .context("Failed to load Discovery document")?;

    let self_url = match &args.self_url {
        Some(url) => url.to_string(),
        None if location.starts_with("http") => location.clone(),
        None => {
            let name = doc.name().unwrap_or("api");
            let version = doc.version().unwrap_or("v1");
            directory::rest_url(name, version)
        }
    };

    let generator = Generator::new(&doc, &self_url)
        .context("Discovery document failed generation preflight")?;
    let module = generator
        .generate()
        .with_context(|| format!("Failed to generate client for {location}"))?;
    eprintln!("Generated class {}", generator.class_name());

    match &args.output {
        Some(path) if path.as_os_str() == "-" => {
            print!("{module}");
        }
        Some(path) => {
            write_module(path, &module).await?;
        }
        None => {
            let path = PathBuf::from(format!("{}.ts", doc.name().unwrap_or("client")));
            write_module(&path, &module).await?;
        }
    }
    Ok(())
}

async fn write_module(path: &Path, module: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && fs::metadata(parent).await.is_err() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, module)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Wrote {} ({} bytes)", path.display(), module.len());
    Ok(())
}

/// Generate every API listed in a batch configuration file
async fn run_batch(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(config_path)
        .await
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if config.apis.is_empty() {
        println!("Config lists no APIs, nothing to do");
        return Ok(());
    }
    fs::create_dir_all(&config.output_dir)
        .await
        .context("Failed to create output directory")?;

    for api in &config.apis {
        let (name, version) = api
            .split_once(':')
            .with_context(|| format!("Config entry `{api}` is not a name:version pair"))?;
        let location = directory::resolve(name, version).await?;
        let doc = DiscoveryDocument::from_url(&location)
            .await
            .with_context(|| format!("Failed to load Discovery document for {api}"))?;
        let self_url = match &config.self_url_base {
            Some(base) => format!("{}/v1/{name}:{version}.ts", base.trim_end_matches('/')),
            None => location.clone(),
        };
        let module = Generator::new(&doc, &self_url)?.generate()?;
        let path = Path::new(&config.output_dir).join(format!("{name}_{version}.ts"));
        fs::write(&path, &module).await?;
        println!("✅ Generated {}", path.display());
    }
    Ok(())
}

async fn watch_and_generate(args: GenerateArgs) -> anyhow::Result<()> {
    if args.target.starts_with("http://")
        || args.target.starts_with("https://")
        || fs::metadata(&args.target).await.is_err()
    {
        println!("--watch is only supported for local document files");
        return run_generate(&args).await;
    }

    let (tx, mut rx) = mpsc::channel(1);
    let target = args.target.clone();
    let mut watcher = recommended_watcher(move |res| {
        let _ = tx.blocking_send(res);
    })?;
    watcher.watch(Path::new(&target), RecursiveMode::NonRecursive)?;

    run_generate(&args).await?;
    println!("Watching {target} for changes...");

    while let Some(res) = rx.recv().await {
        match res {
            Ok(_event) => {
                println!("Change detected. Regenerating...");
                if let Err(e) = run_generate(&args).await {
                    eprintln!("Generation failed: {e:#}");
                }
            }
            Err(e) => eprintln!("Watch error: {e:?}"),
        }
    }
    Ok(())
}

async fn run_list(filter: Option<&str>) -> anyhow::Result<()> {
    let entries = directory::list_apis().await?;
    let mut shown = 0usize;
    for entry in &entries {
        if let Some(filter) = filter {
            let title = entry.title.as_deref().unwrap_or("");
            if !entry.id.contains(filter) && !title.contains(filter) {
                continue;
            }
        }
        println!("{:<40} {}", entry.id, entry.title.as_deref().unwrap_or(""));
        shown += 1;
    }
    println!("{shown} of {} APIs", entries.len());
    Ok(())
}

async fn run_init() -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    let query: String = Input::with_theme(&theme)
        .with_prompt("Search the API directory")
        .allow_empty(true)
        .interact_text()?;

    let entries = directory::list_apis().await?;
    let matches: Vec<_> = entries
        .iter()
        .filter(|e| e.preferred)
        .filter(|e| {
            query.is_empty()
                || e.id.contains(&query)
                || e.title.as_deref().unwrap_or("").contains(&query)
        })
        .collect();
    if matches.is_empty() {
        anyhow::bail!("No directory entries match `{query}`");
    }

    let labels: Vec<String> = matches
        .iter()
        .map(|e| format!("{:<32} {}", e.id, e.title.as_deref().unwrap_or("")))
        .collect();
    let selection = Select::with_theme(&theme)
        .with_prompt("API")
        .items(&labels)
        .default(0)
        .interact()?;
    let entry = matches[selection];

    let output_str: String = Input::with_theme(&theme)
        .with_prompt("Output file")
        .default(format!("{}.ts", entry.name))
        .interact_text()?;

    let args = GenerateArgs {
        target: entry.id.clone(),
        output: Some(PathBuf::from(output_str)),
        self_url: None,
    };
    run_generate(&args).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    match &cli.command {
        Commands::Generate { target, output, self_url, config, watch } => {
            if let Some(config) = config {
                run_batch(config).await?;
            } else {
                let target = target
                    .clone()
                    .context("TARGET or --config is required; see `discogen generate --help`")?;
                let args = GenerateArgs {
                    target,
                    output: output.clone(),
                    self_url: self_url.clone(),
                };
                if *watch {
                    watch_and_generate(args).await?;
                } else {
                    run_generate(&args).await?;
                }
            }
        }
        Commands::List { filter } => {
            run_list(filter.as_deref()).await?;
        }
        Commands::Init => {
            run_init().await?;
        }
    }
    Ok(())
}
