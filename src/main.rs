use clap::{Parser as ClapParser, Subcommand};
use console::style;
use rust_embed::RustEmbed;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use quire::collection::DEFAULT_POSTS_DIR;
use quire::{DefaultTheme, Site};

#[derive(RustEmbed)]
#[folder = "assets/default_site/"]
struct Asset;

#[derive(ClapParser)]
#[command(author, version, about = "quire - validated content collections and site settings for a static blog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Site configuration file.
    #[arg(short, long, global = true, default_value = "site.toml")]
    config: PathBuf,
    /// Directory holding the posts collection.
    #[arg(long, global = true, default_value = DEFAULT_POSTS_DIR)]
    content_dir: PathBuf,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Validate the configuration and every post.
    Check,
    /// Print the validated site as JSON for the renderer.
    Manifest {
        #[arg(long)]
        pretty: bool,
    },
    /// Write a starter site.toml and sample post.
    Init,
}

fn main() -> anyhow::Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match &cli.command {
        Commands::Init => {
            eprintln!("quire init v{}", env!("CARGO_PKG_VERSION"));
            init_project()?;
            eprintln!("{} Project initialized.", style("success").cyan());
        }
        Commands::Check => {
            eprintln!("quire check v{}", env!("CARGO_PKG_VERSION"));
            let site = load(&cli)?;
            summarize(&site);
            eprintln!("{} site and content are valid.", style("success").cyan());
        }
        Commands::Manifest { pretty } => {
            let site = load(&cli)?;
            println!("{}", site.manifest().to_json(*pretty)?);
        }
    }

    eprintln!("Done in {:.2}s.", start.elapsed().as_secs_f32());
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose { "quire=debug" } else { "quire=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn load(cli: &Cli) -> anyhow::Result<Site> {
    step(1, "Reading site configuration...", cli.verbose);
    if !cli.config.exists() {
        anyhow::bail!(
            "{} {} not found. Run 'quire init' to begin.",
            style("error:").red(),
            cli.config.display()
        );
    }

    step(2, "Validating content collections...", cli.verbose);
    Ok(Site::load(&cli.config, &cli.content_dir)?)
}

fn step(n: usize, msg: &str, verbose: bool) {
    if verbose {
        eprintln!("{} {}", style(format!("[{n}/2]")).dim(), msg);
    }
}

fn summarize(site: &Site) {
    let config = site.config();
    let themes = config.themes();
    let default = match themes.default_theme() {
        DefaultTheme::Named(name) => name,
        DefaultTheme::Auto => "auto",
    };

    eprintln!("  {} {} ({})", style("site").dim(), config.title(), config.site());
    eprintln!(
        "  {} {} mode, default {}, {} included",
        style("themes").dim(),
        themes.mode(),
        default,
        themes.include().len()
    );
    for collection in site.collections() {
        eprintln!(
            "  {} {} entries, {} tags",
            style(collection.name()).dim(),
            collection.len(),
            collection.tags().len()
        );
    }
}

fn init_project() -> anyhow::Result<()> {
    eprintln!("{} Extracting default assets...", style("[1/1]").dim());

    for file in Asset::iter() {
        let path = Path::new(file.as_ref());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let Some(content) = Asset::get(file.as_ref()) else {
            anyhow::bail!("embedded asset {} is missing", file);
        };

        if path.exists() {
            tracing::info!(path = %path.display(), "already exists, keeping it");
            continue;
        }
        fs::write(path, content.data)?;
    }
    Ok(())
}
