use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::path::PathBuf;
use taskroll::{
    Config, Format, Permission, Selection, Store, TimeBucket, categories, exporter, importer, selector,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskroll")]
#[command(about = "TaskRoll CLI - Roll a random task from your categories")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: from config)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Extra config file layered over the user config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all categories
    List,

    /// Show the tasks of a category
    Show { name: String },

    /// Import categories from a .json, .toml or .yaml file
    Import { file: PathBuf },

    /// Export categories (all of them when no names are given)
    Export {
        names: Vec<String>,

        /// json, toml or yaml
        #[arg(short, long)]
        format: Option<Format>,

        /// Destination directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Roll a random task from a category
    Roll {
        name: String,

        /// Time bucket 1-4 for time-sensitive categories
        #[arg(short, long)]
        time: Option<u8>,
    },

    /// Delete every category with this name
    Remove { name: String },

    /// Replace all categories with the default "General" category
    Reset,

    /// Delete all categories
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    let store_path = cli.store_path.unwrap_or_else(|| config.store_path.clone());

    let mut store = Store::open(&store_path).context("Failed to open store")?;

    match cli.command {
        Commands::List => {
            let listed = categories::load_keyed(&store)?;
            if listed.is_empty() {
                println!("No categories yet. Import some or run `taskroll reset`.");
            }
            for item in listed {
                let marker = if item.category.time_sensitive { " (timed)" } else { "" };
                println!(
                    "{:>3}. {}{}  {}",
                    item.key,
                    item.category.name.bold(),
                    marker.cyan(),
                    item.category.description.dimmed()
                );
            }
        }
        Commands::Show { name } => {
            let category =
                categories::find(&store, &name)?.ok_or_else(|| eyre!("Category not found: {}", name))?;
            println!("{}  {}", category.name.bold(), category.description.dimmed());
            for task in &category.tasks {
                println!("  - {} [{}]", task.name, task.time.label().cyan());
            }
        }
        Commands::Import { file } => {
            let result = importer::import_file(&mut store, &file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("{}", result.message().green());
        }
        Commands::Export { names, format, dir } => {
            let format = format.unwrap_or(config.default_format);
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let permission = if config.allow_write {
                Permission::Granted
            } else {
                Permission::Denied
            };

            let result = if names.is_empty() {
                exporter::export_all(&store, format, &dir, &permission)
            } else {
                exporter::export_named(&store, &names, format, &dir, &permission)
            }
            .context("Export failed")?;
            println!("{}", result.message().green());
        }
        Commands::Roll { name, time } => {
            let category =
                categories::find(&store, &name)?.ok_or_else(|| eyre!("Category not found: {}", name))?;
            let bucket = time
                .map(TimeBucket::try_from)
                .transpose()
                .map_err(|e| eyre!(e))?;

            match selector::select_with(&category, bucket) {
                Selection::Eligible(tasks) => match selector::roll(&tasks, &mut rand::thread_rng()) {
                    Some(task) => println!("{}", task.name.bold().green()),
                    None => println!("{}", "No tasks to roll from".yellow()),
                },
                Selection::ChooseBucket(buckets) => {
                    println!("How much time do you have? Pass --time with one of:");
                    for bucket in buckets {
                        println!("  {}  {}", bucket.value(), bucket.label());
                    }
                }
            }
        }
        Commands::Remove { name } => {
            let removed = categories::remove_named(&mut store, &name)?;
            println!("Removed {} categor{}", removed, if removed == 1 { "y" } else { "ies" });
        }
        Commands::Reset => {
            categories::reset(&mut store)?;
            println!("Categories reset to defaults");
        }
        Commands::Clear => {
            categories::clear(&mut store)?;
            println!("All categories cleared");
        }
    }

    Ok(())
}
