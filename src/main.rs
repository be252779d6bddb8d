use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use curriculum_pdf::store::visible_counts;
use curriculum_pdf::{CategoryFilter, Config, Error, FontConfig, JsonStore, RenderedDocument, Store};

#[derive(Parser, Debug)]
#[command(name = "curriculum-pdf", version, about = "Render the active résumé profile as a PDF")]
struct Cli {
    /// JSON record store.
    #[arg(long, global = true, env = "CURRICULUM_PDF_STORE", default_value = "store.json")]
    store: PathBuf,
    /// Directory asset paths are resolved against.
    #[arg(long, global = true, env = "CURRICULUM_PDF_MEDIA", default_value = "media")]
    media: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the active profile.
    Render {
        #[arg(short, long, default_value = RenderedDocument::FILENAME)]
        output: PathBuf,
        /// Raw query string, e.g. "exp&cursos".
        #[arg(long, conflicts_with = "only")]
        query: Option<String>,
        /// Include only this section flag (exp, cursos, pa, pl, recon, vg). Repeatable.
        #[arg(long = "only")]
        only: Vec<String>,
        /// Font directory to scan, in addition to CURRICULUM_PDF_FONTS. Repeatable.
        #[arg(long = "font-dir")]
        font_dirs: Vec<PathBuf>,
        /// Preferred font families, comma separated. Overrides
        /// CURRICULUM_PDF_FONT_FAMILIES.
        #[arg(long = "font-family", value_delimiter = ',')]
        font_families: Vec<String>,
        /// Also scan the platform font directories.
        #[arg(long)]
        system_fonts: bool,
    },
    /// Make one profile the active one, deactivating all others.
    Activate { id: u32 },
    /// Visible item counts for the active profile.
    Summary {
        #[arg(long)]
        json: bool,
    },
}

fn font_config(dirs: Vec<PathBuf>, families: Vec<String>, system_dirs: bool) -> FontConfig {
    let mut config = FontConfig::from_env();
    config.dirs.extend(dirs);
    let families: Vec<String> = families
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if !families.is_empty() {
        config.families = families;
    }
    config.system_dirs |= system_dirs;
    config
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Commands::Render {
            output,
            query,
            only,
            font_dirs,
            font_families,
            system_fonts,
        } => {
            let store = JsonStore::open(&cli.store, &cli.media)?;
            let filter = match query {
                Some(q) => CategoryFilter::from_query(&q),
                None => CategoryFilter::from_flags(only.iter().map(String::as_str)),
            };
            let config = Config {
                fonts: font_config(font_dirs, font_families, system_fonts),
                ..Config::default()
            };
            let doc = curriculum_pdf::generate_to_file(&store, &filter, &config, &output)?;
            println!(
                "{} ({} pages, {} bytes)",
                output.display(),
                doc.page_count,
                doc.bytes.len()
            );
        }
        Commands::Activate { id } => {
            let mut store = JsonStore::open(&cli.store, &cli.media)?;
            store.activate_profile(id)?;
            println!("Profile {id} is now active");
        }
        Commands::Summary { json } => {
            let store = JsonStore::open(&cli.store, &cli.media)?;
            let Some(profile) = store.active_profile()? else {
                return Err(Error::NotFound);
            };
            let counts = visible_counts(&store, &profile)?;
            if json {
                let sections: serde_json::Map<String, serde_json::Value> = counts
                    .iter()
                    .map(|(c, n)| (c.flag().to_string(), serde_json::Value::from(*n)))
                    .collect();
                let out = serde_json::json!({
                    "profile": profile.id,
                    "name": profile.display_name(),
                    "printing_allowed": profile.printing_allowed,
                    "sections": sections,
                });
                println!("{out}");
            } else {
                println!("{} (#{})", profile.display_name(), profile.id);
                println!(
                    "printing {}",
                    if profile.printing_allowed { "allowed" } else { "disabled" }
                );
                for (category, n) in counts {
                    println!("{:<24} {n}", category.heading());
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error ({}): {e}", e.status());
            ExitCode::FAILURE
        }
    }
}
