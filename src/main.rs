use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use brand_compositor::{
    api::{default_prompts, filter_image_models, ModelApiClient},
    config::Config,
    launch::LaunchGraphic,
    overlay::{run_batch, OverlayCompositor, OverlaySpec},
};

#[derive(Parser)]
#[command(
    name = "brand-compositor",
    version,
    about = "Generate branded marketing images",
    long_about = "Brand-Compositor layers the brand overlay (gradient band, captions, logo) onto marketing images, renders the launch graphic and drives the image-model API that produces source illustrations."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the brand overlay to a single image
    Overlay {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,

        /// Output image; .png writes PNG, anything else JPEG
        #[arg(short, long)]
        output: PathBuf,

        /// Large caption line
        #[arg(long)]
        headline: String,

        /// Small caption line
        #[arg(long)]
        subtitle: String,

        /// Logo image (defaults to the configured logo)
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Apply the overlay to every registered variant
    Batch {
        /// Directory holding variant sources and outputs
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Only compose these variants (repeatable)
        #[arg(long = "variant")]
        variants: Vec<String>,
    },

    /// Render the launch announcement graphic
    Launch {
        #[arg(short, long, default_value = "producthunt-launch.png")]
        output: PathBuf,
    },

    /// List image-capable models offered by the API
    Models,

    /// Generate the marketing illustration set
    Generate {
        /// Directory generated images are written to
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List registered overlay variants
    Variants,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting Brand-Compositor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    run(cli.command, &config).map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn run(command: Command, config: &Config) -> brand_compositor::Result<()> {
    match command {
        Command::Overlay {
            input,
            output,
            headline,
            subtitle,
            logo,
        } => {
            let compositor = OverlayCompositor::from_config(config);
            let spec = OverlaySpec::new(headline, subtitle).with_logo(logo.unwrap_or_else(|| config.paths.logo.clone()));
            compositor.compose(&input, &spec, &output)?;
            println!("Saved: {}", output.display());
        }

        Command::Batch { dir, variants } => {
            let dir = dir.unwrap_or_else(|| config.paths.marketing_dir.clone());
            let compositor = OverlayCompositor::from_config(config);
            let mut registry = config.variant_registry();
            if !variants.is_empty() {
                registry = registry.select(&variants)?;
            }

            let written = run_batch(&compositor, &registry, &dir, Some(&config.paths.logo))?;
            for path in &written {
                println!("Saved: {}", path.display());
            }
            println!("\nAll branded images created!");
        }

        Command::Launch { output } => {
            LaunchGraphic::new(config.font_resolver()).save(&output, config.output.quality)?;
            println!("Saved: {}", output.display());
        }

        Command::Models => {
            let client = ModelApiClient::from_env(&config.api)?;
            let models = client.list_models()?;
            let image_models = filter_image_models(&models, &config.api.image_keywords);

            println!("Image generation models on {}:\n", config.api.base_url);
            for model in &image_models {
                println!("  {}", model.id);
                println!("    Price: {}", model.prompt_price());
            }
            println!("\n{} of {} models match", image_models.len(), models.len());
        }

        Command::Generate { out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| config.paths.images_dir.clone());
            let client = ModelApiClient::from_env(&config.api)?;
            let prompts = default_prompts();

            let succeeded = client.run_prompts(&prompts, &config.api.models, &out_dir)?;
            println!("\nComplete: {}/{} images generated", succeeded, prompts.len());
        }

        Command::Variants => {
            for variant in config.variant_registry().iter() {
                println!("{:<12} {:?} -> {:?}", variant.name, variant.source, variant.output);
            }
        }
    }

    Ok(())
}
