use clap::{Parser, Subcommand};
use log::error;
use recipe_extract::{AppConfig, ImportError, RecipeImporter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "recipe-extract")]
#[command(about = "Extract structured recipes from web pages and photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the configured language-model provider
    #[arg(long, global = true)]
    provider: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape a recipe from a supported site
    Url {
        url: String,

        /// Also generate an illustration
        #[arg(long)]
        illustrate: bool,
    },

    /// Read a recipe off a photo
    Image {
        path: PathBuf,

        /// Also generate an illustration
        #[arg(long)]
        illustrate: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ImportError> {
    let mut config = AppConfig::load()?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }

    let builder = RecipeImporter::builder().config(config);
    let (builder, illustrate) = match cli.command {
        Commands::Url { url, illustrate } => (builder.url(url), illustrate),
        Commands::Image { path, illustrate } => (builder.image_file(path), illustrate),
    };
    let builder = if illustrate {
        builder.illustrate()
    } else {
        builder
    };

    let result = builder.build().await?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| ImportError::BuilderError(format!("Failed to serialize result: {e}")))?;
    println!("{json}");
    Ok(())
}
