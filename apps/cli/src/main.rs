use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    compare::CompareController,
    config::load_settings,
    dashboard::{DashboardController, KpiCards},
    explore::ExploreController,
    loader::{load_history, load_stats},
    render::ResultTab,
    session::sync_session,
    GovanshClient, IntakeSource, PredictionPage, WorkflowEffect,
};
use shared::protocol::PredictionResult;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "govansh", about = "Cattle and buffalo breed recognition client")]
struct Cli {
    /// Overrides `server_url` from the config file and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Config file; defaults to `govansh.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the session as the navigation bar would.
    Whoami,
    /// Classify one image picked from disk.
    Predict {
        image: PathBuf,
        #[command(flatten)]
        output: ResultArgs,
    },
    /// Classify the first of several dropped files.
    Drop {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        output: ResultArgs,
    },
    History,
    Stats,
    Compare {
        breed1: String,
        breed2: String,
    },
    Dashboard,
    Breeds,
    Breed {
        name: String,
    },
}

#[derive(Args, Debug)]
struct ResultArgs {
    /// Write a text report for the result.
    #[arg(long)]
    export: bool,
    #[arg(long, default_value = "overview")]
    tab: ResultTab,
    /// Print the raw result instead of the rendered panels.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
        settings.validate()?;
    }
    info!(server_url = %settings.server_url, "govansh client starting");
    let client = Arc::new(GovanshClient::new(&settings)?);

    match cli.command {
        Command::Whoami => {
            println!("{}", sync_session(client.as_ref()).await);
        }
        Command::Predict { image, output } => {
            let mut page = PredictionPage::new(client, &settings);
            run_prediction(&mut page, IntakeSource::Picker(image), &output).await?;
        }
        Command::Drop { files, output } => {
            let mut page = PredictionPage::new(client, &settings);
            run_prediction(&mut page, IntakeSource::Drop(files), &output).await?;
        }
        Command::History => {
            print!("{}", load_history(client.as_ref()).await);
        }
        Command::Stats => {
            let kpis = KpiCards::from_stats(&load_stats(client.as_ref()).await);
            println!("My predictions:    {}", kpis.my_predictions);
            println!("Total users:       {}", kpis.total_users);
            println!("Total predictions: {}", kpis.total_predictions);
            println!("Top breed:         {}", kpis.top_breed);
        }
        Command::Compare { breed1, breed2 } => {
            let view = CompareController::new(client.as_ref())
                .compare(&breed1, &breed2)
                .await?;
            print!("{view}");
        }
        Command::Dashboard => {
            print!("{}", DashboardController::new(client.as_ref()).load().await);
        }
        Command::Breeds => {
            print!("{}", ExploreController::new(client.as_ref()).catalogue().await?);
        }
        Command::Breed { name } => {
            print!("{}", ExploreController::new(client.as_ref()).profile(&name).await?);
        }
    }

    Ok(())
}

async fn run_prediction(
    page: &mut PredictionPage<GovanshClient>,
    source: IntakeSource,
    output: &ResultArgs,
) -> Result<()> {
    page.load().await;
    println!("{}", page.nav());

    if !page.select(source).await? {
        println!("Nothing to classify.");
        return Ok(());
    }
    if let Some(message) = page.controller().message() {
        bail!("{message}");
    }

    match page.submit().await? {
        WorkflowEffect::RefreshLoaders => {}
        WorkflowEffect::Redirect(login_url) => bail!("Login required: {login_url}"),
        WorkflowEffect::ShowMessage(message) => bail!("{message}"),
        WorkflowEffect::Discarded => bail!("prediction was superseded by a newer selection"),
    }

    if output.json {
        let result: Option<PredictionResult> = page.controller().result_snapshot();
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(rendered) = page.controller().rendered() {
        println!("{}", rendered.headline);
        page.select_tab(output.tab);
        if let Some(panel) = page.active_panel_text() {
            println!();
            println!("[{}]", page.controller().active_tab().label());
            print!("{panel}");
        }
        println!();
        println!("Recent predictions");
        print!("{}", page.history());
    }

    if output.export {
        match page.export()? {
            Some(path) => println!("Report saved to {}", path.display()),
            None => println!("Nothing to export."),
        }
    }
    Ok(())
}
