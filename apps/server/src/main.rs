use anyhow::Context;
use carefinder_api::{build_router, AppState};
use carefinder_catalog::{SearchQuery, SortOrder};
use carefinder_config::{load as load_config, AppConfig};
use carefinder_runtime::{telemetry, BackendServices};
use carefinder_storefront::results_headline;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "carefinder")]
#[command(about = "CareFinder doctor discovery backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Search the provider catalog and print the results
    Search {
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        specialty: String,
        #[arg(long, value_enum, default_value_t = SortArg::Relevance)]
        sort: SortArg,
        /// Only providers marked available today
        #[arg(long)]
        available_today: bool,
        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the persisted session, if any
    Session,
    /// Clear the persisted session
    Logout,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    FeeLowToHigh,
    FeeHighToLow,
    Rating,
    PatientStories,
    Experience,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Relevance => SortOrder::Relevance,
            SortArg::FeeLowToHigh => SortOrder::FeeLowToHigh,
            SortArg::FeeHighToLow => SortOrder::FeeHighToLow,
            SortArg::Rating => SortOrder::Rating,
            SortArg::PatientStories => SortOrder::PatientStories,
            SortArg::Experience => SortOrder::Experience,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Search {
            location,
            specialty,
            sort,
            available_today,
            json,
        } => {
            let mut query = SearchQuery::new(location, specialty).with_sort(sort.into());
            if available_today {
                query = query.with_available_today(true);
            }
            run_search(query, json).await
        }
        Commands::Session => show_session().await,
        Commands::Logout => logout().await,
    }
}

async fn initialise() -> anyhow::Result<BackendServices> {
    let config = load_config().context("failed to load configuration")?;
    initialise_with(&config).await
}

async fn initialise_with(config: &AppConfig) -> anyhow::Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting CareFinder backend");

    let config = load_config().context("failed to load configuration")?;
    let services = initialise_with(&config).await?;

    let state = AppState::from_store(services.search.clone(), &services.session);
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(carefinder_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    drop(services);
    info!("backend shut down");
    Ok(())
}

async fn run_search(query: SearchQuery, json: bool) -> anyhow::Result<()> {
    let services = initialise().await?;

    let results = services
        .search
        .search(&query)
        .await
        .context("provider search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let specialty = headline_term(&query.specialty, "provider");
    let location = headline_term(&query.location, "all locations");
    println!("{}", results_headline(results.len(), specialty, location));
    println!("{}", "-".repeat(100));

    for record in results {
        println!(
            "{:<4} {:<48} {:<16} {:<28} ₹{:<6} {:>3}%  {}",
            record.id,
            record.name,
            record.specialty,
            record.location,
            record.consultation_fee,
            record.rating,
            record.availability_label
        );
    }

    Ok(())
}

/// `term` as shown in the results headline; empty or `all` reads as `unfiltered`.
fn headline_term<'a>(term: &'a str, unfiltered: &'a str) -> &'a str {
    if term.is_empty() || term.eq_ignore_ascii_case("all") {
        unfiltered
    } else {
        term
    }
}

async fn show_session() -> anyhow::Result<()> {
    let services = initialise().await?;

    match services.session.current_session() {
        Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
        None => println!("No active session"),
    }

    Ok(())
}

async fn logout() -> anyhow::Result<()> {
    let services = initialise().await?;

    let previous = services.session.current_session();
    services
        .session
        .logout()
        .context("failed to clear persisted session")?;

    match previous {
        Some(session) => println!("Logged out {}", session.email),
        None => println!("No active session"),
    }

    Ok(())
}
