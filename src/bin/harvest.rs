use alumni_scout_core::persist::remote::RemoteTable;
use alumni_scout_core::{
    Credentials, HarvestConfig, Harvester, HttpNavigator, Persistence, RemoteSettings, RunReport,
    SearchDriver, SupabaseTable, config, targeted_searches, user_interrupt,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    config::load_dotenv();

    if let Err(e) = run().await {
        error!(error = %e, "harvest aborted");
        std::process::exit(1);
    }
}

async fn run() -> alumni_scout_core::Result<()> {
    let config = match std::env::var("HARVEST_CONFIG") {
        Ok(path) => HarvestConfig::from_json_file(path)?,
        Err(_) => HarvestConfig::default(),
    };
    let credentials = Credentials::from_env()?;

    let remote: Option<Box<dyn RemoteTable>> = match RemoteSettings::from_env() {
        Some(settings) => match SupabaseTable::new(&settings) {
            Ok(table) => Some(Box::new(table) as Box<dyn RemoteTable>),
            Err(e) => {
                warn!(error = %e, "remote table unavailable, writing csv only");
                None
            }
        },
        None => {
            warn!("SUPABASE_* not set, writing csv only");
            None
        }
    };

    let navigator = HttpNavigator::with_config(config.pacing.after_navigation.clone())?;
    navigator.login(&credentials).await?;
    config.pacing.between_queries.pause().await;

    let driver = SearchDriver::from_config(&config)?;
    let persistence = Persistence::new(Some(config.output.csv_path.clone()), remote);
    let harvester = Harvester::new(driver, persistence);

    let report = harvester
        .run_until(&navigator, user_interrupt(tokio::signal::ctrl_c()))
        .await;

    print_report(&report, &config);
    Ok(())
}

fn print_report(report: &RunReport, config: &HarvestConfig) {
    if report.interrupted {
        warn!("extraction stopped by user");
    }
    info!(
        collected = report.collected,
        unique = report.unique,
        with_profile_url = report.with_profile_url,
        remote_saved = ?report.remote_saved,
        elapsed_secs = (report.finished_at - report.started_at).num_seconds(),
        "run finished"
    );

    if report.unique == 0 {
        println!("No profiles collected");
        return;
    }

    println!("Sample results:");
    for (i, record) in report.records.iter().take(5).enumerate() {
        println!("  {}. Name: {}", i + 1, record.name.as_deref().unwrap_or("N/A"));
        let url = if record.profile_url.is_empty() {
            "No URL"
        } else {
            record.profile_url.as_str()
        };
        println!("     Profile URL: {}", url);
        println!("     Headline: {}", record.headline.as_deref().unwrap_or("N/A"));
        if record.has_profile_url() {
            continue;
        }
        match targeted_searches(record, &config.extraction, &config.search) {
            Ok(searches) => {
                for search in searches {
                    println!("     {}: {}", search.description, search.url);
                }
            }
            Err(e) => warn!(error = %e, "could not build follow-up searches"),
        }
    }
    println!(
        "Total profiles: {} ({} with profile URLs, {:.1}%)",
        report.unique,
        report.with_profile_url,
        report.url_success_rate()
    );
    if let Some(path) = &report.csv_path {
        println!("Saved to {}", path.display());
    }
}
