use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use salesdesk::api::{build_router, AppState};
use salesdesk::config::{Cli, Command, ImportArgs, ServeArgs};
use salesdesk::infra::import::SpreadsheetReader;
use salesdesk::infra::sqlite::repo::{SqliteRecordSink, SqliteRecordSource};
use salesdesk::usecase::services::batch_loader::BatchLoader;
use salesdesk::usecase::services::import_service::{ImportRequest, ImportService};
use salesdesk::usecase::services::verify_service::VerifyService;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let db_path = cli.db_path()?;

    match cli.command {
        Command::Import(args) => run_import(&db_path, &args),
        Command::Serve(args) => run_serve(&db_path, &args),
        Command::Verify => run_verify(&db_path),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run_import(db_path: &Path, args: &ImportArgs) -> Result<()> {
    let loader = BatchLoader::new(args.chunk_size)?;
    let service = ImportService::new(SpreadsheetReader, loader);
    let request = ImportRequest {
        source: args.source.clone(),
        sheet: args.sheet.clone(),
    };
    let mode = args.refresh_mode();

    service
        .run(|| SqliteRecordSink::connect(db_path, mode), &request)
        .with_context(|| format!("import of {} failed", args.source.display()))?;
    Ok(())
}

fn run_serve(db_path: &Path, args: &ServeArgs) -> Result<()> {
    let source = SqliteRecordSource::new(db_path.to_path_buf());
    source.init().context("failed to prepare database")?;
    let app = build_router(AppState::new(Arc::new(source)));
    let addr = args.addr();

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("server is running on http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await
            .context("server error")
    })
}

fn run_verify(db_path: &Path) -> Result<()> {
    let source = SqliteRecordSource::new(db_path.to_path_buf());
    source.init().context("failed to prepare database")?;
    let report = VerifyService::new(Arc::new(source))
        .verify()
        .context("verification failed")?;

    info!("total records in database: {}", report.total_records);
    info!(
        "filter options: {} categories, {} branches, {} suppliers",
        report.distinct_categories, report.distinct_branches, report.distinct_suppliers
    );
    for (idx, record) in report.samples.iter().enumerate() {
        info!(
            "sample {}: article {}, category {}, branch {}, amount {}",
            idx + 1,
            record.article_no,
            record.category_filter.as_deref().unwrap_or("-"),
            record.branch_filter.as_deref().unwrap_or("-"),
            record.net_amount.unwrap_or_default()
        );
    }
    let totals = report.totals;
    info!(
        "net amount: total {:.2}, average {:.2}, max {:.2}, min {:.2}; quantity total {}",
        totals.sum_net_amount,
        totals.avg_net_amount,
        totals.max_net_amount,
        totals.min_net_amount,
        totals.sum_net_sls_qty
    );
    Ok(())
}
