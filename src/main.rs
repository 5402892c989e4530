use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use vymind::config::{AppConfig, EngineConfig};
use vymind::error::AppError;
use vymind::modules::churn::{churn_report, AtRiskCustomer, CustomerActivity};
use vymind::modules::freshflow::{
    expiry_report, propose_flash_sale, BatchImporter, ExpiringBatch, FlashSalePrice, ProductBatch,
};
use vymind::modules::staffing::{
    predict_headcount, propose_assignment, EventTag, FirstAvailable, ShiftAssignment, StaffMember,
    WeatherTag,
};
use vymind::modules::suppliers::{fleet_summary, FleetSummary, PurchaseOrder, Supplier};
use vymind::scoring::{ActionProposal, Money};
use vymind::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    engine: EngineConfig,
}

#[derive(Parser, Debug)]
#[command(
    name = "VyMind Operations Engine",
    about = "Score retail operations data and serve decision reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Expiring-batch reports and flash-sale proposals
    Freshflow {
        #[command(subcommand)]
        command: FreshflowCommand,
    },
    /// Headcount prediction for a roster slot
    Staffing {
        #[command(subcommand)]
        command: StaffingCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum FreshflowCommand {
    /// Classify a batch CSV export and print the expiry report
    Report(FreshflowReportArgs),
}

#[derive(Args, Debug)]
struct FreshflowReportArgs {
    /// Batch CSV export to classify
    #[arg(long)]
    batches_csv: PathBuf,
    /// Evaluation date for the report (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Storage window in days (defaults to the configured window)
    #[arg(long)]
    lookahead: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum StaffingCommand {
    /// Predict the headcount for a weather/event context
    Predict(StaffingPredictArgs),
}

#[derive(Args, Debug)]
struct StaffingPredictArgs {
    /// Weather tag: sunny, rainy, cloudy, cold-wave, heatwave
    #[arg(long, value_parser = parse_weather)]
    weather: WeatherTag,
    /// Event tag: none, weekend, holiday, festival, sports-match
    #[arg(long, value_parser = parse_event)]
    event: EventTag,
    /// Staff already assigned to the slot
    #[arg(long, default_value_t = 0)]
    assigned: u32,
}

#[derive(Debug, Deserialize)]
struct FreshflowReportRequest {
    #[serde(default)]
    batches: Vec<ProductBatch>,
    /// Raw CSV export appended to the inline batches when present.
    #[serde(default)]
    batches_csv: Option<String>,
    #[serde(default)]
    today: Option<NaiveDate>,
    #[serde(default)]
    lookahead_days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct FreshflowReportResponse {
    today: NaiveDate,
    lookahead_days: i64,
    total_exposure: Money,
    critical_count: usize,
    unclassified_count: usize,
    count_by_tier: BTreeMap<&'static str, usize>,
    batches: Vec<ExpiringBatch>,
    flash_sales: Vec<FlashSalePrice>,
}

#[derive(Debug, Deserialize)]
struct ChurnReportRequest {
    customers: Vec<CustomerActivity>,
    #[serde(default)]
    today: Option<NaiveDate>,
    #[serde(default)]
    at_risk_after_days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ChurnReportResponse {
    today: NaiveDate,
    at_risk_after_days: i64,
    revenue_at_risk: Money,
    critical_count: usize,
    count_by_tier: BTreeMap<&'static str, usize>,
    customers: Vec<AtRiskCustomer>,
}

#[derive(Debug, Deserialize)]
struct SupplierScorecardRequest {
    suppliers: Vec<Supplier>,
    purchase_orders: Vec<PurchaseOrder>,
}

#[derive(Debug, Deserialize)]
struct StaffingPlanRequest {
    weather: WeatherTag,
    event: EventTag,
    #[serde(default)]
    assigned: u32,
    #[serde(default)]
    available: Vec<StaffMember>,
}

#[derive(Debug, Serialize)]
struct StaffingPlanResponse {
    predicted: u32,
    assigned: u32,
    proposal: ActionProposal<ShiftAssignment>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Freshflow {
            command: FreshflowCommand::Report(args),
        } => run_freshflow_report(args),
        Command::Staffing {
            command: StaffingCommand::Predict(args),
        } => run_staffing_predict(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_weather(raw: &str) -> Result<WeatherTag, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

fn parse_event(raw: &str) -> Result<EventTag, String> {
    raw.parse().map_err(|err| format!("{err}"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        engine: config.engine,
    };

    let app = api_router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "operations engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/freshflow/report", post(freshflow_report_endpoint))
        .route("/api/v1/churn/report", post(churn_report_endpoint))
        .route(
            "/api/v1/suppliers/scorecards",
            post(supplier_scorecards_endpoint),
        )
        .route("/api/v1/staffing/plan", post(staffing_plan_endpoint))
        .with_state(state)
}

fn run_freshflow_report(args: FreshflowReportArgs) -> Result<(), AppError> {
    let FreshflowReportArgs {
        batches_csv,
        today,
        lookahead,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let lookahead = lookahead.unwrap_or(config.engine.lookahead_days);

    let batches = BatchImporter::from_path(batches_csv)?;
    let report = expiry_report(batches, today, lookahead);

    println!("FreshFlow expiry report");
    println!("Evaluated {today}, storage window {lookahead} day(s)");
    println!(
        "\n{} batch(es) in window, {} critical, exposure {}",
        report.filtered.len(),
        report.critical_count,
        report.total_value
    );
    if report.unclassified_count > 0 {
        println!(
            "{} batch(es) have no expiry on record and are excluded from exposure",
            report.unclassified_count
        );
    }

    println!("\nBatches by tier");
    for (tier, count) in &report.count_by_tier {
        println!("- {tier}: {count}");
    }

    println!("\nFlash-sale proposals");
    let mut any = false;
    for record in &report.filtered {
        if let ActionProposal::Permitted { parameters } = propose_flash_sale(record) {
            any = true;
            println!(
                "- {} ({}): {}% off, {} -> {}",
                record.batch.product_name,
                parameters.batch_code,
                parameters.discount_pct,
                parameters.current_price,
                parameters.new_price
            );
        }
    }
    if !any {
        println!("- none");
    }

    Ok(())
}

fn run_staffing_predict(args: StaffingPredictArgs) -> Result<(), AppError> {
    let StaffingPredictArgs {
        weather,
        event,
        assigned,
    } = args;

    let predicted = predict_headcount(weather, event);
    let shortfall = predicted.saturating_sub(assigned);

    println!("Staffing prediction");
    println!("Predicted headcount: {predicted}");
    println!("Currently assigned:  {assigned}");
    if shortfall == 0 {
        println!("Roster already covered");
    } else {
        println!("Shortfall to assign: {shortfall}");
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn freshflow_report_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<FreshflowReportRequest>,
) -> Result<Json<FreshflowReportResponse>, AppError> {
    let FreshflowReportRequest {
        mut batches,
        batches_csv,
        today,
        lookahead_days,
    } = payload;

    if let Some(csv) = batches_csv {
        let imported = BatchImporter::from_reader(Cursor::new(csv.into_bytes()))?;
        batches.extend(imported);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let lookahead_days = lookahead_days.unwrap_or(state.engine.lookahead_days);
    let report = expiry_report(batches, today, lookahead_days);

    let flash_sales = report
        .filtered
        .iter()
        .filter_map(|record| match propose_flash_sale(record) {
            ActionProposal::Permitted { parameters } => Some(parameters),
            ActionProposal::Declined { .. } => None,
        })
        .collect();

    Ok(Json(FreshflowReportResponse {
        today,
        lookahead_days,
        total_exposure: report.total_value,
        critical_count: report.critical_count,
        unclassified_count: report.unclassified_count,
        count_by_tier: report.count_by_tier,
        batches: report.filtered,
        flash_sales,
    }))
}

async fn churn_report_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ChurnReportRequest>,
) -> Result<Json<ChurnReportResponse>, AppError> {
    let ChurnReportRequest {
        customers,
        today,
        at_risk_after_days,
    } = payload;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let at_risk_after_days = at_risk_after_days.unwrap_or(state.engine.at_risk_after_days);
    let report = churn_report(customers, today, at_risk_after_days);

    Ok(Json(ChurnReportResponse {
        today,
        at_risk_after_days,
        revenue_at_risk: report.total_value,
        critical_count: report.critical_count,
        count_by_tier: report.count_by_tier,
        customers: report.filtered,
    }))
}

async fn supplier_scorecards_endpoint(
    Json(payload): Json<SupplierScorecardRequest>,
) -> Json<FleetSummary> {
    let SupplierScorecardRequest {
        suppliers,
        purchase_orders,
    } = payload;

    Json(fleet_summary(&suppliers, &purchase_orders))
}

async fn staffing_plan_endpoint(
    Json(payload): Json<StaffingPlanRequest>,
) -> Json<StaffingPlanResponse> {
    let StaffingPlanRequest {
        weather,
        event,
        assigned,
        available,
    } = payload;

    let predicted = predict_headcount(weather, event);
    let proposal = propose_assignment(predicted, assigned, &available, &FirstAvailable);

    Json(StaffingPlanResponse {
        predicted,
        assigned,
        proposal,
    })
}
