use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use ksr_chef::api::{ApiClient, ChefApi, WorkerQuery};
use ksr_chef::config::ApiConfig;
use ksr_chef::tasks::TaskDetailSession;

fn usage() -> ! {
    eprintln!("Usage: ksr-chef <task-id> [--workers [YYYY-MM-DD]]");
    eprintln!("  KSR_API_BASE_URL and KSR_API_TOKEN configure the backend.");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let task_id: i64 = match args.next().map(|a| a.parse()) {
        Some(Ok(id)) => id,
        _ => usage(),
    };
    let workers_on: Option<Option<NaiveDate>> = match args.next().as_deref() {
        None => None,
        Some("--workers") => Some(match args.next() {
            Some(date) => Some(date.parse()?),
            None => None,
        }),
        Some(_) => usage(),
    };

    let config = ApiConfig::from_env()?;
    eprintln!("KSR Chef v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.base_url);

    let api: Arc<dyn ChefApi> = Arc::new(ApiClient::new(config)?);
    let mut session = TaskDetailSession::load(api, task_id, Utc::now()).await?;

    let task = session.task();
    println!("Task #{} {}", task.id, task.title);
    let requirements = session.requirements();
    println!(
        "   crane types {:?}, certificates {:?}",
        requirements.crane_types, requirements.certificates
    );

    println!("\nAssigned workers ({}):", session.assignments().len());
    for row in session.compatibility_rows() {
        println!(
            "   #{:<6} {:<28} {}",
            row.assignment_id,
            row.employee_name,
            row.compatibility.summary()
        );
    }

    // ── Candidate workers ───────────────────────────────────────────
    if let Some(date) = workers_on {
        let query = date.map(WorkerQuery::on).unwrap_or_default();
        let loaded = session.load_available_workers(query).await?;

        println!("\nAvailable workers ({loaded}):");
        let candidates = session.available_workers().iter();
        for (worker, compatibility) in candidates.zip(session.candidate_compatibility()) {
            let marker = if !worker.is_available() {
                "busy"
            } else if compatibility.is_eligible() {
                "ok"
            } else if compatibility.has_certificate_issues() {
                "cert"
            } else {
                "--"
            };
            println!(
                "   [{marker:<4}] {:<28} {}",
                worker.employee.name,
                compatibility.summary()
            );
        }
    }

    Ok(())
}
