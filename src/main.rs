use chrono::Local;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use organizer::api::router;
use organizer::config::Config;
use organizer::seed::Seed;
use organizer::state::AppState;
use organizer::store::Store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "organizer=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;
    let addr = config.bind_addr;

    let seed = Seed::load(&config, Local::now().date_naive())?;
    let state = AppState::new(Store::new(seed), config);

    let mut changes = state.store.subscribe();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let snapshot = changes.borrow_and_update().clone();
            debug!(
                "store at revision {}: {} subjects, {} tasks, {} schedule entries, {} notes",
                snapshot.revision,
                snapshot.subjects.len(),
                snapshot.tasks.len(),
                snapshot.schedule.len(),
                snapshot.notes.len()
            );
        }
    });

    let app = router(state.clone());

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.study_plan.lock().await.close();
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
