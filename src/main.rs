use jobboard_workflow::{
    config::{get_config, init_config},
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let state = AppState::new(config)?;
    info!(
        base_url = %config.api_base_url,
        role = %state.role(),
        interval_secs = config.poll_interval_secs,
        "Watching badge counts"
    );

    let poller = state.spawn_badge_poller();
    let mut counts = poller.subscribe();

    loop {
        tokio::select! {
            changed = counts.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *counts.borrow_and_update();
                info!(
                    unread_messages = snapshot.unread_messages,
                    pending_interviews = snapshot.pending_interviews,
                    new_applicants = snapshot.new_applicants,
                    unread_notifications = snapshot.unread_notifications,
                    total = snapshot.total(),
                    "Badge counts changed"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    state.shutdown();
    Ok(())
}
