mod analysis;
mod config;
mod wiring;

use std::error::Error;
use std::sync::{Arc, Mutex as StdMutex};

use api::state::FeedEvent;
use sim_core::SimSession;
use sim_runtime::{
    unix_ms_now, JsonLinesRunLogWriter, SharedMetrics, SharedRunLog, SharedSession, TickDriver,
    TickLatencyMetrics,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env()?;
    let now_ms = unix_ms_now();
    // absent an explicit seed the price path is clock-seeded, a fresh walk
    // per server start
    let seed = config.price_seed.unwrap_or(now_ms);

    let session: SharedSession = Arc::new(tokio::sync::Mutex::new(SimSession::new(
        config.sim_config(),
        seed,
        now_ms,
    )));
    let metrics: SharedMetrics = Arc::new(StdMutex::new(TickLatencyMetrics::new()));
    let run_log: SharedRunLog = Arc::new(StdMutex::new(Box::new(JsonLinesRunLogWriter::new(
        std::io::stdout(),
    ))));

    let state = api::AppState::new(session.clone(), metrics.clone(), run_log.clone());

    let feed = state.clone();
    let driver = TickDriver::spawn(
        session,
        config.tick_interval_ms,
        metrics,
        run_log,
        move |update| {
            let _ = feed.publish_event(FeedEvent::Tick {
                tick: update.tick,
                price: update.price,
                ts_ms: update.ts_ms,
            });
        },
    );

    let proxy = analysis::AnalysisProxy::new(config.analysis_url.clone());
    let listener = TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, wiring::build_app(state, proxy)).await?;

    driver.stop();
    Ok(())
}
