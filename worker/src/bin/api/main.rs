use ses_notifications_monitor::clock::TokioClock;
use ses_notifications_monitor::environment::Environment;
use ses_notifications_monitor::queue::SqsQueueProvider;
use ses_notifications_monitor::scheduler::PollScheduler;
use ses_notifications_monitor::shutdown::Shutdown;
use ses_notifications_monitor_worker::routes::Routes;
use ses_notifications_monitor_worker::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wg::WaitGroup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stdout());

    let rust_log = Environment::string("RUST_LOG", "INFO,aws_config=WARN,aws_smithy_runtime=WARN");

    tracing_subscriber::registry()
        .with(EnvFilter::new(rust_log))
        .with(Box::new(tracing_subscriber::fmt::layer().with_writer(non_blocking)))
        .init();

    info!("Starting...");

    let wait_group = WaitGroup::new();

    let app_state = AppState::new().await?;

    tokio::spawn(init_http_server(app_state.clone(), wait_group.add(1)));
    tokio::spawn(init_notifications_session(app_state.clone(), wait_group.add(1)));

    wait_group.wait();

    info!("Stopped!");

    Ok(())
}

async fn init_http_server(
    app_state: AppState,
    wait_group: WaitGroup,
) {
    info!("Starting http server...");
    let routes = Routes::routes(&app_state).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], app_state.http_port));

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Running http server on {addr}...");
            let _ = axum::serve(listener, routes).with_graceful_shutdown(Shutdown::signal("Stopping http server...")).await;
        },
        Err(error) => {
            error!("Failed to bind http server on {addr}: {error}");
        },
    }

    wait_group.done();

    info!("Http server stopped!");
}

async fn init_notifications_session(
    app_state: AppState,
    wait_group: WaitGroup,
) {
    let provider = SqsQueueProvider::new(app_state.sqs_client.clone());
    let mut scheduler = PollScheduler::new(provider, TokioClock, app_state.markup.clone(), app_state.settings.clone());

    let stopper = scheduler.stopper();
    tokio::spawn(async move {
        Shutdown::signal("Stopping notifications session...").await;
        stopper.stop();
    });

    match scheduler.start().await {
        Ok(report) => info!(
            cycles_completed = report.cycles_completed,
            records = report.records,
            failures = report.failures.len(),
            "Notifications session finished"
        ),
        Err(_) => info!("Notifications session ended after a failed cycle"),
    }

    wait_group.done();
}
