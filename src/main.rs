use std::fmt::{Debug, Display};

use authr::authr_web_server::AuthrWebServer;
use authr::core::{get_subscriber, init_subscriber, log_writer, AppConfig};
use tokio::task::JoinError;

use colored::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new()?;

    let (log_sink, _log_guard) = log_writer(
        config.authr_server_config.log_directory.as_deref(),
        "authr",
    );
    let subscriber = get_subscriber("authr".into(), "info".into(), log_sink);
    init_subscriber(subscriber)?;

    tracing::info!("initializing authorization service");

    let authr_web_server = AuthrWebServer::build(config.clone()).await?;
    let port = authr_web_server.port();

    let server_task = tokio::spawn(authr_web_server.run_until_stopped());

    println!("{}", "-----------------------------------------".green());
    println!(
        "🚀 {} started on Addr: {}:{}",
        config.authr_server_config.name, config.authr_server_config.host, port
    );
    println!("{}", "-----------------------------------------".green());

    report_exit("authr web server", server_task.await);
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} task failed to complete",
                task_name
            )
        }
    }
}
