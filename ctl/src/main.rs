//! botops - Entry Point
//!
//! Deploys and monitors the single summarizer bot container. Two
//! subcommands: `deploy` runs the full lifecycle, `monitor` runs a
//! single-shot diagnostic or the interactive loop.

use std::env;
use std::path::Path;

use colored::Colorize;
use tracing::{error, info};

use botops::cancel::{cancel_pair, CancelHandle};
use botops::config::settings::Settings;
use botops::config::target::DeploymentTarget;
use botops::deploy::controller::LifecycleController;
use botops::deploy::outcome::DeploymentOutcome;
use botops::errors::OpsError;
use botops::logs::{init_logging, LogOptions};
use botops::monitor::commands::{MonitorCommand, SINGLE_SHOT_OPS};
use botops::monitor::Monitor;
use botops::runtime::docker::DockerClient;
use botops::utils::version_info;

/// Optional settings file next to the build context
const SETTINGS_FILE: &str = "botops.json";

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize version info: {}", e),
        }
        return;
    }

    let settings = match Settings::load_or_default(Path::new(SETTINGS_FILE)).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read {}: {}", SETTINGS_FILE, e);
            std::process::exit(1);
        }
    };

    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    let target = DeploymentTarget::from_settings(&settings);
    let runtime = DockerClient::new();

    let (handle, token) = cancel_pair();
    spawn_signal_listener(handle);

    let exit_code = match args.get(1).map(String::as_str) {
        Some("deploy") => run_deploy(&runtime, target, &token).await,
        Some("monitor") => run_monitor(&runtime, &target, args.get(2).map(String::as_str), &token).await,
        _ => {
            print_usage();
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run_deploy(
    runtime: &DockerClient,
    target: DeploymentTarget,
    token: &botops::cancel::CancelToken,
) -> i32 {
    println!(
        "{} deploying {} (image {})",
        "botops:".bold(),
        target.container_name,
        target.image_name
    );

    let controller = LifecycleController::new(runtime, target);
    let outcome = controller.deploy(token).await;

    match &outcome {
        DeploymentOutcome::Success(state) => {
            info!("Deployment finished in state {:?}", state);
            println!(
                "{} {} deployed and running",
                "success:".green().bold(),
                controller.target().container_name
            );
        }
        DeploymentOutcome::Failed { stage, error } => {
            error!("Deployment failed during {}: {}", stage.describe(), error);
            println!(
                "{} deploy failed during {}: {}",
                "error:".red().bold(),
                stage.describe(),
                error
            );
            print_failure_guidance(error);
        }
    }
    outcome.exit_code()
}

fn print_failure_guidance(error: &OpsError) {
    match error {
        OpsError::DependencyMissing(_) => {
            println!("Check that docker is installed and the daemon is running.");
        }
        OpsError::ConfigMissing(_) | OpsError::ConfigIncomplete(_) => {
            println!("Create the environment file with TELEGRAM_BOT_TOKEN and OPENAI_API_KEY set.");
        }
        OpsError::ContainerNotRunning(_) => {
            println!("The container was left in place; inspect it with: botops monitor errors");
        }
        OpsError::Cancelled => {
            println!("Deploy aborted; re-run `botops deploy` to converge to a clean state.");
        }
        _ => {}
    }
}

async fn run_monitor(
    runtime: &DockerClient,
    target: &DeploymentTarget,
    op: Option<&str>,
    token: &botops::cancel::CancelToken,
) -> i32 {
    let monitor = Monitor::new(runtime, target);

    let result = match op {
        None => monitor.interactive(token).await,
        Some(op) => match MonitorCommand::from_op(op) {
            Some(command) => monitor.dispatch(command, token).await,
            None => {
                eprintln!("Unknown monitor operation: {}", op);
                eprintln!("Expected one of: {}", SINGLE_SHOT_OPS.join(", "));
                return 1;
            }
        },
    };

    match result {
        Ok(()) => 0,
        Err(OpsError::Cancelled) => {
            println!("{}", "Aborted.".yellow());
            1
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            1
        }
    }
}

fn spawn_signal_listener(handle: CancelHandle) {
    tokio::spawn(async move {
        await_shutdown_signal().await;
        handle.cancel();
    });
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, aborting...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, aborting...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, aborting...");
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  botops deploy                              run the full deployment sequence");
    eprintln!("  botops monitor [{}]   single-shot diagnostic", SINGLE_SHOT_OPS.join("|"));
    eprintln!("  botops monitor                             interactive diagnostics");
    eprintln!("  botops --version                           version info");
}
