//! Nutrilin
//!
//! Interactive meal composer: search foods, pick quantities, see the
//! nutrition and insulin estimate for the meal.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use nutrilin::api::HttpNutritionApi;
use nutrilin::build_info;
use nutrilin::config::Config;
use nutrilin::session::Session;
use nutrilin::view::{parse_command, Command, CommandError, TerminalView, HELP};

/// Read stdin lines into commands until EOF
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Result<Command, CommandError>> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(parse_command(&line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the rendered view
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrilin=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env()?;
    eprintln!("API: {}", config.api_url);
    if let Some(path) = &config.chart_path {
        eprintln!("Chart file: {}", path.display());
    }

    let api = Arc::new(HttpNutritionApi::new(config.api_url.clone()));
    let mut session = Session::new(api, config.session_settings());
    let mut view = TerminalView::new(config.chart_path.clone());
    let mut input = spawn_input_reader();

    view.message(HELP);
    session.start();
    view.present(&session.view());

    loop {
        let changed = tokio::select! {
            Some(event) = session.next_event() => session.handle(event),
            command = input.recv() => match command {
                None | Some(Ok(Command::Quit)) => break,
                Some(Ok(Command::Intent(intent))) => session.apply(intent),
                Some(Ok(Command::Show)) => true,
                Some(Ok(Command::Help)) => {
                    view.message(HELP);
                    false
                }
                Some(Ok(Command::Chart(path))) => {
                    view.export_chart(session.view().result.as_ref(), &path);
                    false
                }
                Some(Err(e)) => {
                    view.message(&e.to_string());
                    false
                }
            },
        };

        for notice in session.take_notices() {
            view.notice(&notice);
        }
        if changed {
            view.present(&session.view());
        }
    }

    eprintln!("Bye.");
    Ok(())
}
