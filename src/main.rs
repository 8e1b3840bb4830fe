use std::{env, io, process};

use split_pay::Register;
use split_pay::csv::{read_events, write_report};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let Some(path) = env::args().nth(1) else {
        error!("usage: split-pay <checkout.csv>");
        process::exit(2);
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let events = match read_events(path) {
        Ok(events) => events,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let mut register = Register::new();
    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in events {
            match result {
                Ok(event) => {
                    if event_sender.send(event).await.is_err() {
                        // register is gone, nothing left to feed
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    register.run(ReceiverStream::new(event_receiver)).await;

    for sale in register.open_sales() {
        warn!(sale, "sale left open, not reported");
    }

    if let Err(e) = write_report(register.committer(), io::stdout().lock()) {
        error!("{e}");
        process::exit(1);
    }
}
