//! Console shell for the storefront.
//!
//! Reads commands from stdin, turns them into bus events, and pumps the resulting
//! actions: render instructions are printed, API requests go to the configured shop.
//!
//! ```text
//! stdin line → Command → dispatch → EventBus → Coordinator → Actions
//!                                                               │
//!                 ConsoleRenderer ← Render ──── pump ──── PostToApi → HttpShopApi
//! ```
//!
//! # Usage
//!
//! ```text
//! storefront [--config <path>]
//! ```
//!
//! Without `--config`, `~/.config/storefront/config.toml` is read when it exists.
//! `STOREFRONT_*` variables override file values and `RUST_LOG` overrides `trace_level`.

#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use storefront::api::HttpShopApi;
use storefront::ui::{dispatch, Command, ConsoleRenderer, Flow};
use storefront::{observability, Config, Result, StorefrontError};

const USAGE: &str = "usage: storefront [--config <path>]";

/// Parses `--config <path>` from the command line.
fn config_path(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| StorefrontError::Config(format!("{arg} needs a path")))?;
                path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => {
                return Err(StorefrontError::Config(format!(
                    "unexpected argument `{other}`\n{USAGE}"
                )))
            }
        }
    }
    Ok(path)
}

async fn run() -> Result<()> {
    let path = config_path(std::env::args().skip(1))?;
    let config = Config::load(path.as_deref())?;
    let provider = observability::init_tracing(&config);

    tracing::info!(api_url = %config.api_url, "starting storefront");

    let api = HttpShopApi::new(&config.api_url, config.request_timeout())?;
    let shop = storefront::initialize(&config);
    let mut view = ConsoleRenderer::new(std::io::stdout(), shop.bus().clone(), config.theme());

    shop.start();
    shop.pump(&api, &mut view).await?;
    view.notice("Type `help` for commands.")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let flow = match line
            .parse::<Command>()
            .and_then(|command| dispatch(command, shop.bus(), shop.state(), &mut view))
        {
            Ok(flow) => flow,
            Err(e) => {
                tracing::debug!(error = %e, line = %line, "command failed");
                view.error(&e.to_string())?;
                Flow::Continue
            }
        };

        shop.pump(&api, &mut view).await?;

        if flow == Flow::Quit {
            break;
        }
    }

    tracing::info!("storefront closed");
    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("storefront: trace export shutdown failed: {e}");
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("storefront: {e}");
            ExitCode::FAILURE
        }
    }
}
