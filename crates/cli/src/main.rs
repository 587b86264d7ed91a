//! `gridview` -- operator CLI for saved grid views.
//!
//! Lists, saves, deletes and re-flags saved views against the configured
//! settings API (or an offline store file given with `--offline`), and
//! encodes or decodes share-link tokens. Every command prints JSON to
//! stdout; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable               | Required          | Default                     |
//! |------------------------|-------------------|-----------------------------|
//! | `SETTINGS_API_URL`     | no                | `http://localhost:8080/api` |
//! | `COLUMN_SETTINGS_PATH` | no                | `table-settings`            |
//! | `FILTER_SETTINGS_PATH` | no                | `table-filter-settings`     |
//! | `REQUEST_TIMEOUT_SECS` | no                | `30`                        |
//! | `GRIDVIEW_USER_ID`     | for view commands | --                          |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridview_cli::Cli;
use gridview_client::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gridview=info,gridview_cli=info,gridview_views=info,gridview_client=info,gridview_core=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let output = gridview_cli::run(cli, &config, std::io::stdin().lock()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
