//! Command surface of the `gridview` binary.
//!
//! [`run`] executes one parsed [`Cli`] against either the configured
//! settings API or an offline store file and returns the JSON document the
//! binary prints.

mod offline;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};

use gridview_client::{ClientConfig, HttpSettingsBackend, SettingsBackend};
use gridview_core::codec;
use gridview_core::snapshot::ViewKind;
use gridview_core::types::{DbId, UserId};
use gridview_views::{NewView, SettingsStore};

use crate::offline::OfflineStore;

#[derive(Debug, Parser)]
#[command(name = "gridview")]
#[command(about = "Saved grid views operations CLI")]
pub struct Cli {
    /// Keep views in this JSON file instead of calling the settings API.
    #[arg(long, global = true, value_name = "FILE")]
    pub offline: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the saved views of a page.
    List {
        #[arg(long, value_enum)]
        kind: KindCli,
        #[arg(long)]
        page: String,
    },
    /// Save a payload as a new view.
    Save {
        #[arg(long, value_enum)]
        kind: KindCli,
        #[arg(long)]
        page: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// File holding the payload JSON, or `-` for stdin.
        #[arg(long)]
        payload: PathBuf,
    },
    /// Delete a saved view.
    Delete {
        #[arg(long, value_enum)]
        kind: KindCli,
        #[arg(long)]
        page: String,
        #[arg(long)]
        id: DbId,
    },
    /// Make a view the only default of its page.
    Default {
        #[arg(long, value_enum)]
        kind: KindCli,
        #[arg(long)]
        page: String,
        #[arg(long)]
        id: DbId,
    },
    /// Compress a grid-state JSON document into a share token.
    Encode {
        /// File holding the JSON, or `-` for stdin.
        input: PathBuf,
    },
    /// Expand a share token back into JSON.
    Decode { token: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindCli {
    Columns,
    Filters,
}

impl From<KindCli> for ViewKind {
    fn from(kind: KindCli) -> Self {
        match kind {
            KindCli::Columns => ViewKind::Columns,
            KindCli::Filters => ViewKind::Filters,
        }
    }
}

/// Execute `cli`. `stdin` is read when a path argument is `-`.
pub async fn run<R: Read>(cli: Cli, config: &ClientConfig, stdin: R) -> anyhow::Result<Value> {
    match cli.command {
        Commands::Encode { input } => {
            let state: Value = serde_json::from_str(&read_input(&input, stdin)?)
                .context("input is not valid JSON")?;
            let token = codec::compress(&state)?;
            Ok(json!({ "param": codec::SHARE_PARAM, "token": token }))
        }
        Commands::Decode { token } => {
            Ok(codec::try_decompress::<Value>(&token).context("token could not be decoded")?)
        }
        command => {
            let user_id = config.require_user()?;
            let offline = cli.offline.as_deref().map(OfflineStore::open).transpose()?;
            let backend: Arc<dyn SettingsBackend> = match &offline {
                Some(store) => store.backend(),
                None => {
                    tracing::info!(api_url = %config.api_url, "Using settings API");
                    Arc::new(HttpSettingsBackend::new(config)?)
                }
            };

            let output = run_view_command(command, backend, user_id, stdin).await?;
            if let Some(store) = &offline {
                store.persist()?;
            }
            Ok(output)
        }
    }
}

async fn run_view_command<R: Read>(
    command: Commands,
    backend: Arc<dyn SettingsBackend>,
    user_id: UserId,
    stdin: R,
) -> anyhow::Result<Value> {
    match command {
        Commands::List { kind, page } => {
            let store = open_store(backend, kind.into(), user_id, &page).await?;
            Ok(json!({
                "own": store.snapshots(),
                "shared": store.shared(),
                "default": store.resolve_active(None).map(|(s, _)| s.id),
            }))
        }
        Commands::Save {
            kind,
            page,
            name,
            description,
            payload,
        } => {
            let payload = read_input(&payload, stdin)?;
            serde_json::from_str::<Value>(&payload).context("payload is not valid JSON")?;
            let mut store = open_store(backend, kind.into(), user_id, &page).await?;
            let saved = store
                .save(NewView {
                    name,
                    description,
                    payload,
                    all_state: None,
                })
                .await?;
            Ok(serde_json::to_value(saved)?)
        }
        Commands::Delete { kind, page, id } => {
            let mut store = open_store(backend, kind.into(), user_id, &page).await?;
            store.remove(id).await?;
            Ok(json!({ "deleted": id }))
        }
        Commands::Default { kind, page, id } => {
            let mut store = open_store(backend, kind.into(), user_id, &page).await?;
            store.set_default(id).await?;
            Ok(json!({ "default": id }))
        }
        Commands::Encode { .. } | Commands::Decode { .. } => {
            anyhow::bail!("not a saved view command")
        }
    }
}

/// Load `page` into a fresh store.
async fn open_store(
    backend: Arc<dyn SettingsBackend>,
    kind: ViewKind,
    user_id: UserId,
    page: &str,
) -> anyhow::Result<SettingsStore> {
    let mut store = SettingsStore::new(backend, kind, user_id);
    store
        .load_for_page(page)
        .await
        .with_context(|| format!("failed to load {kind} views for page '{page}'"))?;
    Ok(store)
}

fn read_input<R: Read>(path: &Path, mut stdin: R) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
