use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use client_core::{AdminClient, ClientOptions, Resource};
use dashboard::{event_channel, page::RowId, pages, render, CrudPage, DashboardEvent};
use grid::{GridRow, LoadOutcome, QueryState};
use shared::protocol::{Filters, Pagination};
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "admin", about = "Browse and edit admin dashboard tables")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the API base URL from config and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(value_enum)]
    page: PageKind,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PageKind {
    Coupon,
    Document,
    Node,
    SubscribeGroup,
    User,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        /// Repeatable `key=value` filter.
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },
    Create {
        #[arg(long)]
        json: String,
    },
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        json: String,
        /// Page the row is listed on.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(group(ArgGroup::new("state").required(true).args(["on", "off"])))]
    Toggle {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        on: bool,
        #[arg(long)]
        off: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
    BatchDelete {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_base_url = url;
    }
    info!(api = %settings.api_base_url, page = ?cli.page, "admin starting");

    let client = AdminClient::with_options(
        settings.api_base_url.clone(),
        ClientOptions {
            token: settings.api_token.clone(),
            timeout: Some(settings.request_timeout()),
        },
    )?;
    let (events, _) = event_channel();
    let size = settings.page_size;

    match cli.page {
        PageKind::Coupon => run(pages::coupon_page(&client, size, events), cli.command).await,
        PageKind::Document => run(pages::document_page(&client, size, events), cli.command).await,
        PageKind::Node => run(pages::node_page(&client, size, events), cli.command).await,
        PageKind::SubscribeGroup => {
            run(pages::subscribe_group_page(&client, size, events), cli.command).await
        }
        PageKind::User => run(pages::user_page(&client, size, events), cli.command).await,
    }
}

async fn run<R>(page: CrudPage<R>, command: Command) -> Result<()>
where
    R: Resource,
    R::Row: GridRow,
    RowId<R>: From<i64>,
{
    let mut notices = page.subscribe_events();
    let default_size = page.grid().snapshot().await.query.size();

    let result = match command {
        Command::List {
            page: number,
            size,
            filters,
        } => {
            let query = QueryState {
                pagination: Pagination::new(number, size.unwrap_or(default_size)),
                filters: filters.into_iter().collect::<Filters>(),
            };
            fail_on_load_error(page.grid().set_query(query).await)
        }
        Command::Create { json } => {
            let values = serde_json::from_str(&json).context("--json is not valid JSON")?;
            page.submit_create(values).await.map(drop).map_err(Into::into)
        }
        Command::Update {
            id,
            json,
            page: number,
        } => {
            let values = serde_json::from_str(&json).context("--json is not valid JSON")?;
            fail_on_load_error(page.grid().set_page(number).await)?;
            page.submit_update(id.into(), values)
                .await
                .map(drop)
                .map_err(Into::into)
        }
        Command::Toggle {
            id,
            on,
            off: _,
            page: number,
        } => {
            fail_on_load_error(page.grid().set_page(number).await)?;
            page.toggle(id.into(), on).await.map(drop).map_err(Into::into)
        }
        Command::Delete { id } => page.delete(id.into()).await.map(drop).map_err(Into::into),
        Command::BatchDelete { ids } => {
            for id in ids {
                page.grid().toggle_select(id.into()).await;
            }
            page.batch_delete().await.map(drop).map_err(Into::into)
        }
    };

    print_notices(&mut notices);
    result?;
    println!("{}", render::report(&page.render().await));
    Ok(())
}

fn fail_on_load_error(outcome: LoadOutcome) -> Result<()> {
    match outcome {
        LoadOutcome::Failed(err) => Err(err.into()),
        LoadOutcome::Applied | LoadOutcome::Superseded => Ok(()),
    }
}

fn print_notices(notices: &mut broadcast::Receiver<DashboardEvent>) {
    while let Ok(event) = notices.try_recv() {
        match event {
            DashboardEvent::Success { message, .. } => println!("{message}"),
            DashboardEvent::Error { page, message } => eprintln!("{page}: {message}"),
        }
    }
}
