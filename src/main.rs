use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use feed_chart::{ChartConfig, ChartEvent, ChartView, FetchTicket, ScaleMode, SvgFileTarget, Viewport};

#[derive(Parser, Debug)]
#[command(name = "feed-chart")]
#[command(about = "Polls a tab-separated metric feed and keeps an SVG chart of it up to date")]
struct Args {
    /// URL of the feed (`timestamp<TAB>value` per line)
    #[arg(short, long)]
    url: String,

    /// SVG file rewritten after every render pass
    #[arg(short, long, default_value = "chart.svg")]
    output: PathBuf,

    /// JSON chart configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1200.0)]
    width: f32,

    #[arg(long, default_value_t = 700.0)]
    height: f32,

    /// Initial scale mode: 0/linear or 1/log
    #[arg(short, long, default_value = "linear")]
    mode: String,

    /// Fetch and render once, then exit
    #[arg(long)]
    once: bool,
}

/// Line commands read from stdin while polling.
#[derive(Debug, PartialEq)]
enum Command {
    Mode(ScaleMode),
    Resize(Viewport),
    Refresh,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "resize" => {
            let width = words.next()?.parse().ok()?;
            let height = words.next()?.parse().ok()?;
            Some(Command::Resize(Viewport::new(width, height)))
        }
        "refresh" => Some(Command::Refresh),
        "quit" | "exit" => Some(Command::Quit),
        other => other.parse().ok().map(Command::Mode),
    }
}

async fn fetch(client: &reqwest::Client, url: &str, ticket: FetchTicket) -> ChartEvent {
    let result = async {
        let response = client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
    .await;
    match result {
        Ok(body) => ChartEvent::DatasetReady { ticket, body },
        Err(err) => ChartEvent::FetchFailed {
            ticket,
            reason: err.to_string(),
        },
    }
}

fn spawn_fetch(
    view: &mut ChartView<SvgFileTarget>,
    client: &reqwest::Client,
    url: &str,
    tx: &mpsc::Sender<ChartEvent>,
) {
    let ticket = view.begin_fetch();
    let client = client.clone();
    let url = url.to_string();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = fetch(&client, &url, ticket).await;
        let _ = tx.send(event).await;
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    let mode: ScaleMode = args.mode.parse().wrap_err("invalid --mode")?;
    let poll_interval = config.poll_interval();
    let target = SvgFileTarget::new(&args.output, Viewport::new(args.width, args.height));
    let mut view = ChartView::new(config, mode, target);
    let client = reqwest::Client::new();

    if args.once {
        let ticket = view.begin_fetch();
        let event = fetch(&client, &args.url, ticket).await;
        view.handle(event);
        return Ok(());
    }

    info!(
        url = %args.url,
        output = %view.target().path().display(),
        ?poll_interval,
        "polling feed"
    );

    let (tx, mut rx) = mpsc::channel::<ChartEvent>(16);
    let mut ticker = tokio::time::interval(poll_interval);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => spawn_fetch(&mut view, &client, &args.url, &tx),
            Some(event) = rx.recv() => view.handle(event),
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(Command::Mode(mode)) => view.handle(ChartEvent::ScaleModeChanged(mode)),
                    Some(Command::Resize(viewport)) => {
                        view.target_mut().resize(viewport);
                        view.handle(ChartEvent::ViewportChanged);
                    }
                    Some(Command::Refresh) => spawn_fetch(&mut view, &client, &args.url, &tx),
                    Some(Command::Quit) => break,
                    None => warn!("unknown command: {line}"),
                },
                Ok(None) => stdin_open = false,
                Err(err) => {
                    warn!("stdin closed: {err}");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }
    Ok(())
}
