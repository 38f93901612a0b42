use egostrategy_dashboard::api::marketstack::MarketstackClient;
use egostrategy_dashboard::config::Config;
use egostrategy_dashboard::models::chart::ChartKind;
use egostrategy_dashboard::render::backend::{ChartBackend, HtmlFileBackend, TerminalBackend};
use egostrategy_dashboard::services::dashboard::{ChartView, Dashboard, QueryPanel, ViewState};

use anyhow::{anyhow, Context};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

type CliDashboard = Dashboard<MarketstackClient, Box<dyn ChartBackend>>;

const SHELL_HELP: &str = "\
Commands:
  open <file>          load a CSV file and chart it
  type <line|bar|pie>  change the chart type
  update               redraw the chart with the current type
  query <symbol>       fetch end-of-day prices (a bare symbol works too)
  help                 show this help
  quit                 leave the shell";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("ChartDashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .author("DataHub Team")
        .about("Chart CSV files or recent stock prices")
        .arg(
            Arg::with_name("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("HTML page to write the chart to")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("terminal")
                .long("terminal")
                .help("Draw charts in the terminal instead of an HTML page")
                .takes_value(false)
                .global(true),
        )
        .arg(
            Arg::with_name("type")
                .short('t')
                .long("type")
                .value_name("TYPE")
                .help("Chart type (line, bar, pie)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("api-key")
                .long("api-key")
                .value_name("KEY")
                .help("Market data access key (defaults to MARKETSTACK_ACCESS_KEY)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Market data API base URL")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Market data request timeout (no timeout by default)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for series colours")
                .takes_value(true)
                .global(true),
        );

    // 添加子命令
    let app = app
        .subcommand(
            SubCommand::with_name("chart")
                .about("Chart the columns of a CSV file")
                .arg(
                    Arg::with_name("file")
                        .short('f')
                        .long("file")
                        .value_name("FILE")
                        .help("CSV file; the first column is used as labels")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("quote")
                .about("Chart the last 30 closing prices of a stock")
                .arg(
                    Arg::with_name("symbol")
                        .short('s')
                        .long("symbol")
                        .value_name("SYMBOL")
                        .help("Stock ticker symbol")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(SubCommand::with_name("shell").about("Interactive dashboard session"));

    let matches = app.get_matches();

    match matches.subcommand() {
        Some(("chart", sub)) => {
            let mut dashboard = build_dashboard(sub)?;
            let file = sub.value_of("file").context("missing --file")?;
            dashboard.upload_file(Path::new(file));
            print_view(dashboard.view(), dashboard.chart_kind());
            if let Some(banner) = &dashboard.view().banner {
                return Err(anyhow!(banner.clone()));
            }
        }
        Some(("quote", sub)) => {
            let mut dashboard = build_dashboard(sub)?;
            let symbol = sub.value_of("symbol").context("missing --symbol")?;
            dashboard.submit_query(symbol).await;
            print_view(dashboard.view(), dashboard.chart_kind());
            if let QueryPanel::Error(message) = &dashboard.view().query_panel {
                return Err(anyhow!(message.clone()));
            }
        }
        Some(("shell", sub)) => {
            let dashboard = build_dashboard(sub)?;
            run_shell(dashboard).await?;
        }
        _ => {
            info!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}

fn build_dashboard(matches: &ArgMatches) -> anyhow::Result<CliDashboard> {
    let mut config = Config::from_env();
    if let Some(key) = matches.value_of("api-key") {
        config = config.with_access_key(key);
    }
    if let Some(url) = matches.value_of("base-url") {
        config = config.with_api_base_url(url);
    }
    if let Some(output) = matches.value_of("output") {
        config = config.with_output_path(output);
    }
    if let Some(kind) = matches.value_of("type") {
        config = config.with_default_chart_kind(kind.parse::<ChartKind>()?);
    }
    if let Some(secs) = matches.value_of("timeout") {
        let secs = secs.parse::<u64>().context("--timeout must be a whole number of seconds")?;
        config = config.with_request_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(seed) = matches.value_of("seed") {
        let seed = seed.parse::<u64>().context("--seed must be an unsigned integer")?;
        config = config.with_color_seed(Some(seed));
    }

    let backend: Box<dyn ChartBackend> = if matches.is_present("terminal") {
        Box::new(TerminalBackend::stdout())
    } else {
        Box::new(HtmlFileBackend::new(config.output_path.clone()))
    };
    info!("Using {} chart backend", backend.name());

    let api = MarketstackClient::new(&config)?;
    Ok(Dashboard::new(&config, api, backend))
}

async fn run_shell(mut dashboard: CliDashboard) -> anyhow::Result<()> {
    println!("{}", SHELL_HELP);
    print_view(dashboard.view(), dashboard.chart_kind());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", SHELL_HELP);
                continue;
            }
            "open" => dashboard.upload_file(Path::new(rest)),
            "type" => match rest.parse::<ChartKind>() {
                Ok(kind) => dashboard.change_chart_kind(kind),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            "update" => dashboard.update_chart(),
            "query" => dashboard.submit_query(rest).await,
            // 直接回车提交的内容按股票代码处理
            _ => dashboard.submit_query(line).await,
        }
        print_view(dashboard.view(), dashboard.chart_kind());
    }

    Ok(())
}

fn print_view(view: &ViewState, kind: ChartKind) {
    if let Some(name) = &view.file_name {
        println!("File: {}", name);
    }
    if let Some(banner) = &view.banner {
        println!("[error] {}", banner);
    }
    match view.chart {
        ChartView::NoData => println!("No data to display. Upload a CSV file or query a stock."),
        ChartView::HasChart => println!("Showing {} chart", kind),
    }
    match &view.query_panel {
        QueryPanel::Hidden => {}
        QueryPanel::Loading(message) => println!("{}", message),
        QueryPanel::Error(message) => println!("[error] {}", message),
        QueryPanel::Success { message, detail } => {
            println!("{}", message);
            println!("{}", detail);
        }
    }
}
