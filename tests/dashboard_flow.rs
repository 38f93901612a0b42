use async_trait::async_trait;
use egostrategy_dashboard::api::base::StockApi;
use egostrategy_dashboard::api::marketstack::interpret_eod_response;
use egostrategy_dashboard::config::Config;
use egostrategy_dashboard::models::chart::{CellValue, ChartKind};
use egostrategy_dashboard::models::stock::EodResponse;
use egostrategy_dashboard::render::backend::{ChartBackend, ChartHandle, HtmlFileBackend};
use egostrategy_dashboard::render::chart_config::ChartConfig;
use egostrategy_dashboard::services::dashboard::{ChartView, Dashboard, QueryPanel};
use egostrategy_dashboard::{DashboardError, Result};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// 按代码返回预设 HTTP 响应的行情源
#[derive(Default)]
struct FakeApi {
    replies: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn reply(mut self, symbol: &str, status: u16, body: &str) -> Self {
        self.replies.insert(symbol.to_string(), (status, body.to_string()));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockApi for FakeApi {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_eod(&self, symbol: &str) -> Result<EodResponse> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let (status, body) = self
            .replies
            .get(symbol)
            .cloned()
            .unwrap_or((404, r#"{"error":{"message":"not found"}}"#.to_string()));
        interpret_eod_response(status, &body, symbol)
    }
}

#[derive(Default)]
struct RecordingBackend {
    next: u64,
    live: HashSet<ChartHandle>,
    configs: Vec<ChartConfig>,
    /// 创建次数达到该值后开始失败
    fail_after: Option<usize>,
}

impl ChartBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle> {
        if self.fail_after.is_some_and(|n| self.configs.len() >= n) {
            return Err(DashboardError::DataError("canvas unavailable".to_string()));
        }
        self.next += 1;
        let handle = ChartHandle::new(self.next);
        self.live.insert(handle);
        self.configs.push(config.clone());
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) -> Result<()> {
        assert!(self.live.remove(&handle), "destroyed unknown chart {:?}", handle);
        Ok(())
    }
}

const AAPL_BODY: &str = r#"{"data":[
    {"date":"2024-01-02T00:00:00+0000","open":184.0,"high":186.0,"low":183.0,"close":185.5,
     "volume":1000000,"symbol":"AAPL","name":"Apple Inc","exchange":"XNAS",
     "exchange_code":"NASDAQ","price_currency":"USD"},
    {"date":"2024-01-01T00:00:00+0000","close":182.0,"symbol":"AAPL"}
]}"#;

const MSFT_BODY: &str = r#"{"data":[{"date":"2024-01-02","close":370.0,"symbol":"MSFT"}]}"#;

fn dashboard(api: FakeApi) -> Dashboard<FakeApi, RecordingBackend> {
    let config = Config::new().with_color_seed(Some(42));
    Dashboard::new(&config, api, RecordingBackend::default())
}

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn live_charts(d: &Dashboard<FakeApi, RecordingBackend>) -> usize {
    d.renderer().backend().live.len()
}

#[test]
fn csv_upload_charts_every_column() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "sales.csv", "Month,Revenue,Cost\nJan,100,80\nFeb,120,90\n");
    let mut d = dashboard(FakeApi::default());

    d.upload_file(&path);

    assert_eq!(d.view().chart, ChartView::HasChart);
    assert_eq!(d.view().file_name.as_deref(), Some("sales.csv"));
    assert!(d.view().banner.is_none());
    let series = d.session().series().unwrap();
    assert_eq!(series.labels, vec!["Jan", "Feb"]);
    assert_eq!(series.series[0].name, "Revenue");
    assert_eq!(series.series[0].values, vec![CellValue::Number(100.0), CellValue::Number(120.0)]);
    assert_eq!(series.series[1].name, "Cost");
    assert_eq!(series.series[1].values, vec![CellValue::Number(80.0), CellValue::Number(90.0)]);
    assert_eq!(live_charts(&d), 1);
    assert_eq!(d.renderer().backend().configs[0].kind, ChartKind::Line);
}

#[test]
fn empty_csv_shows_banner_and_keeps_no_data() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "empty.csv", "Month,Revenue\n");
    let mut d = dashboard(FakeApi::default());

    d.upload_file(&path);

    assert_eq!(d.view().chart, ChartView::NoData);
    assert_eq!(d.view().banner.as_deref(), Some("The uploaded CSV file is empty"));
    assert!(d.session().series().is_none());
    assert_eq!(live_charts(&d), 0);
}

#[test]
fn malformed_csv_keeps_previous_chart() {
    let dir = TempDir::new().unwrap();
    let good = write_csv(&dir, "good.csv", "k,v\na,1\nb,2\n");
    let bad = write_csv(&dir, "bad.csv", "k,v\na,1,9\n");
    let mut d = dashboard(FakeApi::default());

    d.upload_file(&good);
    let before = d.session().clone();
    d.upload_file(&bad);

    assert_eq!(d.view().chart, ChartView::HasChart);
    let banner = d.view().banner.clone().unwrap();
    assert!(banner.starts_with("Error parsing CSV file: "), "{}", banner);
    assert_eq!(d.session(), &before);
    assert_eq!(live_charts(&d), 1);
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut d = dashboard(FakeApi::default());
    d.upload_file(&dir.path().join("nope.csv"));
    assert!(d.view().banner.as_deref().unwrap().starts_with("Error reading file"));
    assert_eq!(d.view().chart, ChartView::NoData);
}

#[test]
fn chart_type_change_reuses_retained_data() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "pie.csv", "k,v\na,1\nb,2\nc,3\n");
    let mut d = dashboard(FakeApi::default());
    d.upload_file(&path);
    // 文件删除后仍能重绘，说明没有重新解析
    std::fs::remove_file(&path).unwrap();

    d.change_chart_kind(ChartKind::Pie);

    assert_eq!(d.view().chart, ChartView::HasChart);
    assert_eq!(d.chart_kind(), ChartKind::Pie);
    let configs = &d.renderer().backend().configs;
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[1].kind, ChartKind::Pie);
    assert_eq!(live_charts(&d), 1);
}

#[test]
fn update_twice_leaves_one_live_chart() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "s.csv", "k,v,w\na,1,2\nb,2,3\n");
    let mut d = dashboard(FakeApi::default());
    d.upload_file(&path);
    d.change_chart_kind(ChartKind::Bar);

    d.update_chart();
    d.update_chart();

    assert_eq!(live_charts(&d), 1);
    let configs = &d.renderer().backend().configs;
    assert_eq!(configs.len(), 4);
    assert_eq!(configs[2], configs[3]);
    assert_eq!(configs[3].options["scales"]["y"]["stacked"], true);
}

#[test]
fn single_column_csv_shows_empty_state() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "labels.csv", "name\nx\ny\n");
    let mut d = dashboard(FakeApi::default());

    d.upload_file(&path);

    assert_eq!(d.view().chart, ChartView::NoData);
    assert!(d.view().banner.is_none());
    assert!(d.session().series().is_some());
    assert_eq!(live_charts(&d), 0);
}

#[test]
fn update_without_data_is_a_no_op() {
    let mut d = dashboard(FakeApi::default());
    d.update_chart();
    assert_eq!(d.view().chart, ChartView::NoData);
    assert!(d.view().banner.is_none());
    assert_eq!(live_charts(&d), 0);
}

#[tokio::test]
async fn stock_query_charts_closing_prices() {
    let mut d = dashboard(FakeApi::default().reply("AAPL", 200, AAPL_BODY));
    d.change_chart_kind(ChartKind::Bar);

    d.submit_query("  aapl ").await;

    assert_eq!(d.api().calls(), vec!["AAPL"]);
    assert_eq!(d.view().chart, ChartView::HasChart);
    assert_eq!(d.chart_kind(), ChartKind::Line);
    let series = d.session().series().unwrap();
    assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02"]);
    assert_eq!(series.series.len(), 1);
    assert_eq!(series.series[0].name, "AAPL Closing Price");
    assert_eq!(series.series[0].values, vec![CellValue::Number(182.0), CellValue::Number(185.5)]);

    match &d.view().query_panel {
        QueryPanel::Success { message, detail } => {
            assert_eq!(message, "Successfully loaded data for AAPL");
            assert_eq!(detail.title, "Apple Inc (AAPL)");
            assert_eq!(detail.price, "$185.50");
            assert_eq!(detail.date, "January 2, 2024");
        }
        other => panic!("unexpected panel {:?}", other),
    }
    assert_eq!(live_charts(&d), 1);
}

#[tokio::test]
async fn invalid_symbol_leaves_chart_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "s.csv", "k,v\na,1\n");
    let api = FakeApi::default().reply(
        "ZZZZ",
        422,
        r#"{"error":{"code":"validation_error","message":"Request failed with validation error"}}"#,
    );
    let mut d = dashboard(api);
    d.upload_file(&path);
    let before = d.session().clone();

    d.submit_query("zzzz").await;

    assert_eq!(
        d.view().query_panel,
        QueryPanel::Error(
            "Error: Invalid stock symbol: ZZZZ. Please check the symbol and try again.".to_string()
        )
    );
    assert_eq!(d.view().chart, ChartView::HasChart);
    assert_eq!(d.session(), &before);
    assert_eq!(live_charts(&d), 1);
}

#[tokio::test]
async fn quota_error_in_success_body() {
    let api = FakeApi::default().reply(
        "AAPL",
        200,
        r#"{"error":{"code":"usage_limit_reached","message":"Your monthly usage limit has been reached."}}"#,
    );
    let mut d = dashboard(api);
    d.submit_query("AAPL").await;
    assert_eq!(
        d.view().query_panel,
        QueryPanel::Error("Error: API rate limit exceeded. Please try again later.".to_string())
    );
    assert_eq!(d.view().chart, ChartView::NoData);
}

#[tokio::test]
async fn empty_payload_reports_no_data() {
    let mut d = dashboard(FakeApi::default().reply("IBM", 200, r#"{"data":[]}"#));
    d.submit_query("ibm").await;
    assert_eq!(
        d.view().query_panel,
        QueryPanel::Error("Error: No data found for symbol: IBM".to_string())
    );
}

#[tokio::test]
async fn blank_query_never_reaches_the_api() {
    let mut d = dashboard(FakeApi::default());
    d.submit_query("   ").await;
    assert!(d.api().calls().is_empty());
    assert_eq!(
        d.view().query_panel,
        QueryPanel::Error("Please enter a stock symbol".to_string())
    );
}

#[test]
fn loading_message_while_in_flight() {
    let mut d = dashboard(FakeApi::default());
    let ticket = d.begin_query("msft").unwrap();
    assert_eq!(ticket.symbol(), "MSFT");
    assert_eq!(
        d.view().query_panel,
        QueryPanel::Loading("Fetching data for MSFT...".to_string())
    );
}

#[test]
fn late_response_from_older_query_is_discarded() {
    let mut d = dashboard(FakeApi::default());
    let first = d.begin_query("aapl").unwrap();
    let second = d.begin_query("msft").unwrap();

    let msft = interpret_eod_response(200, MSFT_BODY, "MSFT");
    assert!(d.complete_query(second, msft));
    let aapl = interpret_eod_response(200, AAPL_BODY, "AAPL");
    assert!(!d.complete_query(first, aapl));

    let series = d.session().series().unwrap();
    assert_eq!(series.series[0].name, "MSFT Closing Price");
    match &d.view().query_panel {
        QueryPanel::Success { message, .. } => {
            assert_eq!(message, "Successfully loaded data for MSFT")
        }
        other => panic!("unexpected panel {:?}", other),
    }
    assert_eq!(live_charts(&d), 1);
}

#[test]
fn html_backend_holds_a_single_page() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "s.csv", "k,v\na,1\nb,2\n");
    let page = dir.path().join("chart.html");
    let config = Config::new()
        .with_color_seed(Some(1))
        .with_output_path(&page);
    let mut d = Dashboard::new(&config, FakeApi::default(), HtmlFileBackend::new(&page));

    d.upload_file(&csv);
    assert!(page.exists());
    d.change_chart_kind(ChartKind::Bar);

    let html = std::fs::read_to_string(&page).unwrap();
    assert!(html.contains(r#""type":"bar""#));
    assert!(d.renderer().backend().live().is_some());
}

#[tokio::test]
async fn banner_clears_after_next_successful_draw() {
    let dir = TempDir::new().unwrap();
    let good = write_csv(&dir, "good.csv", "k,v\na,1\nb,2\n");
    let bad = write_csv(&dir, "bad.csv", "k,v\na,1,9\n");
    let mut d = dashboard(FakeApi::default().reply("MSFT", 200, MSFT_BODY));

    d.upload_file(&good);
    d.upload_file(&bad);
    assert!(d.view().banner.is_some());

    d.change_chart_kind(ChartKind::Bar);
    assert!(d.view().banner.is_none());

    d.upload_file(&bad);
    assert!(d.view().banner.is_some());
    d.submit_query("msft").await;
    assert!(d.view().banner.is_none());
    assert_eq!(d.view().chart, ChartView::HasChart);
}

#[test]
fn blank_query_cancels_query_in_flight() {
    let mut d = dashboard(FakeApi::default());
    let pending = d.begin_query("msft").unwrap();
    assert!(d.begin_query("   ").is_none());

    let msft = interpret_eod_response(200, MSFT_BODY, "MSFT");
    assert!(!d.complete_query(pending, msft));
    assert_eq!(
        d.view().query_panel,
        QueryPanel::Error("Please enter a stock symbol".to_string())
    );
    assert!(d.session().series().is_none());
}

#[test]
fn failed_render_does_not_commit_new_data() {
    let dir = TempDir::new().unwrap();
    let first = write_csv(&dir, "first.csv", "k,v\na,1\nb,2\n");
    let second = write_csv(&dir, "second.csv", "k,w\nx,5\n");
    let backend = RecordingBackend {
        fail_after: Some(1),
        ..Default::default()
    };
    let config = Config::new().with_color_seed(Some(42));
    let mut d = Dashboard::new(&config, FakeApi::default(), backend);

    d.upload_file(&first);
    assert_eq!(d.session().chart(), d.renderer().backend().live.iter().next().copied());
    let before = d.session().series().cloned();

    d.upload_file(&second);

    let banner = d.view().banner.clone().unwrap();
    assert_eq!(banner, "Error rendering chart: Data error: canvas unavailable");
    assert_eq!(d.session().series().cloned(), before);
    assert_eq!(d.session().chart(), None);
    assert_eq!(d.view().chart, ChartView::NoData);
    assert_eq!(live_charts(&d), 0);
}

