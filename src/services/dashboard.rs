use crate::api::base::StockApi;
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::ingest::base::TableIngestor;
use crate::ingest::csv::CsvIngestor;
use crate::models::chart::{ChartKind, ChartSeries};
use crate::models::stock::EodResponse;
use crate::normalize::{normalize_eod, normalize_table};
use crate::render::backend::ChartBackend;
use crate::render::renderer::ChartRenderer;
use crate::services::detail::StockDetail;
use crate::services::session::SessionState;
use crate::util::color_rng;
use log::{error, info, warn};
use rand::rngs::StdRng;
use std::path::Path;

/// 图表区域状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    NoData,
    HasChart,
}

/// 查询结果面板
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPanel {
    Hidden,
    Loading(String),
    Error(String),
    Success { message: String, detail: StockDetail },
}

/// Everything the user currently sees.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub chart: ChartView,
    pub file_name: Option<String>,
    /// 上传或绘图失败时的错误横幅
    pub banner: Option<String>,
    pub query_panel: QueryPanel,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            chart: ChartView::NoData,
            file_name: None,
            banner: None,
            query_panel: QueryPanel::Hidden,
        }
    }
}

/// 一次查询的凭证，只有最新发出的凭证能更新界面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    id: u64,
    symbol: String,
}

impl QueryTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// 看板控制器：把上传、查询、切换图表类型三类用户操作接到数据管道上
///
/// Every error raised below this point is turned into a message on the view;
/// none escapes a handler.
pub struct Dashboard<A: StockApi, B: ChartBackend> {
    api: A,
    ingestor: CsvIngestor,
    renderer: ChartRenderer<B>,
    session: SessionState,
    view: ViewState,
    rng: StdRng,
    issued_queries: u64,
}

impl<A: StockApi, B: ChartBackend> Dashboard<A, B> {
    pub fn new(config: &Config, api: A, backend: B) -> Self {
        Self {
            api,
            ingestor: CsvIngestor::new(),
            renderer: ChartRenderer::new(backend),
            session: SessionState::new(config.default_chart_kind),
            view: ViewState::default(),
            rng: color_rng(config.color_seed),
            issued_queries: 0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.session.kind()
    }

    pub fn renderer(&self) -> &ChartRenderer<B> {
        &self.renderer
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 处理文件上传
    pub fn upload_file(&mut self, path: &Path) {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Loading uploaded file {}", file_name);
        self.view.file_name = Some(file_name);

        let series = match self.load_table(path) {
            Ok(series) => series,
            Err(e) => {
                error!("Upload failed: {}", e);
                // 保持原有图表不变
                self.view.banner = Some(upload_message(&e));
                return;
            }
        };

        let kind = self.session.kind();
        if let Err(e) = self.present(series, kind) {
            error!("Rendering failed: {}", e);
            self.view.banner = Some(format!("Error rendering chart: {}", e));
        }
    }

    fn load_table(&mut self, path: &Path) -> Result<ChartSeries> {
        let table = self.ingestor.ingest_path(path)?;
        if table.is_empty() {
            return Err(DashboardError::EmptyDataError);
        }
        normalize_table(&table, &mut self.rng)
    }

    /// 切换图表类型；已有数据时立即重绘，不重新解析或请求
    pub fn change_chart_kind(&mut self, kind: ChartKind) {
        info!("Chart type changed to {}", kind);
        self.session.set_kind(kind);
        if self.session.series().is_some() {
            self.update_chart();
        }
    }

    /// 使用保留的数据重绘当前图表
    pub fn update_chart(&mut self) {
        let series = match self.session.series() {
            Some(series) => series.clone(),
            None => return,
        };
        let kind = self.session.kind();
        if let Err(e) = self.present(series, kind) {
            error!("Rendering failed: {}", e);
            self.view.banner = Some(format!("Error rendering chart: {}", e));
        }
    }

    /// Draw `series` and commit it to the session only once the chart exists.
    ///
    /// A config failure leaves both the old chart and the old data in place. A
    /// backend failure has already released the old chart, so the view drops to
    /// the empty state while the session keeps the old data for the next redraw.
    fn present(&mut self, series: ChartSeries, kind: ChartKind) -> Result<()> {
        let config = self.renderer.prepare(&series, kind, &mut self.rng)?;

        let previous = self.session.take_chart();
        self.view.chart = ChartView::NoData;
        let handle = self.renderer.show(previous, config.as_ref())?;

        self.session.commit(series, kind, handle);
        if handle.is_some() {
            self.view.chart = ChartView::HasChart;
        }
        self.view.banner = None;
        Ok(())
    }

    /// 查询股票：校验输入、发出请求、应用结果
    pub async fn submit_query(&mut self, query: &str) {
        if let Some(ticket) = self.begin_query(query) {
            let result = self.api.fetch_eod(ticket.symbol()).await;
            self.complete_query(ticket, result);
        }
    }

    /// Validate the query and switch the panel to loading.
    pub fn begin_query(&mut self, query: &str) -> Option<QueryTicket> {
        // 任何新提交都会作废仍在进行的查询
        self.issued_queries += 1;
        let query = query.trim();
        if query.is_empty() {
            self.view.query_panel = QueryPanel::Error("Please enter a stock symbol".to_string());
            return None;
        }

        let symbol = query.to_uppercase();
        self.view.query_panel = QueryPanel::Loading(format!("Fetching data for {}...", symbol));
        info!(
            "Issued query {} for {} via {}",
            self.issued_queries,
            symbol,
            self.api.provider_name()
        );
        Some(QueryTicket {
            id: self.issued_queries,
            symbol,
        })
    }

    /// Apply a finished query. Returns `false` when a newer query was issued
    /// in the meantime and this result was discarded.
    pub fn complete_query(&mut self, ticket: QueryTicket, result: Result<EodResponse>) -> bool {
        if ticket.id != self.issued_queries {
            warn!(
                "Discarding stale response {} for {} (latest is {})",
                ticket.id, ticket.symbol, self.issued_queries
            );
            return false;
        }

        let stock = match result.and_then(|response| normalize_eod(&response, &ticket.symbol)) {
            Ok(stock) => stock,
            Err(e) => {
                error!("Query for {} failed: {}", ticket.symbol, e);
                self.view.query_panel =
                    QueryPanel::Error(format!("Error: {}", classify_query_error(&e, &ticket.symbol)));
                return true;
            }
        };

        // 股票数据固定使用折线图
        if let Err(e) = self.present(stock.series, ChartKind::Line) {
            error!("Rendering failed: {}", e);
            self.view.query_panel = QueryPanel::Error(format!("Error: {}", e));
            return true;
        }

        self.view.query_panel = QueryPanel::Success {
            message: format!("Successfully loaded data for {}", ticket.symbol),
            detail: StockDetail::from_record(&stock.latest),
        };
        true
    }
}

fn upload_message(err: &DashboardError) -> String {
    match err {
        DashboardError::ParseError(message) => format!("Error parsing CSV file: {}", message),
        DashboardError::EmptyDataError => err.to_string(),
        DashboardError::IoError(e) => format!("Error reading file: {}", e),
        other => other.to_string(),
    }
}

/// Maps a query failure to the message shown on the panel.
pub fn classify_query_error(err: &DashboardError, symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    let (status, message) = match err {
        DashboardError::ApiError { status, message } => (Some(*status), message.clone()),
        DashboardError::NoDataError { .. } => {
            return format!("No data found for symbol: {}", symbol);
        }
        other => (None, other.to_string()),
    };

    let lowered = message.to_lowercase();
    let has_status = |code: u16| status == Some(code) || message.contains(&code.to_string());

    if has_status(422) {
        format!(
            "Invalid stock symbol: {}. Please check the symbol and try again.",
            symbol
        )
    } else if lowered.contains("limit") || lowered.contains("quota") {
        "API rate limit exceeded. Please try again later.".to_string()
    } else if has_status(401) {
        "Invalid API key. Please check your API configuration.".to_string()
    } else if has_status(404) {
        format!("No data available for symbol: {}", symbol)
    } else {
        message
    }
}
