//! 订单分页 - 业务能力层
//!
//! 先取第一页得到 `total_orders`，再以上一页最后一个订单号为游标逐页获取。
//! 遇到以下情况停止：
//! - 计划页数取完
//! - 某页返回空列表（正常结束）
//! - 请求失败（连接错误只重试一次）
//!
//! 已经取到的结果在中止时保留

use crate::config::Config;
use crate::error::{FetchError, PageFetchError};
use crate::models::{OrderId, OrderTables, OrdersPage};
use crate::services::order_extractor::extract;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// 订单页数据来源
pub trait OrderPageSource {
    /// 获取一页订单，`cursor` 为 `None` 时取第一页
    fn fetch_page(
        &self,
        cursor: Option<&OrderId>,
    ) -> impl Future<Output = Result<OrdersPage, FetchError>>;
}

/// 每处理完一页回调一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    pub page: u64,
    pub pages: u64,
    pub orders_so_far: usize,
}

/// 分页停止的原因
#[derive(Debug)]
pub enum StopReason {
    /// 用户没有任何订单
    NoOrders,
    /// 计划的页数全部取完
    Exhausted,
    /// 某页返回空列表
    EmptyPage { page: u64 },
    /// 请求失败，分页中止
    Failed(PageFetchError),
}

/// 分页结果
#[derive(Debug)]
pub struct PaginationOutcome {
    pub tables: OrderTables,
    pub total_orders: u64,
    pub pages_planned: u64,
    /// 返回了订单的页数，空页不计
    pub pages_fetched: u64,
    pub stop: StopReason,
}

impl PaginationOutcome {
    /// 中止分页的错误（如果有）
    pub fn error(&self) -> Option<&PageFetchError> {
        match &self.stop {
            StopReason::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn aborted(err: PageFetchError) -> Self {
        Self {
            tables: OrderTables::default(),
            total_orders: 0,
            pages_planned: 0,
            pages_fetched: 0,
            stop: StopReason::Failed(err),
        }
    }
}

/// 订单分页器
pub struct OrderPaginator {
    page_size: u64,
    page_delay: Duration,
    retry_backoff: Duration,
}

impl OrderPaginator {
    pub fn new(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            page_delay: config.page_delay(),
            retry_backoff: config.retry_backoff(),
        }
    }

    /// 根据订单总数计算页数（向上取整）
    pub fn page_count(&self, total_orders: u64) -> u64 {
        total_orders.div_ceil(self.page_size.max(1))
    }

    /// 取完全部订单
    ///
    /// # 参数
    /// - `source`: 已登录的订单来源
    /// - `on_progress`: 每页处理完成后的进度回调
    pub async fn run<S, F>(&self, source: &S, mut on_progress: F) -> PaginationOutcome
    where
        S: OrderPageSource,
        F: FnMut(&PageProgress),
    {
        info!("📥 正在获取订单...");

        let first = match self.fetch_with_retry(source, None, 1).await {
            Ok(page) => page,
            Err(err) => {
                error!("❌ 无法获取订单: {}", err);
                return PaginationOutcome::aborted(err);
            }
        };

        if first.orders.is_empty() {
            info!("ℹ️ 没有任何订单，无需继续获取");
            return PaginationOutcome {
                tables: OrderTables::default(),
                total_orders: first.total_orders,
                pages_planned: 0,
                pages_fetched: 0,
                stop: StopReason::NoOrders,
            };
        }

        let total_orders = first.total_orders;
        // 第一页已有数据时至少算一页
        let pages = self.page_count(total_orders).max(1);
        info!("✓ 共 {} 个订单，分 {} 页获取", total_orders, pages);

        let mut tables = extract(&first.orders);
        let mut cursor = first.last_order_id().cloned();
        let mut pages_fetched = 1;
        on_progress(&PageProgress {
            page: 1,
            pages,
            orders_so_far: tables.orders.len(),
        });

        let mut stop = StopReason::Exhausted;
        for page in 2..=pages {
            sleep(self.page_delay).await;

            debug!("第 {}/{} 页，游标: {:?}", page, pages, cursor);
            let fetched = match self.fetch_with_retry(source, cursor.as_ref(), page).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    error!("❌ 获取第 {} 页失败，保留已获取的数据: {}", page, err);
                    stop = StopReason::Failed(err);
                    break;
                }
            };

            if fetched.orders.is_empty() {
                info!("ℹ️ 第 {} 页为空，没有更多订单", page);
                stop = StopReason::EmptyPage { page };
                break;
            }

            pages_fetched += 1;
            cursor = fetched.last_order_id().cloned();
            tables.append(extract(&fetched.orders));
            on_progress(&PageProgress {
                page,
                pages,
                orders_so_far: tables.orders.len(),
            });
        }

        PaginationOutcome {
            tables,
            total_orders,
            pages_planned: pages,
            pages_fetched,
            stop,
        }
    }

    /// 获取一页，连接错误时等待后重试一次
    async fn fetch_with_retry<S: OrderPageSource>(
        &self,
        source: &S,
        cursor: Option<&OrderId>,
        page: u64,
    ) -> Result<OrdersPage, PageFetchError> {
        match source.fetch_page(cursor).await {
            Ok(fetched) => Ok(fetched),
            Err(err) if err.is_connection() => {
                warn!(
                    "第 {} 页连接失败，{:?} 后重试: {}",
                    page, self.retry_backoff, err
                );
                sleep(self.retry_backoff).await;
                source
                    .fetch_page(cursor)
                    .await
                    .map_err(|source| PageFetchError { page, source })
            }
            Err(source) => Err(PageFetchError { page, source }),
        }
    }
}
