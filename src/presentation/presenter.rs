//! 导出展示
//!
//! 流水线返回的结果表按运行 ID 缓存在这里，预览和导出都从缓存读取

use crate::config::Config;
use crate::error::ExportError;
use crate::models::OrderTables;
use crate::presentation::csv_export::{write_items_csv, write_orders_csv};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ORDERS_FILE: &str = "orders.csv";
pub const ITEMS_FILE: &str = "items.csv";

/// 一次运行的标识，同时用作导出子目录名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// 以当前本地时间生成
    pub fn now() -> Self {
        Self(chrono::Local::now().format("%Y%m%d-%H%M%S").to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 导出的两个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub orders_csv: PathBuf,
    pub items_csv: PathBuf,
}

/// 导出展示器
pub struct ExportPresenter {
    output_dir: PathBuf,
    preview_rows: usize,
    cache: HashMap<RunId, OrderTables>,
}

impl ExportPresenter {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            preview_rows: config.preview_rows,
            cache: HashMap::new(),
        }
    }

    /// 缓存一次运行的结果，同一运行 ID 会被覆盖
    pub fn store(&mut self, run_id: RunId, tables: OrderTables) {
        debug!(
            "缓存运行 {}: {} 个订单, {} 个菜品",
            run_id,
            tables.orders.len(),
            tables.items.len()
        );
        self.cache.insert(run_id, tables);
    }

    pub fn tables(&self, run_id: &RunId) -> Option<&OrderTables> {
        self.cache.get(run_id)
    }

    /// 生成两张表前几行的预览（CSV 文本，带表头）
    pub fn render_preview(&self, run_id: &RunId) -> Result<String, ExportError> {
        let tables = self.lookup(run_id)?;
        let orders_rows = &tables.orders[..tables.orders.len().min(self.preview_rows)];
        let items_rows = &tables.items[..tables.items.len().min(self.preview_rows)];

        let mut orders_buf = Vec::new();
        write_orders_csv(&mut orders_buf, orders_rows).map_err(|source| ExportError::Csv {
            path: ORDERS_FILE.to_string(),
            source,
        })?;
        let mut items_buf = Vec::new();
        write_items_csv(&mut items_buf, items_rows).map_err(|source| ExportError::Csv {
            path: ITEMS_FILE.to_string(),
            source,
        })?;

        Ok(format!(
            "订单示例 ({}/{}):\n{}\n菜品示例 ({}/{}):\n{}",
            orders_rows.len(),
            tables.orders.len(),
            String::from_utf8_lossy(&orders_buf),
            items_rows.len(),
            tables.items.len(),
            String::from_utf8_lossy(&items_buf),
        ))
    }

    /// 把一次运行的结果写成 `<output_dir>/<run_id>/orders.csv` 和 `items.csv`
    pub fn export(&self, run_id: &RunId) -> Result<ExportedFiles, ExportError> {
        let tables = self.lookup(run_id)?;
        let run_dir = self.output_dir.join(run_id.as_str());
        fs::create_dir_all(&run_dir).map_err(|source| ExportError::Io {
            path: run_dir.display().to_string(),
            source,
        })?;

        let orders_csv = run_dir.join(ORDERS_FILE);
        write_file(&orders_csv, |file| write_orders_csv(file, &tables.orders))?;
        let items_csv = run_dir.join(ITEMS_FILE);
        write_file(&items_csv, |file| write_items_csv(file, &tables.items))?;

        info!("💾 已导出 {} 和 {}", orders_csv.display(), items_csv.display());
        Ok(ExportedFiles {
            orders_csv,
            items_csv,
        })
    }

    fn lookup(&self, run_id: &RunId) -> Result<&OrderTables, ExportError> {
        self.cache.get(run_id).ok_or_else(|| ExportError::UnknownRun {
            run_id: run_id.to_string(),
        })
    }
}

fn write_file<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(BufWriter<File>) -> Result<(), csv::Error>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    write(BufWriter::new(file)).map_err(|source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Order, OrderId};

    fn tables(orders: usize) -> OrderTables {
        let mut tables = OrderTables::default();
        for i in 0..orders {
            let order_id = OrderId::new(format!("{}", 1000 + i));
            tables.orders.push(Order {
                order_id: order_id.clone(),
                order_total: Some(format!("{}", 100 + i)),
                restaurant_name: Some("Empire".to_string()),
                order_time: Some("2024-03-01 13:00:00".to_string()),
                rain_mode: i % 2 == 0,
                on_time: true,
                status: "Delivered".to_string(),
            });
            tables.items.push(Item {
                order_id,
                name: Some("Ghee Rice".to_string()),
                is_veg: Some(true),
            });
        }
        tables
    }

    fn presenter(dir: &Path, preview_rows: usize) -> ExportPresenter {
        let config = Config {
            output_dir: dir.display().to_string(),
            preview_rows,
            ..Config::default()
        };
        ExportPresenter::new(&config)
    }

    #[test]
    fn test_export_writes_both_files_under_run_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = presenter(dir.path(), 5);
        let run_id = RunId::new("20240301-130000");
        presenter.store(run_id.clone(), tables(3));

        let files = presenter.export(&run_id).unwrap();

        assert_eq!(files.orders_csv, dir.path().join("20240301-130000").join("orders.csv"));
        let orders = fs::read_to_string(&files.orders_csv).unwrap();
        assert_eq!(orders.lines().count(), 4);
        assert!(orders.starts_with("order_id,order_total,restaurant_name,order_time,rain_mode,on_time\n"));
        let items = fs::read_to_string(&files.items_csv).unwrap();
        assert_eq!(items.lines().next(), Some("order_id,name,is_veg"));
        assert_eq!(items.lines().count(), 4);
    }

    #[test]
    fn test_preview_is_limited() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = presenter(dir.path(), 2);
        let run_id = RunId::new("run");
        presenter.store(run_id.clone(), tables(7));

        let preview = presenter.render_preview(&run_id).unwrap();
        assert!(preview.contains("订单示例 (2/7)"));
        assert!(preview.contains("1001,101,Empire"));
        assert!(!preview.contains("1002,"));
    }

    #[test]
    fn test_unknown_run() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = presenter(dir.path(), 5);
        let run_id = RunId::new("missing");

        assert!(matches!(
            presenter.export(&run_id),
            Err(ExportError::UnknownRun { .. })
        ));
        assert!(presenter.tables(&run_id).is_none());
    }

    #[test]
    fn test_cache_is_keyed_by_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut presenter = presenter(dir.path(), 5);
        presenter.store(RunId::new("a"), tables(1));
        presenter.store(RunId::new("b"), tables(2));

        assert_eq!(presenter.tables(&RunId::new("a")).unwrap().orders.len(), 1);
        assert_eq!(presenter.tables(&RunId::new("b")).unwrap().orders.len(), 2);
    }
}
