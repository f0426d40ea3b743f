//! 展示层
//!
//! 终端输入、预览和 CSV 导出；按运行 ID 缓存结果表

pub mod csv_export;
pub mod presenter;
pub mod prompt;

pub use csv_export::{write_items_csv, write_orders_csv};
pub use presenter::{ExportPresenter, ExportedFiles, RunId};
pub use prompt::{LoginPrompt, TerminalPrompt};
