//! CSV 编码
//!
//! 两张表都始终带表头，逗号分隔，每条记录一行

use crate::models::{Item, Order};
use serde::Serialize;
use std::io::Write;

/// 写出订单表
pub fn write_orders_csv<W: Write>(writer: W, orders: &[Order]) -> Result<(), csv::Error> {
    write_table(writer, &Order::COLUMNS, orders)
}

/// 写出菜品表
pub fn write_items_csv<W: Write>(writer: W, items: &[Item]) -> Result<(), csv::Error> {
    write_table(writer, &Item::COLUMNS, items)
}

fn write_table<W: Write, R: Serialize>(
    writer: W,
    columns: &[&str],
    rows: &[R],
) -> Result<(), csv::Error> {
    // 表头单独写，空表也有表头
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(columns)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderId;

    fn order(id: &str, name: &str) -> Order {
        Order {
            order_id: OrderId::new(id),
            order_total: Some("249.50".to_string()),
            restaurant_name: Some(name.to_string()),
            order_time: Some("2024-02-14 20:31:00".to_string()),
            rain_mode: false,
            on_time: true,
            status: "Delivered".to_string(),
        }
    }

    #[test]
    fn test_orders_csv_layout() {
        let mut out = Vec::new();
        write_orders_csv(&mut out, &[order("101", "Truffles, Koramangala")]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "order_id,order_total,restaurant_name,order_time,rain_mode,on_time"
        );
        assert_eq!(
            lines[1],
            r#"101,249.50,"Truffles, Koramangala",2024-02-14 20:31:00,false,true"#
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_items_csv_layout_with_missing_values() {
        let items = vec![
            Item {
                order_id: OrderId::new("101"),
                name: Some("Paneer Tikka".to_string()),
                is_veg: Some(true),
            },
            Item {
                order_id: OrderId::new("101"),
                name: None,
                is_veg: None,
            },
        ];
        let mut out = Vec::new();
        write_items_csv(&mut out, &items).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "order_id,name,is_veg\n101,Paneer Tikka,true\n101,,\n");
    }

    #[test]
    fn test_empty_tables_still_have_headers() {
        let mut out = Vec::new();
        write_items_csv(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "order_id,name,is_veg\n");
    }
}
