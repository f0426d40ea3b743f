//! 订单抽取 - 业务能力层
//!
//! 纯函数：只保留已送达订单，把嵌套的菜品列表展开成两张平表

use crate::models::{Item, Order, OrderTables, RawOrder};

/// 需要导出的订单状态
pub const DELIVERED_STATUS: &str = "Delivered";
/// `rain_mode` 缺失时的取值
pub const DEFAULT_RAIN_MODE: bool = false;
/// `on_time` 缺失时的取值
pub const DEFAULT_ON_TIME: bool = true;

/// 从一页原始订单中抽取订单表和菜品表
///
/// 输出保持输入顺序，不排序；没有菜品的订单不产生菜品行
pub fn extract(page: &[RawOrder]) -> OrderTables {
    let mut tables = OrderTables::default();

    for raw in page.iter().filter(|raw| is_delivered(raw)) {
        tables.orders.push(Order {
            order_id: raw.order_id.clone(),
            order_total: raw.order_total.clone(),
            restaurant_name: raw.restaurant_name.clone(),
            order_time: raw.order_time.clone(),
            rain_mode: raw.rain_mode.unwrap_or(DEFAULT_RAIN_MODE),
            on_time: raw.on_time.unwrap_or(DEFAULT_ON_TIME),
            status: DELIVERED_STATUS.to_string(),
        });

        for item in raw.order_items.iter().flatten() {
            tables.items.push(Item {
                order_id: raw.order_id.clone(),
                name: item.name.clone(),
                is_veg: item.is_veg,
            });
        }
    }

    tables
}

fn is_delivered(raw: &RawOrder) -> bool {
    raw.order_status.as_deref() == Some(DELIVERED_STATUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderId, RawItem};

    fn raw_order(id: &str, status: &str, items: usize) -> RawOrder {
        RawOrder {
            order_id: OrderId::new(id),
            order_total: Some("100".to_string()),
            restaurant_name: Some(format!("Restaurant {id}")),
            order_time: Some("2024-01-01 12:00:00".to_string()),
            rain_mode: None,
            on_time: None,
            order_status: Some(status.to_string()),
            order_items: Some(
                (0..items)
                    .map(|i| RawItem {
                        name: Some(format!("Dish {i}")),
                        is_veg: Some(i % 2 == 0),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_only_delivered_orders_are_kept() {
        let page = vec![
            raw_order("1", "Delivered", 2),
            raw_order("2", "Cancelled", 3),
            raw_order("3", "Delivered", 0),
            raw_order("4", "delivered", 1),
            raw_order("5", "Delivered", 4),
        ];

        let tables = extract(&page);

        let ids: Vec<&str> = tables.orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "5"]);
        assert_eq!(tables.items.len(), 2 + 0 + 4);
        assert!(tables.orders.iter().all(|o| o.status == DELIVERED_STATUS));
    }

    #[test]
    fn test_defaults_and_item_foreign_keys() {
        let mut explicit = raw_order("9", "Delivered", 1);
        explicit.rain_mode = Some(true);
        explicit.on_time = Some(false);
        let page = vec![raw_order("8", "Delivered", 2), explicit];

        let tables = extract(&page);

        assert!(!tables.orders[0].rain_mode);
        assert!(tables.orders[0].on_time);
        assert!(tables.orders[1].rain_mode);
        assert!(!tables.orders[1].on_time);

        let owners: Vec<&str> = tables.items.iter().map(|i| i.order_id.as_str()).collect();
        assert_eq!(owners, vec!["8", "8", "9"]);
        assert_eq!(tables.items[0].name.as_deref(), Some("Dish 0"));
    }

    #[test]
    fn test_missing_items_and_status() {
        let mut no_items = raw_order("1", "Delivered", 0);
        no_items.order_items = None;
        let mut no_status = raw_order("2", "Delivered", 1);
        no_status.order_status = None;

        let tables = extract(&[no_items, no_status]);
        assert_eq!(tables.orders.len(), 1);
        assert!(tables.items.is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let page = vec![
            raw_order("1", "Delivered", 3),
            raw_order("2", "Processing", 1),
        ];
        assert_eq!(extract(&page), extract(&page));
        assert!(extract(&[]).is_empty());
    }
}
