//! 订单接口的原始响应结构
//!
//! 接口字段类型并不稳定（数字/字符串混用、字段缺失或为 null），
//! 这里统一做宽松解析，默认值在抽取阶段再补

use crate::models::order::OrderId;
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// `GET /dapi/order/all` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub data: Option<OrdersData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersData {
    #[serde(default)]
    pub orders: Option<Vec<RawOrder>>,
    #[serde(default)]
    pub total_orders: Option<u64>,
}

/// 原始订单
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawOrder {
    pub order_id: OrderId,
    /// 金额按接口原样保存（`180`、`"249.50"`、`"N/A"` 都不改写）
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_total: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub restaurant_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub rain_mode: Option<bool>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub on_time: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_status: Option<String>,
    #[serde(default)]
    pub order_items: Option<Vec<RawItem>>,
}

/// 原始菜品
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_veg: Option<bool>,
}

/// 一页订单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersPage {
    pub orders: Vec<RawOrder>,
    pub total_orders: u64,
}

impl OrdersPage {
    /// 本页最后一个订单的订单号，即下一页的游标
    pub fn last_order_id(&self) -> Option<&OrderId> {
        self.orders.last().map(|order| &order.order_id)
    }
}

impl OrdersResponse {
    /// 取出分页数据，`data` 缺失时返回 `None`
    pub fn into_page(self) -> Option<OrdersPage> {
        self.data.map(|data| OrdersPage {
            orders: data.orders.unwrap_or_default(),
            total_orders: data.total_orders.unwrap_or(0),
        })
    }
}

// ========== 宽松解析 ==========

/// 标量按文本保存（数字、布尔值转为字符串）
///
/// 对象和数组无法放进一列，丢弃并返回 `None`，不让整页解析失败
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            skip_seq(seq)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            skip_map(map)
        }
    }

    deserializer.deserialize_any(StringVisitor)
}

/// 布尔值：`true`/`false`、`1`/`0`、`"1"`/`"0"`、`"true"`/`"false"`
///
/// 其他取值视为未知，返回 `None`
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl<'de> Visitor<'de> for BoolVisitor {
        type Value = Option<bool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean, 0/1 or a boolean-like string")
        }

        fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(match value {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            })
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(match value {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            })
        }

        fn visit_f64<E: serde::de::Error>(self, _value: f64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            })
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            skip_seq(seq)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            skip_map(map)
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

fn skip_seq<'de, A: SeqAccess<'de>, T>(mut seq: A) -> Result<Option<T>, A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(None)
}

fn skip_map<'de, A: MapAccess<'de>, T>(mut map: A) -> Result<Option<T>, A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_order_accepts_mixed_types() {
        let order: RawOrder = serde_json::from_value(json!({
            "order_id": 123456789,
            "order_total": "249.5",
            "restaurant_name": "Meghana Foods",
            "order_time": "2023-04-01 20:15:00",
            "rain_mode": null,
            "order_status": "Delivered",
            "order_items": [
                {"name": "Chicken Biryani", "is_veg": "0"},
                {"name": "Gobi 65", "is_veg": 1}
            ]
        }))
        .unwrap();

        assert_eq!(order.order_id, OrderId::new("123456789"));
        assert_eq!(order.order_total.as_deref(), Some("249.5"));
        assert_eq!(order.rain_mode, None);
        assert_eq!(order.on_time, None);
        let items = order.order_items.unwrap();
        assert_eq!(items[0].is_veg, Some(false));
        assert_eq!(items[1].is_veg, Some(true));
    }

    #[test]
    fn test_order_total_kept_as_sent() {
        let response: OrdersResponse = serde_json::from_value(json!({
            "data": {
                "total_orders": 3,
                "orders": [
                    {"order_id": 3, "order_total": 180, "order_status": "Delivered"},
                    {"order_id": 2, "order_total": "N/A", "order_status": "Delivered"},
                    {"order_id": 1, "order_total": "249.50", "order_status": "Delivered"}
                ]
            }
        }))
        .unwrap();

        let page = response.into_page().unwrap();
        let totals: Vec<_> = page
            .orders
            .iter()
            .map(|order| order.order_total.as_deref())
            .collect();
        assert_eq!(totals, vec![Some("180"), Some("N/A"), Some("249.50")]);
    }

    #[test]
    fn test_odd_field_shapes_do_not_fail_the_page() {
        let response: OrdersResponse = serde_json::from_value(json!({
            "data": {
                "total_orders": 2,
                "orders": [
                    {
                        "order_id": 7,
                        "order_total": {"amount": 120},
                        "restaurant_name": ["Empire"],
                        "rain_mode": {"on": true},
                        "on_time": 1.0,
                        "order_status": "Delivered",
                        "order_items": [{"name": true, "is_veg": [1]}]
                    },
                    {"order_id": 6, "order_total": 99.5, "order_status": "Delivered"}
                ]
            }
        }))
        .unwrap();

        let page = response.into_page().unwrap();
        assert_eq!(page.orders.len(), 2);
        let odd = &page.orders[0];
        assert_eq!(odd.order_total, None);
        assert_eq!(odd.restaurant_name, None);
        assert_eq!(odd.rain_mode, None);
        assert_eq!(odd.on_time, None);
        let items = odd.order_items.as_ref().unwrap();
        assert_eq!(items[0].name.as_deref(), Some("true"));
        assert_eq!(items[0].is_veg, None);
        assert_eq!(page.orders[1].order_total.as_deref(), Some("99.5"));
    }

    #[test]
    fn test_raw_order_requires_order_id() {
        let result: Result<RawOrder, _> =
            serde_json::from_value(json!({"order_status": "Delivered"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_into_page_defaults() {
        let response: OrdersResponse =
            serde_json::from_value(json!({"data": {"orders": null}})).unwrap();
        let page = response.into_page().unwrap();
        assert!(page.orders.is_empty());
        assert_eq!(page.total_orders, 0);

        let response: OrdersResponse =
            serde_json::from_value(json!({"statusCode": 1, "data": null})).unwrap();
        assert!(response.into_page().is_none());
    }

    #[test]
    fn test_last_order_id() {
        let response: OrdersResponse = serde_json::from_value(json!({
            "data": {
                "total_orders": 2,
                "orders": [{"order_id": "a1"}, {"order_id": "b2"}]
            }
        }))
        .unwrap();
        let page = response.into_page().unwrap();
        assert_eq!(page.last_order_id(), Some(&OrderId::new("b2")));
    }
}
