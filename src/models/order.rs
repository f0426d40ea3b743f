//! 导出用的订单与菜品记录

use serde::{Deserialize, Serialize};
use std::fmt;

/// 订单号，同时作为分页游标
///
/// 接口里可能是数字也可能是字符串，统一保存为字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct OrderIdVisitor;

        impl<'de> Visitor<'de> for OrderIdVisitor {
            type Value = OrderId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer order id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if value.is_empty() {
                    return Err(E::invalid_value(serde::de::Unexpected::Str(value), &self));
                }
                Ok(OrderId::new(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(OrderId::new(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(OrderId::new(value.to_string()))
            }
        }

        deserializer.deserialize_any(OrderIdVisitor)
    }
}

/// 已送达的订单
///
/// 字段顺序即 `orders.csv` 的列顺序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: OrderId,
    pub order_total: Option<String>,
    pub restaurant_name: Option<String>,
    pub order_time: Option<String>,
    pub rain_mode: bool,
    pub on_time: bool,
    #[serde(skip_serializing)]
    pub status: String,
}

impl Order {
    pub const COLUMNS: [&'static str; 6] = [
        "order_id",
        "order_total",
        "restaurant_name",
        "order_time",
        "rain_mode",
        "on_time",
    ];
}

/// 订单中的一个菜品，没有独立身份
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub order_id: OrderId,
    pub name: Option<String>,
    pub is_veg: Option<bool>,
}

impl Item {
    pub const COLUMNS: [&'static str; 3] = ["order_id", "name", "is_veg"];
}

/// 一次运行得到的两张表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderTables {
    pub orders: Vec<Order>,
    pub items: Vec<Item>,
}

impl OrderTables {
    /// 追加另一批结果，保持原有顺序
    pub fn append(&mut self, mut other: OrderTables) {
        self.orders.append(&mut other.orders);
        self.items.append(&mut other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
