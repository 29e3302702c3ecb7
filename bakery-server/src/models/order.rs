//! Order records and validated create payloads

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::ValidationError;

/// Column widths from the `orders` table
const MAX_ORDER_ID_LEN: usize = 50;
const MAX_CUSTOMER_NAME_LEN: usize = 100;
const MAX_PRODUCT_LEN: usize = 100;

/// Quantity stored when the client omits one (matches the column default)
pub const DEFAULT_QUANTITY: i32 = 1;

const REQUIRED_CREATE_FIELDS: &[&str] = &["order_id", "customer_name", "product"];

/// Order lifecycle status, stored as a MySQL ENUM
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    /// Get the stored spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "status",
                value: s.to_owned(),
            })
    }
}

/// Order as read back from storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_id: String,
    pub customer_name: String,
    pub product: String,
    pub quantity: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw create payload as sent by clients.
///
/// Every field is optional here so that missing fields surface as a
/// `ValidationError` rather than a JSON rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub order_id: Option<String>,
    pub customer_name: Option<String>,
    pub product: Option<String>,
    /// Accepts `2` or `"2"`; form-driven clients send strings.
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub status: Option<String>,
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            de::Error::custom(format!("quantity must be a whole number, got '{}'", text))
        }),
    }
}

/// Status update payload
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
}

impl UpdateOrderRequest {
    /// Validate the requested status.
    pub fn into_status(self) -> Result<OrderStatus, ValidationError> {
        match non_blank(self.status) {
            Some(raw) => raw.parse(),
            None => Err(ValidationError::MissingField { label: "Status" }),
        }
    }
}

/// Validated order ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    order_id: String,
    customer_name: String,
    product: String,
    quantity: i32,
    order_date: Option<NaiveDate>,
    status: OrderStatus,
}

impl NewOrder {
    /// Validate a create payload.
    ///
    /// # Rules
    /// - `order_id`, `customer_name`, `product` present and non-blank
    /// - text fields within their column widths
    /// - `quantity` at least 1, defaulting to 1
    /// - `status` one of the enumerated values, defaulting to `Pending`
    pub fn new(req: CreateOrderRequest) -> Result<Self, ValidationError> {
        let (Some(order_id), Some(customer_name), Some(product)) = (
            non_blank(req.order_id),
            non_blank(req.customer_name),
            non_blank(req.product),
        ) else {
            return Err(ValidationError::MissingFields {
                fields: REQUIRED_CREATE_FIELDS,
            });
        };

        check_len("order_id", &order_id, MAX_ORDER_ID_LEN)?;
        check_len("customer_name", &customer_name, MAX_CUSTOMER_NAME_LEN)?;
        check_len("product", &product, MAX_PRODUCT_LEN)?;

        let quantity = req.quantity.unwrap_or(DEFAULT_QUANTITY);
        if quantity < 1 {
            return Err(ValidationError::OutOfRange {
                field: "quantity",
                min: 1,
            });
        }

        let status = match non_blank(req.status) {
            Some(raw) => raw.parse()?,
            None => OrderStatus::default(),
        };

        Ok(Self {
            order_id,
            customer_name,
            product,
            quantity,
            order_date: req.order_date,
            status,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
