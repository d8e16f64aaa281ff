use rust_decimal::Decimal;
use serde::Deserialize;

use super::value::Metadata;

/// Immutable snapshot a validation rule is evaluated against.
///
/// Built once per evaluation from persisted entities; never mutated by the
/// engine. Deserializes from JSON so adapters can skip hand-written mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Context {
    pub voucher: Voucher,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub redemption_counters: RedemptionCounters,
    #[serde(default)]
    pub request_metadata: Metadata,
}

/// The redeemable being checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Voucher {
    pub code: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub campaign: Option<Campaign>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Order {
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A single order line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Redemption counts for the voucher being checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RedemptionCounters {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_customer: u64,
}

impl Context {
    /// Create a context for the given voucher with no customer, no order and
    /// zeroed redemption counters.
    #[must_use]
    pub fn new(voucher: Voucher) -> Self {
        Self {
            voucher,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_counters(mut self, total: u64, per_customer: u64) -> Self {
        self.redemption_counters = RedemptionCounters {
            total,
            per_customer,
        };
        self
    }

    #[must_use]
    pub fn with_request_metadata(mut self, key: &str, value: impl Into<super::Value>) -> Self {
        self.request_metadata.insert(key.to_owned(), value.into());
        self
    }
}

impl Voucher {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_campaign(mut self, campaign: Campaign) -> Self {
        self.campaign = Some(campaign);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<super::Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

impl Campaign {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<super::Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

impl Customer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<super::Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

impl Order {
    #[must_use]
    pub fn new(amount: impl Into<Decimal>) -> Self {
        Self {
            amount: amount.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<super::Value>) -> Self {
        self.metadata.insert(key.to_owned(), value.into());
        self
    }
}

impl OrderItem {
    #[must_use]
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: Some(sku.into()),
            quantity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<Decimal>) -> Self {
        self.price = Some(price.into());
        self
    }
}
