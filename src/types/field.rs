use std::fmt;

use super::context::Context;
use super::value::{Metadata, Value};

/// A dotted field path resolved once into the part of the [`Context`] it reads.
///
/// Produced by [`FieldRef::parse`] during rule compilation so evaluation
/// never re-dispatches on path strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
    Customer(CustomerField),
    Order(OrderField),
    OrderItems(ItemField),
    Voucher(EntityField),
    Campaign(EntityField),
    Redemptions(RedemptionField),
    /// A path no resolver recognizes. Always resolves to [`Resolved::Absent`].
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerField {
    Id,
    Email,
    Metadata(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderField {
    Amount,
    Currency,
    ItemsCount,
    Metadata(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Sku,
    Product,
    Quantity,
    Price,
}

/// Fields shared by vouchers and campaigns: an identifier and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityField {
    /// `voucher.code` or `campaign.id`.
    Key,
    Metadata(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionField {
    Total,
    PerCustomer,
    Metadata(String),
}

/// Result of resolving a [`FieldRef`] against a [`Context`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The data the path points at is not present.
    Absent,
    /// A single value. Item SKUs and products resolve to a [`Value::List`].
    Value(Value),
    /// Candidates for existential matching: the condition holds if any does.
    AnyOf(Vec<Value>),
}

fn metadata_key(rest: &str) -> Option<String> {
    rest.strip_prefix("metadata.")
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
}

impl FieldRef {
    /// Resolve a dotted path. Never fails: unrecognized paths become
    /// [`FieldRef::Unknown`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let Some((prefix, rest)) = path.split_once('.') else {
            return FieldRef::Unknown(path.to_owned());
        };
        let parsed = match prefix {
            "customer" => match rest {
                "id" | "source_id" => Some(FieldRef::Customer(CustomerField::Id)),
                "email" => Some(FieldRef::Customer(CustomerField::Email)),
                _ => metadata_key(rest).map(|k| FieldRef::Customer(CustomerField::Metadata(k))),
            },
            "order" => match rest {
                "amount" => Some(FieldRef::Order(OrderField::Amount)),
                "currency" => Some(FieldRef::Order(OrderField::Currency)),
                "items.count" => Some(FieldRef::Order(OrderField::ItemsCount)),
                "items.sku" => Some(FieldRef::OrderItems(ItemField::Sku)),
                "items.product" => Some(FieldRef::OrderItems(ItemField::Product)),
                "items.quantity" => Some(FieldRef::OrderItems(ItemField::Quantity)),
                "items.price" => Some(FieldRef::OrderItems(ItemField::Price)),
                _ => metadata_key(rest).map(|k| FieldRef::Order(OrderField::Metadata(k))),
            },
            "voucher" => match rest {
                "code" => Some(FieldRef::Voucher(EntityField::Key)),
                _ => metadata_key(rest).map(|k| FieldRef::Voucher(EntityField::Metadata(k))),
            },
            "campaign" => match rest {
                "id" => Some(FieldRef::Campaign(EntityField::Key)),
                _ => metadata_key(rest).map(|k| FieldRef::Campaign(EntityField::Metadata(k))),
            },
            "redemptions" => match rest {
                "count.total" => Some(FieldRef::Redemptions(RedemptionField::Total)),
                "count.per_customer" => Some(FieldRef::Redemptions(RedemptionField::PerCustomer)),
                _ => metadata_key(rest)
                    .map(|k| FieldRef::Redemptions(RedemptionField::Metadata(k))),
            },
            _ => None,
        };
        parsed.unwrap_or_else(|| FieldRef::Unknown(path.to_owned()))
    }

    /// The namespace this reference belongs to (`"customer"`, `"order"`, ...).
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self {
            FieldRef::Customer(_) => "customer",
            FieldRef::Order(_) | FieldRef::OrderItems(_) => "order",
            FieldRef::Voucher(_) => "voucher",
            FieldRef::Campaign(_) => "campaign",
            FieldRef::Redemptions(_) => "redemptions",
            FieldRef::Unknown(path) => path.split('.').next().unwrap_or(path),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Customer(CustomerField::Id) => write!(f, "customer.id"),
            FieldRef::Customer(CustomerField::Email) => write!(f, "customer.email"),
            FieldRef::Customer(CustomerField::Metadata(k)) => write!(f, "customer.metadata.{k}"),
            FieldRef::Order(OrderField::Amount) => write!(f, "order.amount"),
            FieldRef::Order(OrderField::Currency) => write!(f, "order.currency"),
            FieldRef::Order(OrderField::ItemsCount) => write!(f, "order.items.count"),
            FieldRef::Order(OrderField::Metadata(k)) => write!(f, "order.metadata.{k}"),
            FieldRef::OrderItems(ItemField::Sku) => write!(f, "order.items.sku"),
            FieldRef::OrderItems(ItemField::Product) => write!(f, "order.items.product"),
            FieldRef::OrderItems(ItemField::Quantity) => write!(f, "order.items.quantity"),
            FieldRef::OrderItems(ItemField::Price) => write!(f, "order.items.price"),
            FieldRef::Voucher(EntityField::Key) => write!(f, "voucher.code"),
            FieldRef::Voucher(EntityField::Metadata(k)) => write!(f, "voucher.metadata.{k}"),
            FieldRef::Campaign(EntityField::Key) => write!(f, "campaign.id"),
            FieldRef::Campaign(EntityField::Metadata(k)) => write!(f, "campaign.metadata.{k}"),
            FieldRef::Redemptions(RedemptionField::Total) => write!(f, "redemptions.count.total"),
            FieldRef::Redemptions(RedemptionField::PerCustomer) => {
                write!(f, "redemptions.count.per_customer")
            }
            FieldRef::Redemptions(RedemptionField::Metadata(k)) => {
                write!(f, "redemptions.metadata.{k}")
            }
            FieldRef::Unknown(path) => write!(f, "{path}"),
        }
    }
}

fn from_metadata(metadata: &Metadata, key: &str) -> Resolved {
    match Value::lookup(metadata, key) {
        Some(v) if !v.is_null() => Resolved::Value(v.clone()),
        _ => Resolved::Absent,
    }
}

fn from_option<T: Clone + Into<Value>>(v: Option<&T>) -> Resolved {
    v.map_or(Resolved::Absent, |v| Resolved::Value(v.clone().into()))
}

/// Resolve a field reference against a context.
#[must_use]
pub fn resolve(field: &FieldRef, ctx: &Context) -> Resolved {
    match field {
        FieldRef::Customer(f) => {
            let Some(customer) = ctx.customer.as_ref() else {
                return Resolved::Absent;
            };
            match f {
                CustomerField::Id => from_option(customer.source_id.as_ref()),
                CustomerField::Email => from_option(customer.email.as_ref()),
                CustomerField::Metadata(key) => from_metadata(&customer.metadata, key),
            }
        }
        FieldRef::Order(f) => {
            let Some(order) = ctx.order.as_ref() else {
                return Resolved::Absent;
            };
            match f {
                OrderField::Amount => Resolved::Value(Value::Number(order.amount)),
                OrderField::Currency => from_option(order.currency.as_ref()),
                OrderField::ItemsCount => Resolved::Value(Value::from(order.items.len() as u64)),
                OrderField::Metadata(key) => from_metadata(&order.metadata, key),
            }
        }
        FieldRef::OrderItems(f) => {
            let Some(order) = ctx.order.as_ref() else {
                return Resolved::Absent;
            };
            let items = order.items.iter();
            match f {
                ItemField::Sku => Resolved::Value(Value::List(
                    items.filter_map(|i| i.sku.clone()).map(Value::String).collect(),
                )),
                ItemField::Product => Resolved::Value(Value::List(
                    items.filter_map(|i| i.product.clone()).map(Value::String).collect(),
                )),
                ItemField::Quantity => {
                    Resolved::AnyOf(items.map(|i| Value::from(i.quantity)).collect())
                }
                ItemField::Price => Resolved::AnyOf(
                    items.filter_map(|i| i.price).map(Value::Number).collect(),
                ),
            }
        }
        FieldRef::Voucher(f) => match f {
            EntityField::Key => Resolved::Value(Value::String(ctx.voucher.code.clone())),
            EntityField::Metadata(key) => from_metadata(&ctx.voucher.metadata, key),
        },
        FieldRef::Campaign(f) => {
            let Some(campaign) = ctx.voucher.campaign.as_ref() else {
                return Resolved::Absent;
            };
            match f {
                EntityField::Key => Resolved::Value(Value::String(campaign.id.clone())),
                EntityField::Metadata(key) => from_metadata(&campaign.metadata, key),
            }
        }
        FieldRef::Redemptions(f) => match f {
            RedemptionField::Total => Resolved::Value(Value::from(ctx.redemption_counters.total)),
            RedemptionField::PerCustomer => {
                Resolved::Value(Value::from(ctx.redemption_counters.per_customer))
            }
            RedemptionField::Metadata(key) => from_metadata(&ctx.request_metadata, key),
        },
        FieldRef::Unknown(_) => Resolved::Absent,
    }
}

/// Parse and resolve a dotted path in one step.
#[must_use]
pub fn resolve_path(path: &str, ctx: &Context) -> Resolved {
    resolve(&FieldRef::parse(path), ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Campaign, Customer, Order, OrderItem, Voucher};

    fn ctx() -> Context {
        Context::new(
            Voucher::new("SUMMER")
                .with_metadata("region", "eu")
                .with_campaign(Campaign::new("camp_1").with_metadata("kind", "promo")),
        )
        .with_customer(
            Customer::new()
                .with_source_id("cust_1")
                .with_email("a@x.com")
                .with_metadata("tier", "gold"),
        )
        .with_order(
            Order::new(1500)
                .with_currency("EUR")
                .with_item(OrderItem::new("A", 2).with_product("prod_a").with_price(10))
                .with_item(OrderItem::new("B", 1).with_price(25)),
        )
        .with_counters(4, 1)
        .with_request_metadata("channel", "web")
    }

    #[test]
    fn parse_known_paths() {
        assert_eq!(
            FieldRef::parse("customer.email"),
            FieldRef::Customer(CustomerField::Email)
        );
        assert_eq!(
            FieldRef::parse("order.items.sku"),
            FieldRef::OrderItems(ItemField::Sku)
        );
        assert_eq!(
            FieldRef::parse("campaign.metadata.kind"),
            FieldRef::Campaign(EntityField::Metadata("kind".into()))
        );
        assert_eq!(
            FieldRef::parse("redemptions.count.per_customer"),
            FieldRef::Redemptions(RedemptionField::PerCustomer)
        );
    }

    #[test]
    fn parse_unknown_paths() {
        for path in ["", "customer", "customer.phone", "order.metadata.", "loyalty.points"] {
            assert!(
                matches!(FieldRef::parse(path), FieldRef::Unknown(_)),
                "expected unknown for {path:?}"
            );
        }
    }

    #[test]
    fn display_round_trips_known_paths() {
        for path in [
            "customer.id",
            "customer.metadata.tier",
            "order.items.count",
            "order.items.price",
            "voucher.code",
            "redemptions.metadata.channel",
        ] {
            assert_eq!(FieldRef::parse(path).to_string(), path);
        }
    }

    #[test]
    fn namespace_of_item_fields_is_order() {
        assert_eq!(FieldRef::parse("order.items.sku").namespace(), "order");
        assert_eq!(FieldRef::parse("loyalty.points").namespace(), "loyalty");
    }

    #[test]
    fn resolve_scalars() {
        let ctx = ctx();
        assert_eq!(
            resolve_path("customer.id", &ctx),
            Resolved::Value(Value::from("cust_1"))
        );
        assert_eq!(
            resolve_path("order.amount", &ctx),
            Resolved::Value(Value::from(1500_i64))
        );
        assert_eq!(
            resolve_path("order.items.count", &ctx),
            Resolved::Value(Value::from(2_i64))
        );
        assert_eq!(
            resolve_path("voucher.metadata.region", &ctx),
            Resolved::Value(Value::from("eu"))
        );
        assert_eq!(
            resolve_path("campaign.id", &ctx),
            Resolved::Value(Value::from("camp_1"))
        );
        assert_eq!(
            resolve_path("redemptions.count.total", &ctx),
            Resolved::Value(Value::from(4_i64))
        );
        assert_eq!(
            resolve_path("redemptions.metadata.channel", &ctx),
            Resolved::Value(Value::from("web"))
        );
    }

    #[test]
    fn resolve_item_collections() {
        let ctx = ctx();
        assert_eq!(
            resolve_path("order.items.sku", &ctx),
            Resolved::Value(Value::from(vec!["A", "B"]))
        );
        assert_eq!(
            resolve_path("order.items.product", &ctx),
            Resolved::Value(Value::from(vec!["prod_a"]))
        );
        assert_eq!(
            resolve_path("order.items.quantity", &ctx),
            Resolved::AnyOf(vec![Value::from(2_i64), Value::from(1_i64)])
        );
    }

    #[test]
    fn resolve_absent_entities() {
        let ctx = Context::new(Voucher::new("V"));
        for path in [
            "customer.email",
            "customer.metadata.tier",
            "order.amount",
            "order.items.sku",
            "campaign.id",
            "voucher.metadata.missing",
            "unknown.path",
        ] {
            assert_eq!(resolve_path(path, &ctx), Resolved::Absent, "{path}");
        }
    }

    #[test]
    fn resolve_null_metadata_is_absent() {
        let ctx = Context::new(Voucher::new("V").with_metadata("gone", Value::Null));
        assert_eq!(resolve_path("voucher.metadata.gone", &ctx), Resolved::Absent);
    }
}
