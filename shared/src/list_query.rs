//! Client-side filtering and sorting of admin lists.
//!
//! Filtering produces a fresh vector and never touches the source slice.
//! Sorting is stable, so rows with equal keys keep their relative order in
//! both directions.

use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    DeliveryFrequency, Order, OrderStatus, PaymentStatus, Product, Subscription,
    SubscriptionStatus, PRODUCT_ACTIVE, PRODUCT_INACTIVE,
};

/// Filter value meaning "no constraint on this field".
pub const ALL: &str = "all";

/// A named field read off an entity for filtering or sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// String form used for equality filters.
    pub fn canonical(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) => format_number(*number),
            FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    fn sort_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.to_lowercase(),
            FieldValue::Number(number) => format_number(*number),
            FieldValue::Date(date) => date.to_rfc3339(),
        }
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Entities that can appear in a filtered, sortable admin list.
pub trait Listable {
    fn id(&self) -> &str;

    /// Value of a named field, `None` when the entity has no such value.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Strings the free-text search looks into.
    fn search_fields(&self) -> Vec<&str>;

    /// Timestamp the date-range filter applies to.
    fn list_date(&self) -> Option<DateTime<Utc>>;

    /// Canonical form of a filter value for `name`. Closed-enum fields map
    /// any casing onto their wire value; other fields keep `value` as is.
    fn canonical_filter(_name: &str, value: &str) -> String
    where
        Self: Sized,
    {
        value.to_string()
    }
}

fn canonical_or_raw<E>(value: &str, as_str: impl Fn(E) -> &'static str) -> String
where
    E: FromStr,
{
    value
        .parse::<E>()
        .map(|parsed| as_str(parsed).to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Inclusive calendar-day range; either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Field name → expected canonical value. [`ALL`] or empty means unset.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub date_range: DateRange,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_range = DateRange {
            from,
            to,
        };
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Value for `name` if it actually constrains the list.
    pub fn active_value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !is_sentinel(value))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.fields.values().all(|value| is_sentinel(value.trim()))
            && self.search.trim().is_empty()
            && self.date_range.is_open()
    }

    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        for (name, expected) in &self.fields {
            let expected = expected.trim();
            if is_sentinel(expected) {
                continue;
            }
            let expected = T::canonical_filter(name, expected);
            match item.field(name) {
                Some(value) if value.canonical() == expected => {},
                _ => return false,
            }
        }

        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !item
                .search_fields()
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
        {
            return false;
        }

        if !self.date_range.is_open() {
            match item.list_date() {
                Some(at) if self.date_range.contains(at) => {},
                _ => return false,
            }
        }
        true
    }
}

fn is_sentinel(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortSpec {
    type Err = String;

    /// Parses `field` or `field:asc|desc`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match value.split_once(':') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (value, SortDirection::Asc),
        };
        let field = field.trim();
        if field.is_empty() {
            return Err("sort field is empty".to_string());
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Ordering between two optional keys. Numbers and dates compare by value,
/// anything else as lowercase text with a missing key treated as "".
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        },
        (Some(FieldValue::Date(x)), Some(FieldValue::Date(y))) => x.cmp(y),
        _ => {
            let left = a.map(FieldValue::sort_text).unwrap_or_default();
            let right = b.map(FieldValue::sort_text).unwrap_or_default();
            left.cmp(&right)
        },
    }
}

pub fn apply_filters<T: Listable + Clone>(items: &[T], criteria: &FilterCriteria) -> Vec<T> {
    items
        .iter()
        .filter(|item| criteria.matches(*item))
        .cloned()
        .collect()
}

pub fn sort_items<T: Listable>(items: &mut [T], spec: &SortSpec) {
    // Keys are read once up front; `field` may allocate.
    let mut keyed = items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, item.field(&spec.field)))
        .collect::<Vec<_>>();
    keyed.sort_by(|(_, a), (_, b)| {
        let ordering = compare_values(a.as_ref(), b.as_ref());
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    let order = keyed.into_iter().map(|(index, _)| index).collect::<Vec<_>>();
    apply_permutation(items, order);
}

fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    // order[i] = source index that should land at position i.
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != start {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}

/// Filter, then optionally sort, into a new view.
pub fn query<T: Listable + Clone>(
    items: &[T],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
) -> Vec<T> {
    let mut view = apply_filters(items, criteria);
    if let Some(spec) = sort {
        sort_items(&mut view, spec);
    }
    view
}

impl Listable for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => text(&self.id),
            "reference" => text(&self.reference),
            "status" => text(self.status.as_str()),
            "payment_status" | "paymentStatus" => text(self.payment_status.as_str()),
            "customer" | "customer_name" => text(&self.user.name),
            "email" | "customer_email" => text(&self.user.email),
            "amount" | "total_amount" | "totalAmount" => Some(FieldValue::Number(self.total_amount)),
            "delivery_fee" => Some(FieldValue::Number(self.delivery_fee)),
            "items" => Some(FieldValue::Number(self.items.len() as f64)),
            "tracking_status" => self.tracking.as_ref().and_then(|t| text(&t.status)),
            "created_at" | "createdAt" | "date" => Some(FieldValue::Date(self.created_at)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.id.as_str(),
            self.reference.as_str(),
            self.user.name.as_str(),
            self.user.email.as_str(),
        ];
        fields.extend(self.items.iter().map(|item| item.product_name.as_str()));
        fields
    }

    fn list_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn canonical_filter(name: &str, value: &str) -> String {
        match name {
            "status" => canonical_or_raw(value, OrderStatus::as_str),
            "payment_status" | "paymentStatus" => canonical_or_raw(value, PaymentStatus::as_str),
            _ => value.to_string(),
        }
    }
}

impl Listable for Subscription {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => text(&self.id),
            "status" => text(self.status.as_str()),
            "plan" | "plan_name" | "planName" => text(&self.plan_name),
            "plan_type" | "planType" => text(&self.plan_type),
            "cylinder_size" | "cylinderSize" => text(&self.cylinder_size),
            "delivery_frequency" | "frequency" => text(self.delivery_frequency.as_str()),
            "customer" | "customer_name" => text(&self.user.name),
            "email" | "customer_email" => text(&self.user.email),
            "price" | "amount" => Some(FieldValue::Number(self.price)),
            "start_date" | "startDate" => Some(FieldValue::Date(day_start(self.start_date))),
            "end_date" | "endDate" => self.end_date.map(|d| FieldValue::Date(day_start(d))),
            "pauses" => Some(FieldValue::Number(self.pause_history.len() as f64)),
            "created_at" | "createdAt" | "date" => Some(FieldValue::Date(self.created_at)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.plan_name.as_str(),
            self.user.name.as_str(),
            self.user.email.as_str(),
        ]
    }

    fn list_date(&self) -> Option<DateTime<Utc>> {
        Some(day_start(self.start_date))
    }

    fn canonical_filter(name: &str, value: &str) -> String {
        match name {
            "status" => canonical_or_raw(value, SubscriptionStatus::as_str),
            "delivery_frequency" | "frequency" => {
                canonical_or_raw(value, DeliveryFrequency::as_str)
            },
            _ => value.to_string(),
        }
    }
}

impl Listable for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => text(&self.id),
            "name" => text(&self.name),
            "category" => text(&self.category),
            "status" => text(if self.is_active { PRODUCT_ACTIVE } else { PRODUCT_INACTIVE }),
            "price" => Some(FieldValue::Number(self.price)),
            "sale_price" | "salePrice" => self.sale_price.map(FieldValue::Number),
            "stock" => Some(FieldValue::Number(f64::from(self.stock))),
            "created_at" | "createdAt" | "date" => Some(FieldValue::Date(self.created_at)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.id.as_str(), self.category.as_str()]
    }

    fn list_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn canonical_filter(name: &str, value: &str) -> String {
        match name {
            "status" => value.to_ascii_lowercase(),
            _ => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::CustomerRef;

    fn order(id: &str, status: OrderStatus, amount: f64, day: u32) -> Order {
        Order {
            id: id.to_string(),
            reference: format!("REF-{id}"),
            user: CustomerRef {
                id: format!("u{id}"),
                name: format!("Customer {id}"),
                email: format!("c{id}@example.com"),
            },
            items: vec![],
            total_amount: amount,
            delivery_fee: 0.0,
            status,
            payment_status: PaymentStatus::Completed,
            tracking: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("1", OrderStatus::Processing, 100.0, 1),
            order("2", OrderStatus::Delivered, 50.0, 2),
        ]
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn all_sentinels_return_input_unchanged() {
        let orders = sample();
        let criteria = FilterCriteria::new()
            .with_field("status", ALL)
            .with_field("payment_status", "");
        assert!(criteria.is_unconstrained());
        assert_eq!(apply_filters(&orders, &criteria), orders);
    }

    #[test]
    fn status_filter_selects_matching_rows() {
        let criteria = FilterCriteria::new().with_field("status", "delivered");
        let view = apply_filters(&sample(), &criteria);
        assert_eq!(ids(&view), vec!["2"]);
    }

    #[test]
    fn enum_filters_ignore_case() {
        let criteria = FilterCriteria::new().with_field("status", "Delivered");
        assert_eq!(ids(&apply_filters(&sample(), &criteria)), vec!["2"]);
        let criteria = FilterCriteria::new().with_field("payment_status", "COMPLETED");
        assert_eq!(apply_filters(&sample(), &criteria).len(), 2);
        let criteria = FilterCriteria::new().with_field("status", "shipped");
        assert!(apply_filters(&sample(), &criteria).is_empty());
    }

    #[test]
    fn sort_by_amount_desc() {
        let view = query(&sample(), &FilterCriteria::new(), Some(&SortSpec::desc("amount")));
        assert_eq!(ids(&view), vec!["1", "2"]);
        let view = query(&sample(), &FilterCriteria::new(), Some(&SortSpec::asc("amount")));
        assert_eq!(ids(&view), vec!["2", "1"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let orders = sample();
        let by_email = FilterCriteria::new().with_search("C2@EXAMPLE");
        assert_eq!(ids(&apply_filters(&orders, &by_email)), vec!["2"]);
        let by_ref = FilterCriteria::new().with_search("ref-1");
        assert_eq!(ids(&apply_filters(&orders, &by_ref)), vec!["1"]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let orders = vec![
            order("a", OrderStatus::Processing, 1.0, 1),
            order("b", OrderStatus::Processing, 1.0, 5),
            order("c", OrderStatus::Processing, 1.0, 9),
        ];
        let criteria = FilterCriteria::new().with_date_range(
            NaiveDate::from_ymd_opt(2026, 3, 5),
            NaiveDate::from_ymd_opt(2026, 3, 9),
        );
        assert_eq!(ids(&apply_filters(&orders, &criteria)), vec!["b", "c"]);
        let open_end = FilterCriteria::new().with_date_range(None, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(ids(&apply_filters(&orders, &open_end)), vec!["a"]);
    }

    #[test]
    fn unknown_filter_field_excludes_everything() {
        let criteria = FilterCriteria::new().with_field("warehouse", "lagos");
        assert!(apply_filters(&sample(), &criteria).is_empty());
    }

    #[test]
    fn equal_keys_keep_original_order_in_both_directions() {
        let orders = vec![
            order("a", OrderStatus::Processing, 10.0, 1),
            order("b", OrderStatus::Processing, 5.0, 1),
            order("c", OrderStatus::Processing, 10.0, 1),
            order("d", OrderStatus::Processing, 5.0, 1),
        ];
        let asc = query(&orders, &FilterCriteria::new(), Some(&SortSpec::asc("amount")));
        assert_eq!(ids(&asc), vec!["b", "d", "a", "c"]);
        let desc = query(&orders, &FilterCriteria::new(), Some(&SortSpec::desc("amount")));
        assert_eq!(ids(&desc), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        let orders = vec![
            order("a", OrderStatus::Processing, 9.0, 1),
            order("b", OrderStatus::Processing, 100.0, 1),
            order("c", OrderStatus::Processing, 25.5, 1),
        ];
        let view = query(&orders, &FilterCriteria::new(), Some(&SortSpec::asc("amount")));
        assert_eq!(ids(&view), vec!["a", "c", "b"]);
    }

    #[test]
    fn missing_keys_sort_first_ascending() {
        let mut with_tracking = order("t", OrderStatus::InTransit, 1.0, 1);
        with_tracking.tracking = Some(crate::models::Tracking {
            status: "At depot".to_string(),
            location: "Ikeja".to_string(),
            progress: 40,
        });
        let orders = vec![with_tracking, order("n", OrderStatus::Processing, 1.0, 1)];
        let view = query(&orders, &FilterCriteria::new(), Some(&SortSpec::asc("tracking_status")));
        assert_eq!(ids(&view), vec!["n", "t"]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let mut a = order("1", OrderStatus::Processing, 1.0, 1);
        a.user.name = "bola".to_string();
        let mut b = order("2", OrderStatus::Processing, 1.0, 1);
        b.user.name = "Ade".to_string();
        let view = query(&[a, b], &FilterCriteria::new(), Some(&SortSpec::asc("customer")));
        assert_eq!(ids(&view), vec!["2", "1"]);
    }

    #[test]
    fn dates_sort_chronologically() {
        let orders = vec![
            order("late", OrderStatus::Processing, 1.0, 20),
            order("early", OrderStatus::Processing, 1.0, 3),
        ];
        let view = query(&orders, &FilterCriteria::new(), Some(&SortSpec::asc("created_at")));
        assert_eq!(ids(&view), vec!["early", "late"]);
    }

    #[test]
    fn numeric_filter_matches_canonical_form() {
        let criteria = FilterCriteria::new().with_field("amount", "100");
        assert_eq!(ids(&apply_filters(&sample(), &criteria)), vec!["1"]);
    }

    #[test]
    fn sort_spec_parses_direction_suffix() {
        assert_eq!("amount:desc".parse::<SortSpec>(), Ok(SortSpec::desc("amount")));
        assert_eq!("created_at".parse::<SortSpec>(), Ok(SortSpec::asc("created_at")));
        assert!(":asc".parse::<SortSpec>().is_err());
        assert!("amount:sideways".parse::<SortSpec>().is_err());
    }

    #[test]
    fn permutation_handles_cycles() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        apply_permutation(&mut items, vec![2, 0, 3, 1]);
        assert_eq!(items, vec!['c', 'a', 'd', 'b']);
    }
}
