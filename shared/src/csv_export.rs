//! CSV text for the "Export" buttons.
//!
//! Every field is double-quoted with inner quotes doubled, fields are joined
//! by commas and rows by `\n`. The first row is a fixed header.

use crate::models::{Order, Product, Subscription};

/// Rows that know how to render themselves for export.
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    fn csv_fields(&self) -> Vec<String>;
}

pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn join_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| quote(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn to_csv<T: CsvRow>(rows: &[T]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_row(T::HEADER));
    lines.extend(rows.iter().map(|row| join_row(&row.csv_fields())));
    lines.join("\n")
}

/// Suggested download name, e.g. `orders-2026-03-01.csv`.
pub fn export_filename(prefix: &str, date: chrono::NaiveDate) -> String {
    format!("{prefix}-{}.csv", date.format("%Y-%m-%d"))
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

impl CsvRow for Order {
    const HEADER: &'static [&'static str] = &[
        "Order ID",
        "Reference",
        "Customer",
        "Email",
        "Items",
        "Total",
        "Delivery Fee",
        "Status",
        "Payment",
        "Created",
    ];

    fn csv_fields(&self) -> Vec<String> {
        let items = self
            .items
            .iter()
            .map(|item| format!("{} x{}", item.product_name, item.quantity))
            .collect::<Vec<_>>()
            .join("; ");
        vec![
            self.id.clone(),
            self.reference.clone(),
            self.user.name.clone(),
            self.user.email.clone(),
            items,
            money(self.total_amount),
            money(self.delivery_fee),
            self.status.to_string(),
            self.payment_status.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl CsvRow for Subscription {
    const HEADER: &'static [&'static str] = &[
        "Subscription ID",
        "Customer",
        "Email",
        "Plan",
        "Cylinder",
        "Frequency",
        "Price",
        "Status",
        "Start",
        "End",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.name.clone(),
            self.user.email.clone(),
            self.plan_name.clone(),
            self.cylinder_size.clone(),
            self.delivery_frequency.to_string(),
            money(self.price),
            self.status.to_string(),
            self.start_date.to_string(),
            self.end_date.map(|d| d.to_string()).unwrap_or_default(),
        ]
    }
}

impl CsvRow for Product {
    const HEADER: &'static [&'static str] =
        &["Product ID", "Name", "Category", "Price", "Sale Price", "Stock", "Active"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            money(self.price),
            self.sale_price.map(money).unwrap_or_default(),
            self.stock.to_string(),
            if self.is_active { "yes" } else { "no" }.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(quote(r#"12" hose"#), r#""12"" hose""#);
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn header_row_comes_first_and_rows_follow() {
        let product = Product {
            id: "p1".to_string(),
            name: "Regulator, brass".to_string(),
            description: String::new(),
            price: 4500.0,
            stock: 12,
            category: "accessories".to_string(),
            is_active: false,
            sale_price: None,
            specifications: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        };
        let csv = to_csv(&[product]);
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#""Product ID","Name","Category","Price","Sale Price","Stock","Active""#
        );
        assert_eq!(
            lines[1],
            r#""p1","Regulator, brass","accessories","4500.00","","12","no""#
        );
    }

    #[test]
    fn empty_export_still_has_a_header() {
        let csv = to_csv::<Order>(&[]);
        assert!(csv.starts_with("\"Order ID\""));
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn filename_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(export_filename("orders", date), "orders-2026-03-01.csv");
    }
}
