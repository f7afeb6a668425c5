use anyhow::Result;
use gasdash_shared::{
    format::{format_currency, format_datetime, humanize},
    Order, Product, Subscription,
};
use serde::Serialize;

use crate::cli::OutputFormat;

const CURRENCY: &str = "";

/// Columns shown by `list` commands.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for Order {
    const COLUMNS: &'static [&'static str] =
        &["id", "reference", "customer", "total", "status", "payment", "created"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.reference.clone(),
            self.user.name.clone(),
            format_currency(self.total_amount, CURRENCY),
            humanize(self.status.as_str()),
            humanize(self.payment_status.as_str()),
            format_datetime(&self.created_at),
        ]
    }
}

impl TableRow for Subscription {
    const COLUMNS: &'static [&'static str] =
        &["id", "customer", "plan", "cylinder", "frequency", "price", "status", "start"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user.name.clone(),
            self.plan_name.clone(),
            self.cylinder_size.clone(),
            humanize(self.delivery_frequency.as_str()),
            format_currency(self.price, CURRENCY),
            humanize(self.status.as_str()),
            self.start_date.to_string(),
        ]
    }
}

impl TableRow for Product {
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "category", "price", "sale", "stock", "active"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            format_currency(self.price, CURRENCY),
            self.sale_price
                .map(|price| format_currency(price, CURRENCY))
                .unwrap_or_default(),
            self.stock.to_string(),
            if self.is_active { "yes" } else { "no" }.to_string(),
        ]
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_rows<T: TableRow + Serialize>(rows: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(rows),
        OutputFormat::Table => {
            print!("{}", render_table(rows));
            Ok(())
        },
        OutputFormat::Vertical => {
            print!("{}", render_vertical(rows));
            Ok(())
        },
    }
}

pub fn render_table<T: TableRow>(rows: &[T]) -> String {
    let cells = rows.iter().map(TableRow::cells).collect::<Vec<_>>();
    let mut widths = T::COLUMNS
        .iter()
        .map(|column| column.chars().count())
        .collect::<Vec<_>>();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, T::COLUMNS.iter().copied(), &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&format!("({} rows)\n", rows.len()));
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_vertical<T: TableRow>(rows: &[T]) -> String {
    let label_width = T::COLUMNS
        .iter()
        .map(|column| column.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&format!("*** row {} ***\n", index + 1));
        for (column, cell) in T::COLUMNS.iter().zip(row.cells()) {
            out.push_str(&format!("{column:>label_width$}: {cell}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: 38000.0,
            stock: 4,
            category: "cylinders".to_string(),
            is_active: true,
            sale_price: None,
            specifications: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let table = render_table(&[product("p1", "6kg Cylinder"), product("p22", "Hose")]);
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "id   name          category   price      sale  stock  active");
        assert_eq!(lines[2], "p1   6kg Cylinder  cylinders  38,000.00        4      yes");
        assert_eq!(lines.last().copied(), Some("(2 rows)"));
    }

    #[test]
    fn vertical_lists_one_field_per_line() {
        let text = render_vertical(&[product("p1", "Hose")]);
        assert!(text.starts_with("*** row 1 ***\n"));
        assert!(text.contains("    name: Hose\n"));
    }
}
