//! Fixed-column tables for product listings and the low-stock report.

use crate::model::product::Product;
use crate::present::palette::Palette;
use crate::service::inventory_service::LowStockReport;

const PRODUCT_RULE_WIDTH: usize = 90;
const LOW_STOCK_RULE_WIDTH: usize = 65;
const ELLIPSIS: &str = "...";

/// Which listing a product table belongs to; picks the trailer wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCaption {
    Inventory,
    SearchResults,
}

impl TableCaption {
    fn empty_message(self) -> &'static str {
        match self {
            Self::Inventory => "No products registered in the inventory.",
            Self::SearchResults => "No products matched the search criteria.",
        }
    }

    fn count_label(self) -> &'static str {
        match self {
            Self::Inventory => "Total products",
            Self::SearchResults => "Products found",
        }
    }
}

/// Cuts `text` to `keep` characters plus `...` when it is longer than `width`.
pub fn truncate(text: &str, width: usize, keep: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated = text.chars().take(keep).collect::<String>();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Renders `products` as `ID Name Description Quantity Price Category` rows
/// followed by a count line, or a single informational line when empty.
pub fn render_products(
    products: &[Product],
    caption: TableCaption,
    palette: Palette,
) -> Vec<String> {
    if products.is_empty() {
        return vec![palette.info(caption.empty_message())];
    }

    let mut lines = Vec::with_capacity(products.len() + 4);
    lines.push(palette.menu(&format!(
        "{:<5} {:<20} {:<25} {:<10} {:<12} {:<15}",
        "ID", "Name", "Description", "Quantity", "Price", "Category"
    )));
    lines.push(palette.menu(&"─".repeat(PRODUCT_RULE_WIDTH)));

    for product in products {
        lines.push(format!(
            "{:<5} {:<20} {:<25} {:<10} ${:<11.2} {:<15}",
            product.id,
            truncate(&product.name, 20, 17),
            truncate(product.description.as_deref().unwrap_or(""), 25, 22),
            product.quantity,
            product.price,
            truncate(product.category.as_deref().unwrap_or(""), 15, 12),
        ));
    }

    lines.push(String::new());
    lines.push(palette.info(&format!("{}: {}", caption.count_label(), products.len())));
    lines
}

/// Renders the low-stock report; out-of-stock rows are flagged and painted
/// as errors.
pub fn render_low_stock(report: &LowStockReport, palette: Palette) -> Vec<String> {
    if report.entries.is_empty() {
        return vec![palette.success(&format!(
            "No products with stock at or below {}.",
            report.threshold
        ))];
    }

    let mut lines = Vec::with_capacity(report.entries.len() + 5);
    lines.push(palette.error(&format!("Products with stock <= {}:", report.threshold)));
    lines.push(palette.menu(&format!(
        "{:<5} {:<25} {:<10} {:<15}",
        "ID", "Name", "Quantity", "Category"
    )));
    lines.push(palette.menu(&"─".repeat(LOW_STOCK_RULE_WIDTH)));

    for entry in &report.entries {
        let product = &entry.product;
        let row = format!(
            "{:<5} {:<25} {:<10} {:<15}",
            product.id,
            truncate(&product.name, 25, 22),
            product.quantity,
            truncate(product.category.as_deref().unwrap_or(""), 15, 12),
        );
        if entry.out_of_stock {
            lines.push(palette.error(&format!("{row} <- OUT OF STOCK")));
        } else {
            lines.push(row);
        }
    }

    lines.push(String::new());
    lines.push(palette.info(&format!(
        "Total low-stock products: {}",
        report.entries.len()
    )));
    lines
}
