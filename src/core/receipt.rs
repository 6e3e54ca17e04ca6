//! Receipt Composer
//!
//! Assembles the fixed-layout shipping receipt as a structured content
//! tree. Actual page rendering happens in the external document renderer;
//! this module only decides what goes where, mirroring the historical
//! layout: header, tracking/method line, FROM/TO block, package detail
//! table, totals, footer.

use serde::Serialize;

use crate::models::ShipmentRecord;

// Brand palette (hex, passed through to the renderer as style hints)
pub const BRAND_YELLOW: &str = "#FDB813";
pub const BRAND_BLUE: &str = "#205875";
pub const LIGHT_BLUE: &str = "#E8F1F5";

/// Page geometry handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct PageSetup {
    pub size: String,
    pub margin_mm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: "A4".to_string(),
            margin_mm: 15.0,
        }
    }
}

/// One element of the content tree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocElement {
    Table {
        /// Column widths in millimetres
        col_widths_mm: Vec<f64>,
        rows: Vec<Vec<String>>,
        /// Renderer style hint ("header", "grid", "totals", ...)
        style: String,
        /// Background accent for the first row, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        accent: Option<String>,
    },
    Paragraph {
        text: String,
        style: String,
        color: String,
    },
    Spacer {
        height_mm: f64,
    },
}

/// Structured document passed to the external rendering service.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub page: PageSetup,
    pub elements: Vec<DocElement>,
}

/// Per-kg rate string. Zero weight would divide by zero; render "N/A"
/// instead of faulting.
fn rate_per_kg(shipping_cost: f64, package_weight: f64) -> String {
    if package_weight > 0.0 {
        format!("${:.2}/kg", shipping_cost / package_weight)
    } else {
        "N/A".to_string()
    }
}

fn opt(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

/// Build the receipt content tree for a shipment record.
pub fn compose_receipt(record: &ShipmentRecord) -> Document {
    let mut elements = Vec::new();

    // Header with company info
    elements.push(DocElement::Table {
        col_widths_mm: vec![25.0, 70.0, 30.0, 50.0],
        rows: vec![
            vec![
                "[logo]".to_string(),
                "SHIPPING RECEIPT".to_string(),
                String::new(),
                format!("Receipt #{}", record.package_id),
            ],
            vec![
                String::new(),
                "CHASEXPRESS".to_string(),
                String::new(),
                format!("Date: {}", record.shipping_date.format("%Y-%m-%d")),
            ],
        ],
        style: "header".to_string(),
        accent: None,
    });
    elements.push(DocElement::Spacer { height_mm: 10.0 });

    // Tracking number and shipping method line
    elements.push(DocElement::Table {
        col_widths_mm: vec![35.0, 55.0, 35.0, 55.0],
        rows: vec![vec![
            "TRACKING NUMBER:".to_string(),
            record.tracking_code.clone(),
            "SHIPPING METHOD:".to_string(),
            record.mode_of_transit.label().to_string(),
        ]],
        style: "grid".to_string(),
        accent: Some(LIGHT_BLUE.to_string()),
    });
    elements.push(DocElement::Spacer { height_mm: 5.0 });

    // Sender / receiver in two columns
    elements.push(DocElement::Table {
        col_widths_mm: vec![90.0, 90.0],
        rows: vec![
            vec!["FROM:".to_string(), "TO:".to_string()],
            vec![opt(&record.sender), opt(&record.receiver)],
            vec![opt(&record.sending_location), opt(&record.receiving_location)],
            vec![opt(&record.tel), opt(&record.email)],
            vec![String::new(), String::new()],
        ],
        style: "grid".to_string(),
        accent: Some(LIGHT_BLUE.to_string()),
    });
    elements.push(DocElement::Spacer { height_mm: 5.0 });

    // Package detail table
    elements.push(DocElement::Table {
        col_widths_mm: vec![90.0, 30.0, 30.0, 30.0],
        rows: vec![
            vec![
                "PACKAGE DETAILS".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ],
            vec![
                "Description".to_string(),
                "Weight".to_string(),
                "Rate".to_string(),
                "Amount".to_string(),
            ],
            vec![
                record.package_name.clone(),
                format!("{} kg", record.package_weight),
                rate_per_kg(record.shipping_cost, record.package_weight),
                format!("${:.2}", record.shipping_cost),
            ],
        ],
        style: "grid".to_string(),
        accent: Some(LIGHT_BLUE.to_string()),
    });
    elements.push(DocElement::Spacer { height_mm: 5.0 });

    // Totals: subtotal, 10% tax, 110% total
    let subtotal = record.shipping_cost;
    elements.push(DocElement::Table {
        col_widths_mm: vec![90.0, 30.0, 30.0, 30.0],
        rows: vec![
            vec![
                String::new(),
                String::new(),
                "Subtotal:".to_string(),
                format!("${:.2}", subtotal),
            ],
            vec![
                String::new(),
                String::new(),
                "Tax (10%):".to_string(),
                format!("${:.2}", subtotal * 0.1),
            ],
            vec![
                String::new(),
                String::new(),
                "Total:".to_string(),
                format!("${:.2}", subtotal * 1.1),
            ],
        ],
        style: "totals".to_string(),
        accent: None,
    });
    elements.push(DocElement::Spacer { height_mm: 10.0 });

    elements.push(DocElement::Paragraph {
        text: "Thank you for choosing CHASEXPRESS!\n visit www.chaselogix.com".to_string(),
        style: "footer".to_string(),
        color: BRAND_BLUE.to_string(),
    });

    Document {
        page: PageSetup::default(),
        elements,
    }
}
