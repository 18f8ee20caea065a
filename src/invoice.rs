//! Printable invoice
//!
//! Renders a placed [`Order`] as a self-contained HTML page. The browser's
//! print dialog turns it into a PDF; nothing here knows about that.

use crate::domain::aggregates::{Order, TaxMode};
use crate::domain::value_objects::Money;

pub struct Invoice<'a> {
    order: &'a Order,
    store_name: &'a str,
    currency: &'a str,
}

impl<'a> Invoice<'a> {
    pub fn new(order: &'a Order, store_name: &'a str, currency: &'a str) -> Self {
        Self { order, store_name, currency }
    }

    pub fn render_html(&self) -> String {
        let order = self.order;
        let b = order.breakdown();
        let p = order.payable();
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>Invoice {}</title>\n", escape(order.order_number())));
        html.push_str("<style>table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:4px 8px}td.num{text-align:right}</style>\n");
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape(self.store_name)));
        html.push_str(&format!(
            "<p>Invoice <strong>{}</strong><br>Date: {}</p>\n",
            escape(order.order_number()),
            order.placed_at().format("%d %b %Y")
        ));
        if let Some(customer) = order.customer() {
            html.push_str(&format!("<p>Billed to: {}</p>\n", escape(customer)));
        }

        html.push_str("<table>\n<tr><th>Item</th><th>Qty</th><th>MRP</th><th>Price</th><th>Tax</th><th>Amount</th></tr>\n");
        for line in order.lines() {
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape(&line.product.name),
                line.quantity.value(),
                self.money(line.unit_mrp()),
                self.money(line.unit_price()),
                tax_label(line.tax_mode()),
                self.money(line.price_total()),
            ));
        }

        self.row(&mut html, "Subtotal", b.subtotal);
        self.row(&mut html, "Discount", b.line_discount_total);
        if !b.extra_discount_total.is_zero() {
            self.row(&mut html, "Extra discount", b.extra_discount_total.round_to_unit());
        }
        let gst = b.gst_total.round_to_unit();
        if !gst.is_zero() {
            self.row(&mut html, "GST", gst);
        } else {
            self.row(&mut html, "IGST", b.igst_total.round_to_unit());
            self.row(&mut html, "SGST", b.sgst_total.round_to_unit());
        }
        self.row(&mut html, "Delivery", b.delivery_charge);
        if !p.wallet_applied.is_zero() {
            self.row(&mut html, "Wallet", p.wallet_applied);
        }
        html.push_str(&format!(
            "<tr><th colspan=\"5\">Total</th><th class=\"num\">{}</th></tr>\n</table>\n</body>\n</html>\n",
            self.money(p.payable)
        ));
        html
    }

    fn row(&self, html: &mut String, label: &str, amount: Money) {
        html.push_str(&format!("<tr><td colspan=\"5\">{}</td><td class=\"num\">{}</td></tr>\n", label, self.money(amount)));
    }

    fn money(&self, amount: Money) -> String { format!("{} {}", escape(self.currency), amount) }
}

fn tax_label(mode: &TaxMode) -> String {
    match mode {
        TaxMode::Gst { gst_percent } => format!("GST {}%", gst_percent.value().normalize()),
        TaxMode::Split { sgst_percent, igst_percent } => {
            format!("IGST {}% / SGST {}%", igst_percent.value().normalize(), sgst_percent.value().normalize())
        }
        TaxMode::None => "-".to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
