use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;

use crate::matcher::{MatchedItem, NOT_AVAILABLE};

/// GST surcharge applied to the total investment. A fixed business
/// constant, not configuration: the letter text names the 8% rate.
pub const GST_RATE_PERCENT: u32 = 8;

/// Summary table columns, in construction order. The exported workbook
/// must use exactly this order.
pub const SUMMARY_HEADERS: [&str; 10] = [
    "Req. Ref.",
    "Project",
    "Site",
    "Env.",
    "Type",
    "Items",
    "Qty (GiB)",
    "Unit Cost",
    "Total Cost",
    "Quote Reference #",
];

const VALID_TIL: &str = "90 days from date of quotation";

const LETTER_TEMPLATE: &str = r"Our Ref: {{ our_ref }}
Date: {{ date }}
Valid Til: {{ valid_til }}

To: {{ to }}
Platform: Open System Storage
Company: United Overseas Bank Limited

From: {{ sender }}
Subject: {{ subject }}
Company: S&I Systems Private Limited
No Of Pages: 1

-----------------------------------------------------------------------------------------

Dear {{ greeting }},

Thank you for giving S&I this opportunity to propose the following offer for your new infrastructure requirements.
We hope that you will find our proposal favorable and do feel free to call us should you require any further clarifications or information.

Investment Summary:
-------------------
- Total Investment: {{ total_investment }}
- Total Investment (Incl. GST): {{ total_with_gst }}

For a detailed breakdown, please download the attached Excel file.

Delivery and Payment Terms
- Validity: Price is valid for 90 days from date of quotation.
- Delivery: 4 to 8 weeks upon receipt of order confirmation.

GENERAL TERMS & CONDITIONS
- Payment: S&I shall invoice the Customer in accordance with the agreed payment schedule in this agreement, and the Customer agrees to abide by the payment schedule and pay promptly in full all due invoices (for undisputed invoices) within the agreed 30 days from date of invoice.
- Taxes: The above prices are subject to prevailing GST at the date of purchase.
- Title of Goods: Title of goods will remain with S&I until full payment is received.
- Governing Law: This agreement shall be governed by and interpreted in accordance with the laws of the Republic of Singapore.

The Sales quotation is governed by the terms and conditions defined in the MSA signed between UOB and S&I dated 29th Aug 2018.
This quotation shall not be effective until executed by the Customer (via Purchase Order and/or Statement of Work (SOW)) and accepted by S&I. Subsequent amendments or changes to the details contained in this Agreement have to be in writing and signed by both S&I and the Customer.

We thank you and hope to hear from you soon.

Thanks & Best regards,
S&I Systems Private Limited
";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Letter template failed to render: {0}")]
    Template(#[from] tera::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Header fields extracted from the email body. Every field falls back to
/// the `"N/A"` sentinel when the model could not find it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationDetails {
    pub our_ref: String,
    pub date: String,
    pub to: String,
    pub from: String,
    pub subject: String,
}

impl Default for QuotationDetails {
    fn default() -> Self {
        Self {
            our_ref: NOT_AVAILABLE.into(),
            date: NOT_AVAILABLE.into(),
            to: NOT_AVAILABLE.into(),
            from: NOT_AVAILABLE.into(),
            subject: NOT_AVAILABLE.into(),
        }
    }
}

/// The assembled quotation: header details, matched rows, and the two
/// aggregate figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub details: QuotationDetails,
    pub items: Vec<MatchedItem>,
    pub total_investment: Decimal,
    pub total_with_gst: Decimal,
}

impl Quotation {
    /// Compute the aggregates and apply the reference-number precedence
    /// rule: when any rows matched, the first row's quote reference
    /// supersedes whatever the model extracted (the sentinel if that row
    /// is unmatched).
    #[must_use]
    pub fn assemble(mut details: QuotationDetails, items: Vec<MatchedItem>) -> Self {
        let total_investment: Decimal = items.iter().filter_map(|i| i.total_cost).sum();
        let gst_multiplier = Decimal::new(100 + i64::from(GST_RATE_PERCENT), 2);
        let total_with_gst = (total_investment * gst_multiplier).round_dp(2);

        if let Some(first) = items.first() {
            details.our_ref = first
                .quote_reference
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.into());
        }

        Self {
            details,
            items,
            total_investment,
            total_with_gst,
        }
    }

    /// Render the single-page quotation letter.
    pub fn render_letter(&self) -> RenderResult<String> {
        let mut context = Context::new();
        context.insert("our_ref", &self.details.our_ref);
        context.insert("date", &self.details.date);
        context.insert("valid_til", VALID_TIL);
        context.insert("to", &self.details.to);
        context.insert("sender", &self.details.from);
        context.insert("subject", &self.details.subject);
        context.insert("greeting", &greeting_name(&self.details.to));
        context.insert("total_investment", &format!("{:.2}", self.total_investment));
        context.insert("total_with_gst", &format!("{:.2}", self.total_with_gst));

        Ok(Tera::one_off(LETTER_TEMPLATE, &context, false)?)
    }

    /// The summary table as display strings: one row per matched item plus
    /// the two synthetic aggregate rows, columns per [`SUMMARY_HEADERS`].
    #[must_use]
    pub fn summary_rows(&self) -> Vec<[String; 10]> {
        let mut rows: Vec<[String; 10]> = self
            .items
            .iter()
            .map(|m| {
                [
                    m.item.req_ref.clone(),
                    m.item.project.clone(),
                    m.item.site.clone(),
                    m.item.env.clone(),
                    m.item.kind.clone(),
                    m.item.items.clone(),
                    m.item.qty.clone(),
                    money_cell(m.unit_cost),
                    money_cell(m.total_cost),
                    m.quote_reference
                        .clone()
                        .unwrap_or_else(|| NOT_AVAILABLE.into()),
                ]
            })
            .collect();

        rows.push(aggregate_row("Total Investments", self.total_investment));
        rows.push(aggregate_row(
            "Total Investments incl. 8% GST",
            self.total_with_gst,
        ));

        rows
    }
}

fn aggregate_row(label: &str, amount: Decimal) -> [String; 10] {
    let mut row: [String; 10] = Default::default();
    row[5] = label.to_string();
    row[8] = format!("{amount:.2}");
    row
}

fn money_cell(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| NOT_AVAILABLE.into(), |a| format!("{a:.2}"))
}

/// The salutation name: the recipient string up to the first `@`, when one
/// is present, otherwise the whole recipient string.
fn greeting_name(to: &str) -> String {
    match to.split_once('@') {
        Some((prefix, _)) => prefix.trim().to_string(),
        None => to.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::LineItem;

    fn matched(total: Option<i64>, quote_ref: Option<&str>, score: f64) -> MatchedItem {
        MatchedItem {
            item: LineItem {
                req_ref: "R1".into(),
                project: "P1".into(),
                site: "S1".into(),
                env: "Prod".into(),
                kind: "Storage".into(),
                items: "2TB SSD".into(),
                qty: "2".into(),
            },
            unit_cost: total.map(|t| Decimal::from(t / 2)),
            total_cost: total.map(Decimal::from),
            quote_reference: quote_ref.map(Into::into),
            match_score: score,
        }
    }

    #[test]
    fn test_total_investment_treats_unmatched_as_zero() {
        let quotation = Quotation::assemble(
            QuotationDetails::default(),
            vec![
                matched(Some(200), Some("Q1"), 100.0),
                matched(None, None, 0.0),
                matched(Some(360), Some("Q2"), 95.0),
            ],
        );

        assert_eq!(quotation.total_investment, Decimal::from(560));
    }

    #[test]
    fn test_gst_total() {
        let quotation = Quotation::assemble(
            QuotationDetails::default(),
            vec![matched(Some(1000), Some("Q1"), 100.0)],
        );

        assert_eq!(quotation.total_investment, Decimal::from(1000));
        assert_eq!(quotation.total_with_gst, Decimal::new(108_000, 2));
        assert_eq!(format!("{:.2}", quotation.total_with_gst), "1080.00");
    }

    #[test]
    fn test_our_ref_precedence() {
        let details = QuotationDetails {
            our_ref: "SSR2024-040".into(),
            ..QuotationDetails::default()
        };
        let quotation =
            Quotation::assemble(details, vec![matched(Some(200), Some("Q1"), 100.0)]);

        assert_eq!(quotation.details.our_ref, "Q1");
    }

    #[test]
    fn test_our_ref_kept_when_no_rows() {
        let details = QuotationDetails {
            our_ref: "SSR2024-040".into(),
            ..QuotationDetails::default()
        };
        let quotation = Quotation::assemble(details, Vec::new());

        assert_eq!(quotation.details.our_ref, "SSR2024-040");
    }

    #[test]
    fn test_our_ref_sentinel_when_first_row_unmatched() {
        let details = QuotationDetails {
            our_ref: "SSR2024-040".into(),
            ..QuotationDetails::default()
        };
        let quotation = Quotation::assemble(details, vec![matched(None, None, 0.0)]);

        assert_eq!(quotation.details.our_ref, NOT_AVAILABLE);
    }

    #[test]
    fn test_summary_rows_append_aggregates() {
        let quotation = Quotation::assemble(
            QuotationDetails::default(),
            vec![matched(Some(200), Some("Q1"), 100.0)],
        );

        let rows = quotation.summary_rows();
        assert_eq!(rows.len(), 3);

        let totals = &rows[1];
        assert_eq!(totals[5], "Total Investments");
        assert_eq!(totals[8], "200.00");
        assert!(totals[0].is_empty());
        assert!(totals[9].is_empty());

        let with_gst = &rows[2];
        assert_eq!(with_gst[5], "Total Investments incl. 8% GST");
        assert_eq!(with_gst[8], "216.00");
    }

    #[test]
    fn test_letter_renders_greeting_and_totals() {
        let details = QuotationDetails {
            to: "Abella Jake Yabut @ 64138413".into(),
            ..QuotationDetails::default()
        };
        let quotation =
            Quotation::assemble(details, vec![matched(Some(1000), Some("Q1"), 100.0)]);

        let letter = quotation.render_letter().unwrap();

        assert!(letter.contains("Dear Abella Jake Yabut,"));
        assert!(letter.contains("Our Ref: Q1"));
        assert!(letter.contains("- Total Investment: 1000.00"));
        assert!(letter.contains("- Total Investment (Incl. GST): 1080.00"));
        assert!(letter.contains("Valid Til: 90 days from date of quotation"));
        assert!(letter.contains("please download the attached Excel file"));
    }

    #[test]
    fn test_greeting_without_at_uses_full_recipient() {
        let details = QuotationDetails {
            to: "Lionel Tan".into(),
            ..QuotationDetails::default()
        };
        let quotation = Quotation::assemble(details, Vec::new());

        let letter = quotation.render_letter().unwrap();
        assert!(letter.contains("Dear Lionel Tan,"));
    }
}
