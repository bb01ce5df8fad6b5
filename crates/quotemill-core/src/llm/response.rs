//! Parsing of the model's semi-structured detail output.
//!
//! The response is untrusted, loosely-structured text. This parser accepts
//! the requested `**Label**: value` form (with or without the bold
//! markers), takes the first hit per label, and falls back to the `"N/A"`
//! sentinel for anything missing.

use regex::Regex;

use crate::matcher::NOT_AVAILABLE;
use crate::quotation::QuotationDetails;

const LABEL_OUR_REF: &str = "Our Ref";
const LABEL_DATE: &str = "Date";
const LABEL_TO: &str = "To";
const LABEL_FROM: &str = "From";
const LABEL_SUBJECT: &str = "Subject/Prj Name";

#[must_use]
pub fn parse_details(response: &str) -> QuotationDetails {
    QuotationDetails {
        our_ref: field(response, LABEL_OUR_REF),
        date: field(response, LABEL_DATE),
        to: field(response, LABEL_TO),
        from: field(response, LABEL_FROM),
        subject: field(response, LABEL_SUBJECT),
    }
}

fn field(response: &str, label: &str) -> String {
    let pattern = format!(
        r"(?m)^\s*\*{{0,2}}{}\*{{0,2}}\s*:\s*(.+)$",
        regex::escape(label)
    );

    let Ok(re) = Regex::new(&pattern) else {
        return NOT_AVAILABLE.into();
    };

    re.captures(response)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map_or_else(|| NOT_AVAILABLE.into(), ToString::to_string)
}
