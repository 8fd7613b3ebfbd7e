//! Rate sheet parsing.
//!
//! The upstream document carries one `Currency` element per quoted
//! currency:
//!
//! ```xml
//! <Currency Kod="USD" CurrencyCode="USD">
//!     <Unit>1</Unit>
//!     <CurrencyName>US DOLLAR</CurrencyName>
//!     <ForexBuying>29.9510</ForexBuying>
//!     <ForexSelling>30.0050</ForexSelling>
//!     <BanknoteBuying>29.9300</BanknoteBuying>
//!     <BanknoteSelling>30.0500</BanknoteSelling>
//! </Currency>
//! ```
//!
//! Individual fields are parsed leniently: a missing or unreadable rate
//! becomes zero and never fails the whole document.

use std::borrow::Cow;
use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use roxmltree::{Document, Node, ParsingOptions};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::FetchError;
use super::types::{Currency, normalize_code};

const CURRENCY_TAG: &str = "Currency";
const CODE_ATTR: &str = "CurrencyCode";
const NAME_TAG: &str = "CurrencyName";
const FOREX_BUYING_TAG: &str = "ForexBuying";
const FOREX_SELLING_TAG: &str = "ForexSelling";
const BANKNOTE_BUYING_TAG: &str = "BanknoteBuying";
const BANKNOTE_SELLING_TAG: &str = "BanknoteSelling";

/// Parses every `Currency` element of `xml`, stamping each record with
/// `fetched_at`.
///
/// Records keep document order. When a code repeats, the first record wins.
///
/// # Errors
///
/// Returns [`FetchError::Xml`] if the document is not well-formed.
pub fn parse_feed(xml: &str, fetched_at: DateTime<Utc>) -> Result<Vec<Currency>, FetchError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| FetchError::Xml(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut currencies = Vec::new();

    for node in doc.descendants().filter(|n| n.has_tag_name(CURRENCY_TAG)) {
        let currency = parse_currency(node, fetched_at);
        if seen.insert(currency.code.clone()) {
            currencies.push(currency);
        } else {
            debug!(code = %currency.code, "Skipping duplicate currency in rate sheet");
        }
    }

    Ok(currencies)
}

fn parse_currency(node: Node<'_, '_>, fetched_at: DateTime<Utc>) -> Currency {
    let code = normalize_code(node.attribute(CODE_ATTR).unwrap_or_default());
    let name = child_text(node, NAME_TAG).map(str::trim).unwrap_or_default();

    let field = |tag: &str| {
        let raw = child_text(node, tag);
        let value = parse_decimal(raw);
        if value.is_zero() && raw.is_some_and(|r| !r.trim().is_empty()) {
            debug!(code = %code, field = tag, raw = ?raw, "Unreadable rate, using zero");
        }
        value
    };

    let forex_buying = field(FOREX_BUYING_TAG);
    let forex_selling = field(FOREX_SELLING_TAG);
    let banknote_buying = field(BANKNOTE_BUYING_TAG);
    let banknote_selling = field(BANKNOTE_SELLING_TAG);

    Currency {
        code,
        name: name.to_string(),
        forex_buying,
        forex_selling,
        banknote_buying,
        banknote_selling,
        last_updated: fetched_at,
    }
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
}

/// Parses a rate value, falling back to zero.
///
/// Accepts `.` as the decimal separator, or a lone `,` when no `.` is
/// present. Empty, unreadable, and negative values yield zero.
#[must_use]
pub fn parse_decimal(raw: Option<&str>) -> Decimal {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Decimal::ZERO;
    };

    let normalized: Cow<'_, str> = if text.contains(',') && !text.contains('.') {
        Cow::Owned(text.replacen(',', ".", 1))
    } else {
        Cow::Borrowed(text)
    };

    match Decimal::from_str(&normalized) {
        Ok(value) if !value.is_sign_negative() => value,
        _ => Decimal::ZERO,
    }
}
