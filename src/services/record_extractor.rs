use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use crate::{configuration::DirectorySelectors, domain::record::Record};

#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// A paragraph as the browser renders it: its text content and the markup
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub inner_html: String,
}

/// Read access to one result card.
pub trait CardNode {
    /// Text content of the first descendant matching `selector`.
    fn first_text(&self, selector: &str) -> Result<Option<String>, CardError>;

    /// Every descendant matching `selector`, in document order.
    fn paragraphs(&self, selector: &str) -> Result<Vec<Paragraph>, CardError>;
}

fn parse_selector(selector: &str) -> Result<Selector, CardError> {
    Selector::parse(selector).map_err(|e| CardError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl CardNode for ElementRef<'_> {
    fn first_text(&self, selector: &str) -> Result<Option<String>, CardError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .select(&selector)
            .next()
            .map(|element| element.text().collect()))
    }

    fn paragraphs(&self, selector: &str) -> Result<Vec<Paragraph>, CardError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .select(&selector)
            .map(|element| Paragraph {
                text: element.text().collect(),
                inner_html: element.inner_html(),
            })
            .collect())
    }
}

/// Builds a record from one card. Missing parts of the card leave the
/// matching fields empty.
pub fn extract_record<C: CardNode>(
    card: &C,
    selectors: &DirectorySelectors,
) -> Result<Record, CardError> {
    let name = card.first_text(&selectors.name)?.unwrap_or_default();
    let header_location = card
        .first_text(&selectors.header_location)?
        .unwrap_or_default();

    let lead = card.paragraphs(&selectors.lead_paragraphs)?;
    let lead_text = |i: usize| lead.get(i).map(|p| p.text.trim().to_string());

    let body = card.paragraphs(&selectors.body_paragraphs)?;

    Ok(Record {
        name: name.trim().to_string(),
        header_location: header_location.trim().to_string(),
        organization: lead_text(0),
        address_line1: lead_text(1),
        address_line2: lead_text(2),
        phone: labelled_value(&body, "Phone:"),
        fax: labelled_value(&body, "Fax:"),
        certification_details: body
            .iter()
            .find(|p| p.text.contains("certified") && p.text.contains("expire"))
            .map(|p| p.text.trim().to_string()),
    })
}

// Value of the first paragraph carrying a bold `label`, with the label removed.
fn labelled_value(paragraphs: &[Paragraph], label: &str) -> Option<String> {
    let marker = format!("<b>{}</b>", label);
    paragraphs
        .iter()
        .find(|p| p.inner_html.contains(&marker))
        .map(|p| p.text.replacen(label, "", 1).trim().to_string())
}

/// Extracts every card, in order. Cards that fail are logged and left out.
pub fn extract_cards<C, I>(cards: I, selectors: &DirectorySelectors) -> Vec<Record>
where
    C: CardNode,
    I: IntoIterator<Item = C>,
{
    cards
        .into_iter()
        .filter_map(|card| match extract_record(&card, selectors) {
            Ok(record) => Some(record),
            Err(e) => {
                log::error!("Error extracting individual: {}", e);
                None
            }
        })
        .collect()
}

/// Extracts the records from a rendered result page.
pub fn extract_records(html: &str, selectors: &DirectorySelectors) -> Vec<Record> {
    let card_selector = match parse_selector(&selectors.card) {
        Ok(selector) => selector,
        Err(e) => {
            log::error!("Cannot locate result cards: {}", e);
            return vec![];
        }
    };
    let document = Html::parse_document(html);

    extract_cards(document.select(&card_selector), selectors)
}
