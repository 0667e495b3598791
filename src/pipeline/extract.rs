//! Product-card extraction from HTML.
//!
//! Each card is read independently. A card without a discount is dropped with a
//! warning; a card missing any other required element is either skipped or ends
//! the scan, depending on the configured [`ErrorPolicy`].

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{ErrorPolicy, Selectors};
use crate::records::RawProduct;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("missing {field} element")]
    MissingElement { field: &'static str },
    #[error("missing {attribute:?} attribute on {field} element")]
    MissingAttribute {
        field: &'static str,
        attribute: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoDiscount,
    Malformed(ExtractError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Extracted(RawProduct),
    Skipped {
        index: usize,
        card_id: Option<String>,
        reason: SkipReason,
    },
}

/// Per-card outcomes in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub outcomes: Vec<CardOutcome>,
    /// Cards matched in the document, including any never visited after an abort.
    pub cards: usize,
    pub aborted: bool,
}

impl Extraction {
    pub fn into_products(self) -> Vec<RawProduct> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                CardOutcome::Extracted(p) => Some(p),
                CardOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CardOutcome::Skipped { .. }))
            .count()
    }
}

pub struct CardExtractor {
    card: Selector,
    name: Selector,
    price: Selector,
    rating: Selector,
    image: Selector,
    discount: Selector,
    image_attr: String,
    date_attr: String,
    id_attr: String,
    policy: ErrorPolicy,
}

impl CardExtractor {
    pub fn new(selectors: &Selectors, policy: ErrorPolicy) -> Result<Self, ExtractError> {
        Ok(CardExtractor {
            card: compile(&selectors.card)?,
            name: compile(&selectors.name)?,
            price: compile(&selectors.price)?,
            rating: compile(&selectors.rating)?,
            image: compile(&selectors.image)?,
            discount: compile(&selectors.discount)?,
            image_attr: selectors.image_attr.clone(),
            date_attr: selectors.date_attr.clone(),
            id_attr: selectors.id_attr.clone(),
            policy,
        })
    }

    pub fn extract(&self, html: &str) -> Extraction {
        info!("Extracting product cards");
        let doc = Html::parse_document(html);
        let cards: Vec<ElementRef> = doc.select(&self.card).collect();

        let mut extraction = Extraction {
            outcomes: Vec::with_capacity(cards.len()),
            cards: cards.len(),
            aborted: false,
        };

        for (index, card) in cards.iter().enumerate() {
            let card_id = card.value().attr(&self.id_attr).map(str::to_string);
            match self.read_card(card) {
                Ok(Some(product)) => {
                    debug!("Card {}: {} ({})", index, product.name, product.image_url);
                    extraction.outcomes.push(CardOutcome::Extracted(product));
                }
                Ok(None) => {
                    let name = first_text(card, &self.name).unwrap_or_default();
                    warn!(
                        "Product {:?} ({}) skipped: no discount tag",
                        card_id.as_deref().unwrap_or("?"),
                        name
                    );
                    extraction.outcomes.push(CardOutcome::Skipped {
                        index,
                        card_id,
                        reason: SkipReason::NoDiscount,
                    });
                }
                Err(e) => {
                    error!(
                        "Failed to extract card {} ({:?}): {}",
                        index,
                        card_id.as_deref().unwrap_or("?"),
                        e
                    );
                    extraction.outcomes.push(CardOutcome::Skipped {
                        index,
                        card_id,
                        reason: SkipReason::Malformed(e),
                    });
                    if self.policy == ErrorPolicy::Abort {
                        error!(
                            "Extraction aborted; {} later card(s) not read",
                            cards.len() - index - 1
                        );
                        extraction.aborted = true;
                        break;
                    }
                }
            }
        }

        info!(
            "Extracted {} of {} cards ({} skipped)",
            extraction.outcomes.len() - extraction.skipped(),
            extraction.cards,
            extraction.skipped()
        );
        extraction
    }

    /// `Ok(None)` when the card has no discount tag.
    fn read_card(&self, card: &ElementRef) -> Result<Option<RawProduct>, ExtractError> {
        let name = required_text(card, &self.name, "name")?;
        let price = required_text(card, &self.price, "price")?;
        let rating = required_text(card, &self.rating, "rating")?;
        let image_url = card
            .select(&self.image)
            .next()
            .ok_or(ExtractError::MissingElement { field: "image" })?
            .value()
            .attr(&self.image_attr)
            .ok_or_else(|| ExtractError::MissingAttribute {
                field: "image",
                attribute: self.image_attr.clone(),
            })?
            .to_string();
        let registered_on = card.value().attr(&self.date_attr).map(str::to_string);

        let Some(discount) = first_text(card, &self.discount) else {
            return Ok(None);
        };

        Ok(Some(RawProduct {
            card_id: card.value().attr(&self.id_attr).map(str::to_string),
            name,
            price,
            rating,
            image_url,
            registered_on,
            discount,
        }))
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn first_text(el: &ElementRef, selector: &Selector) -> Option<String> {
    el.select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

fn required_text(
    el: &ElementRef,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    first_text(el, selector).ok_or(ExtractError::MissingElement { field })
}
