use tracing::{info, warn};

use super::clean;
use crate::config::NumberFormat;
use crate::records::{Offer, OfferTable, RawProduct};

pub struct Transformer {
    format: NumberFormat,
}

impl Transformer {
    pub fn new(format: NumberFormat) -> Self {
        Transformer { format }
    }

    pub fn transform(&self, products: &[RawProduct]) -> OfferTable {
        info!("Transforming {} records", products.len());
        if products.is_empty() {
            warn!("No records to transform");
            return OfferTable::default();
        }

        info!("Parsing prices");
        let prices: Vec<_> = products
            .iter()
            .map(|p| clean::parse_price(&p.price, &self.format))
            .collect();

        info!("Parsing discounts (e.g. \"10% OFF\") into percentages");
        let discounts: Vec<_> = products
            .iter()
            .map(|p| clean::parse_discount(&p.discount))
            .collect();

        info!("Normalizing ratings to a 0-100 scale");
        let ratings: Vec<_> = products.iter().map(|p| clean::parse_rating(&p.rating)).collect();

        info!("Formatting dates");
        let dates: Vec<_> = products
            .iter()
            .map(|p| p.registered_on.as_deref().map(clean::format_date))
            .collect();

        info!("Computing net prices");
        let rows: Vec<Offer> = products
            .iter()
            .enumerate()
            .map(|(i, p)| Offer {
                name: p.name.clone(),
                price: prices[i],
                discount_pct: discounts[i],
                net_price: clean::net_price(prices[i], discounts[i]),
                rating_pct: ratings[i],
                date: dates[i].clone(),
            })
            .collect();

        let unparsed = rows.iter().filter(|r| r.price.is_none()).count();
        if unparsed > 0 {
            warn!("{} record(s) with unparseable price", unparsed);
        }

        let table = OfferTable { rows };
        let (n_rows, n_cols) = table.shape();
        info!("Transform done: {} rows x {} columns", n_rows, n_cols);
        info!("Columns: {:?}", table.columns());
        table
    }
}
