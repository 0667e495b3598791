use rust_decimal::Decimal;

/// Output column names, in file order.
pub const COLUMNS: [&str; 6] = [
    "nome",
    "preco_numerico",
    "desconto_percentual",
    "preco_liquido",
    "avaliacao_percentual",
    "data",
];

/// One product card as found in the markup, fields still in their display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    pub card_id: Option<String>,
    pub name: String,
    pub price: String,
    pub rating: String,
    pub image_url: String,
    pub registered_on: Option<String>,
    pub discount: String,
}

/// A cleaned product row. `None` marks a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub name: String,
    pub price: Option<Decimal>,
    pub discount_pct: Decimal,
    pub net_price: Option<Decimal>,
    pub rating_pct: Option<Decimal>,
    pub date: Option<String>,
}

impl Offer {
    /// Render the row as CSV fields in `COLUMNS` order. Nulls become empty fields.
    pub fn to_record(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.price.map(format_decimal).unwrap_or_default(),
            format_decimal(self.discount_pct),
            self.net_price.map(format_decimal).unwrap_or_default(),
            self.rating_pct.map(format_decimal).unwrap_or_default(),
            self.date.clone().unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferTable {
    pub rows: Vec<Offer>,
}

impl OfferTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Columns present in the table. An empty table has none.
    pub fn columns(&self) -> &'static [&'static str] {
        if self.rows.is_empty() {
            &[]
        } else {
            &COLUMNS
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns().len())
    }
}

/// Trailing zeros trimmed, but always at least one fractional digit: `1250.0`, `549.5`.
pub fn format_decimal(value: Decimal) -> String {
    let n = value.normalize();
    if n.scale() == 0 {
        format!("{}.0", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(format_decimal(dec("1250.00")), "1250.0");
        assert_eq!(format_decimal(dec("549.50")), "549.5");
        assert_eq!(format_decimal(dec("1799.99")), "1799.99");
        assert_eq!(format_decimal(dec("10")), "10.0");
        assert_eq!(format_decimal(dec("90.0")), "90.0");
    }

    #[test]
    fn nulls_render_empty() {
        let offer = Offer {
            name: "Widget".into(),
            price: None,
            discount_pct: Decimal::ZERO,
            net_price: None,
            rating_pct: None,
            date: None,
        };
        assert_eq!(offer.to_record(), ["Widget", "", "0.0", "", "", ""].map(String::from));
    }

    #[test]
    fn empty_table_has_no_columns() {
        let table = OfferTable::default();
        assert!(table.columns().is_empty());
        assert_eq!(table.shape(), (0, 0));
    }
}
