//! Symbol-to-category mapping.
//!
//! The table is an explicit configuration value handed to the engine at
//! construction, never shared module state, so tests and alternate
//! configurations can substitute their own mapping.

use std::collections::HashMap;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, thiserror::Error)]
pub enum CategoryError {
    #[error("empty token in symbol list for category {0}")]
    EmptyToken(String),

    #[error("symbol {symbol} listed in both {first} and {second}")]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },
}

/// Fixed mapping from symbol to category name. Symbols not present fall
/// into [`UNCATEGORIZED`].
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    by_symbol: HashMap<String, String>,
}

impl CategoryTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from (category, comma-separated symbol list) pairs,
    /// as read from the `[categories]` config section. Symbols are
    /// trimmed and uppercased; a symbol may belong to only one category.
    pub fn from_lists<'a, I>(lists: I) -> Result<Self, CategoryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut by_symbol = HashMap::new();
        for (category, symbols) in lists {
            for token in symbols.split(',') {
                let symbol = token.trim().to_uppercase();
                if symbol.is_empty() {
                    return Err(CategoryError::EmptyToken(category.to_string()));
                }
                if let Some(first) = by_symbol.insert(symbol.clone(), category.to_string()) {
                    return Err(CategoryError::DuplicateSymbol {
                        symbol,
                        first,
                        second: category.to_string(),
                    });
                }
            }
        }
        Ok(Self { by_symbol })
    }

    /// The category table the original Questrade report shipped with.
    /// Used when the config file supplies no `[categories]` section.
    pub fn builtin() -> Self {
        Self::from_lists([
            (
                "TSX Mining",
                "ABX.TO, CCO.TO, TECK-B.TO, NTR.TO, FM.TO, FNV.TO, AGI.TO, AEM.TO, \
                 K.TO, WPM.TO, LUN.TO, IVN.TO, NXE.TO, CS.TO, B2GOLD.TO",
            ),
            (
                "Dividend",
                "ENB.TO, SU.TO, BCE.TO, JNJ, ABBV, PFE, KO, PG, T.TO, BNS.TO",
            ),
            (
                "Tech",
                "AAPL, MSFT, NVDA, GOOGL, META, AMZN, TSLA, AMD, CRM, SHOP.TO, \
                 ADBE, INTC, CSCO, ORCL",
            ),
            (
                "Blue Chip",
                "JPM, WMT, V, UNH, LLY, MRK, BMY, CAT, HD, MA, DIS, XOM, CVX",
            ),
        ])
        .expect("builtin category table is well-formed")
    }

    pub fn category_for(&self, symbol: &str) -> &str {
        self.by_symbol
            .get(symbol)
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}
