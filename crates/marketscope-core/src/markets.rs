/// Read-only lookup from short futures codes to the canonical
/// exchange-qualified market names the positioning portal queries by.
///
/// Owned configuration rather than ambient state; the default table covers
/// the index futures the dashboard tracks. Unknown codes resolve to
/// themselves so callers can pass full market names straight through.
#[derive(Debug, Clone)]
pub struct MarketAliases {
    table: Vec<(&'static str, &'static str)>,
}

impl Default for MarketAliases {
    fn default() -> Self {
        Self {
            table: vec![
                ("NQ", "NASDAQ-100 Consolidated"),
                ("MNQ", "NASDAQ-100 Consolidated"),
                ("ES", "E-MINI S&P 500"),
                ("MES", "E-MINI S&P 500"),
                ("YM", "DJIA Consolidated"),
                ("RTY", "RUSSELL E-MINI"),
                ("M2K", "RUSSELL E-MINI"),
                ("VX", "VIX FUTURES"),
            ],
        }
    }
}

impl MarketAliases {
    /// Resolve a short code to its canonical market name.
    ///
    /// Lookup is case-insensitive; a miss returns the input unchanged so
    /// full market names can be passed straight through. Never errors.
    pub fn resolve(&self, code: &str) -> String {
        let upper = code.trim().to_ascii_uppercase();
        self.table
            .iter()
            .find(|(short, _)| *short == upper)
            .map(|(_, name)| (*name).to_owned())
            .unwrap_or_else(|| code.to_owned())
    }

    /// All known (code, market name) pairs, for display.
    pub fn entries(&self) -> &[(&'static str, &'static str)] {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_codes_case_insensitively() {
        let aliases = MarketAliases::default();
        assert_eq!(aliases.resolve("nq"), "NASDAQ-100 Consolidated");
        assert_eq!(aliases.resolve(" ES "), "E-MINI S&P 500");
    }

    #[test]
    fn unknown_codes_pass_through_unchanged() {
        let aliases = MarketAliases::default();
        assert_eq!(aliases.resolve("GOLD Consolidated"), "GOLD Consolidated");
        assert_eq!(aliases.resolve("zz"), "zz");
    }
}
