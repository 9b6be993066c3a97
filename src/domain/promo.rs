//! Promo code normalization and lookup classification.

/// Codes are stored upper-cased; user input is trimmed and upper-cased before
/// the exact match. No partial or fuzzy matching.
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Outcome of resolving a user-entered code. Inactive is kept distinct from
/// NotFound internally (it is useful in logs), but both surface the same
/// generic invalid-code message to the customer. Only `is_active` gates
/// validity; no expiry timestamp is modeled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromoLookup<T> {
    Found(T),
    Inactive,
    NotFound,
}

impl<T> PromoLookup<T> {
    /// Classifies the row returned by an exact-code query (fetched without an
    /// active filter so the two failure cases stay distinguishable).
    pub fn classify(row: Option<T>, is_active: impl Fn(&T) -> bool) -> Self {
        match row {
            Some(promo) if is_active(&promo) => PromoLookup::Found(promo),
            Some(_) => PromoLookup::Inactive,
            None => PromoLookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Promo {
        code: &'static str,
        active: bool,
    }

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_code("  sale20 "), "SALE20");
        assert_eq!(normalize_code("WELCOME10"), "WELCOME10");
    }

    #[test]
    fn active_code_is_found() {
        let lookup = PromoLookup::classify(
            Some(Promo {
                code: "SALE20",
                active: true,
            }),
            |p| p.active,
        );
        assert!(matches!(lookup, PromoLookup::Found(p) if p.code == "SALE20"));
    }

    #[test]
    fn inactive_and_missing_are_distinct_internally() {
        let inactive = PromoLookup::classify(
            Some(Promo {
                code: "SALE20",
                active: false,
            }),
            |p| p.active,
        );
        assert_eq!(
            std::mem::discriminant(&inactive),
            std::mem::discriminant(&PromoLookup::Inactive)
        );
        let missing = PromoLookup::<Promo>::classify(None, |p| p.active);
        assert_eq!(
            std::mem::discriminant(&missing),
            std::mem::discriminant(&PromoLookup::NotFound)
        );
    }
}
