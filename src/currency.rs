use crate::error::ValidationError;

/// Converts entry amounts into the group's base currency.
///
/// Rates come from the caller; nothing here fetches them.
#[derive(Clone, Debug)]
pub struct CurrencyNormalizer {
    base: String,
}

impl CurrencyNormalizer {
    pub fn new(base: impl Into<String>) -> Self {
        CurrencyNormalizer {
            base: base.into().to_uppercase(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `rate` is base-currency units per one unit of `currency`. Amounts
    /// already in the base currency (or with no currency given) pass through.
    pub fn normalize(
        &self,
        amount: f64,
        currency: Option<&str>,
        rate: Option<f64>,
    ) -> Result<f64, ValidationError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::InvalidAmount(amount));
        }
        let currency = match currency.map(str::trim) {
            Some(c) if !c.is_empty() && !c.eq_ignore_ascii_case(&self.base) => c,
            _ => return Ok(amount),
        };
        let rate =
            rate.ok_or_else(|| ValidationError::MissingExchangeRate(currency.to_uppercase()))?;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::InvalidExchangeRate(rate));
        }
        Ok(amount * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 120.0)]
    #[case(Some("USD"), None, 120.0)]
    #[case(Some("usd"), Some(3.0), 120.0)]
    #[case(Some("JPY"), Some(0.5), 60.0)]
    fn converts_to_base(
        #[case] currency: Option<&str>,
        #[case] rate: Option<f64>,
        #[case] expected: f64,
    ) {
        let normalizer = CurrencyNormalizer::new("usd");
        assert_eq!(normalizer.base(), "USD");
        assert_eq!(normalizer.normalize(120.0, currency, rate), Ok(expected));
    }

    #[rstest]
    #[case(-1.0, Some("USD"), None, ValidationError::InvalidAmount(-1.0))]
    #[case(10.0, Some("EUR"), None, ValidationError::MissingExchangeRate("EUR".into()))]
    #[case(10.0, Some("eur"), Some(0.0), ValidationError::InvalidExchangeRate(0.0))]
    fn rejects_bad_input(
        #[case] amount: f64,
        #[case] currency: Option<&str>,
        #[case] rate: Option<f64>,
        #[case] expected: ValidationError,
    ) {
        let normalizer = CurrencyNormalizer::new("USD");
        assert_eq!(normalizer.normalize(amount, currency, rate), Err(expected));
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        let normalizer = CurrencyNormalizer::new("USD");
        assert!(normalizer.normalize(f64::NAN, None, None).is_err());
        assert!(normalizer.normalize(f64::INFINITY, None, None).is_err());
    }
}
