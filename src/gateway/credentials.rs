//! Per-request credential resolution.
//!
//! Each upstream call resolves its effective credentials fresh: an override
//! sourced from the inbound request wins over the process-wide default loaded
//! at startup. A partially supplied brokerage pair (key id without secret, or
//! the reverse) is treated as if no override was supplied at all.

/// Key id + secret pair for the brokerage upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerageCredentials {
    pub key_id: String,
    pub secret: String,
}

/// Request-scoped credential overrides, as extracted from inbound headers.
/// Any field may be absent; absent fields fall back to the process defaults.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub brokerage_key_id: Option<String>,
    pub brokerage_secret: Option<String>,
    pub market_data_key: Option<String>,
}

/// Resolve the brokerage pair: a fully present override wins, otherwise the
/// default pair. Partial overrides count as absent.
pub fn resolve_brokerage(
    overrides: &CredentialOverrides,
    default: Option<&BrokerageCredentials>,
) -> Option<BrokerageCredentials> {
    match (&overrides.brokerage_key_id, &overrides.brokerage_secret) {
        (Some(key_id), Some(secret)) => Some(BrokerageCredentials {
            key_id: key_id.clone(),
            secret: secret.clone(),
        }),
        _ => default.cloned(),
    }
}

/// Resolve the market-data key: override first, then the default.
pub fn resolve_market_data(
    overrides: &CredentialOverrides,
    default: Option<&str>,
) -> Option<String> {
    overrides
        .market_data_key
        .clone()
        .or_else(|| default.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pair() -> BrokerageCredentials {
        BrokerageCredentials {
            key_id: "default-key".to_string(),
            secret: "default-secret".to_string(),
        }
    }

    #[test]
    fn full_override_wins_over_default() {
        let overrides = CredentialOverrides {
            brokerage_key_id: Some("header-key".to_string()),
            brokerage_secret: Some("header-secret".to_string()),
            market_data_key: None,
        };
        let resolved =
            resolve_brokerage(&overrides, Some(&default_pair())).expect("resolved pair");
        assert_eq!(resolved.key_id, "header-key");
        assert_eq!(resolved.secret, "header-secret");
    }

    #[test]
    fn partial_override_falls_back_to_default() {
        let key_only = CredentialOverrides {
            brokerage_key_id: Some("header-key".to_string()),
            ..CredentialOverrides::default()
        };
        let secret_only = CredentialOverrides {
            brokerage_secret: Some("header-secret".to_string()),
            ..CredentialOverrides::default()
        };
        for overrides in [key_only, secret_only] {
            let resolved =
                resolve_brokerage(&overrides, Some(&default_pair())).expect("resolved pair");
            assert_eq!(resolved, default_pair());
        }
    }

    #[test]
    fn partial_override_without_default_resolves_to_nothing() {
        let overrides = CredentialOverrides {
            brokerage_key_id: Some("header-key".to_string()),
            ..CredentialOverrides::default()
        };
        assert_eq!(resolve_brokerage(&overrides, None), None);
    }

    #[test]
    fn market_data_override_wins_then_default() {
        let overrides = CredentialOverrides {
            market_data_key: Some("header-fmp".to_string()),
            ..CredentialOverrides::default()
        };
        assert_eq!(
            resolve_market_data(&overrides, Some("default-fmp")),
            Some("header-fmp".to_string())
        );
        assert_eq!(
            resolve_market_data(&CredentialOverrides::default(), Some("default-fmp")),
            Some("default-fmp".to_string())
        );
        assert_eq!(resolve_market_data(&CredentialOverrides::default(), None), None);
    }
}
