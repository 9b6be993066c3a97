//! Payment method enumeration and availability rules.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Visa,
    Wallet,
    Fawry,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Visa,
        PaymentMethod::Wallet,
        PaymentMethod::Fawry,
    ];
}

/// Per-method enable flags, used both for the store-wide settings and for
/// per-product allow-lists. An omitted flag defaults to enabled, which is how
/// the historical data reads products saved before allow-lists existed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentFlags {
    #[serde(default = "enabled")]
    pub cash: bool,
    #[serde(default = "enabled")]
    pub visa: bool,
    #[serde(default = "enabled")]
    pub wallet: bool,
    #[serde(default = "enabled")]
    pub fawry: bool,
}

fn enabled() -> bool {
    true
}

impl Default for PaymentFlags {
    fn default() -> Self {
        Self {
            cash: true,
            visa: true,
            wallet: true,
            fawry: true,
        }
    }
}

impl PaymentFlags {
    pub fn allows(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Visa => self.visa,
            PaymentMethod::Wallet => self.wallet,
            PaymentMethod::Fawry => self.fawry,
        }
    }
}

/// Methods offered for a checkout session: the method must be enabled in the
/// store settings and allowed by every line item. A product without an
/// allow-list allows everything; a single product disallowing a method hides
/// it for the whole order.
pub fn available_methods(
    global: &PaymentFlags,
    per_item: &[Option<PaymentFlags>],
) -> Vec<PaymentMethod> {
    PaymentMethod::ALL
        .into_iter()
        .filter(|&m| global.allows(m))
        .filter(|&m| {
            per_item
                .iter()
                .all(|flags| flags.as_ref().map_or(true, |f| f.allows(m)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_cash() -> PaymentFlags {
        PaymentFlags {
            cash: true,
            visa: false,
            wallet: false,
            fawry: false,
        }
    }

    #[test]
    fn globally_disabled_method_never_offered() {
        let global = PaymentFlags {
            visa: false,
            ..PaymentFlags::default()
        };
        let methods = available_methods(&global, &[None, Some(PaymentFlags::default())]);
        assert!(!methods.contains(&PaymentMethod::Visa));
        assert!(methods.contains(&PaymentMethod::Cash));
    }

    #[test]
    fn single_item_veto_hides_method_for_whole_order() {
        let global = PaymentFlags::default();
        let methods = available_methods(&global, &[None, Some(only_cash()), None]);
        assert_eq!(methods, vec![PaymentMethod::Cash]);
    }

    #[test]
    fn missing_allow_list_defaults_to_allowed() {
        let methods = available_methods(&PaymentFlags::default(), &[None, None]);
        assert_eq!(methods.len(), 4);
    }

    #[test]
    fn legacy_flags_with_omitted_fields_deserialize_as_enabled() {
        let flags: PaymentFlags = serde_json::from_str(r#"{"visa": false}"#).unwrap();
        assert!(!flags.visa);
        assert!(flags.cash && flags.wallet && flags.fawry);
    }
}
