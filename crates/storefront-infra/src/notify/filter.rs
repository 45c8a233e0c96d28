//! Subscription filter rules
//!
//! Product notifications are split between two subscriptions on the numeric `price`
//! attribute: one for `price >= 50`, one for `price < 50`. The boundary belongs to the
//! high-price rule, so every real price matches exactly one of them.

use super::{AttributeValue, TopicMessage};
use serde_json::json;
use storefront_core::constants::{PRICE_ATTRIBUTE, PRICE_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCondition {
    AtLeast(f64),
    LessThan(f64),
}

impl NumericCondition {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            NumericCondition::AtLeast(bound) => value >= bound,
            NumericCondition::LessThan(bound) => value < bound,
        }
    }

    fn operator(&self) -> (&'static str, f64) {
        match *self {
            NumericCondition::AtLeast(bound) => (">=", bound),
            NumericCondition::LessThan(bound) => ("<", bound),
        }
    }
}

/// A subscription that only receives messages whose numeric attribute meets a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionFilter {
    pub name: String,
    pub attribute: String,
    pub condition: NumericCondition,
}

impl SubscriptionFilter {
    pub fn new(
        name: impl Into<String>,
        attribute: impl Into<String>,
        condition: NumericCondition,
    ) -> Self {
        Self {
            name: name.into(),
            attribute: attribute.into(),
            condition,
        }
    }

    /// Messages without the attribute, or with a non-numeric one, never match.
    pub fn matches(&self, message: &TopicMessage) -> bool {
        match message.attributes.get(&self.attribute) {
            Some(AttributeValue::Number(value)) => self.condition.holds(*value),
            _ => false,
        }
    }

    /// Filter policy document in the SNS subscription format.
    pub fn to_policy_json(&self) -> serde_json::Value {
        let (op, bound) = self.condition.operator();
        let mut policy = serde_json::Map::new();
        policy.insert(
            self.attribute.clone(),
            json!([{ "numeric": [op, bound] }]),
        );
        serde_json::Value::Object(policy)
    }
}

pub fn high_price_subscription() -> SubscriptionFilter {
    SubscriptionFilter::new(
        "high-price",
        PRICE_ATTRIBUTE,
        NumericCondition::AtLeast(PRICE_THRESHOLD),
    )
}

pub fn low_price_subscription() -> SubscriptionFilter {
    SubscriptionFilter::new(
        "low-price",
        PRICE_ATTRIBUTE,
        NumericCondition::LessThan(PRICE_THRESHOLD),
    )
}

pub fn default_subscriptions() -> Vec<SubscriptionFilter> {
    vec![high_price_subscription(), low_price_subscription()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn priced(price: f64) -> TopicMessage {
        let mut attributes = BTreeMap::new();
        attributes.insert("price".to_string(), AttributeValue::Number(price));
        TopicMessage {
            subject: None,
            body: "{}".to_string(),
            attributes,
        }
    }

    #[test]
    fn test_every_price_matches_exactly_one_rule() {
        let rules = default_subscriptions();
        for price in [-1.0, 0.0, 10.0, 49.99, 50.0, 50.01, 100.0, 1e9] {
            let matched: Vec<_> = rules
                .iter()
                .filter(|r| r.matches(&priced(price)))
                .map(|r| r.name.as_str())
                .collect();
            assert_eq!(matched.len(), 1, "price {price} matched {matched:?}");
        }
    }

    #[test]
    fn test_boundary_belongs_to_high_price() {
        assert!(high_price_subscription().matches(&priced(50.0)));
        assert!(!low_price_subscription().matches(&priced(50.0)));
    }

    #[test]
    fn test_message_without_price_matches_nothing() {
        let message = TopicMessage::plain("subject", json!({"error": "boom"}));
        assert!(default_subscriptions().iter().all(|r| !r.matches(&message)));
    }

    #[test]
    fn test_policy_json() {
        assert_eq!(
            high_price_subscription().to_policy_json(),
            json!({"price": [{"numeric": [">=", 50.0]}]})
        );
        assert_eq!(
            low_price_subscription().to_policy_json(),
            json!({"price": [{"numeric": ["<", 50.0]}]})
        );
    }
}
