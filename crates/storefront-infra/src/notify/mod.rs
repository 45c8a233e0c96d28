//! Notification topic abstraction
//!
//! Published messages carry a JSON body plus typed attributes. Subscriptions select
//! messages by their attributes (see [`filter`]).

pub mod filter;
mod memory;
#[cfg(feature = "aws")]
pub mod sns;

pub use memory::InMemoryTopic;

use async_trait::async_trait;
use std::collections::BTreeMap;
use storefront_core::{constants::PRICE_ATTRIBUTE, AppError, Notification};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        AppError::TransientDependency(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    String(String),
}

/// A message as published to the topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMessage {
    pub subject: Option<String>,
    pub body: String,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl TopicMessage {
    /// Product-created notification with its price as a numeric attribute.
    pub fn from_notification(notification: &Notification) -> Result<Self, PublishError> {
        let body = serde_json::to_string(notification)
            .map_err(|e| PublishError::InvalidMessage(e.to_string()))?;
        let mut attributes = BTreeMap::new();
        attributes.insert(
            PRICE_ATTRIBUTE.to_string(),
            AttributeValue::Number(notification.price_attribute),
        );
        Ok(TopicMessage {
            subject: None,
            body,
            attributes,
        })
    }

    /// Message without attributes, matched by no filtered subscription.
    pub fn plain(subject: impl Into<String>, body: serde_json::Value) -> Self {
        TopicMessage {
            subject: Some(subject.into()),
            body: body.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn number_attribute(&self, name: &str) -> Option<f64> {
        match self.attributes.get(name) {
            Some(AttributeValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, message: &TopicMessage) -> Result<(), PublishError>;
}
