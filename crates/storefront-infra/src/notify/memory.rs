use super::filter::{default_subscriptions, SubscriptionFilter};
use super::{NotificationPublisher, PublishError, TopicMessage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Process-local topic that fans messages out to filtered subscriptions.
pub struct InMemoryTopic {
    subscriptions: Vec<SubscriptionFilter>,
    published: Mutex<Vec<TopicMessage>>,
    deliveries: Mutex<Vec<(String, TopicMessage)>>,
    failing: AtomicBool,
}

impl Default for InMemoryTopic {
    fn default() -> Self {
        Self::with_subscriptions(default_subscriptions())
    }
}

impl InMemoryTopic {
    /// Topic with the high-price and low-price subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<SubscriptionFilter>) -> Self {
        Self {
            subscriptions,
            published: Mutex::new(Vec::new()),
            deliveries: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent publishes fail.
    pub fn fail_publishes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<TopicMessage> {
        self.published.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Messages delivered to the named subscription.
    pub fn delivered_to(&self, subscription: &str) -> Vec<TopicMessage> {
        self.deliveries
            .lock()
            .map(|d| {
                d.iter()
                    .filter(|(name, _)| name == subscription)
                    .map(|(_, m)| m.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationPublisher for InMemoryTopic {
    async fn publish(&self, message: &TopicMessage) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::PublishFailed("topic unavailable".to_string()));
        }

        self.published
            .lock()
            .map_err(|_| PublishError::PublishFailed("topic lock poisoned".to_string()))?
            .push(message.clone());

        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|_| PublishError::PublishFailed("topic lock poisoned".to_string()))?;
        for subscription in self.subscriptions.iter().filter(|s| s.matches(message)) {
            deliveries.push((subscription.name.clone(), message.clone()));
        }

        Ok(())
    }
}
