//! Storefront Infrastructure Library
//!
//! Shared infrastructure used by the HTTP service, the workers and the CLI:
//! - Message queue abstraction (SQS, in-memory)
//! - Notification topic abstraction (SNS, in-memory) and subscription filter rules
//! - Tracing initialization

#[cfg(feature = "aws")]
pub mod aws;

pub mod notify;
pub mod queue;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

// Re-export commonly used types
pub use notify::{
    filter::{
        default_subscriptions, high_price_subscription, low_price_subscription,
        NumericCondition, SubscriptionFilter,
    },
    AttributeValue, InMemoryTopic, NotificationPublisher, PublishError, TopicMessage,
};
pub use queue::{InMemoryQueue, MessageQueue, QueueError, QueueMessage};

#[cfg(feature = "aws")]
pub use notify::sns::SnsPublisher;
#[cfg(feature = "aws")]
pub use queue::sqs::SqsQueue;

#[cfg(feature = "observability-basic")]
pub use telemetry::init_tracing;
