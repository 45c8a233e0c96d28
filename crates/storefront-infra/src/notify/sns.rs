use super::{AttributeValue, NotificationPublisher, PublishError, TopicMessage};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;

/// SNS-backed topic publisher.
#[derive(Clone)]
pub struct SnsPublisher {
    client: Client,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(sdk_config: &SdkConfig, topic_arn: String) -> Self {
        Self {
            client: Client::new(sdk_config),
            topic_arn,
        }
    }
}

fn to_sns_attribute(value: &AttributeValue) -> Result<MessageAttributeValue, PublishError> {
    let (data_type, string_value) = match value {
        AttributeValue::Number(n) => ("Number", n.to_string()),
        AttributeValue::String(s) => ("String", s.clone()),
    };
    MessageAttributeValue::builder()
        .data_type(data_type)
        .string_value(string_value)
        .build()
        .map_err(|e| PublishError::InvalidMessage(e.to_string()))
}

#[async_trait]
impl NotificationPublisher for SnsPublisher {
    async fn publish(&self, message: &TopicMessage) -> Result<(), PublishError> {
        let start = std::time::Instant::now();

        let mut request = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(&message.body)
            .set_subject(message.subject.clone());

        for (name, value) in &message.attributes {
            request = request.message_attributes(name, to_sns_attribute(value)?);
        }

        let output = request.send().await.map_err(|e| {
            tracing::error!(
                error = %DisplayErrorContext(&e),
                topic_arn = %self.topic_arn,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "SNS publish failed"
            );
            PublishError::PublishFailed(DisplayErrorContext(&e).to_string())
        })?;

        tracing::debug!(
            topic_arn = %self.topic_arn,
            message_id = output.message_id().unwrap_or_default(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "SNS message published"
        );

        Ok(())
    }
}
