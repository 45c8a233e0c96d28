//! Shared AWS SDK configuration

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load SDK configuration from the environment, with an optional explicit region and
/// endpoint override (LocalStack and similar).
pub async fn load_sdk_config(region: Option<&str>, endpoint: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}
