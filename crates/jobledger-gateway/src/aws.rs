//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load credentials and region from the environment, optionally pinning
/// the region.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
