use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Shared AWS configuration for every client. An empty region falls back to
/// the default provider chain, then to `us-east-1`.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    let region_provider = if region.is_empty() {
        RegionProviderChain::default_provider().or_else(DEFAULT_REGION)
    } else {
        RegionProviderChain::first_try(Region::new(region.to_string()))
    };

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}
