//! Common test utilities

#![allow(dead_code)]

use archgraph_pipeline::{Pipeline, PipelineConfig};

/// A blog-style write-up of an e-commerce backend, with some page chrome
pub const ECOMMERCE_ARTICLE: &str = "Subscribe to our newsletter for weekly posts. \
    Our platform started as a monolith but the traffic forced a rethink. \
    The mobile client sends requests to the API Gateway over HTTPS. \
    The API Gateway forwards requests to the Order Service and the User Service. \
    The Order Service writes to the PostgreSQL database for every checkout. \
    The User Service queries the Redis cache before touching the user database. \
    The Order Service publishes events to Kafka so the Notification Service can react. \
    We celebrated the launch with a long team dinner downtown. \
    Click here to share this article with your friends.";

/// A write-up whose relationships form a loop
pub const CYCLIC_ARTICLE: &str = "Billing Service sends requests to Ledger Service. \
    Ledger Service sends requests to Audit Service for every entry. \
    Audit Service sends requests to Billing Service when a check fails. \
    All three services run on one container platform behind a load balancer.";

/// Nothing architectural at all
pub const SMALL_TALK: &str = "We had lovely weather on the trip. \
    Everyone enjoyed the food and the long walks by the river. \
    Next year we would like to go somewhere warmer.";

/// A pipeline with the default configuration and no suggestion provider
pub fn default_pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default()).expect("Failed to build pipeline")
}
