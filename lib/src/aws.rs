use std::env;

use aws_config::Region;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct SqsClient {
    pub client: aws_sdk_sqs::Client,
}

impl SqsClient {
    /// Builds the client from the shared SDK config. `LOCAL_ENDPOINT` and `LOCAL_REGION`
    /// each override their part of it on their own; credentials always come from `aws_config`.
    pub fn new(aws_config: &aws_config::SdkConfig) -> SqsClient {
        let mut builder = aws_sdk_sqs::config::Builder::from(aws_config);

        if let Ok(endpoint) = env::var("LOCAL_ENDPOINT") {
            debug!("Using SQS endpoint {endpoint}");
            builder = builder.endpoint_url(endpoint);
        }

        if let Ok(region) = env::var("LOCAL_REGION") {
            debug!("Using SQS region {region}");
            builder = builder.region(Region::new(region));
        }

        SqsClient {
            client: aws_sdk_sqs::Client::from_conf(builder.build()),
        }
    }

    pub fn from_client(client: aws_sdk_sqs::Client) -> SqsClient {
        SqsClient { client }
    }
}
