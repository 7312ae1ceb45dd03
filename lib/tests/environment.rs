#[cfg(test)]
mod test {
    use aws_config::{BehaviorVersion, Region, SdkConfig};
    use serial_test::serial;
    use ses_notifications_monitor::aws::SqsClient;
    use ses_notifications_monitor::environment::Environment;
    use std::env;

    fn sdk_config() -> SdkConfig {
        SdkConfig::builder().behavior_version(BehaviorVersion::latest()).region(Region::new("us-east-1")).build()
    }

    #[test]
    #[serial]
    fn should_read_http_port() {
        env::remove_var("HTTP_PORT");
        assert_eq!(9095, Environment::u16("HTTP_PORT", 9095).unwrap());

        env::set_var("HTTP_PORT", "8080");
        assert_eq!(8080, Environment::u16("HTTP_PORT", 9095).unwrap());

        env::remove_var("HTTP_PORT");
    }

    #[test]
    #[serial]
    fn should_fail_on_invalid_http_port() {
        env::set_var("HTTP_PORT", "70000");

        let error = Environment::u16("HTTP_PORT", 9095).unwrap_err();

        assert_eq!("HTTP_PORT=70000 is not a valid u16", error.cause);
        assert_eq!(Some("Failed to parse HTTP_PORT to u16".to_string()), error.message);

        env::remove_var("HTTP_PORT");
    }

    #[test]
    #[serial]
    fn should_override_region_without_local_endpoint() {
        env::remove_var("LOCAL_ENDPOINT");
        env::set_var("LOCAL_REGION", "eu-west-1");

        let sqs_client = SqsClient::new(&sdk_config());

        assert_eq!(Some(&Region::new("eu-west-1")), sqs_client.client.config().region());

        env::remove_var("LOCAL_REGION");
    }

    #[test]
    #[serial]
    fn should_keep_shared_region_without_overrides() {
        env::remove_var("LOCAL_ENDPOINT");
        env::remove_var("LOCAL_REGION");

        let sqs_client = SqsClient::new(&sdk_config());

        assert_eq!(Some(&Region::new("us-east-1")), sqs_client.client.config().region());
    }
}
