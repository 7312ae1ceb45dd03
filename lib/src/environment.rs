use crate::error::NotificationMonitorError;
use std::env;
use std::str::FromStr;

pub struct Environment;

impl Environment {
    pub fn string(
        env_name: &str,
        default: &str,
    ) -> String {
        env::var(env_name).ok().unwrap_or(default.to_string())
    }

    pub fn required_string(env_name: &str) -> Result<String, NotificationMonitorError> {
        env::var(env_name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| NotificationMonitorError::new(&format!("{env_name} is not set"), &format!("Missing required environment variable {env_name}")))
    }

    pub fn u16(
        env_name: &str,
        default: u16,
    ) -> Result<u16, NotificationMonitorError> {
        Self::parse(env_name, default, "u16")
    }

    pub fn u32(
        env_name: &str,
        default: u32,
    ) -> Result<u32, NotificationMonitorError> {
        Self::parse(env_name, default, "u32")
    }

    pub fn u64(
        env_name: &str,
        default: u64,
    ) -> Result<u64, NotificationMonitorError> {
        Self::parse(env_name, default, "u64")
    }

    pub fn boolean(
        env_name: &str,
        default: bool,
    ) -> Result<bool, NotificationMonitorError> {
        Self::parse(env_name, default, "bool")
    }

    fn parse<T: FromStr>(
        env_name: &str,
        default: T,
        type_name: &str,
    ) -> Result<T, NotificationMonitorError> {
        match env::var(env_name) {
            Ok(value) => value.trim().parse::<T>().map_err(|_| {
                NotificationMonitorError::new(
                    &format!("{env_name}={value} is not a valid {type_name}"),
                    &format!("Failed to parse {env_name} to {type_name}"),
                )
            }),
            Err(_) => Ok(default),
        }
    }
}
