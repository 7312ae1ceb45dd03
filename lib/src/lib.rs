pub mod accumulator;
pub mod aws;
pub mod clock;
pub mod environment;
pub mod error;
pub mod mount;
pub mod normalizer;
pub mod notification;
pub mod presenter;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod shutdown;
