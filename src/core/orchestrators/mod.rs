pub mod bucket_bootstrap;
pub mod poll_loop;

pub use bucket_bootstrap::{BucketBootstrap, BucketStatus};
pub use poll_loop::{CycleOutcome, PollLoop};
