mod app_settings;
mod capture_result;
mod loop_state;
mod notify_payload;
pub mod object_name;
mod poll_signal;
mod uploaded_image;

pub use app_settings::{AppConfig, Settings};
pub use capture_result::CaptureResult;
pub use loop_state::LoopState;
pub use notify_payload::NotifyPayload;
pub use object_name::ObjectNamer;
pub use poll_signal::PollSignal;
pub use uploaded_image::UploadedImage;
