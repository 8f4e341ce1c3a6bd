mod command_capture_invoker;

pub use command_capture_invoker::{CommandCaptureInvoker, SkipCaptureInvoker};
