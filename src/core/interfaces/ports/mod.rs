mod capture_invoker;

pub use capture_invoker::CaptureInvoker;
