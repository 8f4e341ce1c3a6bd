use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Polling,
    Capturing,
    Uploading,
    SettingVisibility,
    Notifying,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopState::Idle => write!(f, "Idle"),
            LoopState::Polling => write!(f, "Polling"),
            LoopState::Capturing => write!(f, "Capturing"),
            LoopState::Uploading => write!(f, "Uploading"),
            LoopState::SettingVisibility => write!(f, "SettingVisibility"),
            LoopState::Notifying => write!(f, "Notifying"),
        }
    }
}

impl Default for LoopState {
    fn default() -> Self {
        LoopState::Idle
    }
}
