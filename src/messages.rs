//! Small stderr logger, threshold-gated, the way the rest of this codebase
//! reports recoverable conditions instead of reaching for the `log` crate.

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Msg {
    pub fn new() -> Self {
        Msg {
            level: DebugLevel::Error,
        }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    pub fn error<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        self.emit(DebugLevel::Error, caller, message, detail);
    }

    pub fn warning<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        self.emit(DebugLevel::Warning, caller, message, detail);
    }

    pub fn info<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        self.emit(DebugLevel::Info, caller, message, detail);
    }

    pub fn debug<T: Debug>(&self, caller: &str, message: &str, detail: Option<T>) {
        self.emit(DebugLevel::Debug, caller, message, detail);
    }

    fn emit<T: Debug>(&self, level: DebugLevel, caller: &str, message: &str, detail: Option<T>) {
        if level > self.level {
            return;
        }
        match detail {
            Some(d) => eprintln!("[{:?}] {}: {} ({:?})", level, caller, message, d),
            None => eprintln!("[{:?}] {}: {}", level, caller, message),
        }
    }
}

impl Default for Msg {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_error() {
        let msg = Msg::new();
        assert_eq!(msg.get_level(), DebugLevel::Error);
    }

    #[test]
    fn test_set_level() {
        let mut msg = Msg::new();
        msg.set_level(DebugLevel::Debug);
        assert_eq!(msg.get_level(), DebugLevel::Debug);
    }
}
