//! The bootstrap text FIRST needs before any THIRD source can run: the
//! thirteen priming token names, fed to the compiler ahead of whatever
//! program the caller supplies (§4.5). Everything past this is opaque input
//! bytes as far as this crate is concerned — the rest of THIRD, if any, is
//! supplied externally by the operator, not embedded here.
pub const PRIMING_TEXT: &str = "exit : immediate _read @ ! - * / <0 echo key pick\n";
