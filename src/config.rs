//! Command-line surface, parsed with `argh` the way the teacher's
//! `config.rs` does (kept from its Cargo.toml stack; the teacher's
//! interactive-TUI flags are dropped since this spec is a batch CLI).

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// FIRST, a minimal self-hosting virtual machine for THIRD programs.
pub struct Config {
    /// upper address bound; any load or store strictly above it fails
    /// (0 = unlimited)
    #[argh(option, default = "0")]
    pub mem_limit: i64,

    /// stop the run after this many seconds (0 = no deadline)
    #[argh(option, default = "0")]
    pub timeout: u64,

    /// enable the per-step debug trace
    #[argh(switch)]
    pub trace: bool,

    /// print a memory and dictionary summary after the run
    #[argh(switch)]
    pub dump: bool,
}
