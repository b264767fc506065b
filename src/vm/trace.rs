//! Debug trace: a single bit at `retBase-1` gates a per-step dump of pc and
//! the data stack, in the collaborator role spec.md §4.6 assigns it.
//! Grounded in the teacher's `f_dot_s`/trace-on-error logging
//! (`internals/debug.rs`), routed through [`Msg`](crate::messages::Msg)
//! instead of a bare `println!`.

use super::Vm;
use crate::error::FirstResult;

const TRON_BIT: i64 = 1;

impl Vm {
    pub(super) fn tron_enabled(&self) -> FirstResult<bool> {
        let addr = self.ret_base()? - 1;
        Ok(self.mem.get(addr)? & TRON_BIT != 0)
    }

    pub(super) fn set_tron(&mut self, on: bool) -> FirstResult<()> {
        let addr = self.ret_base()? - 1;
        let cur = self.mem.get(addr)?;
        let v = if on { cur | TRON_BIT } else { cur & !TRON_BIT };
        self.mem.set(addr, v)
    }

    pub(super) fn trace_step(&self) -> FirstResult<()> {
        let instr = self.mem.get(self.pc)?;
        self.msg.debug(
            "trace",
            &format!("pc={} instr={} stack={:?}", self.pc, instr, self.data),
            None::<()>,
        );
        Ok(())
    }
}
