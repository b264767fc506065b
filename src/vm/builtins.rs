//! Priming: installing the thirteen builtin words by reading their names off
//! the input queue and binding each to its opcode directly, bypassing the
//! general read/compile dispatch since no words exist yet to look any of
//! this up through (§4.5). Grounded in the teacher's `add_builtin` table in
//! `internals/builtin.rs`, which walks a fixed list binding names to
//! function pointers at startup; this module does the equivalent binding
//! names to opcodes instead, since this spec has no function-pointer table.

use super::Vm;
use crate::error::FirstResult;
use crate::opcodes::{Opcode, IMMEDIATE_DURING_PRIMING, PRIMING_OPCODES};

impl Vm {
    /// Each primitive's data field is one cell (its rc) — `compile-it`
    /// copies exactly that cell when the word is used in a definition. The
    /// three that also get the `immediate` treatment run their rc directly
    /// at read-time instead, so they additionally need a trailing `exit` to
    /// hand control back to whatever called them (§4.5).
    pub(super) fn prime_builtins(&mut self) -> FirstResult<()> {
        for &op in PRIMING_OPCODES.iter() {
            let tok = self.scan_token()?;
            let name_id = self.symtab.intern(&tok);
            let w = self.compile_header(name_id)?;
            self.mem.set(w + 2, Opcode::CompileIt.value())?;
            self.mem.set(w + 3, op.value())?;
            if IMMEDIATE_DURING_PRIMING.contains(&op) {
                self.apply_immediate()?;
                self.compile(Opcode::Exit.value())?;
            }
        }
        Ok(())
    }
}
