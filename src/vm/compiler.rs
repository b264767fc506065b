//! Dictionary compilation: header layout, the `immediate` shrink, lookup, and
//! cold start. Grounded in the teacher's `f_immediate`/`f_create`
//! (`internals/compiler.rs`, `internals/builtin.rs`) but rebuilt around this
//! spec's 4-cell `[prev, name, cc, rc]` header instead of the teacher's
//! packed masked-flag cell.

use super::Vm;
use crate::error::FirstResult;
use crate::memory::Addr;
use crate::opcodes::Opcode;

impl Vm {
    /// Appends one cell at H and advances it — the single primitive every
    /// other compiling operation is built from.
    pub(super) fn compile(&mut self, v: i64) -> FirstResult<()> {
        let h = self.h()?;
        self.mem.set(h, v)?;
        self.set_h(h + 1)
    }

    /// Writes a fresh 4-cell header `[prev, name, cc=compile-me, rc=run-me]`
    /// at H, links it onto the dictionary via `last`, and returns its
    /// address.
    pub(super) fn compile_header(&mut self, name_id: i64) -> FirstResult<Addr> {
        let w = self.h()?;
        self.compile(self.last)?;
        self.compile(name_id)?;
        self.compile(Opcode::CompileMe.value())?;
        self.compile(Opcode::RunMe.value())?;
        self.last = w;
        Ok(w)
    }

    /// `immediate ( -- )`: shrinks the most recently compiled header from
    /// four cells to three by overwriting cc with rc and walking H back by
    /// one, so the word runs at read-time instead of compiling a call (§4.5).
    pub(super) fn apply_immediate(&mut self) -> FirstResult<()> {
        let mut h = self.h()?;
        h -= 1;
        let rc = self.mem.get(h)?;
        h -= 1;
        self.mem.set(h, rc)?;
        h += 1;
        self.set_h(h)
    }

    /// Walks `prev` from `last` looking for `name_id`. Returns 0 (never
    /// found) for id 0, the anonymous entry word's name.
    pub(super) fn lookup(&self, name_id: i64) -> FirstResult<Addr> {
        if name_id == 0 {
            return Ok(0);
        }
        let mut w = self.last;
        while w != 0 {
            let name = self.mem.get(w + 1)?;
            if name == name_id {
                return Ok(w);
            }
            w = self.mem.get(w)?;
        }
        Ok(0)
    }

    /// Establishes control cell defaults (if still zero), compiles the
    /// anonymous entry word and its self-calling loop body, then primes the
    /// thirteen builtin words by reading their names off the front of the
    /// input queue (§4.5, §6).
    pub(super) fn cold_start(&mut self) -> FirstResult<()> {
        if self.ret_base()? == 0 {
            self.mem.set(super::RETBASE_ADDR, self.init_ret_base)?;
        }
        if self.mem_base()? == 0 {
            self.mem.set(super::MEMBASE_ADDR, self.init_mem_base)?;
        }
        if self.h()? == 0 {
            self.set_h(self.mem_base()?)?;
        }
        if self.r()? == 0 {
            self.set_r(self.ret_base()? - 1)?;
        }

        let entry = self.compile_header(0)?;
        self.apply_immediate()?;
        let entry_data = entry + 2;
        // entry_data (W+2) holds run-me, left there by the immediate shrink
        // above, so [read, entry_data, exit] actually starts at W+3, one
        // cell later than spec.md's literal phrasing. Harmless: pc starts
        // at W+2, run-me is a no-op, and execution falls through into read
        // immediately, so the self-loop still targets W+2 correctly.
        self.compile(Opcode::Read.value())?;
        self.compile(entry_data)?;
        self.compile(Opcode::Exit.value())?;
        self.pc = entry_data;

        self.prime_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::sink;

    fn new_vm() -> Vm {
        Vm::new(0, 256, 256, 1024, Box::new(sink()))
    }

    #[test]
    fn test_cold_start_primes_fourteen_headers() {
        let mut vm = new_vm();
        vm.cold_start().unwrap();
        let mut w = vm.last;
        let mut count = 0;
        while w != 0 {
            count += 1;
            w = vm.mem.get(w).unwrap();
        }
        assert_eq!(count, 14);
    }

    #[test]
    fn test_cold_start_priming_names_match_opcode_table() {
        let mut vm = new_vm();
        vm.cold_start().unwrap();
        let mut w = vm.last;
        let mut names = Vec::new();
        while w != 0 {
            let name_id = vm.mem.get(w + 1).unwrap();
            names.push(vm.symtab.name(name_id).to_string());
            w = vm.mem.get(w).unwrap();
        }
        names.reverse();
        assert_eq!(
            names,
            vec![
                "", "exit", ":", "immediate", "_read", "@", "!", "-", "*", "/", "<0", "echo",
                "key", "pick"
            ]
        );
    }

    #[test]
    fn test_lookup_finds_primed_word() {
        let mut vm = new_vm();
        vm.cold_start().unwrap();
        let id = vm.symtab.id_of("pick");
        let w = vm.lookup(id).unwrap();
        assert_ne!(w, 0);
        assert_eq!(vm.mem.get(w + 1).unwrap(), id);
    }

    #[test]
    fn test_lookup_unknown_name_is_zero() {
        let mut vm = new_vm();
        vm.cold_start().unwrap();
        let w = vm.lookup(vm.symtab.id_of("nope")).unwrap();
        assert_eq!(w, 0);
    }

    /// A redefinition links a new header in front of the old one; lookup
    /// by name must return the newer header, never the shadowed one.
    #[test]
    fn test_lookup_redefinition_shadows_earlier_header() {
        let mut vm = new_vm();
        vm.cold_start().unwrap();
        let id = vm.symtab.intern("dup2");
        let first = vm.compile_header(id).unwrap();
        let second = vm.compile_header(id).unwrap();
        assert_ne!(first, second);
        let found = vm.lookup(id).unwrap();
        assert_eq!(found, second);
    }
}
