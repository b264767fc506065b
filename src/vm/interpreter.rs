//! Fetch/dispatch loop, token scanning, literal parsing, and the primitive
//! bodies. Grounded in the teacher's `f_execute`/`f_eval` dispatch
//! (`internals/inner.rs`, `internals/compiler.rs`) but rebuilt around the
//! dual cc/rc code-pointer domain this spec defines instead of the
//! teacher's tagged-cell `BUILTIN`/`DEFINITION` scheme.

use super::Vm;
use crate::error::{FirstError, FirstResult};
use crate::memory::{Addr, Cell};
use crate::opcodes::Opcode;

impl Vm {
    /// Fetches the cell at `pc`, advances `pc` by one, then dispatches it:
    /// an opcode value runs the matching primitive, anything else is an
    /// address and becomes a call.
    pub(super) fn step(&mut self) -> FirstResult<()> {
        let instr = self.mem.get(self.pc)?;
        self.pc += 1;
        match Opcode::from_cell(instr) {
            Some(op) => self.dispatch(op),
            None => self.call(instr),
        }
    }

    fn call(&mut self, target: Addr) -> FirstResult<()> {
        self.push_return(self.pc)?;
        self.pc = target;
        Ok(())
    }

    fn dispatch(&mut self, op: Opcode) -> FirstResult<()> {
        match op {
            Opcode::Colon => self.op_colon(),
            Opcode::Immediate => self.apply_immediate(),
            Opcode::Read => self.op_read(),
            Opcode::Get => self.op_get(),
            Opcode::Set => self.op_set(),
            Opcode::Sub => self.op_sub(),
            Opcode::Mul => self.op_mul(),
            Opcode::Div => self.op_div(),
            Opcode::Under0 => self.op_under0(),
            Opcode::Exit => self.op_exit(),
            Opcode::Echo => self.op_echo(),
            Opcode::Key => self.op_key(),
            Opcode::Pick => self.op_pick(),
            Opcode::PushInt => self.op_pushint(),
            Opcode::CompileMe => self.op_compile_me(),
            Opcode::CompileIt => self.op_compile_it(),
            Opcode::RunMe => Ok(()),
        }
    }

    /// `: ( -- )` scans the next token and opens a new dictionary header
    /// for it.
    fn op_colon(&mut self) -> FirstResult<()> {
        let tok = self.scan_token()?;
        let id = self.symtab.intern(&tok);
        self.compile_header(id)?;
        Ok(())
    }

    /// `@ ( a -- v )`
    fn op_get(&mut self) -> FirstResult<()> {
        let a = self.pop_data()?;
        let v = self.mem.get(a)?;
        self.push_data(v);
        Ok(())
    }

    /// `! ( v a -- )`
    fn op_set(&mut self) -> FirstResult<()> {
        let a = self.pop_data()?;
        let v = self.pop_data()?;
        self.mem.set(a, v)
    }

    /// `- ( a b -- a-b )`
    fn op_sub(&mut self) -> FirstResult<()> {
        let b = self.pop_data()?;
        let a = self.pop_data()?;
        self.push_data(a.wrapping_sub(b));
        Ok(())
    }

    /// `* ( a b -- a*b )`
    fn op_mul(&mut self) -> FirstResult<()> {
        let b = self.pop_data()?;
        let a = self.pop_data()?;
        self.push_data(a.wrapping_mul(b));
        Ok(())
    }

    /// `/ ( a b -- a/b )`, truncating toward zero.
    fn op_div(&mut self) -> FirstResult<()> {
        let b = self.pop_data()?;
        let a = self.pop_data()?;
        self.push_data(a / b);
        Ok(())
    }

    /// `<0 ( a -- flag )`
    fn op_under0(&mut self) -> FirstResult<()> {
        let a = self.pop_data()?;
        self.push_data(if a < 0 { 1 } else { 0 });
        Ok(())
    }

    /// `exit ( R: a -- )` pops a return address and jumps to it. Popping at
    /// retBase-1 is the clean halt that ends a run.
    fn op_exit(&mut self) -> FirstResult<()> {
        let target = self.pop_return()?;
        self.pc = target;
        Ok(())
    }

    /// `echo ( rune -- )`
    fn op_echo(&mut self) -> FirstResult<()> {
        let r = self.pop_data()?;
        self.write_rune(r)
    }

    /// `key ( -- rune )` reads one rune from input; EOF propagates rather
    /// than pushing a sentinel, since end of input is a distinct failure
    /// state (§4.4).
    fn op_key(&mut self) -> FirstResult<()> {
        let r = self.input.read_rune()?;
        self.push_data(r);
        Ok(())
    }

    /// `pick ( n -- v )` copies the element n below the top (0 = duplicate
    /// top). Out of range yields 0.
    fn op_pick(&mut self) -> FirstResult<()> {
        let n = self.pop_data()?;
        let len = self.data.len();
        let v = if n >= 0 && (n as usize) < len {
            self.data[len - 1 - n as usize]
        } else {
            0
        };
        self.push_data(v);
        Ok(())
    }

    /// `pushint`: reads the literal cell following it in the instruction
    /// stream and pushes it, advancing past it.
    fn op_pushint(&mut self) -> FirstResult<()> {
        let v = self.mem.get(self.pc)?;
        self.pc += 1;
        self.push_data(v);
        Ok(())
    }

    /// `compile-me`: compiles a reference to this word usable as a call —
    /// the address of the rc cell, not the cc cell it was dispatched
    /// through, so a later `call` on the compiled value lands on rc and
    /// falls through `run-me` into the body for colon words, or runs the
    /// builtin opcode directly for primitives.
    fn op_compile_me(&mut self) -> FirstResult<()> {
        let rc_addr = self.pc;
        self.compile(rc_addr)?;
        let ret = self.pop_return()?;
        self.pc = ret;
        Ok(())
    }

    /// `compile-it`: inlines a primitive's single rc cell directly into the
    /// caller's definition (so using `-` twice in a row compiles two `Sub`
    /// cells, not a call through the dictionary). Each primed primitive's
    /// data field is exactly that one opcode cell, so the copy never needs
    /// to scan for a terminator — inlining `exit` itself naturally copies an
    /// `Exit` cell, which is what gives an ordinary colon word its return.
    fn op_compile_it(&mut self) -> FirstResult<()> {
        let cell = self.mem.get(self.pc)?;
        self.pc += 1;
        self.compile(cell)?;
        let ret = self.pop_return()?;
        self.pc = ret;
        Ok(())
    }

    /// `_read`: scans a token, and either calls the word it names (pushing
    /// the current pc as the return address) or parses it as a literal and
    /// compiles a pushint pair. An unrecognized, unparseable token is an
    /// error rather than silently skipped.
    pub(super) fn op_read(&mut self) -> FirstResult<()> {
        let tok = self.scan_token()?;
        let id = self.symtab.id_of(&tok);
        let w = self.lookup(id)?;
        if w != 0 {
            self.push_return(self.pc)?;
            self.pc = w + 2;
            return Ok(());
        }
        match parse_literal(&tok) {
            Some(v) => {
                self.compile(Opcode::PushInt.value())?;
                self.compile(v)
            }
            None => Err(FirstError::InvalidLiteral(tok)),
        }
    }

    /// Flushes output, skips leading control/whitespace runes, then
    /// accumulates runes up to the next control/whitespace rune or EOF.
    /// EOF before any token text is a clean halt; EOF right after some
    /// token text still yields that text.
    pub(super) fn scan_token(&mut self) -> FirstResult<String> {
        self.output
            .flush()
            .map_err(|e| FirstError::IoFailure(e.to_string()))?;
        let mut tok = String::new();
        loop {
            match self.input.read_rune() {
                Ok(r) => {
                    if is_boundary(r) {
                        if tok.is_empty() {
                            continue;
                        }
                        return Ok(tok);
                    }
                    tok.push(r as u8 as char);
                }
                Err(FirstError::Eof) => {
                    if tok.is_empty() {
                        return Err(FirstError::Halt);
                    }
                    return Ok(tok);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Encodes one rune to the output stream: ASCII bytes verbatim, NEL as
    /// CR+LF, other C1 controls as ESC + (rune XOR 0xC0), everything else as
    /// UTF-8 (§4.6).
    fn write_rune(&mut self, r: Cell) -> FirstResult<()> {
        if (0..0x80).contains(&r) {
            self.emit_bytes(&[r as u8])
        } else if r == 0x85 {
            self.emit_bytes(b"\r\n")
        } else if (0x80..=0x9F).contains(&r) {
            self.emit_bytes(&[0x1B, (r as u32 ^ 0xC0) as u8])
        } else {
            match char::from_u32(r as u32) {
                Some(c) => {
                    let mut buf = [0u8; 4];
                    let s = c.encode_utf8(&mut buf);
                    self.emit_bytes(s.as_bytes())
                }
                None => Err(FirstError::InvalidLiteral(format!("rune {}", r))),
            }
        }
    }
}

fn is_boundary(r: Cell) -> bool {
    r <= 0x20 || r == 0x7F || (0x80..=0x9F).contains(&r)
}

/// Parses a scanned token against the four literal syntaxes: signed
/// decimal/hex/octal integers, `<NAME>` control mnemonics, caret forms
/// (`^X`, `^[X`), and single-rune quotes (`'c'`, with a small set of
/// backslash escapes).
fn parse_literal(tok: &str) -> Option<Cell> {
    parse_integer(tok)
        .or_else(|| parse_control_mnemonic(tok))
        .or_else(|| parse_caret(tok))
        .or_else(|| parse_rune_quote(tok))
}

fn parse_integer(tok: &str) -> Option<Cell> {
    let (neg, body) = match tok.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tok),
    };
    if body.is_empty() {
        return None;
    }
    let v = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Cell::from_str_radix(hex, 16).ok()?
    } else if body.len() > 1 && body.starts_with('0') {
        Cell::from_str_radix(&body[1..], 8).ok()?
    } else {
        body.parse::<Cell>().ok()?
    };
    Some(if neg { -v } else { v })
}

const CONTROL_NAMES: &[(&str, Cell)] = &[
    ("NUL", 0x00),
    ("SOH", 0x01),
    ("STX", 0x02),
    ("ETX", 0x03),
    ("EOT", 0x04),
    ("ENQ", 0x05),
    ("ACK", 0x06),
    ("BEL", 0x07),
    ("BS", 0x08),
    ("HT", 0x09),
    ("LF", 0x0A),
    ("VT", 0x0B),
    ("FF", 0x0C),
    ("CR", 0x0D),
    ("SO", 0x0E),
    ("SI", 0x0F),
    ("DLE", 0x10),
    ("DC1", 0x11),
    ("DC2", 0x12),
    ("DC3", 0x13),
    ("DC4", 0x14),
    ("NAK", 0x15),
    ("SYN", 0x16),
    ("ETB", 0x17),
    ("CAN", 0x18),
    ("EM", 0x19),
    ("SUB", 0x1A),
    ("ESC", 0x1B),
    ("FS", 0x1C),
    ("GS", 0x1D),
    ("RS", 0x1E),
    ("US", 0x1F),
    ("SP", 0x20),
    ("DEL", 0x7F),
    ("NEL", 0x85),
    ("SS2", 0x8E),
    ("SS3", 0x8F),
    ("CSI", 0x9B),
    ("ST", 0x9C),
    ("OSC", 0x9D),
];

fn parse_control_mnemonic(tok: &str) -> Option<Cell> {
    let inner = tok.strip_prefix('<')?.strip_suffix('>')?;
    if inner.is_empty() {
        return None;
    }
    if let Some(&(_, v)) = CONTROL_NAMES.iter().find(|(n, _)| n.eq_ignore_ascii_case(inner)) {
        return Some(v);
    }
    let v = Cell::from_str_radix(inner, 16).ok()?;
    if (0x00..=0x1F).contains(&v) || v == 0x20 || v == 0x7F || (0x80..=0x9F).contains(&v) {
        Some(v)
    } else {
        None
    }
}

fn parse_caret(tok: &str) -> Option<Cell> {
    let bytes = tok.as_bytes();
    if bytes.len() == 3 && bytes[0] == b'^' && bytes[1] == b'[' {
        let x = bytes[2];
        return Some((x as u32 ^ 0xC0) as Cell);
    }
    if bytes.len() == 2 && bytes[0] == b'^' {
        let x = bytes[1];
        return Some((x as u32 ^ 0x40) as Cell);
    }
    None
}

fn parse_rune_quote(tok: &str) -> Option<Cell> {
    let inner = tok.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.is_empty() {
        return None;
    }
    if let Some(esc) = inner.strip_prefix('\\') {
        return match esc {
            "n" => Some(b'\n' as Cell),
            "r" => Some(b'\r' as Cell),
            "t" => Some(b'\t' as Cell),
            "0" => Some(0),
            "\\" => Some(b'\\' as Cell),
            "'" => Some(b'\'' as Cell),
            _ => None,
        };
    }
    let mut chars = inner.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c as Cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_forms() {
        assert_eq!(parse_literal("42"), Some(42));
        assert_eq!(parse_literal("-7"), Some(-7));
        assert_eq!(parse_literal("0x2A"), Some(42));
        assert_eq!(parse_literal("052"), Some(42));
    }

    #[test]
    fn test_parse_control_mnemonic() {
        assert_eq!(parse_literal("<ESC>"), Some(0x1B));
        assert_eq!(parse_literal("<NEL>"), Some(0x85));
        assert_eq!(parse_literal("<1B>"), Some(0x1B));
    }

    #[test]
    fn test_parse_caret_forms() {
        assert_eq!(parse_literal("^A"), Some(0x01));
        assert_eq!(parse_literal("^[A"), Some(('A' as u32 ^ 0xC0) as Cell));
        assert_eq!(parse_literal("^["), Some(('[' as u32 ^ 0x40) as Cell));
    }

    #[test]
    fn test_parse_rune_quote() {
        assert_eq!(parse_literal("'a'"), Some('a' as Cell));
        assert_eq!(parse_literal("'\\n'"), Some(10));
        assert_eq!(parse_literal("''"), None);
    }

    #[test]
    fn test_parse_literal_rejects_plain_word() {
        assert_eq!(parse_literal("foo"), None);
    }
}
