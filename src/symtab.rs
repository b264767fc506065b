//! One-based string interning, grounded in the symbol table spec.md §4.2
//! calls for — a small bijective map the dictionary uses to turn token text
//! into the name ids stored in word headers.

use std::collections::HashMap;

#[derive(Default)]
pub struct SymbolTable {
    names: Vec<String>, // names[id - 1] == name for id
    ids: HashMap<String, i64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            names: Vec::new(),
            ids: HashMap::new(),
        }
    }

    pub fn intern(&mut self, s: &str) -> i64 {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        self.names.push(s.to_string());
        let id = self.names.len() as i64;
        self.ids.insert(s.to_string(), id);
        id
    }

    pub fn id_of(&self, s: &str) -> i64 {
        *self.ids.get(s).unwrap_or(&0)
    }

    pub fn name(&self, id: i64) -> &str {
        if id <= 0 || id as usize > self.names.len() {
            ""
        } else {
            &self.names[(id - 1) as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_dense_ids_from_one() {
        let mut t = SymbolTable::new();
        assert_eq!(t.intern("foo"), 1);
        assert_eq!(t.intern("bar"), 2);
        assert_eq!(t.intern("foo"), 1);
    }

    #[test]
    fn test_id_of_unknown_is_zero() {
        let t = SymbolTable::new();
        assert_eq!(t.id_of("nope"), 0);
    }

    #[test]
    fn test_name_round_trips() {
        let mut t = SymbolTable::new();
        let id = t.intern("exit");
        assert_eq!(t.name(id), "exit");
        assert_eq!(t.name(0), "");
        assert_eq!(t.name(999), "");
    }
}
