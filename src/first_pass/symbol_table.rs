//! Insertion-ordered symbol table mapping names to 15-bit addresses.
//!
//! Seeded with the predefined Hack symbols per spec §3, then extended by
//! the label pass (labels) and the variable pass (user variables).
//! Uses a `Vec<(String, u16)>` rather than a `HashMap`, following the
//! teacher's choice for LC-3's (smaller) symbol tables — Hack programs
//! are similarly small, so linear lookup is adequate and preserves
//! insertion order for diagnostics.

#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<(String, u16)>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Seeds the predefined symbols: `SP, LCL, ARG, THIS, THAT, R0..R15,
    /// SCREEN, KBD`.
    pub fn new() -> Self {
        let mut entries = vec![
            ("SP".to_string(), 0),
            ("LCL".to_string(), 1),
            ("ARG".to_string(), 2),
            ("THIS".to_string(), 3),
            ("THAT".to_string(), 4),
            ("SCREEN".to_string(), 0x4000),
            ("KBD".to_string(), 0x6000),
        ];
        for r in 0..=15u16 {
            entries.push((format!("R{r}"), r));
        }
        Self { entries }
    }

    pub fn insert(&mut self, name: String, address: u16) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == &name) {
            entry.1 = address;
        } else {
            self.entries.push((name, address));
        }
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, addr)| *addr)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), *a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_predefined_symbols() {
        let table = SymbolTable::new();
        assert_eq!(table.get("SP"), Some(0));
        assert_eq!(table.get("LCL"), Some(1));
        assert_eq!(table.get("ARG"), Some(2));
        assert_eq!(table.get("THIS"), Some(3));
        assert_eq!(table.get("THAT"), Some(4));
        assert_eq!(table.get("SCREEN"), Some(0x4000));
        assert_eq!(table.get("KBD"), Some(0x6000));
        for r in 0..=15u16 {
            assert_eq!(table.get(&format!("R{r}")), Some(r));
        }
    }

    #[test]
    fn insert_then_get_round_trips() {
        let mut table = SymbolTable::new();
        table.insert("LOOP".into(), 42);
        assert_eq!(table.get("LOOP"), Some(42));
    }

    #[test]
    fn insert_overwrites_existing_entry_in_place() {
        let mut table = SymbolTable::new();
        table.insert("i".into(), 16);
        table.insert("i".into(), 17);
        assert_eq!(table.get("i"), Some(17));
        assert_eq!(table.len(), 7 + 16 + 1);
    }
}
