// Tabular source domain model

/// One decoded row. `None` marks an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl<S: AsRef<str>> From<&[S]> for RawRow {
    fn from(values: &[S]) -> Self {
        let cells = values
            .iter()
            .map(|v| {
                let v = v.as_ref();
                if v.trim().is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        Self { cells }
    }
}
