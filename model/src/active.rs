use catalogue::LineId;

/// The lines currently switched on, in the order they were turned on. Owned by whoever hosts
/// the line list; the engine only reads it and calls `toggle`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveLines {
    lines: Vec<LineId>,
}

impl ActiveLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, line: &LineId) -> bool {
        self.lines.contains(line)
    }

    /// Returns true if the line is now active
    pub fn toggle(&mut self, line: &LineId) -> bool {
        if self.deactivate(line) {
            false
        } else {
            self.lines.push(line.clone());
            true
        }
    }

    /// Returns true if this changed anything
    pub fn activate(&mut self, line: &LineId) -> bool {
        if self.contains(line) {
            return false;
        }
        self.lines.push(line.clone());
        true
    }

    /// Returns true if this changed anything
    pub fn deactivate(&mut self, line: &LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|x| x != line);
        self.lines.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineId> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[LineId] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<LineId> for ActiveLines {
    fn from_iter<I: IntoIterator<Item = LineId>>(iter: I) -> Self {
        let mut active = Self::new();
        for line in iter {
            active.activate(&line);
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_order() {
        let mut active = ActiveLines::new();
        assert!(active.toggle(&"17".into()));
        assert!(active.toggle(&"15".into()));
        assert!(active.toggle(&"20".into()));
        assert!(!active.toggle(&"15".into()));
        assert_eq!(
            active.iter().map(|l| l.as_str()).collect::<Vec<_>>(),
            vec!["17", "20"]
        );
        assert!(!active.activate(&"20".into()));
    }

    #[test]
    fn collect_dedupes() {
        let active: ActiveLines = vec![LineId::from("1"), LineId::from("2"), LineId::from("1")]
            .into_iter()
            .collect();
        assert_eq!(active.len(), 2);
    }
}
