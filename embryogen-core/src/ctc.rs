//! Director-side bookkeeping of birth/death/parental events, exported in
//! Cell Tracking Challenge format at shutdown.

use embryogen_concepts::agent::AgentId;
use embryogen_concepts::errors::IoError;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug)]
pub struct CtcTrackRow {
    pub id: AgentId,
    pub first_frame: u32,
    pub last_frame: u32,
    pub parent_id: AgentId,
}

#[derive(Clone, Debug, Default)]
pub struct CtcTrackTable {
    rows: std::collections::BTreeMap<AgentId, CtcTrackRow>,
}

impl CtcTrackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: AgentId, frame: u32, parent_id: AgentId) {
        self.rows.insert(
            id,
            CtcTrackRow {
                id,
                first_frame: frame,
                last_frame: frame,
                parent_id,
            },
        );
    }

    /// Extends an existing track's last-seen frame; a no-op if the track
    /// was never started (defensive against out-of-order delivery).
    pub fn touch(&mut self, id: AgentId, frame: u32) {
        if let Some(row) = self.rows.get_mut(&id) {
            row.last_frame = row.last_frame.max(frame);
        }
    }

    pub fn close(&mut self, id: AgentId, frame: u32) {
        self.touch(id, frame);
    }

    pub fn rows(&self) -> impl Iterator<Item = &CtcTrackRow> {
        self.rows.values()
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), IoError> {
        let mut file = std::fs::File::create(path)
            .map_err(|e| IoError::new(format!("cannot create {}: {e}", path.display())))?;
        for row in self.rows() {
            writeln!(
                file,
                "{} {} {} {}",
                row.id, row.first_frame, row.last_frame, row.parent_id
            )
            .map_err(|e| IoError::new(format!("cannot write {}: {e}", path.display())))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_division_produces_the_three_expected_rows() {
        let mut table = CtcTrackTable::new();
        table.start(1, 0, 0);
        table.close(1, 19);
        table.start(2, 20, 1);
        table.close(2, 20);
        table.start(3, 20, 1);
        table.close(3, 20);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].id, rows[0].first_frame, rows[0].last_frame, rows[0].parent_id), (1, 0, 19, 0));
        assert_eq!(rows[1].parent_id, 1);
        assert_eq!(rows[2].parent_id, 1);
    }
}
