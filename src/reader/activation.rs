use log::{debug, warn};

use crate::schema::ColumnSet;

use super::{Binding, ColumnStatus, ReaderError, RowSource};

impl<C: ColumnSet> RowSource<C> {
    /// Declare the columns that will be read.
    ///
    /// Tables whose active set grows are decoded again with the new projection,
    /// once. If a row is loaded it is reloaded, so the newly active columns are
    /// populated for it. Columns missing from the forest stay inactive and read
    /// as zero.
    ///
    /// # Errors
    ///
    /// A column whose stored type does not match its declared kind is an error.
    pub fn activate(&mut self, columns: &[C]) -> Result<(), ReaderError> {
        let mut touched = vec![false; self.groups.len()];

        for &column in columns {
            let idx = column.index();
            match self.status[idx] {
                ColumnStatus::Active => continue,
                ColumnStatus::Missing => {
                    warn!(
                        "Column {} not found in {}, reading it as zero",
                        column.def().name,
                        C::DIRECTORY
                    );
                    continue;
                }
                ColumnStatus::Inactive => {}
            }

            let def = column.def();
            let Some(group_idx) = self.groups.iter().position(|g| g.kind == def.group) else {
                continue;
            };
            let group = &mut self.groups[group_idx];
            let root = group.schema.index_of(def.name)?;
            let stored = group.schema.field(root).data_type();
            if !def.kind.matches(stored) {
                return Err(ReaderError::ColumnTypeMismatch {
                    column: def.name,
                    expected: format!("{:?}", def.kind),
                    found: stored.to_string(),
                });
            }

            if let Err(pos) = group.projected.binary_search(&root) {
                group.projected.insert(pos, root);
                touched[group_idx] = true;
            }
            self.status[idx] = ColumnStatus::Active;
            debug!("Activated {}/{}", C::DIRECTORY, def.name);
        }

        if !touched.iter().any(|&t| t) {
            return Ok(());
        }

        for (group_idx, group) in self.groups.iter_mut().enumerate() {
            if !touched[group_idx] {
                continue;
            }
            let batches = group
                .table
                .read_columns(&group.projected, self.config.batch_size)?;
            let mut batch_starts = Vec::with_capacity(batches.len());
            let mut start = 0;
            for batch in &batches {
                batch_starts.push(start);
                start += batch.num_rows();
            }
            if start != group.num_rows {
                return Err(ReaderError::InvalidFormat(format!(
                    "{} table decoded {} rows, footer declares {}",
                    group.kind, start, group.num_rows
                )));
            }
            debug!(
                "Decoded {} columns of {}/{} in {} batches",
                group.projected.len(),
                C::DIRECTORY,
                C::table_name(group.kind),
                batches.len()
            );
            group.batches = batches;
            group.batch_starts = batch_starts;
        }

        self.rebind()?;

        if let Some(row) = self.row {
            self.load_row(row)?;
        }
        Ok(())
    }

    /// Declare every column present in the forest.
    pub fn activate_all(&mut self) -> Result<(), ReaderError> {
        let present: Vec<C> = C::ALL
            .iter()
            .copied()
            .filter(|&c| self.status[c.index()] != ColumnStatus::Missing)
            .collect();
        self.activate(&present)
    }

    /// Resolve active columns to their position in the decoded batches.
    fn rebind(&mut self) -> Result<(), ReaderError> {
        for &column in C::ALL {
            let idx = column.index();
            if self.status[idx] != ColumnStatus::Active {
                self.bindings[idx] = None;
                continue;
            }
            let def = column.def();
            let Some(group_idx) = self.groups.iter().position(|g| g.kind == def.group) else {
                continue;
            };
            let group = &self.groups[group_idx];
            let root = group.schema.index_of(def.name)?;
            let position = group.projected.binary_search(&root).map_err(|_| {
                ReaderError::InvalidFormat(format!("{} is active but not decoded", def.name))
            })?;
            self.bindings[idx] = Some(Binding {
                group: group_idx,
                column: position,
            });
        }
        Ok(())
    }
}
