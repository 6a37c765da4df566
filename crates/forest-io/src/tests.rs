//! Unit tests for the tabular readers.

#[cfg(test)]
mod helpers {
    use std::path::PathBuf;

    use tempfile::TempDir;

    pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

#[cfg(test)]
mod columns {
    use crate::{IoError, dump_vector, read_column_file};

    #[test]
    fn reads_columns_row_major() {
        let dir = tempfile::tempdir().unwrap();
        let path = super::helpers::write(&dir, "t.txt", "1 2 3\n4 5 6\n\n7 8 9\n");
        let cols = read_column_file(&path).unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], vec![1.0, 4.0, 7.0]);
        assert_eq!(cols[2], vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = super::helpers::write(&dir, "t.txt", "1 2\n3\n");
        assert!(matches!(
            read_column_file(&path),
            Err(IoError::ColumnMismatch { line: 2, .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = super::helpers::write(&dir, "t.txt", "1 abc\n");
        assert!(matches!(read_column_file(&path), Err(IoError::Parse { .. })));
    }

    #[test]
    fn rejects_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = super::helpers::write(&dir, "t.txt", "\n\n");
        assert!(matches!(read_column_file(&path), Err(IoError::Empty { .. })));
    }

    #[test]
    fn dump_writes_one_value_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        dump_vector(&[1.5f32, 0.0, 2.25], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.5\n0\n2.25\n");
    }
}

#[cfg(test)]
mod records {
    use forest_core::NodeId;

    use crate::{IoError, read_entries, read_parking, read_populations, read_preferences};

    #[test]
    fn entries_carry_both_node_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            super::helpers::write(&dir, "e.txt", "48.0 7.8 17 4\n48.1 7.9 23 9\n");
        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].road_node, NodeId(17));
        assert_eq!(entries[0].forest_node, NodeId(4));
        assert_eq!(entries[1].forest_node, NodeId(9));
    }

    #[test]
    fn populations_and_parking() {
        let dir = tempfile::tempdir().unwrap();
        let pop = super::helpers::write(&dir, "p.txt", "48.0 7.8 120.5\n");
        let records = read_populations(&pop).unwrap();
        assert_eq!(records[0].population, 120.5);

        let park = super::helpers::write(&dir, "k.txt", "48.0 7.8 3 40\n48.1 7.9 1 10\n");
        let lots = read_parking(&park).unwrap();
        assert_eq!(lots[0].rank, 3.0);
        assert_eq!(lots[1].population, 10.0);
    }

    #[test]
    fn preferences_are_validated_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let good = super::helpers::write(&dir, "g.txt", "15 0.5\n30 0.25\n60 0.2\n120 0.05\n");
        let prefs = read_preferences(&good).unwrap();
        assert_eq!(prefs.num_buckets(), 4);
        assert_eq!(prefs.max_bound(), 120.0);

        let bad = super::helpers::write(&dir, "b.txt", "15 0.5\n14 0.25\n");
        assert!(matches!(read_preferences(&bad), Err(IoError::Invalid { .. })));

        let sum = super::helpers::write(&dir, "s.txt", "15 0.5\n30 0.6\n");
        assert!(matches!(read_preferences(&sum), Err(IoError::Invalid { .. })));
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = super::helpers::write(&dir, "e.txt", "48.0 7.8 17\n");
        assert!(matches!(read_entries(&path), Err(IoError::ColumnMismatch { .. })));
    }
}
