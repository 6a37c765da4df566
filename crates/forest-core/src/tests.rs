//! Unit tests for forest-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ArcId, Fid, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ArcId(0) < ArcId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(ArcId::INVALID.0, u32::MAX);
        assert_eq!(Fid::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(Fid(7).to_string(), "Fid(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPos;
    use crate::geo::differ;

    #[test]
    fn zero_distance() {
        let p = GeoPos::new(48.0, 7.85);
        assert!(p.great_circle_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPos::new(48.0, 7.85);
        let b = GeoPos::new(49.0, 7.85);
        let d = a.great_circle_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn relative_deviation() {
        assert!(!differ(100.0, 100.5, 0.01));
        assert!(differ(100.0, 102.0, 0.01));
        assert!(!differ(0.0, 0.0, 0.01));
        // Any nonzero difference from zero counts.
        assert!(differ(0.0, 0.1, 0.01));
    }
}

#[cfg(test)]
mod prefs {
    use crate::{CoreError, Preferences};

    fn survey() -> Preferences {
        Preferences::new(vec![15.0, 30.0, 60.0, 120.0], vec![0.5, 0.25, 0.2, 0.05]).unwrap()
    }

    #[test]
    fn share_lookup() {
        let p = survey();
        assert_eq!(p.share_at(0.0), 0.5);
        assert_eq!(p.share_at(15.0), 0.5);
        assert_eq!(p.share_at(20.0), 0.25);
        assert_eq!(p.share_at(30.0), 0.25);
        assert_eq!(p.share_at(31.0), 0.2);
        assert_eq!(p.share_at(120.0), 0.05);
    }

    #[test]
    fn tail_share_lookup() {
        let p = survey();
        let close = |a: f32, b: f32| (a - b).abs() < 1e-6;
        assert!(close(p.tail_share_at(0.0), 1.0));
        assert!(close(p.tail_share_at(15.0), 1.0));
        assert!(close(p.tail_share_at(16.0), 0.5));
        assert!(close(p.tail_share_at(30.0), 0.5));
        assert!(close(p.tail_share_at(31.0), 0.25));
        assert!(close(p.tail_share_at(60.0), 0.25));
        assert!(close(p.tail_share_at(61.0), 0.05));
        assert!(close(p.tail_share_at(120.0), 0.05));
    }

    #[test]
    fn tail_share_non_increasing() {
        let p = survey();
        let mut prev = f32::INFINITY;
        for t in [0.0, 10.0, 15.5, 29.0, 45.0, 61.0, 119.0, 120.0] {
            let v = p.tail_share_at(t);
            assert!(v <= prev, "tail share increased at t={t}");
            prev = v;
        }
    }

    #[test]
    #[should_panic]
    fn lookup_past_table_panics() {
        survey().share_at(121.0);
    }

    #[test]
    fn scaling_to_seconds() {
        let p = survey().scaled(60.0);
        assert_eq!(p.max_bound(), 7200.0);
        assert_eq!(p.share_at(900.0), 0.5);
        assert_eq!(p.share_at(901.0), 0.25);
    }

    #[test]
    fn rejects_non_increasing_bounds() {
        let r = Preferences::new(vec![15.0, 14.0], vec![0.5, 0.25]);
        assert!(matches!(r, Err(CoreError::BoundsNotIncreasing(..))));
    }

    #[test]
    fn rejects_share_out_of_range() {
        let r = Preferences::new(vec![15.0, 30.0], vec![0.5, 1.2]);
        assert!(matches!(r, Err(CoreError::ShareOutOfRange(..))));
    }

    #[test]
    fn rejects_share_sum_above_one() {
        let r = Preferences::new(vec![15.0, 30.0, 60.0], vec![0.5, 0.25, 0.5]);
        assert!(matches!(r, Err(CoreError::ShareSumExceedsOne(..))));
    }

    #[test]
    fn rejects_empty_and_mismatched() {
        assert!(matches!(
            Preferences::new(vec![], vec![]),
            Err(CoreError::EmptyPreferences)
        ));
        assert!(matches!(
            Preferences::new(vec![15.0, 30.0], vec![0.5]),
            Err(CoreError::ColumnMismatch { .. })
        ));
    }
}

#[cfg(test)]
mod progress {
    use crate::Progress;

    #[test]
    fn counts_ticks() {
        let p = Progress::new("test", 10);
        for _ in 0..7 {
            p.tick();
        }
        assert_eq!(p.done(), 7);
    }
}
