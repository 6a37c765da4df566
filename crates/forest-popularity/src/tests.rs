//! Unit tests for the popularity mapper.

#[cfg(test)]
mod helpers {
    use forest_core::{NodeId, Preferences};
    use forest_graph::{RoadGraph, RoadGraphBuilder};

    /// Walking chain 0-1-2-3, 300 s per segment (5 min at walking speed).
    pub fn walking_chain() -> (RoadGraph, [NodeId; 4]) {
        let mut b = RoadGraphBuilder::new();
        let n: Vec<NodeId> = (0..4)
            .map(|i| b.add_node(forest_core::GeoPos::new(0.0, i as f32)))
            .collect();
        for i in 0..3 {
            b.add_edge(n[i], n[i + 1], 300);
        }
        (b.build(), [n[0], n[1], n[2], n[3]])
    }

    /// 15 or 30 tolerated walking minutes, half the users each.
    pub fn preferences_minutes() -> Preferences {
        Preferences::new(vec![15.0, 30.0], vec![0.5, 0.5]).unwrap()
    }
}

#[cfg(test)]
mod shares {
    use crate::{ModeShares, PopularityError};

    #[test]
    fn survey_default_sums_to_one() {
        let s = ModeShares::survey_default();
        assert!((s.walking + s.cycling + s.car - 1.0).abs() < 1e-6);
        assert!(s.walking > s.car && s.car > s.cycling);
    }

    #[test]
    fn custom_shares_validated() {
        assert!(ModeShares::new(0.5, 0.25, 0.25).is_ok());
        assert!(matches!(
            ModeShares::new(0.5, 0.5, 0.5),
            Err(PopularityError::InvalidModeShares { .. })
        ));
        assert!(ModeShares::new(-0.1, 0.6, 0.5).is_err());
    }
}

#[cfg(test)]
mod mapper {
    use crate::{ModeShares, map_population};

    #[test]
    fn fully_reachable_grid_maps_the_modal_quota() {
        let (g, [e0, p1, p2, e3]) = super::helpers::walking_chain();
        let prefs = super::helpers::preferences_minutes();
        let shares = ModeShares::survey_default();

        let mapped = map_population(&g, &[e0, e3], &[p1, p2], &[80.0, 40.0], &prefs, shares)
            .unwrap();

        assert_eq!(mapped.entry_populations.len(), 2);
        assert!(mapped.entry_populations.iter().all(|&p| p > 0.0));

        // Everyone reaches the forest on foot and by bike, so the mapped
        // total is exactly the non-motorised quota.
        let total: f64 = mapped.entry_populations.iter().sum();
        let expected = 120.0 * (shares.walking + shares.cycling) as f64;
        assert!((total - expected).abs() < expected * 0.01, "{total} vs {expected}");

        // The rest drives.
        let car_expected = 120.0 * shares.car as f64;
        assert!((mapped.car_population - car_expected).abs() < 1e-6);
    }

    #[test]
    fn unreachable_population_is_respread_over_entries() {
        use forest_core::GeoPos;
        use forest_graph::RoadGraphBuilder;

        let mut b = RoadGraphBuilder::new();
        let n: Vec<_> = (0..5).map(|i| b.add_node(GeoPos::new(0.0, i as f32))).collect();
        for i in 0..3 {
            b.add_edge(n[i], n[i + 1], 300);
        }
        // Node 4 is a disconnected settlement.
        let g = b.build();
        let prefs = super::helpers::preferences_minutes();
        let shares = ModeShares::survey_default();

        let mapped = map_population(
            &g,
            &[n[0], n[3]],
            &[n[1], n[2], n[4]],
            &[80.0, 40.0, 50.0],
            &prefs,
            shares,
        )
        .unwrap();

        // The unreachable 50 people still end up at some entry: the grand
        // total matches the non-motorised quota of the whole population.
        let total: f64 = mapped.entry_populations.iter().sum();
        let expected = 170.0 * (shares.walking + shares.cycling) as f64;
        assert!((total - expected).abs() < expected * 0.01, "{total} vs {expected}");
    }

    #[test]
    fn walking_limit_is_exclusive_in_the_distribution_pass() {
        use forest_core::GeoPos;
        use forest_graph::RoadGraphBuilder;

        // One entry, one population point exactly at the walking limit
        // (30 min = 1800 s).  It counts as bike-reached only, and the
        // walking share flows back via the redistribution step.
        let mut b = RoadGraphBuilder::new();
        let e = b.add_node(GeoPos::new(0.0, 0.0));
        let p = b.add_node(GeoPos::new(0.0, 1.0));
        b.add_edge(e, p, 1800);
        let g = b.build();
        let prefs = super::helpers::preferences_minutes();
        let shares = ModeShares::survey_default();

        let mapped = map_population(&g, &[e], &[p], &[100.0], &prefs, shares).unwrap();

        let expected = 100.0 * (shares.walking + shares.cycling) as f64;
        assert!(
            (mapped.entry_populations[0] - expected).abs() < expected * 0.01,
            "{} vs {expected}",
            mapped.entry_populations[0]
        );
    }

    #[test]
    fn zero_population_maps_to_zero() {
        let (g, [e0, p1, p2, e3]) = super::helpers::walking_chain();
        let prefs = super::helpers::preferences_minutes();
        let shares = ModeShares::survey_default();

        let mapped =
            map_population(&g, &[e0, e3], &[p1, p2], &[0.0, 0.0], &prefs, shares).unwrap();
        assert!(mapped.entry_populations.iter().all(|&p| p == 0.0));
        assert_eq!(mapped.car_population, 0.0);
    }

    #[test]
    fn mismatched_point_and_value_counts_are_rejected() {
        let (g, [e0, p1, _, e3]) = super::helpers::walking_chain();
        let prefs = super::helpers::preferences_minutes();
        let r = map_population(
            &g,
            &[e0, e3],
            &[p1],
            &[1.0, 2.0],
            &prefs,
            ModeShares::survey_default(),
        );
        assert!(r.is_err());
    }
}

#[cfg(test)]
mod parking {
    use crate::distribute_car_population;

    #[test]
    fn splits_by_rank() {
        let pops = distribute_car_population(100.0, &[1.0, 3.0]);
        assert!((pops[0] - 25.0).abs() < 1e-4);
        assert!((pops[1] - 75.0).abs() < 1e-4);
    }

    #[test]
    fn zero_ranks_distribute_nothing() {
        let pops = distribute_car_population(100.0, &[0.0, 0.0]);
        assert_eq!(pops, vec![0.0, 0.0]);
    }
}
