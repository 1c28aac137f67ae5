//! Unit tests for sdp-traffic.

#[cfg(test)]
mod helpers {
    use sdp_core::{NodeId, Point, Polyline, StreetId};
    use sdp_network::{Edge, EdgeTable, EdgeTableBuilder};

    use crate::profile::SpeedPattern;

    /// Streets 10 (oid 1) and 11 (oid 2), each 1 km at 60 km/h.
    pub fn two_streets() -> EdgeTable {
        let mut b = EdgeTableBuilder::new().spatial_order(false);
        for (id, y) in [(10, 0.0), (11, 1.0)] {
            let line = Polyline::from_points(vec![Point::new(0.0, y), Point::new(1.0, y)]).unwrap();
            b.add_edge(Edge::new(StreetId(id), NodeId(id * 2), NodeId(id * 2 + 1), 1000.0, 60.0, line));
        }
        b.build().unwrap()
    }

    pub fn pattern(pattern_id: i64, speed: impl Fn(usize) -> f64) -> SpeedPattern {
        SpeedPattern { pattern_id, speeds: (0..96).map(speed).collect() }
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Harmonic speed and normalization ──────────────────────────────────────────

#[cfg(test)]
mod harmonic {
    use super::helpers::close;
    use crate::profile::{harmonic_speed, relative_to};

    #[test]
    fn uniform_speed_is_itself() {
        for v in [0.7, 5.0, 37.3, 48.0, 113.0, 134.4] {
            for n in [1, 96, 288] {
                assert_eq!(harmonic_speed(vec![v; n]), Some(v), "{v} kph over {n} slices");
            }
        }
    }

    #[test]
    fn weighted_toward_faster_slices() {
        // (1/30 + 1/60) / (1/900 + 1/3600) = 36
        assert!(close(harmonic_speed([30.0, 60.0]).unwrap(), 36.0));
    }

    #[test]
    fn empty_or_zero_has_no_average() {
        assert_eq!(harmonic_speed(std::iter::empty::<f64>()), None);
        assert_eq!(harmonic_speed([40.0, 0.0]), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = [40.0, 20.0, 60.0, 40.0];
        let once = relative_to(&raw, 0).unwrap();
        assert_eq!(once, vec![1.0, 0.5, 1.5, 1.0]);
        assert_eq!(relative_to(&once, 0).unwrap(), once);
    }

    #[test]
    fn zero_reference_cannot_normalize() {
        assert_eq!(relative_to(&[0.0, 10.0], 0), None);
        assert_eq!(relative_to(&[], 0), None);
    }
}

// ── HERE patterns ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod patterns {
    use sdp_core::CollectedDiagnostics;

    use super::helpers::{close, pattern};
    use crate::TrafficError;
    use crate::profile::{SpeedPattern, build_patterns};

    #[test]
    fn summary_and_rows() {
        let mut diag = CollectedDiagnostics::new();
        let input = [
            pattern(7, |_| 60.0),
            pattern(8, |i| if i == 0 { 0.0 } else { 50.0 }),
            pattern(9, |i| if i == 0 { 40.0 } else { 80.0 }),
        ];
        let (rows, catalog) = build_patterns(&input, &mut diag).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(diag.has_warning("Speed pattern 8"));
        // Object ids stay dense when a pattern is skipped.
        assert_eq!((rows[0].object_id, rows[0].profile_id), (1, 7));
        assert_eq!((rows[1].object_id, rows[1].profile_id), (2, 9));

        let constant = catalog.get(7).unwrap();
        assert!(constant.is_const);
        assert!(close(constant.average_speed, 60.0));
        assert!(rows[0].factors.iter().all(|&f| f == 1.0));

        let varying = catalog.get(9).unwrap();
        assert!(!varying.is_const);
        assert_eq!(varying.base_speed, 40.0);
        assert_eq!(rows[1].factors[0], 1.0);
        assert_eq!(rows[1].factors[1], 2.0);
        assert!(catalog.get(8).is_none());
    }

    #[test]
    fn wrong_slice_count_is_fatal() {
        let mut diag = CollectedDiagnostics::new();
        let short = SpeedPattern { pattern_id: 3, speeds: vec![50.0; 95] };
        let err = build_patterns(&[short], &mut diag).unwrap_err();
        assert!(matches!(err, TrafficError::SliceCount { pattern: 3, expected: 96, got: 95 }));
    }
}

// ── MultiNet daily profiles ───────────────────────────────────────────────────

#[cfg(test)]
mod daily {
    use sdp_core::CollectedDiagnostics;

    use crate::profile::{SlotSample, daily_profiles};

    #[test]
    fn complete_profile_has_no_warning() {
        let mut diag = CollectedDiagnostics::new();
        let samples: Vec<SlotSample> = (0..288)
            .map(|i| SlotSample { profile_id: 5, time_slot: i * 300, rel_sp: 80.0 })
            .collect();
        let rows = daily_profiles(&samples, &mut diag);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].factors.len(), 288);
        assert!(rows[0].factors.iter().all(|&f| (f - 0.8).abs() < 1e-12));
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn missing_slots_filled_with_one() {
        let mut diag = CollectedDiagnostics::new();
        let samples = [
            SlotSample { profile_id: 9, time_slot: 0, rel_sp: 100.0 },
            SlotSample { profile_id: 3, time_slot: 0, rel_sp: 50.0 },
            SlotSample { profile_id: 3, time_slot: 600, rel_sp: 120.0 },
        ];
        let rows = daily_profiles(&samples, &mut diag);
        assert_eq!(rows.iter().map(|r| r.profile_id).collect::<Vec<_>>(), vec![3, 9]);
        assert_eq!(rows[0].object_id, 1);
        assert_eq!(rows[0].factors[0], 0.5);
        assert_eq!(rows[0].factors[1], 1.0);
        assert_eq!(rows[0].factors[2], 1.2);
        assert!(diag.has_warning("incomplete TIME_SLOT records for PROFILE_ID 3"));
        assert!(diag.has_warning("PROFILE_ID 9"));
    }
}

// ── Assignments ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod assign {
    use sdp_core::CollectedDiagnostics;

    use super::helpers::{pattern, two_streets};
    use crate::assign::{
        LinkPatternRef, TmcPatternRef, TmcTrafficRef, link_assignments, normalize_tmc, tmc_assignments,
    };
    use crate::profile::build_patterns;

    fn link_ref(link_id: i64, dir: &str, days: [i64; 7]) -> LinkPatternRef {
        LinkPatternRef { link_id, travel_direction: dir.to_string(), days }
    }

    #[test]
    fn minor_fc_drops_constant_weeks() {
        let mut diag = CollectedDiagnostics::new();
        let (_, catalog) =
            build_patterns(&[pattern(7, |_| 60.0), pattern(9, |i| 40.0 + i as f64)], &mut diag).unwrap();
        let edges = two_streets();
        let chunk = [
            link_ref(10, "F", [7; 7]),
            link_ref(10, "T", [7, 7, 7, 7, 7, 7, 9]),
            link_ref(11, "F", [9; 7]),
            link_ref(99, "F", [9; 7]),
        ];

        let major = link_assignments(&chunk, &edges, &catalog, false);
        assert_eq!(major.len(), 3);

        let minor = link_assignments(&chunk, &edges, &catalog, true);
        assert_eq!(minor.len(), 2);
        assert_eq!(minor[0].link_id, 10);
        assert_eq!((minor[0].frm_pos, minor[0].to_pos), (1.0, 0.0));
        assert_eq!((minor[1].frm_pos, minor[1].to_pos), (0.0, 1.0));
    }

    #[test]
    fn tmc_codes_normalized() {
        assert_eq!(normalize_tmc("-116+04355"), "116P04355");
        assert_eq!(normalize_tmc("+116-04355"), "116N04355");
        assert_eq!(normalize_tmc("116P04355"), "116P04355");
    }

    #[test]
    fn tmc_join_sets_direction_from_sign() {
        let traffic = [
            TmcTrafficRef { link_id: 10, traffic_cd: "-116+04355".into() },
            TmcTrafficRef { link_id: 11, traffic_cd: "+116+04355".into() },
            TmcTrafficRef { link_id: 11, traffic_cd: "+116+09999".into() },
        ];
        let patterns = [TmcPatternRef { tmc: "116P04355".into(), days: [4; 7] }];
        let out = tmc_assignments(&traffic, &patterns);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tmc.as_deref(), Some("116P04355"));
        assert_eq!((out[0].frm_pos, out[0].to_pos), (1.0, 0.0));
        assert_eq!((out[1].frm_pos, out[1].to_pos), (0.0, 1.0));
        assert_eq!(out[1].days, [4; 7]);
    }
}

// ── Per-day merge ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod merge {
    use sdp_core::CollectedDiagnostics;

    use super::helpers::{close, pattern, two_streets};
    use crate::assign::PatternAssignment;
    use crate::merge::{DailySpeedRecord, daily_profile_rows, merge_patterns};
    use crate::profile::build_patterns;

    fn assignment(link_id: i64, days: [i64; 7]) -> PatternAssignment {
        PatternAssignment { link_id, tmc: None, days, frm_pos: 0.0, to_pos: 1.0 }
    }

    #[test]
    fn days_map_to_object_ids() {
        let mut diag = CollectedDiagnostics::new();
        let (_, catalog) =
            build_patterns(&[pattern(70, |_| 30.0), pattern(90, |_| 60.0)], &mut diag).unwrap();
        let edges = two_streets();
        let input = [
            assignment(11, [70, 90, 90, 90, 90, 90, 70]),
            assignment(10, [70, 70, 70, 70, 70, 70, 5]),
            assignment(42, [70; 7]),
        ];
        let rows = merge_patterns(&input, &catalog, &edges, 1, &mut diag);

        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.days, [1, 2, 2, 2, 2, 2, 1]);
        assert_eq!((r.fcid, r.fid), (1, 2));
        // (2/30 + 5/60) / (2/900 + 5/3600) = 0.15 / 0.0036111.. = 41.538..
        let expected = (2.0 / 30.0 + 5.0 / 60.0) / (2.0 / 900.0 + 5.0 / 3600.0);
        assert!(close(r.average_speed, expected));
        assert!(close(r.base_speed, expected));
        assert!(diag.has_warning("Speed pattern 5"));
        assert!(diag.has_warning("missing an entry with ID 42"));
    }

    fn hsnp(network_id: i64, val_dir: i64, free_flow: f64) -> DailySpeedRecord {
        DailySpeedRecord {
            network_id,
            val_dir,
            sp_free_flow: free_flow,
            sp_weekday: 40.0,
            sp_weekend: 50.0,
            sp_week: 45.0,
            profiles: [1, 2, 2, 2, 2, 2, 1],
        }
    }

    #[test]
    fn daily_rows_by_direction() {
        let mut diag = CollectedDiagnostics::new();
        let edges = two_streets();
        let records = [hsnp(10, 2, 55.0), hsnp(10, 3, 55.0), hsnp(11, 2, 0.0), hsnp(11, 1, 55.0), hsnp(77, 2, 55.0)];
        let rows = daily_profile_rows(&records, &edges, 1, &mut diag);

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].frm_pos, rows[0].to_pos), (0.0, 1.0));
        assert_eq!((rows[1].frm_pos, rows[1].to_pos), (1.0, 0.0));
        assert_eq!(rows[0].fid, 1);
        assert!(diag.has_warning("network profile link historical traffic table"));
        assert_eq!(diag.warnings.len(), 1);
    }
}

// ── Edge speeds and minutes ───────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use sdp_core::StreetId;
    use sdp_output::StreetPatternRow;

    use super::helpers::{close, two_streets};
    use crate::merge::DailySpeedRecord;
    use crate::speed::{
        HERE_SPEED_FIELDS, MULTINET_SPEED_FIELDS, apply_daily_speeds, apply_minutes, apply_pattern_speeds,
        apply_plain_minutes, travel_minutes,
    };

    fn value(edges: &sdp_network::EdgeTable, street: i64, field: &str) -> Option<f64> {
        edges.by_street(StreetId(street))?.attr(field)?.as_f64()
    }

    #[test]
    fn minutes_formula() {
        assert!(close(travel_minutes(1000.0, 60.0), 1.0));
        assert!(close(travel_minutes(500.0, 30.0), 1.0));
    }

    #[test]
    fn plain_minutes_from_kph() {
        let mut edges = two_streets();
        apply_plain_minutes(&mut edges);
        assert!(edges.fields().iter().any(|f| f == "Minutes"));
        assert!(close(value(&edges, 10, "Minutes").unwrap(), 1.0));
    }

    #[test]
    fn pattern_speed_with_kph_fallback() {
        let mut edges = two_streets();
        let row = StreetPatternRow {
            link_id: 10,
            tmc: None,
            days: [1; 7],
            fcid: 1,
            fid: 1,
            frm_pos: 0.0,
            to_pos: 1.0,
            average_speed: 30.0,
            base_speed: 30.0,
        };
        apply_pattern_speeds(&mut edges, &[row]);
        apply_minutes(&mut edges, HERE_SPEED_FIELDS);

        assert_eq!(value(&edges, 10, "FT_AverageSpeed"), Some(30.0));
        assert_eq!(value(&edges, 10, "TF_AverageSpeed"), None);
        assert!(close(value(&edges, 10, "FT_Minutes").unwrap(), 2.0));
        assert!(close(value(&edges, 10, "TF_Minutes").unwrap(), 1.0));
        assert!(close(value(&edges, 11, "FT_Minutes").unwrap(), 1.0));
        assert!(edges.fields().iter().any(|f| f == "TF_AverageSpeed"));
    }

    #[test]
    fn daily_speeds_by_val_dir() {
        let mut edges = two_streets();
        let rec = DailySpeedRecord {
            network_id: 11,
            val_dir: 3,
            sp_free_flow: 70.0,
            sp_weekday: 20.0,
            sp_weekend: 30.0,
            sp_week: 24.0,
            profiles: [1; 7],
        };
        apply_daily_speeds(&mut edges, &[rec]);
        apply_minutes(&mut edges, MULTINET_SPEED_FIELDS);

        assert_eq!(value(&edges, 11, "TF_Weekday"), Some(20.0));
        assert_eq!(value(&edges, 11, "FT_Weekday"), None);
        assert!(close(value(&edges, 11, "TF_WeekdayMinutes").unwrap(), 3.0));
        assert!(close(value(&edges, 11, "TF_WeekendMinutes").unwrap(), 2.0));
        assert!(close(value(&edges, 11, "TF_AllWeekMinutes").unwrap(), 2.5));
        assert!(close(value(&edges, 11, "FT_AllWeekMinutes").unwrap(), 1.0));
    }
}

// ── Streets_TMC ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tmc {
    use sdp_core::CollectedDiagnostics;

    use super::helpers::two_streets;
    use crate::assign::TmcTrafficRef;
    use crate::tmc::{RdsTmcRecord, here_tmc_rows, multinet_tmc_rows};

    #[test]
    fn here_sign_becomes_positions() {
        let mut diag = CollectedDiagnostics::new();
        let edges = two_streets();
        let traffic = [
            TmcTrafficRef { link_id: 11, traffic_cd: "-116+04355".into() },
            TmcTrafficRef { link_id: 10, traffic_cd: "+116+04356".into() },
            TmcTrafficRef { link_id: 12, traffic_cd: "+116+04357".into() },
        ];
        let rows = here_tmc_rows(&traffic, &edges, 1, &mut diag);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tmc, "116+04355");
        assert_eq!((rows[0].fid, rows[0].frm_pos, rows[0].to_pos), (2, 1.0, 0.0));
        assert_eq!((rows[1].frm_pos, rows[1].to_pos), (0.0, 1.0));
        assert!(diag.has_warning("missing an entry with ID 12"));
    }

    #[test]
    fn multinet_code_is_trailing_nine() {
        let mut diag = CollectedDiagnostics::new();
        let edges = two_streets();
        let rd = [
            RdsTmcRecord { id: 10, rdstmc: "+01116P04355".into() },
            RdsTmcRecord { id: 11, rdstmc: "-01116N04356".into() },
            RdsTmcRecord { id: 11, rdstmc: "X01116N04357".into() },
        ];
        let rows = multinet_tmc_rows(&rd, &edges, 1, &mut diag);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tmc, "116P04355");
        assert_eq!((rows[0].frm_pos, rows[0].to_pos), (0.0, 1.0));
        assert_eq!(rows[1].tmc, "116N04356");
        assert_eq!((rows[1].frm_pos, rows[1].to_pos), (1.0, 0.0));
        assert!(diag.has_warning("invalid RDSTMC field value for ID 11"));
    }
}
