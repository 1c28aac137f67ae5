//! Unit tests for sdp-maneuver.

#[cfg(test)]
mod helpers {
    use sdp_core::{NodeId, Point, Polyline, StreetId};
    use sdp_network::{Edge, EdgeTable, EdgeTableBuilder};

    pub fn line(pts: &[(f64, f64)]) -> Polyline {
        Polyline::from_points(pts.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    pub fn assert_points(actual: &Polyline, expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "points: {:?}", actual.points());
        for (p, &(x, y)) in actual.points().iter().zip(expected) {
            assert!(p.coincides(Point::new(x, y)) || ((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9),
                "expected ({x}, {y}), got {p}");
        }
    }

    /// Node coordinates: 1 (0,0), 2 (10,0), 3 (10,10), 4 (20,0), 5 (10,-10),
    /// 6 (0,10).  Street 20 is street 10 digitized the other way; 30 is far
    /// away from everything.  Object ids follow insertion order (10 → 1,
    /// 11 → 2, ... 30 → 7).
    pub fn junction_table() -> EdgeTable {
        let streets: [(i64, i64, i64, &[(f64, f64)]); 7] = [
            (10, 1, 2, &[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]),
            (11, 2, 3, &[(10.0, 0.0), (10.0, 5.0), (10.0, 10.0)]),
            (12, 4, 2, &[(20.0, 0.0), (10.0, 0.0)]),
            (13, 2, 5, &[(10.0, 0.0), (10.0, -10.0)]),
            (14, 2, 6, &[(10.0, 0.0), (0.0, 10.0)]),
            (20, 2, 1, &[(10.0, 0.0), (0.0, 0.0)]),
            (30, 7, 8, &[(50.0, 50.0), (60.0, 50.0)]),
        ];
        let mut b = EdgeTableBuilder::new().spatial_order(false);
        for (id, from, to, pts) in streets {
            b.add_edge(Edge::new(StreetId(id), NodeId(from), NodeId(to), 100.0, 48.0, line(pts)));
        }
        b.build().unwrap()
    }

    pub fn oid(table: &EdgeTable, street: i64) -> i64 {
        table.find(StreetId(street)).unwrap().oid()
    }
}

// ── Chain stitching ───────────────────────────────────────────────────────────

#[cfg(test)]
mod chain {
    use sdp_core::{Edge1End, Traversal};

    use super::helpers::{assert_points, line};
    use crate::chain::{TURN_TRIM, join_oriented, stitch};

    #[test]
    fn forward_pair_keeps_tail_and_head() {
        let a = line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(10.0, 0.0), (10.0, 5.0), (10.0, 10.0)]);
        let tail = a.segment_along(1.0 - TURN_TRIM, 1.0);
        let head = b.segment_along(0.0, TURN_TRIM);

        let c = stitch(&[&a, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert_eq!(c.traversals, vec![Traversal::Along, Traversal::Along]);
        assert!(!c.mismatch);
        // The junction vertex is shared, not repeated.
        assert_eq!(c.shape.len(), tail.len() + head.len() - 1);
        assert_points(&c.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
    }

    #[test]
    fn no_consecutive_duplicates() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let m = line(&[(10.0, 0.0), (10.0, 10.0)]);
        let b = line(&[(10.0, 10.0), (20.0, 10.0)]);
        let c = stitch(&[&a, &m, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert!(c.shape.points().windows(2).all(|w| !w[0].coincides(w[1])));
    }

    #[test]
    fn zero_length_edge_adds_no_duplicate_vertex() {
        let stub = line(&[(10.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(10.0, 0.0), (10.0, 3.0)]);
        let c = stitch(&[&stub, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert_points(&c.shape, &[(10.0, 0.0), (10.0, 0.9)]);

        let c = stitch(&[&b, &stub], Edge1End::No, TURN_TRIM).unwrap();
        assert!(c.shape.points().windows(2).all(|w| !w[0].coincides(w[1])));
    }

    #[test]
    fn unknown_start_inferred_from_second_edge() {
        let a = line(&[(10.0, 0.0), (0.0, 0.0)]);
        let b = line(&[(10.0, 0.0), (10.0, 10.0)]);
        let c = stitch(&[&a, &b], Edge1End::Unknown, TURN_TRIM).unwrap();
        assert_eq!(c.traversals, vec![Traversal::Against, Traversal::Along]);
        assert_points(&c.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
    }

    #[test]
    fn explicit_no_flag_reverses_first_edge() {
        let a = line(&[(10.0, 0.0), (0.0, 0.0)]);
        let b = line(&[(10.0, 0.0), (10.0, 10.0)]);
        let c = stitch(&[&a, &b], Edge1End::No, TURN_TRIM).unwrap();
        assert_eq!(c.traversals[0], Traversal::Against);
        assert_points(&c.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
    }

    #[test]
    fn middle_edge_whole_and_reversed() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let m = line(&[(10.0, 10.0), (10.0, 0.0)]);
        let b = line(&[(10.0, 10.0), (20.0, 10.0)]);
        let c = stitch(&[&a, &m, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert_eq!(c.traversals, vec![Traversal::Along, Traversal::Against, Traversal::Along]);
        assert_points(&c.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 10.0), (13.0, 10.0)]);
    }

    #[test]
    fn last_edge_against_digitization() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(10.0, 10.0), (10.0, 0.0)]);
        let c = stitch(&[&a, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert_eq!(c.traversals[1], Traversal::Against);
        assert_points(&c.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
    }

    #[test]
    fn disjoint_edge_flags_mismatch() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(20.0, 0.0), (30.0, 0.0)]);
        let c = stitch(&[&a, &b], Edge1End::Yes, TURN_TRIM).unwrap();
        assert!(c.mismatch);
        assert_eq!(c.traversals[1], Traversal::Along);
        assert_eq!(c.shape.len(), 4);
    }

    #[test]
    fn single_edge_is_not_a_chain() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        assert!(stitch(&[&a], Edge1End::Yes, TURN_TRIM).is_none());
        assert!(join_oriented(&[&a], &[Traversal::Along], TURN_TRIM).is_none());
    }

    #[test]
    fn join_oriented_rejects_length_mismatch() {
        let a = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = line(&[(10.0, 0.0), (20.0, 0.0)]);
        assert!(join_oriented(&[&a, &b], &[Traversal::Along], 0.25).is_none());
        let s = join_oriented(&[&a, &b], &[Traversal::Along, Traversal::Along], 0.25).unwrap();
        assert_points(&s, &[(7.5, 0.0), (10.0, 0.0), (12.5, 0.0)]);
    }
}

// ── Turns ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod turns {
    use rustc_hash::FxHashSet;

    use sdp_core::{CollectedDiagnostics, ConditionId, Edge1End, NodeId, StreetId};
    use sdp_network::{AttrValue, GeometryCache};
    use sdp_restrict::{RestrictionRecord, RestrictionSet, TurnRestrictions, resolve_turns};

    use super::helpers::{assert_points, junction_table, oid};
    use crate::{ManeuverRecord, StartHint, TURN_EDGE_POS, TurnBuilder, turn_layout};

    fn record(id: i64, streets: &[i64], start: StartHint) -> ManeuverRecord {
        ManeuverRecord {
            id,
            cond_type: Some(7),
            streets: streets.iter().map(|&s| StreetId(s)).collect(),
            start,
        }
    }

    #[test]
    fn rejects_narrow_table() {
        assert!(TurnBuilder::new(1, 1).is_err());
        assert_eq!(TurnBuilder::new(3, 1).unwrap().max_edges(), 3);
    }

    #[test]
    fn flagged_turn() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(3, 9).unwrap();

        let row = b
            .build(
                &record(500, &[10, 11], StartHint::Flag(Edge1End::Yes)),
                &table,
                &mut cache,
                &TurnRestrictions::default(),
                &mut diag,
            )
            .unwrap();
        assert_eq!(row.object_id, 1);
        assert_eq!(row.maneuver_id, 500);
        assert_eq!(row.cond_type, Some(7));
        assert_eq!(row.edge1_end, Edge1End::Yes);
        assert_eq!(row.edges.len(), 2);
        assert_eq!(row.edges[0].fid, oid(&table, 10));
        assert_eq!(row.edges[1].fid, oid(&table, 11));
        assert!(row.edges.iter().all(|e| e.fcid == 9 && e.pos == TURN_EDGE_POS));
        assert_points(&row.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn junction_node_sets_edge1_end() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();
        let none = TurnRestrictions::default();

        let fwd = b.build(&record(1, &[10, 11], StartHint::Junction(NodeId(2))), &table, &mut cache, &none, &mut diag);
        assert_eq!(fwd.unwrap().edge1_end, Edge1End::Yes);

        let back = b
            .build(&record(2, &[20, 11], StartHint::Junction(NodeId(2))), &table, &mut cache, &none, &mut diag)
            .unwrap();
        assert_eq!(back.edge1_end, Edge1End::No);
        assert_points(&back.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);

        let unknown = b
            .build(&record(3, &[20, 11], StartHint::Junction(NodeId(99))), &table, &mut cache, &none, &mut diag)
            .unwrap();
        assert_eq!(unknown.edge1_end, Edge1End::Unknown);
        // Orientation still inferred from geometry.
        assert_points(&unknown.shape, &[(7.0, 0.0), (10.0, 0.0), (10.0, 3.0)]);
        assert_eq!(unknown.object_id, 3);
    }

    #[test]
    fn missing_street_skips_without_consuming_id() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();
        let none = TurnRestrictions::default();

        let flag = StartHint::Flag(Edge1End::Yes);
        assert!(b.build(&record(1, &[10, 99], flag), &table, &mut cache, &none, &mut diag).is_none());
        assert!(diag.has_warning("missing an entry with ID 99"));

        let row = b.build(&record(2, &[10, 11], flag), &table, &mut cache, &none, &mut diag).unwrap();
        assert_eq!(row.object_id, 1);
        assert_eq!(b.emitted(), 1);
    }

    #[test]
    fn too_few_edges() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();
        let none = TurnRestrictions::default();
        let flag = StartHint::Flag(Edge1End::Unknown);

        assert!(b.build(&record(4, &[], flag), &table, &mut cache, &none, &mut diag).is_none());
        assert!(b.build(&record(5, &[10], flag), &table, &mut cache, &none, &mut diag).is_none());
        assert!(diag.has_warning("no maneuver path records for turn ID 4"));
        assert!(diag.has_warning("turn ID 5 has only one associated edge"));
    }

    #[test]
    fn wide_turn_is_truncated() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();

        let row = b
            .build(
                &record(6, &[10, 11, 13], StartHint::Flag(Edge1End::Yes)),
                &table,
                &mut cache,
                &TurnRestrictions::default(),
                &mut diag,
            )
            .unwrap();
        assert_eq!(row.edges.len(), 2);
        assert!(diag.has_warning("will be truncated"));
    }

    #[test]
    fn disjoint_geometry_warns_with_object_id() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();

        let row = b.build(
            &record(7, &[10, 30], StartHint::Flag(Edge1End::Yes)),
            &table,
            &mut cache,
            &TurnRestrictions::default(),
            &mut diag,
        );
        assert!(row.is_some());
        assert!(diag.has_warning("turn ObjectID 1"));
    }

    #[test]
    fn restrictions_follow_condition_id() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();

        let mut set = RestrictionSet::new();
        set.push(RestrictionRecord::turn(ConditionId(500), "AR_TRUCKS", AttrValue::yes()));
        set.push(RestrictionRecord::turn(ConditionId(500), "HeightLimit_Meters", AttrValue::Number(4.1)));
        let restrictions = resolve_turns(&set, &FxHashSet::default());

        let mut b = TurnBuilder::new(2, 1).unwrap();
        let flag = StartHint::Flag(Edge1End::Yes);
        let hit = b.build(&record(500, &[10, 11], flag), &table, &mut cache, &restrictions, &mut diag).unwrap();
        let miss = b.build(&record(501, &[10, 11], flag), &table, &mut cache, &restrictions, &mut diag).unwrap();
        assert_eq!(hit.restrictions.get("AR_TRUCKS"), Some(&AttrValue::yes()));
        assert!(miss.restrictions.is_empty());

        let layout = turn_layout("COND_ID", true, 2, &restrictions);
        let names: Vec<&str> = layout.restriction_columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["AR_TRUCKS", "HeightLimit_Meters"]);
    }

    #[test]
    fn geometry_is_fetched_once_per_street() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = TurnBuilder::new(2, 1).unwrap();
        let records: Vec<_> =
            (0..5).map(|i| record(i, &[10, 11], StartHint::Flag(Edge1End::Yes))).collect();
        let rows = b.build_all(&records, &table, &mut cache, &TurnRestrictions::default(), &mut diag);
        assert_eq!(rows.len(), 5);
        assert_eq!(cache.fetches(), 2);
    }
}

// ── Road forks ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod forks {
    use sdp_core::{CollectedDiagnostics, NodeId};
    use sdp_network::GeometryCache;

    use super::helpers::{junction_table, oid};
    use crate::{ForkOrientation, ForkRecord, ForkResolver, PathStep};

    fn fork(id: i64, steps: &[(i64, i64)], first_seq: i64, orientation: ForkOrientation) -> ForkRecord {
        ForkRecord {
            id,
            path: steps.iter().map(|&(s, q)| PathStep::new(s, q)).collect(),
            first_seq,
            orientation,
        }
    }

    fn positions(row: &sdp_output::ForkRow) -> Vec<(f64, f64)> {
        std::iter::once(&row.entry)
            .chain(&row.branches)
            .map(|e| (e.frm_pos, e.to_pos))
            .collect()
    }

    #[test]
    fn shared_nodes_orientation() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);

        let row = r
            .resolve(&fork(10, &[(10, 0), (11, 1), (12, 2)], 0, ForkOrientation::SharedNodes), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(row.id, 10);
        assert_eq!(row.entry.fid, oid(&table, 10));
        assert_eq!(row.branches.len(), 2);
        assert_eq!(positions(&row), vec![(0.0, 1.0), (0.0, 1.0), (1.0, 0.0)]);
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn reversed_entry_edge() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);

        let row = r
            .resolve(&fork(20, &[(20, 0), (11, 1), (13, 2)], 0, ForkOrientation::SharedNodes), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(positions(&row), vec![(1.0, 0.0), (0.0, 1.0), (0.0, 1.0)]);
    }

    #[test]
    fn junction_orientation() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);
        let at = ForkOrientation::Junction(NodeId(2));

        let row = r
            .resolve(&fork(1, &[(10, 1), (11, 2), (12, 3)], 1, at), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(positions(&row), vec![(0.0, 1.0), (0.0, 1.0), (1.0, 0.0)]);

        let rev = r
            .resolve(&fork(2, &[(20, 1), (13, 2), (14, 3)], 1, at), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(positions(&rev), vec![(1.0, 0.0), (0.0, 1.0), (0.0, 1.0)]);
    }

    #[test]
    fn branches_leave_from_the_entry_junction() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);

        // 13 leaves node 2 toward 5; 12 is digitized 4 -> 2, so it shares
        // no node with 13's far end and is walked out of the junction.
        let steps = [(10, 0), (13, 1), (12, 2)];
        let shared = r
            .resolve(&fork(12, &steps, 0, ForkOrientation::SharedNodes), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(positions(&shared), vec![(0.0, 1.0), (0.0, 1.0), (1.0, 0.0)]);

        let at = r
            .resolve(&fork(13, &steps, 0, ForkOrientation::Junction(NodeId(2))), &table, &mut cache, &mut diag)
            .unwrap();
        assert_eq!(positions(&shared), positions(&at));
        assert!(diag.warnings.is_empty());
    }

    #[test]
    fn sequence_must_be_contiguous() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);
        let at = ForkOrientation::Junction(NodeId(2));

        assert!(r.resolve(&fork(5, &[(10, 1), (11, 2), (12, 4)], 1, at), &table, &mut cache, &mut diag).is_none());
        assert!(diag.has_warning("road fork ID 5 are not consecutive"));
        assert!(r.resolve(&fork(6, &[(10, 1), (11, 2), (12, 3)], 1, at), &table, &mut cache, &mut diag).is_some());
    }

    #[test]
    fn too_few_and_too_many() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);
        let at = ForkOrientation::Junction(NodeId(2));

        assert!(r.resolve(&fork(7, &[(10, 1), (11, 2)], 1, at), &table, &mut cache, &mut diag).is_none());
        assert!(diag.has_warning("road fork with ID 7 has too few maneuvers"));

        let wide = fork(8, &[(10, 1), (11, 2), (12, 3), (13, 4), (14, 5)], 1, at);
        let row = r.resolve(&wide, &table, &mut cache, &mut diag).unwrap();
        assert_eq!(row.branches.len(), 3);
        assert!(diag.has_warning("road fork with ID 8 has more than 4 parts"));
    }

    #[test]
    fn unmatched_nodes_drop_the_fork() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let r = ForkResolver::new(1);

        let far = fork(9, &[(10, 0), (11, 1), (30, 2)], 0, ForkOrientation::SharedNodes);
        assert!(r.resolve(&far, &table, &mut cache, &mut diag).is_none());
        assert!(diag.has_warning("street 30"));

        let off = fork(11, &[(10, 1), (11, 2), (12, 3)], 1, ForkOrientation::Junction(NodeId(99)));
        assert!(r.resolve(&off, &table, &mut cache, &mut diag).is_none());
        assert!(diag.has_warning("Road fork ID 11 dropped"));
    }

    #[test]
    fn missing_street() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let rows = ForkResolver::new(1).resolve_all(
            &[fork(12, &[(10, 1), (77, 2), (12, 3)], 1, ForkOrientation::Junction(NodeId(2)))],
            &table,
            &mut cache,
            &mut diag,
        );
        assert!(rows.is_empty());
        assert!(diag.has_warning("missing an entry with ID 77"));
    }
}

// ── Signposts ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signposts {
    use sdp_core::{CollectedDiagnostics, StreetId};
    use sdp_network::GeometryCache;
    use sdp_output::{BranchText, SignText};

    use super::helpers::{assert_points, junction_table, oid};
    use crate::{PathStep, SignPath, SignpostBuilder, SignpostRecord, SignpostTables};

    fn pair(source_id: i64, src: i64, dst: i64) -> SignpostRecord {
        SignpostRecord {
            source_id,
            path: SignPath::Pair { src: StreetId(src), dst: StreetId(dst) },
            exit_name: "12B".into(),
            branches: vec![BranchText { text: "I-95".into(), dir: Some("N".into()), lang: "en".into() }],
            towards: vec![SignText { text: "Boston".into(), lang: "en".into() }],
        }
    }

    #[test]
    fn pair_in_digitized_direction() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut out = SignpostTables::default();
        let mut b = SignpostBuilder::new(1);

        assert!(b.build(&pair(900, 10, 11), &table, &mut cache, &mut out, &mut diag));
        let sp = &out.signposts[0];
        assert_eq!(sp.object_id, 1);
        assert_eq!(sp.exit_name, "12B");
        assert_eq!(sp.branches[0].dir.as_deref(), Some("N"));
        assert_points(&sp.shape, &[(7.5, 0.0), (10.0, 0.0), (10.0, 2.5)]);

        assert_eq!(out.streets.len(), 2);
        assert_eq!((out.streets[0].sequence, out.streets[0].fid), (1, oid(&table, 10)));
        assert_eq!((out.streets[1].sequence, out.streets[1].fid), (0, oid(&table, 11)));
        assert_eq!((out.streets[0].frm_pos, out.streets[0].to_pos), (0.0, 1.0));
        assert_eq!((out.streets[1].frm_pos, out.streets[1].to_pos), (0.0, 1.0));
    }

    #[test]
    fn pair_sharing_from_nodes_reverses_first() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut out = SignpostTables::default();
        let mut b = SignpostBuilder::new(1);

        assert!(b.build(&pair(901, 20, 11), &table, &mut cache, &mut out, &mut diag));
        assert_points(&out.signposts[0].shape, &[(7.5, 0.0), (10.0, 0.0), (10.0, 2.5)]);
        assert_eq!((out.streets[0].frm_pos, out.streets[0].to_pos), (1.0, 0.0));
        assert_eq!((out.streets[1].frm_pos, out.streets[1].to_pos), (0.0, 1.0));
    }

    #[test]
    fn pair_into_digitized_end_reverses_second() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut out = SignpostTables::default();
        let mut b = SignpostBuilder::new(1);

        assert!(b.build(&pair(902, 10, 12), &table, &mut cache, &mut out, &mut diag));
        assert_points(&out.signposts[0].shape, &[(7.5, 0.0), (10.0, 0.0), (12.5, 0.0)]);
        assert_eq!((out.streets[1].frm_pos, out.streets[1].to_pos), (1.0, 0.0));
    }

    #[test]
    fn disjoint_pair_joined_straight() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut out = SignpostTables::default();
        let mut b = SignpostBuilder::new(1);

        assert!(b.build(&pair(903, 10, 30), &table, &mut cache, &mut out, &mut diag));
        assert_points(&out.signposts[0].shape, &[(7.5, 0.0), (10.0, 0.0), (50.0, 50.0), (52.5, 50.0)]);
    }

    #[test]
    fn sequence_sorted_and_numbered() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut out = SignpostTables::default();
        let mut b = SignpostBuilder::new(3);

        let rec = SignpostRecord {
            source_id: 77,
            path: SignPath::Sequence(vec![PathStep::new(11, 2), PathStep::new(10, 1)]),
            exit_name: String::new(),
            branches: Vec::new(),
            towards: Vec::new(),
        };
        assert!(b.build(&rec, &table, &mut cache, &mut out, &mut diag));
        assert_points(&out.signposts[0].shape, &[(7.5, 0.0), (10.0, 0.0), (10.0, 2.5)]);
        let seqs: Vec<i64> = out.streets.iter().map(|s| s.sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert!(out.streets.iter().all(|s| s.fcid == 3 && s.signpost_id == 1));
    }

    #[test]
    fn short_or_broken_paths_are_skipped() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = SignpostBuilder::new(1);

        let short = SignpostRecord {
            source_id: 5,
            path: SignPath::Sequence(vec![PathStep::new(10, 1)]),
            exit_name: String::new(),
            branches: Vec::new(),
            towards: Vec::new(),
        };
        let out = b.build_all(&[short, pair(6, 10, 99), pair(7, 10, 11)], &table, &mut cache, &mut diag);
        assert_eq!(out.signposts.len(), 1);
        assert_eq!(out.signposts[0].object_id, 1);
        assert_eq!(out.streets.len(), 2);
        assert!(diag.has_warning("fewer than two entries for sign ID 5"));
        assert!(diag.has_warning("missing an entry with ID 99"));
    }

    #[test]
    fn texts_truncated_to_slot_count() {
        let table = junction_table();
        let mut cache = GeometryCache::new();
        let mut diag = CollectedDiagnostics::new();
        let mut b = SignpostBuilder::new(1);

        let mut rec = pair(42, 10, 11);
        rec.branches = (0..12)
            .map(|i| BranchText { text: format!("B{i}"), dir: None, lang: "en".into() })
            .collect();
        let out = b.build_all(&[rec], &table, &mut cache, &mut diag);
        assert_eq!(out.signposts[0].branches.len(), 10);
        assert_eq!(out.signposts[0].branches[9].text, "B9");
        assert!(diag.has_warning("sign ID 42"));
    }
}
