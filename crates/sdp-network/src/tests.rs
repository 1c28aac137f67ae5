//! Unit tests for sdp-network.
//!
//! All tests use hand-built edges; no vendor files are read.

#[cfg(test)]
mod helpers {
    use sdp_core::{NodeId, Point, Polyline, StreetId};

    use crate::Edge;

    pub fn edge(id: i64, from: i64, to: i64, a: (f64, f64), b: (f64, f64)) -> Edge {
        let line = Polyline::from_points(vec![Point::new(a.0, a.1), Point::new(b.0, b.1)]).unwrap();
        Edge::new(StreetId(id), NodeId(from), NodeId(to), 100.0, 48.0, line)
    }
}

// ── Builder ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use sdp_core::StreetId;

    use super::helpers::edge;
    use crate::{AttrValue, EdgeTableBuilder};

    #[test]
    fn empty_build() {
        let t = EdgeTableBuilder::new().build().unwrap();
        assert!(t.is_empty());
        assert_eq!(t.duplicates_removed(), 0);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let mut b = EdgeTableBuilder::new().spatial_order(false);
        b.add_edge(edge(1, 10, 11, (0.0, 0.0), (1.0, 0.0)));
        b.add_edge(edge(2, 11, 12, (1.0, 0.0), (2.0, 0.0)));
        b.add_edge(edge(1, 99, 98, (5.0, 5.0), (6.0, 6.0)));
        let t = b.build().unwrap();

        assert_eq!(t.len(), 2);
        assert_eq!(t.duplicates_removed(), 1);
        assert_eq!(t.by_street(StreetId(1)).unwrap().from_node.0, 10);
    }

    #[test]
    fn spatial_order_is_a_permutation() {
        let mut b = EdgeTableBuilder::new();
        for i in 0..50 {
            let x = (i % 7) as f64 * 10.0;
            let y = (i / 7) as f64 * 10.0;
            b.add_edge(edge(i, i, i + 1000, (x, y), (x + 1.0, y)));
        }
        let t = b.build().unwrap();
        assert_eq!(t.len(), 50);
        for i in 0..50 {
            let id = t.find(StreetId(i)).unwrap();
            assert_eq!(t.edge(id).street_id, StreetId(i));
        }
    }

    #[test]
    fn declared_fields_come_first() {
        let mut b = EdgeTableBuilder::new();
        b.declare_field("ST_NAME");
        b.add_edge(edge(1, 1, 2, (0.0, 0.0), (1.0, 0.0)));
        b.set_last_attr("Language", AttrValue::from("en"));
        b.set_last_attr("ST_NAME", AttrValue::from("MAIN"));
        let t = b.build().unwrap();
        assert_eq!(t.fields(), &["ST_NAME".to_string(), "Language".to_string()]);
    }
}

// ── Attributes ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod attrs {
    use sdp_core::{Direction, StreetId};

    use super::helpers::edge;
    use crate::{AttrValue, EdgeTableBuilder};

    #[test]
    fn directional_set_writes_prefixed_fields() {
        let mut b = EdgeTableBuilder::new();
        b.add_edge(edge(5, 1, 2, (0.0, 0.0), (1.0, 0.0)));
        let mut t = b.build().unwrap();

        assert!(t.set_directional(StreetId(5), Direction::ToFrom, "GasProhibited", AttrValue::yes()));
        let e = t.by_street(StreetId(5)).unwrap();
        assert!(e.is_yes("TF_GasProhibited"));
        assert!(e.attr("FT_GasProhibited").is_none());
        assert_eq!(t.fields(), &["TF_GasProhibited".to_string()]);
    }

    #[test]
    fn unknown_street_is_reported_not_panicking() {
        let mut t = EdgeTableBuilder::new().build().unwrap();
        assert!(!t.set_street_attr(StreetId(1), "X", AttrValue::Int(1)));
        assert!(t.require(StreetId(1)).is_err());
    }

    #[test]
    fn attr_value_helpers() {
        assert_eq!(AttrValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(AttrValue::from("Y").as_str(), Some("Y"));
        assert!(!AttrValue::from("N").is_yes());
        assert_eq!(AttrValue::Number(2.5).to_string(), "2.5");
    }
}

// ── Geometry cache ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use std::cell::Cell;

    use sdp_core::StreetId;

    use super::helpers::edge;
    use crate::{EdgeShape, EdgeTable, EdgeTableBuilder, GeometryCache, GeometrySource};

    struct Counting<'a> {
        table: &'a EdgeTable,
        calls: Cell<usize>,
    }

    impl GeometrySource for Counting<'_> {
        fn fetch_shape(&self, street: StreetId) -> Option<EdgeShape> {
            self.calls.set(self.calls.get() + 1);
            self.table.fetch_shape(street)
        }
    }

    #[test]
    fn lookups_are_memoized_including_misses() {
        let mut b = EdgeTableBuilder::new();
        b.add_edge(edge(1, 1, 2, (0.0, 0.0), (1.0, 0.0)));
        let table = b.build().unwrap();
        let source = Counting { table: &table, calls: Cell::new(0) };
        let mut cache = GeometryCache::new();

        assert!(cache.get(&source, StreetId(1)).is_some());
        assert!(cache.get(&source, StreetId(1)).is_some());
        assert!(cache.get(&source, StreetId(2)).is_none());
        assert!(cache.get(&source, StreetId(2)).is_none());

        assert_eq!(source.calls.get(), 2);
        assert_eq!(cache.fetches(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn shape_carries_nodes_and_edge_id() {
        let mut b = EdgeTableBuilder::new();
        b.add_edge(edge(9, 3, 4, (0.0, 0.0), (1.0, 0.0)));
        let table = b.build().unwrap();
        let shape = table.fetch_shape(StreetId(9)).unwrap();
        assert_eq!(shape.edge.oid(), 1);
        assert_eq!((shape.from_node.0, shape.to_node.0), (3, 4));
    }
}
