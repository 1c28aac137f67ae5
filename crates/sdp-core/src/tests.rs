//! Unit tests for sdp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, StreetId};

    #[test]
    fn index_roundtrip() {
        let id = EdgeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(EdgeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn oid_is_one_based() {
        assert_eq!(EdgeId(0).oid(), 1);
        assert_eq!(EdgeId(9).oid(), 10);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(StreetId::INVALID.0, i64::MAX);
        assert!(!NodeId::default().is_valid());
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(StreetId(987654321012).to_string(), "987654321012");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Point, Polyline};

    fn line(coords: &[(f64, f64)]) -> Polyline {
        Polyline::from_points(coords.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn empty_polyline_rejected() {
        assert!(Polyline::from_points(Vec::new()).is_err());
    }

    #[test]
    fn one_degree_latitude() {
        let l = line(&[(-88.0, 30.0), (-88.0, 31.0)]);
        let d = l.geodesic_length_m();
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn segment_along_interpolates_and_keeps_interior_vertices() {
        let l = line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
        let head = l.segment_along(0.0, 0.3);
        assert_eq!(head.points(), &[Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);

        let tail = l.segment_along(0.3, 1.0);
        assert_eq!(
            tail.points(),
            &[Point::new(3.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn segment_along_swaps_and_clamps() {
        let l = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let s = l.segment_along(1.5, 0.75);
        assert_eq!(s.points(), &[Point::new(7.5, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn zero_length_segment_is_one_vertex() {
        let l = line(&[(1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(l.segment_along(0.0, 0.3).points(), &[Point::new(1.0, 1.0)]);
    }

    #[test]
    fn extend_joined_collapses_shared_vertex() {
        let mut a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        a.extend_joined(&line(&[(1.0, 0.0), (1.0, 1.0)]));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn reversed_swaps_ends() {
        let l = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0)]);
        let r = l.reversed();
        assert_eq!(r.first(), l.last());
        assert_eq!(r.last(), l.first());
    }

    #[test]
    fn wkt_multilinestring_concatenates_parts() {
        let l = Polyline::from_wkt("MULTILINESTRING((0 0,1 0),(1 0,2 0))").unwrap();
        assert_eq!(l.len(), 3);
        assert_eq!(l.last(), Point::new(2.0, 0.0));
    }

    #[test]
    fn wkt_rejects_points_and_garbage() {
        assert!(Polyline::from_wkt("POINT(1 2)").is_err());
        assert!(Polyline::from_wkt("not wkt").is_err());
    }

    #[test]
    fn wkt_output_reparses() {
        let l = line(&[(0.5, 1.0), (2.0, 3.25)]);
        let back = Polyline::from_wkt(&l.to_wkt_string()).unwrap();
        assert_eq!(back, l);
    }
}

#[cfg(test)]
mod direction {
    use crate::{Direction, Edge1End, Traversal};

    #[test]
    fn prefixes() {
        assert_eq!(Direction::FromTo.prefixes(), &["FT_"]);
        assert_eq!(Direction::Both.prefixes(), &["FT_", "TF_"]);
    }

    #[test]
    fn union() {
        assert_eq!(Direction::FromTo.union(Direction::ToFrom), Direction::Both);
        assert_eq!(Direction::ToFrom.union(Direction::ToFrom), Direction::ToFrom);
    }

    #[test]
    fn traversal_positions() {
        assert_eq!(Traversal::Along.positions(), (0, 1));
        assert_eq!(Traversal::Along.flipped().positions(), (1, 0));
    }

    #[test]
    fn edge1end_codes() {
        assert_eq!(Edge1End::default().as_str(), "?");
        assert_eq!(Edge1End::Yes.to_string(), "Y");
    }
}

#[cfg(test)]
mod time {
    use crate::{SliceGranularity, Weekday};

    #[test]
    fn slice_counts() {
        assert_eq!(SliceGranularity::Minutes15.slice_count(), 96);
        assert_eq!(SliceGranularity::Minutes5.slice_count(), 288);
    }

    #[test]
    fn labels() {
        let g = SliceGranularity::Minutes5;
        assert_eq!(g.label(0), "0000");
        assert_eq!(g.label(287), "2355");
        assert_eq!(SliceGranularity::Minutes15.here_column(1), "H00_15");
        assert_eq!(SliceGranularity::Minutes15.here_column(95), "H23_45");
    }

    #[test]
    fn slice_of_seconds() {
        let g = SliceGranularity::Minutes5;
        assert_eq!(g.slice_of_seconds(0), Some(0));
        assert_eq!(g.slice_of_seconds(299), Some(0));
        assert_eq!(g.slice_of_seconds(300), Some(1));
        assert_eq!(g.slice_of_seconds(86_400), None);
    }

    #[test]
    fn weekday_codes_sunday_first() {
        let codes: String = Weekday::ALL.iter().map(|d| d.code()).collect();
        assert_eq!(codes, "UMTWRFS");
        assert!(Weekday::Sunday.is_weekend());
    }
}

#[cfg(test)]
mod diag {
    use crate::{CollectedDiagnostics, Diagnostics, LogDiagnostics};

    #[test]
    fn collected_keeps_messages() {
        let mut d = CollectedDiagnostics::new();
        d.warning("Street 12 not found".into());
        assert_eq!(d.warning_count(), 1);
        assert!(d.has_warning("12"));
    }

    #[test]
    fn log_counts() {
        let mut d = LogDiagnostics::new();
        d.warning("a".into());
        d.error("b".into());
        assert_eq!(d.warning_count(), 1);
        assert_eq!(d.error_count(), 1);
    }
}

#[cfg(test)]
mod transport {
    use crate::AccessClass;

    #[test]
    fn field_names() {
        assert_eq!(AccessClass::Pedestrian.access_field(), "AR_PEDSTRN");
        assert_eq!(AccessClass::Emergency.usage_fee_field(), "UFR_EMERVEH");
        assert_eq!(AccessClass::ALL.len(), 10);
    }
}
