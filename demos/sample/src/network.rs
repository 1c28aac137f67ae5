//! Built-in HERE sample used when no input directory is given.
//!
//! Four links around one junction near Mobile, Alabama: an arterial that
//! forks into two ramps, a no-left-turn condition, one exit sign and a
//! speed pattern per weekday.

use sdp_vendor::CsvSource;
use sdp_vendor::here::tables;

const STREETS: &str = "\
LINK_ID,REF_IN_ID,NREF_IN_ID,SPEED_CAT,CONTRACC,ST_NAME,ST_LANGCD,SHAPE
1001,1,2,3,N,Government St,ENG,\"LINESTRING (-88.070 30.690, -88.060 30.690)\"
1002,2,3,3,N,Government St,ENG,\"LINESTRING (-88.060 30.690, -88.050 30.690)\"
1003,2,4,5,N,Broad St,ENG,\"LINESTRING (-88.060 30.690, -88.060 30.700)\"
1004,2,5,6,N,Ramp,ENG,\"LINESTRING (-88.060 30.690, -88.055 30.685)\"";

const CDMS: &str = "\
LINK_ID,COND_ID,COND_TYPE,END_OF_LK,AR_AUTO,AR_TRUCKS
1001,500,7,N,Y,Y
1001,501,9,,,";

const RDMS: &str = "\
LINK_ID,MAN_LINKID,COND_ID,SEQ_NUMBER
1001,1003,500,1
1001,1002,501,1
1001,1004,501,2";

const SIGNS: &str = "\
SIGN_ID,SEQ_NUM,EXIT_NUM,SRC_LINKID,DST_LINKID,LANG_CODE,BR_RTEID,BR_RTEDIR,SIGN_TEXT,SIGN_TXTTP,TOW_RTEID
1,1,3A,1001,1004,ENG,I-10,W,Tunnel,T,";

const TRAFFIC: &str = "\
LINK_ID,TRAFFIC_CD
1001,+107P04101
1002,+107P04102";

/// 15-minute speed pattern `1`: 55 kph, slowing to 35 kph from 07:00 to
/// 09:00.
fn speed_profiles() -> String {
    let mut spd = String::from("PATTERN_ID");
    for i in 0..96 {
        spd.push_str(&format!(",H{:02}_{:02}", i / 4, (i % 4) * 15));
    }
    spd.push_str("\n1");
    for i in 0..96 {
        let kph = if (28..36).contains(&i) { 35 } else { 55 };
        spd.push_str(&format!(",{kph}"));
    }
    spd
}

pub fn build_sample() -> CsvSource {
    CsvSource::in_memory()
        .with_table(tables::STREETS, STREETS)
        .with_table(tables::CDMS, CDMS)
        .with_table(tables::RDMS, RDMS)
        .with_table(tables::SIGNS, SIGNS)
        .with_table(tables::TRAFFIC, TRAFFIC)
        .with_table(tables::SPEED_PROFILES, &speed_profiles())
        .with_table(
            tables::LINK_REFERENCE_FC1_4,
            "LINK_PVID,TRAVEL_DIRECTION,U,M,T,W,R,F,S\n1001,F,1,1,1,1,1,1,1\n1002,F,1,1,1,1,1,1,1",
        )
        .with_table(tables::LINK_REFERENCE_FC5, "LINK_PVID,TRAVEL_DIRECTION,U,M,T,W,R,F,S")
}
