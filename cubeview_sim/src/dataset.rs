//! The bundled demo dataset: 40 observed sessions over one day of
//! weekday/weekend traffic across two devices and five content categories.

use cubeview_core::{parse_records, DimensionCatalog, SessionRecord};

/// Raw delimited-text export from the demo telemetry pipeline.
pub const DEMO_CSV: &str = "\
user_id,hour,day_type,device,content_type,session_minutes,recommended,completed,is_binge
U01,8,weekday,mobile,music,7,no,0,0
U02,9,weekday,mobile,news,6,no,0,0
U03,10,weekday,desktop,search,9,no,1,0
U04,11,weekday,mobile,music,12,yes,1,0
U05,12,weekday,desktop,search,15,no,1,0
U06,13,weekday,mobile,podcast,18,yes,1,0
U07,14,weekday,mobile,music,10,no,0,0
U08,15,weekday,desktop,video,22,yes,1,0
U09,16,weekday,mobile,news,8,no,0,0
U10,17,weekday,desktop,video,28,yes,1,0
U11,18,weekday,mobile,video,25,yes,1,0
U12,19,weekday,desktop,video,40,yes,1,1
U13,20,weekday,desktop,video,55,yes,1,1
U14,21,weekday,mobile,video,34,yes,0,0
U15,22,weekday,desktop,video,70,yes,1,1
U16,23,weekday,mobile,video,45,yes,1,1
U17,0,weekday,mobile,video,30,no,0,0
U18,1,weekday,desktop,video,60,yes,1,1
U19,2,weekday,mobile,music,14,no,0,0
U20,3,weekday,mobile,music,9,no,0,0
U21,9,weekend,mobile,music,15,yes,1,0
U22,11,weekend,mobile,video,32,yes,1,0
U23,13,weekend,desktop,video,48,yes,1,1
U24,15,weekend,mobile,podcast,25,yes,1,0
U25,17,weekend,desktop,video,52,yes,1,1
U26,18,weekend,mobile,video,38,yes,1,0
U27,19,weekend,desktop,video,65,yes,1,1
U28,20,weekend,desktop,video,80,yes,1,1
U29,21,weekend,desktop,video,95,yes,1,1
U30,22,weekend,mobile,video,50,yes,0,1
U31,23,weekend,desktop,video,110,yes,1,1
U32,0,weekend,desktop,video,90,yes,1,1
U33,1,weekend,mobile,music,20,no,0,0
U34,2,weekend,mobile,music,18,no,0,0
U35,3,weekend,mobile,music,12,no,0,0
U36,10,weekend,mobile,news,14,yes,1,0
U37,12,weekend,desktop,search,18,no,1,0
U38,14,weekend,mobile,music,16,no,0,0
U39,16,weekend,desktop,video,35,yes,1,0
U40,18,weekend,desktop,video,60,yes,1,1";

/// Parsed demo records.
pub fn demo_records() -> Vec<SessionRecord> {
    parse_records(DEMO_CSV).expect("bundled demo dataset is valid")
}

/// Catalog matching the demo domain.
pub fn demo_catalog() -> DimensionCatalog {
    DimensionCatalog::streaming_default()
}
