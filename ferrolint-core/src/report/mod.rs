//! Output adapters for analysis results

mod geojson;
mod osmose;

pub use geojson::{findings_to_geojson, findings_to_geojson_string};
pub use osmose::osmose_report;
