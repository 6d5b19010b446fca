use std::{
    fs,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrolint_core::{
    RailwayData, analyze,
    loading::{read_osm_xml, read_overpass_json},
    report::{findings_to_geojson_string, osmose_report},
};

#[derive(Parser, Debug)]
#[command(
    name = "ferrolint",
    version,
    about = "Railway network anomaly detector for OSM extracts"
)]
struct Cli {
    /// Input extract, `-` for stdin
    input: String,

    /// Input format, `auto` picks by file extension (stdin defaults to XML)
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// Findings JSON output file, stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    /// Osmose analyser XML output file
    #[arg(long)]
    osmose: Option<PathBuf>,

    /// GeoJSON FeatureCollection output file
    #[arg(long)]
    geojson: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Auto,
    Xml,
    Json,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data = load_input(&cli)?;
    let findings = analyze(&data);

    // Render every requested document before writing any of them, so a
    // serialization failure leaves no partial output behind
    let findings_json = findings.to_json_string()?;
    let osmose = cli
        .osmose
        .is_some()
        .then(|| osmose_report(&findings, Utc::now()))
        .transpose()?;
    let geojson = cli
        .geojson
        .is_some()
        .then(|| findings_to_geojson_string(&findings))
        .transpose()?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &findings_json)
                .with_context(|| format!("writing findings to {}", path.display()))?;
            info!("Findings written to {}", path.display());
        }
        None => println!("{findings_json}"),
    }

    if let (Some(path), Some(document)) = (&cli.osmose, &osmose) {
        fs::write(path, document)
            .with_context(|| format!("writing Osmose report to {}", path.display()))?;
        info!("Osmose report written to {}", path.display());
    }

    if let (Some(path), Some(document)) = (&cli.geojson, &geojson) {
        fs::write(path, document)
            .with_context(|| format!("writing GeoJSON to {}", path.display()))?;
        info!("GeoJSON written to {}", path.display());
    }

    Ok(())
}

fn load_input(cli: &Cli) -> Result<RailwayData> {
    if cli.input == "-" {
        let stdin = std::io::stdin().lock();
        let data = match resolve_format(cli.format, None) {
            InputFormat::Json => read_overpass_json(stdin)?,
            _ => read_osm_xml(stdin)?,
        };
        return Ok(data);
    }

    let path = Path::new(&cli.input);
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let data = match resolve_format(cli.format, Some(path)) {
        InputFormat::Json => read_overpass_json(reader)?,
        _ => read_osm_xml(reader)?,
    };
    Ok(data)
}

fn resolve_format(format: InputFormat, path: Option<&Path>) -> InputFormat {
    match format {
        InputFormat::Auto => match path.and_then(Path::extension).and_then(|ext| ext.to_str()) {
            Some("json") => InputFormat::Json,
            _ => InputFormat::Xml,
        },
        explicit => explicit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_format_picks_json_by_extension() {
        assert_eq!(
            resolve_format(InputFormat::Auto, Some(Path::new("extract.json"))),
            InputFormat::Json
        );
        assert_eq!(
            resolve_format(InputFormat::Auto, Some(Path::new("extract.osm"))),
            InputFormat::Xml
        );
        assert_eq!(resolve_format(InputFormat::Auto, None), InputFormat::Xml);
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        assert_eq!(
            resolve_format(InputFormat::Xml, Some(Path::new("extract.json"))),
            InputFormat::Xml
        );
        assert_eq!(
            resolve_format(InputFormat::Json, None),
            InputFormat::Json
        );
    }
}
