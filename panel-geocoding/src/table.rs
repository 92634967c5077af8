/// Output table: CSV persistence and the dashboard's filter query
use crate::detection::{GeoDetection, PanelClass};
use crate::geo::GeoCoordinate;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const TABLE_HEADER: &str = "id,type,latitude,longitude,image_path";

/// Error types for table persistence.
#[derive(Debug)]
pub enum TableError {
    IoError(std::io::Error),
    MissingHeader(String),
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::IoError(err)
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::IoError(e) => write!(f, "IO error: {}", e),
            TableError::MissingHeader(found) => {
                write!(f, "Expected header '{}', found '{}'", TABLE_HEADER, found)
            }
        }
    }
}

impl std::error::Error for TableError {}

/// Write the final detection table the dashboard reads. One row per
/// detection, six decimal places (about 0.1 m at survey latitudes).
pub fn write_table(path: &Path, rows: &[GeoDetection]) -> Result<(), TableError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", TABLE_HEADER)?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{:.6},{:.6},{}",
            row.id,
            row.class.code(),
            row.coordinate.latitude,
            row.coordinate.longitude,
            row.image_path
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Dropdown filter the dashboard applies to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    Both,
    Pv,
    St,
}

impl TypeFilter {
    pub fn matches(&self, class: PanelClass) -> bool {
        match self {
            TypeFilter::Both => true,
            TypeFilter::Pv => class == PanelClass::Pv,
            TypeFilter::St => class == PanelClass::St,
        }
    }
}

/// One parsed row of the persisted table.
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub id: String,
    pub class: PanelClass,
    pub coordinate: GeoCoordinate,
    pub image_path: String,
}

/// The detection table as the dashboard sees it: loaded once at startup,
/// immutable, queried per filter event with a fresh derived view.
pub struct PanelTable {
    rows: Vec<PanelRow>,
}

impl PanelTable {
    /// Load the table, skipping malformed rows. Returns the table and the
    /// number of rows skipped.
    pub fn load(path: &Path) -> Result<(Self, usize), TableError> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.unwrap_or_default();
        if header.trim() != TABLE_HEADER {
            return Err(TableError::MissingHeader(header));
        }

        let mut rows = Vec::new();
        let mut skipped = 0;
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(&line) {
                Some(row) => rows.push(row),
                None => skipped += 1,
            }
        }

        Ok((Self { rows }, skipped))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fresh view of the rows matching the filter; the table itself is
    /// never mutated.
    pub fn filter(&self, filter: TypeFilter) -> Vec<&PanelRow> {
        self.rows
            .iter()
            .filter(|row| filter.matches(row.class))
            .collect()
    }
}

fn parse_row(line: &str) -> Option<PanelRow> {
    let mut fields = line.splitn(5, ',');
    let id = fields.next()?.to_string();
    let class = PanelClass::parse(fields.next()?)?;
    let latitude: f64 = fields.next()?.parse().ok()?;
    let longitude: f64 = fields.next()?.parse().ok()?;
    let image_path = fields.next()?.to_string();

    let coordinate = GeoCoordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        return None;
    }

    Some(PanelRow {
        id,
        class,
        coordinate,
        image_path,
    })
}
