//! Identifier lookup in whitespace-delimited nav data (`earth_nav.dat`,
//! `earth_fix.dat`).

use std::fmt;
use std::io::prelude::*;
use std::ops::Index;
use std::path::Path;
use std::str::{FromStr, Lines};

use itertools::Itertools;

use crate::codes::NavaidKind;
use crate::error::{Error, Result};
use crate::geo::GeoPoint;

#[derive(Debug)]
pub struct DataFile {
    buf: String,
}

impl DataFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DataFile> {
        let mut file = std::fs::File::open(path)?;
        DataFile::from_reader(&mut file)
    }

    pub fn from_reader<B: Read>(reader: &mut B) -> Result<DataFile> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(DataFile {
            buf: String::from_utf8_lossy(&buf).into_owned(),
        })
    }
}

impl From<String> for DataFile {
    fn from(buf: String) -> Self {
        DataFile { buf }
    }
}

/// Column layout of a data file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceKind {
    /// `type lat lon elev freq range var IDENT ...`
    Nav,
    /// `lat lon IDENT ...`
    Fix,
}

impl SourceKind {
    fn ident_column(self) -> usize {
        match self {
            SourceKind::Nav => 7,
            SourceKind::Fix => 2,
        }
    }

    fn lat_lon_columns(self) -> (usize, usize) {
        match self {
            SourceKind::Nav => (1, 2),
            SourceKind::Fix => (0, 1),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Nav => "NAV",
            SourceKind::Fix => "FIX",
        })
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NAV" => Ok(SourceKind::Nav),
            "FIX" => Ok(SourceKind::Fix),
            _ => Err(Error::UnknownCategory {
                kind: "data source".to_owned(),
                label: s.to_owned(),
            }),
        }
    }
}

impl DataFile {
    pub fn records(&self) -> RecordIter<'_> {
        RecordIter {
            lines: self.buf.lines(),
        }
    }

    /// Every row of `kind` layout whose identifier column equals `ident`
    /// (trimmed, uppercased). An empty result is `Error::NotFound`.
    pub fn candidates(&self, kind: SourceKind, ident: &str) -> Result<Vec<Candidate<'_>>> {
        let ident = ident.trim().to_uppercase();
        if ident.is_empty() {
            return Err(Error::invalid("identifier", "must not be empty"));
        }

        let column = kind.ident_column();
        let found = self
            .records()
            .filter(|r| r.get(column) == Some(ident.as_str()))
            .map(|record| Candidate { kind, record })
            .collect_vec();

        tracing::debug!(%kind, %ident, matches = found.len(), "identifier lookup");

        if found.is_empty() {
            return Err(Error::NotFound { ident });
        }
        Ok(found)
    }
}

pub struct RecordIter<'a> {
    lines: Lines<'a>,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Record<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fields = self.lines.next()?.split_whitespace().collect_vec();
            if !fields.is_empty() {
                break Some(Record { fields });
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Record<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn get(&self, i: usize) -> Option<&'a str> {
        self.fields.get(i).copied()
    }
}

impl<'a> Index<usize> for Record<'a> {
    type Output = &'a str;

    fn index(&self, i: usize) -> &Self::Output {
        &self.fields[i]
    }
}

/// A row that matched an identifier lookup.
#[derive(Clone, Debug)]
pub struct Candidate<'a> {
    kind: SourceKind,
    record: Record<'a>,
}

impl<'a> Candidate<'a> {
    pub fn ident(&self) -> &'a str {
        self.record[self.kind.ident_column()]
    }

    pub fn point(&self) -> Result<GeoPoint> {
        let (lat, lon) = self.kind.lat_lon_columns();
        let parse = |i: usize| {
            self.record[i].parse::<f64>().map_err(|_| {
                Error::invalid(
                    "coordinates",
                    format!("'{}' in row for {} is not a number", self.record[i], self.ident()),
                )
            })
        };
        GeoPoint::checked(parse(lat)?, parse(lon)?)
    }

    /// One-line description shown when several rows share an identifier.
    pub fn label(&self) -> String {
        let ty = match self.kind {
            SourceKind::Nav => NavaidKind::from_row_code(self.record[0]).to_string(),
            SourceKind::Fix => "FIX".to_owned(),
        };
        format!(
            "{} - {} - {}",
            ty,
            self.ident(),
            self.record.get(9).unwrap_or("[name missing]")
        )
    }
}

/// Picks one of several matching rows.
pub trait Selector {
    /// Returns an index into `candidates`, which is never empty.
    fn select(&mut self, candidates: &[Candidate<'_>]) -> Result<usize>;
}

/// Takes the first matching row.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMatch;

impl Selector for FirstMatch {
    fn select(&mut self, _: &[Candidate<'_>]) -> Result<usize> {
        Ok(0)
    }
}

/// Takes a fixed, zero-based row.
#[derive(Clone, Copy, Debug)]
pub struct ByIndex(pub usize);

impl Selector for ByIndex {
    fn select(&mut self, candidates: &[Candidate<'_>]) -> Result<usize> {
        if self.0 < candidates.len() {
            Ok(self.0)
        } else {
            Err(Error::invalid(
                "choice",
                format!("{} is out of range, {} entries matched", self.0, candidates.len()),
            ))
        }
    }
}

/// Looks up `ident` and returns the coordinates of the selected row. The
/// selector is only consulted when more than one row matches.
pub fn resolve(
    file: &DataFile,
    kind: SourceKind,
    ident: &str,
    selector: &mut dyn Selector,
) -> Result<GeoPoint> {
    let candidates = file.candidates(kind, ident)?;
    let chosen = if candidates.len() == 1 {
        &candidates[0]
    } else {
        let i = selector.select(&candidates)?;
        candidates
            .get(i)
            .ok_or_else(|| Error::invalid("choice", format!("{} is out of range", i)))?
    };
    chosen.point()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_ok};

    const NAV: &str = "\
I
1100 Version - data cycle 2310

3  29.958672000  -95.346461000    112    11560  130      8.0 IAH  K6 HUMBLE VORTAC VOR-DME
12 29.958672000  -95.346461000    112    11560  130      0.0 IAH  K6 HUMBLE VORTAC DME
2  36.141211000  -95.781486000    750      402   25      0.0 IAH  K2 HUMBLE NDB
3  33.942536000 -118.408075000    115    11390  130     15.0 LAX  K2 LOS_ANGELES VORTAC VOR-DME
99
";

    const FIX: &str = "\
I
1101 Version - data cycle 2310

 29.986111111  -95.341666667 BANTY ENRT K6 2
 40.123456789  -75.987654321 PENNY ENRT K6 2
 12.000000000 notanumber BADLY ENRT K6 2
99
";

    fn nav() -> DataFile {
        DataFile::from(NAV.to_owned())
    }

    fn fix() -> DataFile {
        DataFile::from(FIX.to_owned())
    }

    #[test]
    fn reads_from_reader() {
        let file = assert_ok!(DataFile::from_reader(&mut FIX.as_bytes()));
        assert_eq!(file.records().count(), 6);
    }

    #[test]
    fn single_fix_match() {
        let point = assert_ok!(resolve(&fix(), SourceKind::Fix, " penny ", &mut FirstMatch));
        assert_eq!(point, GeoPoint::new(40.123456789, -75.987654321));
    }

    #[test]
    fn single_nav_match() {
        let point = assert_ok!(resolve(&nav(), SourceKind::Nav, "LAX", &mut FirstMatch));
        assert_eq!(point, GeoPoint::new(33.942536, -118.408075));
    }

    #[test]
    fn multiple_matches_are_listed() {
        let file = nav();
        let candidates = assert_ok!(file.candidates(SourceKind::Nav, "IAH"));
        let labels = candidates.iter().map(Candidate::label).join("\n");
        insta::assert_snapshot!(labels, @r###"
        VOR - IAH - HUMBLE
        DME (VOR) - IAH - HUMBLE
        NDB - IAH - HUMBLE
        "###);
    }

    #[test]
    fn selector_picks_row() {
        let point = assert_ok!(resolve(&nav(), SourceKind::Nav, "IAH", &mut ByIndex(2)));
        assert_eq!(point, GeoPoint::new(36.141211, -95.781486));

        let point = assert_ok!(resolve(&nav(), SourceKind::Nav, "IAH", &mut FirstMatch));
        assert_eq!(point, GeoPoint::new(29.958672, -95.346461));
    }

    #[test]
    fn selector_out_of_range() {
        assert_matches!(
            resolve(&nav(), SourceKind::Nav, "IAH", &mut ByIndex(3)),
            Err(Error::InvalidInput { .. })
        );
    }

    #[test]
    fn wrong_layout_does_not_match() {
        // fix identifiers live in column 2, not column 7
        assert_matches!(
            resolve(&fix(), SourceKind::Nav, "PENNY", &mut FirstMatch),
            Err(Error::NotFound { ref ident }) if ident == "PENNY"
        );
    }

    #[test]
    fn bad_coordinates() {
        assert_matches!(
            resolve(&fix(), SourceKind::Fix, "BADLY", &mut FirstMatch),
            Err(Error::InvalidInput { .. })
        );
    }

    #[test]
    fn empty_identifier() {
        assert_matches!(fix().candidates(SourceKind::Fix, "  "), Err(Error::InvalidInput { .. }));
    }

    #[test]
    fn fix_rows_have_no_name() {
        let file = fix();
        let candidates = assert_ok!(file.candidates(SourceKind::Fix, "BANTY"));
        assert_eq!(candidates[0].label(), "FIX - BANTY - [name missing]");
    }

    #[test]
    fn source_kind_from_str() {
        assert_matches!("nav".parse::<SourceKind>(), Ok(SourceKind::Nav));
        assert_matches!("FIX".parse::<SourceKind>(), Ok(SourceKind::Fix));
        assert_matches!("apt".parse::<SourceKind>(), Err(Error::UnknownCategory { .. }));
    }
}
