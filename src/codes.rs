//! Category tables used when coding records.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Lowercases and drops separators so `"Final approach fix"`,
/// `"final-approach-fix"` and `"FINAL_APPROACH_FIX"` compare equal.
fn fold(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn unknown(kind: &str, label: &str) -> Error {
    Error::UnknownCategory {
        kind: kind.to_owned(),
        label: label.to_owned(),
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Departure,
    Arrival,
    Approach,
}

impl OperationType {
    pub const ALL: [OperationType; 3] = [
        OperationType::Departure,
        OperationType::Arrival,
        OperationType::Approach,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OperationType::Departure => "Departure",
            OperationType::Arrival => "Arrival",
            OperationType::Approach => "Approach",
        }
    }
}

impl From<OperationType> for &'static str {
    fn from(x: OperationType) -> &'static str {
        match x {
            OperationType::Departure => "4464713",
            OperationType::Arrival => "4530249",
            OperationType::Approach => "4595785",
        }
    }
}

impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        OperationType::ALL
            .iter()
            .copied()
            .find(|op| fold(op.label()) == folded)
            .ok_or_else(|| unknown("operation type", s))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FixType {
    VorDme,
    Vor,
    NdbDme,
    Ndb,
    Ils,
    Rnp,
}

impl FixType {
    pub const ALL: [FixType; 6] = [
        FixType::VorDme,
        FixType::Vor,
        FixType::NdbDme,
        FixType::Ndb,
        FixType::Ils,
        FixType::Rnp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FixType::VorDme => "VORDME",
            FixType::Vor => "VOR",
            FixType::NdbDme => "NDBDME",
            FixType::Ndb => "NDB",
            FixType::Ils => "ILS",
            FixType::Rnp => "RNP",
        }
    }
}

impl From<FixType> for char {
    fn from(x: FixType) -> char {
        match x {
            FixType::VorDme => 'D',
            FixType::Vor => 'V',
            FixType::NdbDme => 'Q',
            FixType::Ndb => 'N',
            FixType::Ils => 'I',
            FixType::Rnp => 'R',
        }
    }
}

impl FromStr for FixType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        FixType::ALL
            .iter()
            .copied()
            .find(|ty| fold(ty.label()) == folded)
            .ok_or_else(|| unknown("fix type", s))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FixUsage {
    FinalApproach,
    InitialApproach,
    IntermediateApproach,
    FinalApproachCourse,
    MissedApproachPoint,
}

impl FixUsage {
    pub const ALL: [FixUsage; 5] = [
        FixUsage::FinalApproach,
        FixUsage::InitialApproach,
        FixUsage::IntermediateApproach,
        FixUsage::FinalApproachCourse,
        FixUsage::MissedApproachPoint,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FixUsage::FinalApproach => "Final approach fix",
            FixUsage::InitialApproach => "Initial approach fix",
            FixUsage::IntermediateApproach => "Intermediate approach fix",
            FixUsage::FinalApproachCourse => "Final approach course fix",
            FixUsage::MissedApproachPoint => "Missed approach point fix",
        }
    }
}

impl From<FixUsage> for char {
    fn from(x: FixUsage) -> char {
        match x {
            FixUsage::FinalApproach => 'F',
            FixUsage::InitialApproach => 'A',
            FixUsage::IntermediateApproach => 'I',
            FixUsage::FinalApproachCourse => 'C',
            FixUsage::MissedApproachPoint => 'M',
        }
    }
}

impl FromStr for FixUsage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold(s);
        FixUsage::ALL
            .iter()
            .copied()
            .find(|usage| fold(usage.label()) == folded)
            .ok_or_else(|| unknown("fix usage", s))
    }
}

/// Row type code in the first column of a nav data row. Only used to label
/// candidates when an identifier matches more than one row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavaidKind {
    Vor,
    VorDme,
    Ndb,
    Dme,
    OuterMarker,
    MiddleMarker,
    InnerMarker,
    Unknown,
}

impl NavaidKind {
    pub fn from_row_code(code: &str) -> NavaidKind {
        match code {
            "3" => NavaidKind::Vor,
            "12" => NavaidKind::VorDme,
            "2" => NavaidKind::Ndb,
            "13" => NavaidKind::Dme,
            "7" => NavaidKind::OuterMarker,
            "8" => NavaidKind::MiddleMarker,
            "9" => NavaidKind::InnerMarker,
            _ => NavaidKind::Unknown,
        }
    }
}

impl fmt::Display for NavaidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NavaidKind::Vor => "VOR",
            NavaidKind::VorDme => "DME (VOR)",
            NavaidKind::Ndb => "NDB",
            NavaidKind::Dme => "DME",
            NavaidKind::OuterMarker => "OUTER MARKER",
            NavaidKind::MiddleMarker => "MIDDLE MARKER",
            NavaidKind::InnerMarker => "INNER MARKER",
            NavaidKind::Unknown => "Unknown",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_ok_eq};

    #[test]
    fn operation_codes() {
        assert_eq!(Into::<&str>::into(OperationType::Departure), "4464713");
        assert_eq!(Into::<&str>::into(OperationType::Arrival), "4530249");
        assert_eq!(Into::<&str>::into(OperationType::Approach), "4595785");
    }

    #[test]
    fn fix_codes() {
        let codes: String = FixType::ALL.iter().map(|&ty| char::from(ty)).collect();
        assert_eq!(codes, "DVQNIR");

        let codes: String = FixUsage::ALL.iter().map(|&usage| char::from(usage)).collect();
        assert_eq!(codes, "FAICM");
    }

    #[test]
    fn parses_labels() {
        assert_ok_eq!("Arrival".parse::<OperationType>(), OperationType::Arrival);
        assert_ok_eq!("approach".parse::<OperationType>(), OperationType::Approach);
        assert_ok_eq!("VORDME".parse::<FixType>(), FixType::VorDme);
        assert_ok_eq!("ndb-dme".parse::<FixType>(), FixType::NdbDme);
        assert_ok_eq!("Final approach fix".parse::<FixUsage>(), FixUsage::FinalApproach);
        assert_ok_eq!(
            "missed-approach-point-fix".parse::<FixUsage>(),
            FixUsage::MissedApproachPoint
        );
        assert_ok_eq!(
            "FINAL_APPROACH_COURSE_FIX".parse::<FixUsage>(),
            FixUsage::FinalApproachCourse
        );
    }

    #[test]
    fn unknown_labels_are_errors() {
        assert_matches!(
            "Overflight".parse::<OperationType>(),
            Err(Error::UnknownCategory { ref kind, ref label }) if kind == "operation type" && label == "Overflight"
        );
        assert_matches!("TACAN".parse::<FixType>(), Err(Error::UnknownCategory { .. }));
        assert_matches!("".parse::<FixUsage>(), Err(Error::UnknownCategory { .. }));
    }

    #[test]
    fn row_codes() {
        assert_eq!(NavaidKind::from_row_code("3").to_string(), "VOR");
        assert_eq!(NavaidKind::from_row_code("12").to_string(), "DME (VOR)");
        assert_eq!(NavaidKind::from_row_code("9").to_string(), "INNER MARKER");
        assert_eq!(NavaidKind::from_row_code("40.5"), NavaidKind::Unknown);
    }
}
