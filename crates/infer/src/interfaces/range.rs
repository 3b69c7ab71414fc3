use std::fmt::Display;

use forseti_common::utils::version::SolcVersion;
use serde::Serialize;

/// How precisely a [`VersionRange`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InferralType {
    /// The metadata block embedded the compiler version.
    Exact,
    /// The metadata block had no version, so the range spans the releases which emitted its
    /// encoding.
    Metadata,
    /// There was no metadata block; the range comes from opcode presence heuristics.
    BytecodeEra,
}

impl Display for InferralType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferralType::Exact => write!(f, "exact"),
            InferralType::Metadata => write!(f, "metadata"),
            InferralType::BytecodeEra => write!(f, "bytecode era"),
        }
    }
}

/// A half-open range of solc versions, `[lower, upper)`, tagged with how it was inferred.
///
/// An open upper bound means every release from `lower` onwards is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VersionRange {
    lower: SolcVersion,
    upper: Option<SolcVersion>,
    inferral_type: InferralType,
}

impl VersionRange {
    /// Creates a range. Panics in debug builds if `upper < lower`.
    pub fn new(
        lower: SolcVersion,
        upper: Option<SolcVersion>,
        inferral_type: InferralType,
    ) -> Self {
        debug_assert!(upper.as_ref().map_or(true, |upper| lower <= *upper));
        Self { lower, upper, inferral_type }
    }

    /// Creates the single-point range admitting only `version`. Build metadata is dropped.
    ///
    /// Returns `None` if `version` has no successor to bound the range with.
    pub fn exact(version: &SolcVersion) -> Option<Self> {
        let upper = version.next_patch()?;
        Some(Self {
            lower: version.release(),
            upper: Some(upper),
            inferral_type: InferralType::Exact,
        })
    }

    /// The inclusive lower bound.
    pub fn lower(&self) -> &SolcVersion {
        &self.lower
    }

    /// The exclusive upper bound, if any.
    pub fn upper(&self) -> Option<&SolcVersion> {
        self.upper.as_ref()
    }

    /// How this range was inferred.
    pub fn inferral_type(&self) -> InferralType {
        self.inferral_type
    }

    /// Returns whether `version` falls within this range.
    pub fn is_included(&self, version: &SolcVersion) -> bool {
        match self.inferral_type {
            InferralType::Exact => *version == self.lower,
            _ => {
                *version >= self.lower &&
                    self.upper.as_ref().map_or(true, |upper| *version < *upper)
            }
        }
    }

    /// Returns the versions from `versions` which this range admits, in their original order.
    pub fn select<'a>(&self, versions: &'a [SolcVersion]) -> Vec<&'a SolcVersion> {
        versions.iter().filter(|version| self.is_included(version)).collect()
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.inferral_type, &self.upper) {
            (InferralType::Exact, _) => write!(f, "={}", self.lower)?,
            (_, Some(upper)) => write!(f, ">={}, <{}", self.lower, upper)?,
            (_, None) => write!(f, ">={}", self.lower)?,
        }
        write!(f, " ({})", self.inferral_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_admits_single_point() {
        let range = VersionRange::exact(&SolcVersion::new(0, 5, 0)).expect("has a successor");

        assert!(range.is_included(&SolcVersion::new(0, 5, 0)));
        assert!(!range.is_included(&SolcVersion::new(0, 5, 1)));
        assert!(!range.is_included(&SolcVersion::new(0, 4, 26)));
        assert_eq!(range.upper(), Some(&SolcVersion::new(0, 5, 1)));
    }

    #[test]
    fn test_exact_ignores_build_metadata() {
        let version: SolcVersion = "0.8.19+commit.7dd6d404".parse().expect("should parse");
        let range = VersionRange::exact(&version).expect("has a successor");

        assert!(range.is_included(&SolcVersion::new(0, 8, 19)));
        assert_eq!(range.to_string(), "=0.8.19 (exact)");
    }

    #[test]
    fn test_exact_without_successor() {
        assert_eq!(VersionRange::exact(&SolcVersion::new(0, 8, u32::MAX)), None);
    }

    #[test]
    fn test_bounded_range_is_half_open() {
        let range = VersionRange::new(
            SolcVersion::new(0, 4, 7),
            Some(SolcVersion::new(0, 5, 9)),
            InferralType::Metadata,
        );

        assert!(range.is_included(&SolcVersion::new(0, 4, 7)));
        assert!(range.is_included(&SolcVersion::new(0, 5, 8)));
        assert!(!range.is_included(&SolcVersion::new(0, 5, 9)));
        assert!(!range.is_included(&SolcVersion::new(0, 4, 6)));
    }

    #[test]
    fn test_open_range() {
        let range = VersionRange::new(SolcVersion::new(0, 6, 0), None, InferralType::Metadata);

        assert!(range.is_included(&SolcVersion::new(0, 8, 28)));
        assert!(!range.is_included(&SolcVersion::new(0, 5, 17)));
    }

    #[test]
    fn test_select_preserves_order() {
        let versions = vec![
            SolcVersion::new(0, 8, 0),
            SolcVersion::new(0, 4, 11),
            SolcVersion::new(0, 5, 1),
            SolcVersion::new(0, 4, 24),
        ];
        let range = VersionRange::new(
            SolcVersion::new(0, 4, 7),
            Some(SolcVersion::new(0, 5, 9)),
            InferralType::Metadata,
        );

        assert_eq!(range.select(&versions), vec![&versions[1], &versions[2], &versions[3]]);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(
            VersionRange::exact(&SolcVersion::new(0, 8, 19)).expect("has a successor").to_string(),
            "=0.8.19 (exact)"
        );
        assert_eq!(
            VersionRange::new(SolcVersion::new(0, 1, 0), None, InferralType::BytecodeEra)
                .to_string(),
            ">=0.1.0 (bytecode era)"
        );
        assert_eq!(
            VersionRange::new(
                SolcVersion::new(0, 5, 11),
                Some(SolcVersion::new(0, 6, 0)),
                InferralType::Metadata
            )
            .to_string(),
            ">=0.5.11, <0.6.0 (metadata)"
        );
    }

    #[test]
    fn test_range_serializes() {
        let range = VersionRange::exact(&SolcVersion::new(0, 7, 6)).expect("has a successor");
        let json = serde_json::to_value(&range).expect("should serialize");

        assert_eq!(json["lower"], "0.7.6");
        assert_eq!(json["upper"], "0.7.7");
        assert_eq!(json["inferral_type"], "exact");
    }
}
