use forseti_common::utils::version::SolcVersion;
use forseti_metadata::MetadataFormat;

use super::VERSION_EMBEDDED_SINCE;

/// The first solc release which emitted a metadata encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatIntroduction {
    /// The metadata encoding.
    pub format: MetadataFormat,
    /// The first release which emitted it.
    pub introduced: SolcVersion,
}

/// Metadata encodings ordered by the release which introduced them.
pub static METADATA_FORMATS: [FormatIntroduction; 4] = [
    FormatIntroduction { format: MetadataFormat::Bzzr0, introduced: SolcVersion::new(0, 4, 7) },
    FormatIntroduction { format: MetadataFormat::Bzzr1, introduced: SolcVersion::new(0, 5, 11) },
    FormatIntroduction { format: MetadataFormat::Ipfs, introduced: SolcVersion::new(0, 6, 0) },
    FormatIntroduction { format: MetadataFormat::HashNone, introduced: SolcVersion::new(0, 6, 0) },
];

/// Returns the `[lower, upper)` span of releases which emitted `format` without embedding their
/// own version.
///
/// A format is superseded by the next format introduced after it, and no release from
/// [`VERSION_EMBEDDED_SINCE`] onwards omits the version. Formats which only ever shipped
/// alongside an embedded version fall back to the span in which they were current.
pub fn format_range(format: MetadataFormat) -> Option<(SolcVersion, Option<SolcVersion>)> {
    let index = METADATA_FORMATS.iter().position(|entry| entry.format == format)?;
    let introduced = &METADATA_FORMATS[index].introduced;

    let next = METADATA_FORMATS[index + 1..]
        .iter()
        .map(|entry| &entry.introduced)
        .find(|version| *version > introduced)
        .cloned();

    let embedded = VERSION_EMBEDDED_SINCE;
    let upper = match &next {
        Some(next) if *next < embedded => next.clone(),
        _ => embedded,
    };

    if upper > *introduced {
        Some((introduced.clone(), Some(upper)))
    } else {
        Some((introduced.clone(), next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered() {
        assert!(METADATA_FORMATS.windows(2).all(|pair| pair[0].introduced <= pair[1].introduced));
    }

    #[test]
    fn test_bzzr0_range_ends_when_version_is_embedded() {
        assert_eq!(
            format_range(MetadataFormat::Bzzr0),
            Some((SolcVersion::new(0, 4, 7), Some(SolcVersion::new(0, 5, 9))))
        );
    }

    #[test]
    fn test_bzzr1_range_falls_back_to_format_lifetime() {
        assert_eq!(
            format_range(MetadataFormat::Bzzr1),
            Some((SolcVersion::new(0, 5, 11), Some(SolcVersion::new(0, 6, 0))))
        );
    }

    #[test]
    fn test_current_formats_are_open_ended() {
        assert_eq!(format_range(MetadataFormat::Ipfs), Some((SolcVersion::new(0, 6, 0), None)));
        assert_eq!(
            format_range(MetadataFormat::HashNone),
            Some((SolcVersion::new(0, 6, 0), None))
        );
    }
}
