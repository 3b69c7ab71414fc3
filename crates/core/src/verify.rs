use std::time::Instant;

use forseti_common::utils::version::SolcVersion;
use forseti_infer::{infer_from_metadata, VersionRange};
use forseti_matcher::{
    find_matching_artifact, CompilerOutput, MatchArgs, MatchOptions, MatchReport, MatchResult,
};
use forseti_metadata::decode_metadata;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Error;

/// The outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification<'a> {
    /// The compiler version range inferred from the deployed bytecode.
    pub range: VersionRange,
    /// The matching artifact with its recovered libraries and immutables.
    pub result: MatchResult<'a>,
}

/// Identifies the artifact in `output` which produced `deployed`, compiled with
/// `configured_version`.
///
/// The version is checked against the range inferred from the bytecode before any matching
/// happens.
pub fn verify<'a>(
    deployed: &[u8],
    output: &'a CompilerOutput,
    configured_version: &SolcVersion,
    options: &MatchOptions,
) -> Result<Verification<'a>, Error> {
    let start_time = Instant::now();

    if deployed.is_empty() {
        return Err(Error::EmptyBytecode);
    }

    let metadata = decode_metadata(deployed);
    let range = infer_from_metadata(metadata.as_ref(), deployed);
    debug!("inferred compiler range {}", range);

    if !range.is_included(configured_version) {
        warn!("compiler version {} is outside {}", configured_version, range);
        return Err(Error::NoCompilerVersionInRange {
            version: configured_version.clone(),
            range,
        });
    }

    let Some(result) = find_matching_artifact(deployed, output, options)? else {
        return Err(Error::NoArtifactMatch { range });
    };

    info!(
        "verified '{}' with solc {}",
        result.artifact.fully_qualified_name(),
        configured_version
    );
    debug!("verification took {:?}", start_time.elapsed());

    Ok(Verification { range, result })
}

/// An owned, serializable summary of a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// The compiler version the bytecode was verified against, if one was known.
    pub solc_version: Option<SolcVersion>,
    /// The compiler version range inferred from the deployed bytecode.
    pub range: VersionRange,
    /// The matching artifact.
    #[serde(rename = "match")]
    pub matched: MatchReport,
}

impl VerificationReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Picks the compiler version to verify against: the explicit one, then the one recorded in the
/// compiler output, then the newest configured version admitted by `range`.
///
/// When every configured version is rejected by `range`, the newest one is returned so the
/// caller reports it as out of range.
fn select_version(
    explicit: Option<&SolcVersion>,
    output: &CompilerOutput,
    configured: &[SolcVersion],
    range: &VersionRange,
) -> Option<SolcVersion> {
    if let Some(version) = explicit.or(output.solc_version.as_ref()) {
        return Some(version.clone());
    }

    range.select(configured).into_iter().max().or_else(|| configured.iter().max()).cloned()
}

/// Reads the target bytecode and compiler output from disk and verifies the target.
///
/// Without any known compiler version the early range check is skipped and only the matcher
/// runs.
pub fn verify_target(
    args: MatchArgs,
    configured_versions: &[SolcVersion],
    defaults: MatchOptions,
) -> Result<VerificationReport, Error> {
    let deployed =
        args.get_bytecode().map_err(|e| forseti_matcher::Error::ReadError(e.to_string()))?;
    let output = CompilerOutput::from_file(&args.artifacts)?;
    let options = args.options(defaults);

    if deployed.is_empty() {
        return Err(Error::EmptyBytecode);
    }

    let range = infer_from_metadata(decode_metadata(&deployed).as_ref(), &deployed);
    let version = select_version(args.solc_version.as_ref(), &output, configured_versions, &range);

    let (range, result) = match &version {
        Some(version) => {
            let verification = verify(&deployed, &output, version, &options)?;
            (verification.range, verification.result)
        }
        None => {
            debug!("no compiler version known, skipping the range check");
            let Some(result) = find_matching_artifact(&deployed, &output, &options)? else {
                return Err(Error::NoArtifactMatch { range });
            };
            (range, result)
        }
    };

    Ok(VerificationReport { solc_version: version, range, matched: MatchReport::from(result) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use forseti_common::utils::io::file::{delete_path, write_file};
    use forseti_infer::InferralType;
    use forseti_matcher::MatchArgsBuilder;

    fn metadata_range() -> VersionRange {
        VersionRange::new(
            SolcVersion::new(0, 4, 7),
            Some(SolcVersion::new(0, 5, 9)),
            InferralType::Metadata,
        )
    }

    #[test]
    fn test_select_version_prefers_explicit() {
        let output = CompilerOutput {
            solc_version: Some(SolcVersion::new(0, 4, 24)),
            ..Default::default()
        };
        let explicit = SolcVersion::new(0, 4, 26);

        assert_eq!(
            select_version(Some(&explicit), &output, &[], &metadata_range()),
            Some(explicit)
        );
        assert_eq!(
            select_version(None, &output, &[], &metadata_range()),
            Some(SolcVersion::new(0, 4, 24))
        );
    }

    #[test]
    fn test_select_version_from_configured() {
        let output = CompilerOutput::default();
        let configured =
            [SolcVersion::new(0, 8, 19), SolcVersion::new(0, 4, 11), SolcVersion::new(0, 5, 1)];

        assert_eq!(
            select_version(None, &output, &configured, &metadata_range()),
            Some(SolcVersion::new(0, 5, 1))
        );
        assert_eq!(
            select_version(None, &output, &configured[..1], &metadata_range()),
            Some(SolcVersion::new(0, 8, 19))
        );
        assert_eq!(select_version(None, &output, &[], &metadata_range()), None);
    }

    #[test]
    fn test_verify_target_from_files() {
        let runtime = "60606040526000600060f3";
        let dir = std::env::temp_dir().join("forseti-test-verify");
        let artifacts = dir.join("build-info.json");
        let artifacts = artifacts.to_str().expect("temp path is valid utf-8");

        let json = format!(
            r#"{{ "solcVersion": "0.4.2", "output": {{ "contracts": {{ "A.sol": {{ "A": {{ "evm": {{ "deployedBytecode": {{ "object": "{runtime}" }} }} }} }} }} }} }}"#
        );
        write_file(artifacts, &json).expect("failed to write mock build info");

        let args = MatchArgsBuilder::new()
            .target(runtime.to_string())
            .artifacts(artifacts.to_string())
            .threads(1)
            .build()
            .expect("failed to build args");
        let report = verify_target(args, &[], MatchOptions::default())
            .expect("verification should succeed");

        assert_eq!(report.solc_version, Some(SolcVersion::new(0, 4, 2)));
        assert_eq!(report.matched.artifact, "A.sol:A");
        assert!(report.to_json().expect("should serialize").contains("\"match\""));

        delete_path(dir.to_str().expect("temp path is valid utf-8"));
    }
}
