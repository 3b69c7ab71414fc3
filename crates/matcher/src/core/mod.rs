pub(crate) mod normalize;

use std::{collections::BTreeMap, time::Instant};

use alloy::primitives::{Address, Bytes};
use forseti_common::{constants::ADDRESS_SIZE, utils::threading::task_pool};
use forseti_metadata::executable_section_length;
use tracing::{debug, info, trace, warn};

use crate::{
    error::Error,
    interfaces::{
        ArtifactBytecode, CompiledArtifact, CompilerOutput, MatchArgs, MatchReport, MatchResult,
    },
};
use normalize::{normalize, reference_spans, MetadataPolicy};

/// Settings for a matching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    /// How the metadata section takes part in the comparison.
    pub metadata_policy: MetadataPolicy,
    /// Number of worker threads used once the worker pool kicks in.
    pub threads: usize,
    /// Candidate count at which matching switches to the worker pool.
    pub parallel_threshold: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            metadata_policy: MetadataPolicy::default(),
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            parallel_threshold: 32,
        }
    }
}

/// Returns the length of the section of `bytecode` which takes part in the comparison.
fn compared_length(bytecode: &[u8], policy: MetadataPolicy) -> usize {
    match policy {
        MetadataPolicy::Ignore => executable_section_length(bytecode),
        MetadataPolicy::Compare => bytecode.len(),
    }
}

/// Checks that every link reference is an address-sized hole inside the candidate's bytecode,
/// and that every immutable reference lies inside it.
fn validate_references(artifact: &CompiledArtifact) -> Result<(), Error> {
    let length = artifact.deployed.object.len();

    for reference in &artifact.deployed.link_references {
        for span in &reference.spans {
            if span.length != ADDRESS_SIZE || !span.is_within(length) {
                return Err(Error::InvalidLinkReference {
                    artifact: artifact.fully_qualified_name(),
                    library: reference.library.clone(),
                    start: span.start,
                    length: span.length,
                });
            }
        }
    }

    for reference in &artifact.deployed.immutable_references {
        if let Some(span) = reference.spans.iter().find(|span| !span.is_within(length)) {
            return Err(Error::InvalidImmutableReference {
                artifact: artifact.fully_qualified_name(),
                id: reference.id.clone(),
                start: span.start,
                length: span.length,
            });
        }
    }

    Ok(())
}

/// Compares `deployed` against a single candidate.
fn is_match(
    deployed: &[u8],
    deployed_length: usize,
    artifact: &CompiledArtifact,
    policy: MetadataPolicy,
) -> Result<bool, Error> {
    validate_references(artifact)?;

    let candidate = &artifact.deployed.object;
    if candidate.is_empty() {
        return Ok(false);
    }

    if compared_length(candidate, policy) != deployed_length {
        trace!("'{}' rejected on length", artifact.fully_qualified_name());
        return Ok(false);
    }

    let spans = reference_spans(&artifact.deployed);
    let normalized_candidate = normalize(candidate, &spans, policy);
    let normalized_deployed = normalize(deployed, &spans, policy);

    Ok(normalized_candidate.code == normalized_deployed.code)
}

/// Reads the addresses linked into `deployed` for every library of the matching candidate.
fn recover_libraries(
    deployed: &[u8],
    bytecode: &ArtifactBytecode,
) -> Result<BTreeMap<String, Address>, Error> {
    let mut libraries = BTreeMap::new();

    for reference in &bytecode.link_references {
        let mut resolved: Option<Address> = None;

        for span in &reference.spans {
            let Some(slice) = deployed.get(span.start..span.end()) else {
                continue;
            };
            let address = Address::from_slice(slice);

            match resolved {
                Some(first) if first != address => {
                    return Err(Error::LibraryAddressInconsistency {
                        library: reference.library.clone(),
                        first,
                        second: address,
                    });
                }
                Some(_) => {}
                None => resolved = Some(address),
            }
        }

        if let Some(address) = resolved {
            debug!("library '{}' is linked at {}", reference.library, address);
            libraries.insert(reference.library.clone(), address);
        }
    }

    Ok(libraries)
}

/// Reads the values substituted into `deployed` for every immutable of the matching candidate.
fn recover_immutables(
    deployed: &[u8],
    bytecode: &ArtifactBytecode,
) -> BTreeMap<String, Vec<Bytes>> {
    bytecode
        .immutable_references
        .iter()
        .map(|reference| {
            let values = reference
                .spans
                .iter()
                .map(|span| Bytes::copy_from_slice(&deployed[span.clamped(deployed.len())]))
                .collect();
            (reference.id.clone(), values)
        })
        .collect()
}

/// Finds the artifact in `output` whose deployed bytecode produced `deployed`.
///
/// Every candidate is compared, so the outcome does not depend on candidate order or on how the
/// work was split across threads. Returns `Ok(None)` when nothing matches and
/// [`Error::AmbiguousArtifactMatch`] when more than one candidate does.
pub fn find_matching_artifact<'a>(
    deployed: &[u8],
    output: &'a CompilerOutput,
    options: &MatchOptions,
) -> Result<Option<MatchResult<'a>>, Error> {
    let start_time = Instant::now();
    let policy = options.metadata_policy;
    let deployed_length = compared_length(deployed, policy);
    let candidates = &output.artifacts;

    let compare =
        |artifact: &CompiledArtifact| is_match(deployed, deployed_length, artifact, policy);
    let parallel = options.threads > 1 && candidates.len() >= options.parallel_threshold.max(1);

    let results: Vec<Result<bool, Error>> = if parallel {
        debug!("comparing {} candidates on {} threads", candidates.len(), options.threads);
        task_pool(candidates, options.threads, compare)
    } else {
        debug!("comparing {} candidates", candidates.len());
        candidates.iter().map(compare).collect()
    };

    let mut matches = Vec::new();
    for (artifact, result) in candidates.iter().zip(results) {
        if result? {
            matches.push(artifact);
        }
    }
    debug!("comparison took {:?}", start_time.elapsed());

    match matches.as_slice() {
        [] => {
            debug!("no candidate matches the deployed bytecode");
            Ok(None)
        }
        [artifact] => {
            info!("deployed bytecode matches '{}'", artifact.fully_qualified_name());
            Ok(Some(MatchResult {
                artifact,
                libraries: recover_libraries(deployed, &artifact.deployed)?,
                immutables: recover_immutables(deployed, &artifact.deployed),
            }))
        }
        _ => {
            let mut names: Vec<String> =
                matches.iter().map(|artifact| artifact.fully_qualified_name()).collect();
            names.sort();
            warn!("deployed bytecode matches {} artifacts", names.len());
            Err(Error::AmbiguousArtifactMatch { names })
        }
    }
}

/// Reads the target bytecode and compiler output from disk and finds the matching artifact.
pub fn match_artifact(args: MatchArgs) -> Result<Option<MatchReport>, Error> {
    let bytecode = args.get_bytecode().map_err(|e| Error::ReadError(e.to_string()))?;
    let output = CompilerOutput::from_file(&args.artifacts)?;

    let options = args.options(MatchOptions::default());
    info!("loaded {} artifacts from '{}'", output.artifacts.len(), args.artifacts);

    Ok(find_matching_artifact(&bytecode, &output, &options)?.map(MatchReport::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{MatchArgsBuilder, Span};
    use forseti_common::utils::{
        io::file::{delete_path, write_file},
        strings::decode_hex,
    };

    const RUNTIME: &str = "608060405234801561001057600080fd5b50600436106100365760003560e01c80";

    fn bytes(hex: &str) -> Vec<u8> {
        decode_hex(hex).expect("valid hex")
    }

    fn metadata(hash_byte: &str) -> String {
        format!("a2646970667358221220{}64736f6c63430008130033", hash_byte.repeat(32))
    }

    fn sequential() -> MatchOptions {
        MatchOptions { threads: 1, ..Default::default() }
    }

    #[test]
    fn test_identical_bytecode_matches() {
        let code = bytes(RUNTIME);
        let output: CompilerOutput =
            [CompiledArtifact::new("A.sol", "A", ArtifactBytecode::new(code.clone()))]
                .into_iter()
                .collect();

        let result = find_matching_artifact(&code, &output, &sequential())
            .expect("matching should succeed")
            .expect("artifact should match");

        assert_eq!(result.artifact.fully_qualified_name(), "A.sol:A");
        assert!(result.libraries.is_empty());
        assert!(result.immutables.is_empty());
    }

    #[test]
    fn test_no_candidates_is_none() {
        let output = CompilerOutput::default();
        let result = find_matching_artifact(&bytes(RUNTIME), &output, &sequential());

        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_differing_metadata_hash_still_matches() {
        let deployed = bytes(&format!("{RUNTIME}{}", metadata("11")));
        let local = bytes(&format!("{RUNTIME}{}", metadata("22")));
        let output: CompilerOutput =
            [CompiledArtifact::new("A.sol", "A", ArtifactBytecode::new(local))]
                .into_iter()
                .collect();

        assert!(find_matching_artifact(&deployed, &output, &sequential())
            .expect("matching should succeed")
            .is_some());

        let strict = MatchOptions { metadata_policy: MetadataPolicy::Compare, ..sequential() };
        assert!(find_matching_artifact(&deployed, &output, &strict)
            .expect("matching should succeed")
            .is_none());
    }

    #[test]
    fn test_creation_bytecode_is_not_compared() {
        let code = bytes(RUNTIME);
        let mut artifact = CompiledArtifact::new("A.sol", "A", ArtifactBytecode::new(bytes("00")));
        artifact.creation = ArtifactBytecode::new(code.clone());
        let output: CompilerOutput = [artifact].into_iter().collect();

        assert!(find_matching_artifact(&code, &output, &sequential())
            .expect("matching should succeed")
            .is_none());
    }

    #[test]
    fn test_library_address_is_recovered() {
        let library = "a".repeat(40);
        let deployed = bytes(&format!("{}{library}{}", &RUNTIME[..20], &RUNTIME[60..]));
        let local = bytes(&format!("{}{}{}", &RUNTIME[..20], "0".repeat(40), &RUNTIME[60..]));

        let output: CompilerOutput = [CompiledArtifact::new(
            "Vault.sol",
            "Vault",
            ArtifactBytecode::new(local)
                .with_link_reference("Math.sol:Math", vec![Span::new(10, 20)]),
        )]
        .into_iter()
        .collect();

        let result = find_matching_artifact(&deployed, &output, &sequential())
            .expect("matching should succeed")
            .expect("artifact should match");

        assert_eq!(result.libraries.get("Math.sol:Math"), Some(&Address::repeat_byte(0xaa)));
    }

    #[test]
    fn test_library_address_inconsistency() {
        let mut deployed = vec![0x5b; 64];
        deployed[0..20].fill(0xaa);
        deployed[30..50].fill(0xbb);

        let mut local = vec![0x5b; 64];
        local[0..20].fill(0);
        local[30..50].fill(0);

        let output: CompilerOutput = [CompiledArtifact::new(
            "Vault.sol",
            "Vault",
            ArtifactBytecode::new(local)
                .with_link_reference("Math.sol:Math", vec![Span::new(0, 20), Span::new(30, 20)]),
        )]
        .into_iter()
        .collect();

        let error = find_matching_artifact(&deployed, &output, &sequential())
            .expect_err("addresses disagree");
        assert!(matches!(
            error,
            Error::LibraryAddressInconsistency { library, first, second }
                if library == "Math.sol:Math" &&
                    first == Address::repeat_byte(0xaa) &&
                    second == Address::repeat_byte(0xbb)
        ));
    }

    #[test]
    fn test_invalid_link_reference() {
        let output: CompilerOutput = [CompiledArtifact::new(
            "Vault.sol",
            "Vault",
            ArtifactBytecode::new(vec![0u8; 16])
                .with_link_reference("Math.sol:Math", vec![Span::new(0, 20)]),
        )]
        .into_iter()
        .collect();

        assert!(matches!(
            find_matching_artifact(&[0u8; 16], &output, &sequential()),
            Err(Error::InvalidLinkReference { start: 0, length: 20, .. })
        ));
    }

    #[test]
    fn test_immutable_reference_past_end_of_address_space() {
        let json = format!(
            r#"{{ "contracts": {{ "A.sol": {{ "A": {{ "abi": [], "evm": {{ "deployedBytecode": {{
                "object": "{RUNTIME}",
                "immutableReferences": {{ "7": [{{ "start": {}, "length": 32 }}] }}
            }} }} }} }} }}"#,
            usize::MAX
        );
        let output = CompilerOutput::from_standard_json(&json).expect("should parse");

        assert!(matches!(
            find_matching_artifact(&bytes(RUNTIME), &output, &sequential()),
            Err(Error::InvalidImmutableReference { start: usize::MAX, length: 32, .. })
        ));
    }

    #[test]
    fn test_link_reference_past_end_of_address_space() {
        let output: CompilerOutput = [CompiledArtifact::new(
            "Vault.sol",
            "Vault",
            ArtifactBytecode::new(bytes(RUNTIME))
                .with_link_reference("Math.sol:Math", vec![Span::new(usize::MAX - 4, 20)]),
        )]
        .into_iter()
        .collect();

        assert!(matches!(
            find_matching_artifact(&bytes(RUNTIME), &output, &sequential()),
            Err(Error::InvalidLinkReference { length: 20, .. })
        ));
    }

    #[test]
    fn test_immutable_values_are_recovered() {
        let mut deployed = bytes(RUNTIME);
        deployed.extend_from_slice(&[0x7f; 33]);
        deployed[RUNTIME.len() / 2 + 1..].fill(0x42);

        let mut local = bytes(RUNTIME);
        local.push(0x7f);
        local.extend_from_slice(&[0u8; 32]);

        let output: CompilerOutput = [CompiledArtifact::new(
            "Token.sol",
            "Token",
            ArtifactBytecode::new(local)
                .with_immutable_reference("12", vec![Span::new(RUNTIME.len() / 2 + 1, 32)]),
        )]
        .into_iter()
        .collect();

        let result = find_matching_artifact(&deployed, &output, &sequential())
            .expect("matching should succeed")
            .expect("artifact should match");

        assert_eq!(result.immutables["12"], vec![Bytes::from(vec![0x42; 32])]);
    }

    #[test]
    fn test_deployed_library_matches_call_protection() {
        let deployed = bytes(&format!("73{}30146080", "cd".repeat(20)));
        let local = bytes(&format!("73{}30146080", "00".repeat(20)));

        let output: CompilerOutput =
            [CompiledArtifact::new("Math.sol", "Math", ArtifactBytecode::new(local))]
                .into_iter()
                .collect();

        assert!(find_matching_artifact(&deployed, &output, &sequential())
            .expect("matching should succeed")
            .is_some());
    }

    #[test]
    fn test_ambiguous_match_lists_every_candidate() {
        let code = bytes(RUNTIME);
        let output: CompilerOutput = [
            CompiledArtifact::new("B.sol", "B", ArtifactBytecode::new(code.clone())),
            CompiledArtifact::new("C.sol", "C", ArtifactBytecode::new(bytes("00"))),
            CompiledArtifact::new("A.sol", "A", ArtifactBytecode::new(code.clone())),
        ]
        .into_iter()
        .collect();

        let error = find_matching_artifact(&code, &output, &sequential())
            .expect_err("two candidates match");
        assert!(matches!(
            error,
            Error::AmbiguousArtifactMatch { names } if names == vec!["A.sol:A", "B.sol:B"]
        ));
    }

    #[test]
    fn test_parallel_matching_is_deterministic() {
        let code = bytes(RUNTIME);
        let mut artifacts: Vec<CompiledArtifact> = (0..128)
            .map(|i| {
                CompiledArtifact::new(
                    format!("C{i}.sol"),
                    format!("C{i}"),
                    ArtifactBytecode::new(bytes(&format!("{:02x}{}", i, &RUNTIME[2..]))),
                )
            })
            .collect();
        artifacts.push(CompiledArtifact::new("Z.sol", "Z", ArtifactBytecode::new(code.clone())));
        let output: CompilerOutput = artifacts.into_iter().collect();

        let options = MatchOptions { threads: 8, parallel_threshold: 4, ..Default::default() };
        for _ in 0..8 {
            let error = find_matching_artifact(&code, &output, &options)
                .expect_err("C96 and Z share bytecode");
            assert!(matches!(
                error,
                Error::AmbiguousArtifactMatch { names } if names == vec!["C96.sol:C96", "Z.sol:Z"]
            ));
        }
    }

    #[test]
    fn test_match_artifact_from_files() {
        let dir = std::env::temp_dir().join("forseti-test-match");
        let artifacts = dir.join("output.json");
        let artifacts = artifacts.to_str().expect("temp path is valid utf-8");

        let json = format!(
            r#"{{ "contracts": {{ "A.sol": {{ "A": {{ "abi": [], "evm": {{ "deployedBytecode": {{ "object": "{RUNTIME}" }} }} }} }} }} }}"#
        );
        write_file(artifacts, &json).expect("failed to write mock output");

        let args = MatchArgsBuilder::new()
            .target(format!("0x{RUNTIME}"))
            .artifacts(artifacts.to_string())
            .build()
            .expect("failed to build args");
        let report = match_artifact(args).expect("matching should succeed").expect("should match");

        assert_eq!(report.artifact, "A.sol:A");
        assert!(report.to_json().expect("should serialize").contains("\"artifact\": \"A.sol:A\""));

        delete_path(dir.to_str().expect("temp path is valid utf-8"));
    }
}
