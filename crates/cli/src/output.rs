use colored::Colorize;
use forseti_common::utils::version::SolcVersion;
use forseti_core::{forseti_infer::InferResult, VerificationReport};

/// Prints an inferred version range, and which configured versions it admits.
pub(crate) fn display_inference(result: &InferResult, configured: &[SolcVersion]) {
    println!("{} {}", "range:".bold(), result.range.to_string().green());

    match &result.metadata {
        Some(metadata) => {
            println!("{} {}", "metadata:".bold(), metadata.format());
            if let Some(hash) = metadata.content_hash() {
                println!("{} {}", "content hash:".bold(), hash);
            }
            if metadata.experimental {
                println!("{} {}", "experimental:".bold(), "true".yellow());
            }
        }
        None => println!("{} {}", "metadata:".bold(), "none".yellow()),
    }

    if !configured.is_empty() {
        let admitted = result.range.select(configured);
        let admitted = if admitted.is_empty() {
            "none".red().to_string()
        } else {
            admitted.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        };
        println!("{} {}", "configured versions in range:".bold(), admitted);
    }
}

/// Prints a verification report.
pub(crate) fn display_verification(report: &VerificationReport) {
    println!("{} {}", "artifact:".bold(), report.matched.artifact.green());
    println!("{} {}", "range:".bold(), report.range);

    if let Some(version) = &report.solc_version {
        println!("{} {}", "solc:".bold(), version);
    }

    for (library, address) in &report.matched.libraries {
        println!("{} {} @ {}", "library:".bold(), library, address);
    }

    for (id, values) in &report.matched.immutables {
        for value in values {
            println!("{} {} = {}", "immutable:".bold(), id, value);
        }
    }
}
