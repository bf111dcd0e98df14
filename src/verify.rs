//! Post-purge verification against known artifact signatures.

use crate::output;
use crate::patterns::Signature;

/// Outcome of one signature check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCheck {
    pub label: String,
    /// Tracked paths still carrying the signature
    pub offenders: Vec<String>,
}

impl SignatureCheck {
    pub fn passed(&self) -> bool {
        self.offenders.is_empty()
    }
}

/// Overall verification verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub checks: Vec<SignatureCheck>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(SignatureCheck::passed)
    }
}

/// True if any directory segment of `path` (every component but the file
/// name) equals one of `segments`, ignoring ASCII case.
fn has_segment(path: &str, segments: &[String]) -> bool {
    let mut components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
    components.pop();
    components
        .iter()
        .any(|component| segments.iter().any(|s| s.eq_ignore_ascii_case(component)))
}

/// Check the tracked listing against each signature
pub fn check_signatures(tracked: &[String], signatures: &[Signature]) -> Verification {
    let checks = signatures
        .iter()
        .map(|signature| SignatureCheck {
            label: signature.label.clone(),
            offenders: tracked
                .iter()
                .filter(|path| has_segment(path, &signature.segments))
                .cloned()
                .collect(),
        })
        .collect();
    Verification { checks }
}

/// Log a `[PASS]`/`[FAIL]` line per signature and the overall verdict
pub fn log_verification(verification: &Verification) {
    for check in &verification.checks {
        if check.passed() {
            output::pass(&format!("No tracked files include {}.", check.label));
        } else {
            output::fail(&format!(
                "Tracked files still include {} ({} paths, e.g. {}).",
                check.label,
                check.offenders.len(),
                check.offenders[0]
            ));
        }
    }
    if verification.passed() {
        output::log_line("PASS: Verification checks completed.");
    } else {
        output::log_line("FAIL: Verification checks reported issues.");
    }
}
