//! Orchestration: classifier + resolver → verdict.
//!
//! # Outcomes
//! ```text
//! classify → skipped    (not subject to the check)
//!          → passed     (declared length within the resolved limit)
//!          → rejected   (declared length > resolved limit)
//! ```
//!
//! # Design Decisions
//! - One transition sequence per request, no retries
//! - The resolver sits behind `ArcSwap`: a reload replaces it wholesale and
//!   in-flight evaluations keep the snapshot they loaded
//! - The comparison trusts the declared length; bytes actually streamed are
//!   not counted here

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::guard::classifier::RequestClassifier;
use crate::guard::resolver::LimitResolver;
use crate::guard::snapshot::RequestSnapshot;
use crate::guard::verdict::GuardVerdict;
use crate::observability::metrics;

/// Default number of leading body bytes captured for sniffing.
pub const DEFAULT_SNIFF_BYTES: usize = 64;

/// Evaluate one snapshot against a classifier and resolver.
pub fn evaluate(
    classifier: &RequestClassifier,
    resolver: &LimitResolver,
    snapshot: &RequestSnapshot,
) -> GuardVerdict {
    classify_and_compare(classifier, resolver, snapshot).1
}

/// Classify once, then compare. The flag reports whether the size check applied.
fn classify_and_compare(
    classifier: &RequestClassifier,
    resolver: &LimitResolver,
    snapshot: &RequestSnapshot,
) -> (bool, GuardVerdict) {
    let declared = match snapshot.declared_content_length {
        Some(declared) if classifier.should_check(snapshot) => declared,
        _ => return (false, GuardVerdict::Pass),
    };

    let max_bytes = resolver.resolve(&snapshot.route_id);
    if declared > max_bytes {
        (true, GuardVerdict::reject(declared, max_bytes))
    } else {
        (true, GuardVerdict::Pass)
    }
}

/// Shared guard installed in the request pipeline.
///
/// Cloning is cheap; all clones observe the same resolver.
#[derive(Clone)]
pub struct SizeGuard {
    classifier: Arc<RequestClassifier>,
    resolver: Arc<ArcSwap<LimitResolver>>,
    sniff_bytes: usize,
}

impl SizeGuard {
    pub fn new(resolver: LimitResolver) -> Self {
        Self {
            classifier: Arc::new(RequestClassifier::default()),
            resolver: Arc::new(ArcSwap::from_pointee(resolver)),
            sniff_bytes: DEFAULT_SNIFF_BYTES,
        }
    }

    pub fn with_sniff_bytes(mut self, sniff_bytes: usize) -> Self {
        self.sniff_bytes = sniff_bytes.max(1);
        self
    }

    /// Evaluate a request and record the outcome.
    pub fn evaluate(&self, snapshot: &RequestSnapshot) -> GuardVerdict {
        let resolver = self.resolver.load();
        let (checked, verdict) = classify_and_compare(&self.classifier, &resolver, snapshot);

        let outcome = match verdict {
            GuardVerdict::Pass if !checked => "skipped",
            GuardVerdict::Pass => "passed",
            GuardVerdict::Reject(_) => "rejected",
        };
        metrics::record_evaluation(outcome);
        if let Some(declared) = snapshot.declared_content_length.filter(|_| checked) {
            metrics::record_declared_bytes(declared);
        }

        tracing::trace!(
            route = %snapshot.route_id,
            outcome,
            declared = ?snapshot.declared_content_length,
            "Guard evaluated"
        );

        verdict
    }

    /// Whether the HTTP layer should capture a body preview before evaluating.
    pub fn needs_preview(&self, snapshot: &RequestSnapshot) -> bool {
        self.classifier.needs_preview(snapshot)
    }

    pub fn sniff_bytes(&self) -> usize {
        self.sniff_bytes
    }

    /// Atomically replace the resolver.
    pub fn reload(&self, resolver: LimitResolver) {
        self.resolver.store(Arc::new(resolver));
    }

    pub fn default_max_bytes(&self) -> u64 {
        self.resolver.load().default_max_bytes()
    }

    /// Resolve a route against the current resolver.
    pub fn resolve(&self, route_id: &str) -> u64 {
        self.resolver.load().resolve(route_id)
    }
}
