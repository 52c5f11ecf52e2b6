use arch_lint::rules::{NoErrorSwallowing, NoPanicInLib, NoSilentResultDrop, NoUnwrapExpect};
use arch_lint::{Analyzer, Severity};

/// Every failure in the pipeline has to reach the user with its step name,
/// so production code may neither drop nor swallow a `Result`, nor bail out
/// with a panic:
///
/// - AL001 no-unwrap-expect
/// - AL003 no-error-swallowing
/// - AL011 no-panic-in-lib
/// - AL013 no-silent-result-drop
///
/// Unit-test modules and `tests/` are exempt.
#[test]
fn production_code_propagates_every_failure() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");

    let analyzer = Analyzer::builder()
        .root(root)
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .exclude("examples/**")
        .rule(NoUnwrapExpect::new())
        .rule(NoErrorSwallowing::new())
        .rule(NoPanicInLib::new())
        .rule(NoSilentResultDrop::new())
        .build()
        .expect("build analyzer");

    let result = analyzer.analyze().expect("analyze");

    if result.has_violations_at(Severity::Warning) {
        let report = result.format_test_report(Severity::Warning);
        panic!("{report}");
    }
}
