//! Integration Test: Panic Prohibition in Library Code
//!
//! **Policy**: `control-core` is a library; every failure must reach the
//! caller as a `Result` or end the decode loop quietly. Production code
//! MUST NOT call `.unwrap()` or `.expect(..)`.
//! **Allowed**: Test modules and test fixtures.

use architectural_enforcement::find_violations;

#[test]
fn test_no_unwrap_in_library_code() {
    let violations = find_violations(&["control/core/src"], &[".unwrap()", ".expect("]);

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Panicking calls found in library code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED: propagate with `?` or map into ControlError");

        panic!(
            "\nFound {} panicking call(s) in library code.\nFix these before merging!",
            violations.len()
        );
    }
}
