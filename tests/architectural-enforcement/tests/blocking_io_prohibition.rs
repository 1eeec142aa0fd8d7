//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: The control client runs on the tokio runtime and MUST NOT use
//! blocking sockets or blocking sleeps. Dial retry backoff and the decode
//! loop would otherwise stall every other task on the worker thread.
//! **Required**: Use `tokio::net` and `tokio::time::sleep`.

use architectural_enforcement::find_violations;

const PRODUCTION_DIRS: &[&str] = &["control/core/src", "control/monitor/src"];

#[test]
fn test_no_blocking_sockets_in_production_code() {
    let violations = find_violations(
        PRODUCTION_DIRS,
        &[
            "std::net::TcpStream",
            "std::net::TcpListener",
            "std::os::unix::net",
        ],
    );

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking sockets found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::net::UnixStream::connect().await");
        eprintln!("  - tokio::net::TcpStream::connect().await");

        panic!(
            "\nFound {} blocking socket use(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_no_thread_sleep_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, &["std::thread::sleep", "thread::sleep("]);

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking sleep found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED: tokio::time::sleep(delay).await");

        panic!(
            "\nFound {} blocking sleep(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}
