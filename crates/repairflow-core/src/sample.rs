//! Built-in sample payload: a KLEE harness with a reachable divide-by-zero.
//!
//! The `\n` is sent as the two characters `\` `n`; the service unescapes it.

use crate::domain::AnalysisRequest;

pub const SAMPLE_FILENAME: &str = "buggy_div.c";

pub const SAMPLE_SOURCE: &str = r#"#include <klee/klee.h>\nint main() { int x; klee_make_symbolic(&x, sizeof(x), "x"); return 100/(x-10); }"#;

/// Analysis request for the built-in sample.
pub fn sample_request() -> AnalysisRequest {
    AnalysisRequest::new(SAMPLE_FILENAME, SAMPLE_SOURCE)
}
