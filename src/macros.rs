//////////////////////////
// Parallel-array macros //
//////////////////////////

/// Assertion that a set of parallel arrays agree in length.
///
/// COO triples and feed inputs carry positionally-aligned vectors; a length
/// disagreement means the invariant was already broken upstream.
#[macro_export]
macro_rules! assert_same_len {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let expected = $first.len();
        $(
            if $rest.len() != expected {
                panic!(
                    "Parallel arrays disagree in length: {} vs {}",
                    expected,
                    $rest.len()
                );
            }
        )+
    }};
}
