//! Shared benchmark output fixtures

#![allow(dead_code)]

/// A `go test -bench` run of the recursive Fibonacci benchmark
pub const FIB_OLD: &str = "\
goos: linux
goarch: amd64
pkg: example.com/fib
cpu: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
BenchmarkFib20-4  30000  49000 ns/op
BenchmarkFib20-4  30000  49500 ns/op
BenchmarkFib20-4  30000  50000 ns/op
PASS
ok  \texample.com/fib\t4.512s
";

/// The same benchmark after the memoization change
pub const FIB_NEW: &str = "\
goos: linux
goarch: amd64
pkg: example.com/fib
cpu: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
BenchmarkFib20-4  50000  31500 ns/op
BenchmarkFib20-4  50000  32000 ns/op
BenchmarkFib20-4  50000  32500 ns/op
PASS
ok  \texample.com/fib\t3.108s
";

/// One `ns/op` result line of `name` per value
pub fn result_lines(name: &str, values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{} 1000 {} ns/op\n", name, v))
        .collect()
}
