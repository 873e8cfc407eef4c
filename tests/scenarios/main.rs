mod dual_mount;
mod environment;
mod roles;

use thoughtmarks_shell::VERSION;

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}
