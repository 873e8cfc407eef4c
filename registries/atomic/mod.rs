pub mod diagnostics;
pub mod role;
pub mod theme;
