//! Workspace tooling crate.
//!
//! Exists so workspace-level dev tooling (`rusty-hook` pre-commit hooks) has
//! a package to attach to. Contains no library code; see `crates/eveye-lib`.
