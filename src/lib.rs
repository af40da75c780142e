//! Workspace root placeholder crate; see `crates/*` for the actual implementation.
