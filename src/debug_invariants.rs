//! Invariant checking for meshes and simulation states.
//!
//! Checks always run through [`DebugInvariants::validate_invariants`]; the
//! [`debug_invariants!`](crate::debug_invariants!) macro additionally turns a
//! violation into a panic in debug builds, or in release builds compiled with
//! the `strict-invariants` feature.

use crate::mesh_error::HydroSieveError;

/// Structures with checkable internal consistency.
pub trait DebugInvariants {
    /// Panic on the first violation when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), HydroSieveError>;
}

/// Run a fallible check and panic with `context` on error when invariant
/// checking is enabled; expands to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// `Ok(())` when `holds`, otherwise an [`HydroSieveError::InvariantViolation`]
/// carrying the lazily built message.
#[inline]
pub(crate) fn ensure(holds: bool, msg: impl FnOnce() -> String) -> Result<(), HydroSieveError> {
    if holds {
        Ok(())
    } else {
        Err(HydroSieveError::InvariantViolation(msg()))
    }
}
