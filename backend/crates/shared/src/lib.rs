//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Error classification and the unified `AppError`
//! - Typed identifiers
//!
//! Keep this crate small. Anything domain specific belongs in its own crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
