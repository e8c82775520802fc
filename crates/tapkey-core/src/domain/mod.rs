//! Domain value types for tapkey.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code has no imports from OS APIs,
//! file systems, or process management, and can be tested in isolation.
//!
//! For tapkey the domain is small: a tag identifier, an action name, and the
//! rule for turning whatever the reader reported into an identifier.

/// Validated action names.
pub mod action;

/// Raw reader events and tag identifier extraction.
///
/// See [`tag::extract_identifier`] for the extraction rules.
pub mod tag;
