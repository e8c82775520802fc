//! Infrastructure layer.
//!
//! Contains the OS-facing adapters behind the application traits: the TOML
//! mapping store, key injectors, tag reader feeds, and the console prompt.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tapkey_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`storage`** – `TomlMappingStore` (implements `MappingRepository`) and
//!   the configuration file loader.
//!
//! - **`key_injection`** – one `KeyInjector` per platform, each driving the
//!   OS's own automation tool, plus a recording injector for tests.
//!
//! - **`reader`** – `TagReader` adapters that turn JSON-line feeds from a
//!   FIFO or local TCP connections into `ReaderEvent`s.
//!
//! - **`prompt`** – `ActionPrompt` on the terminal, plus a scripted prompt
//!   for tests.

pub mod key_injection;
pub mod prompt;
pub mod reader;
pub mod storage;
