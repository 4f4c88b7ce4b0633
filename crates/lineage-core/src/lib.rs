//! Lineage Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Lineage layout
//! engine and its command-line front end. It includes:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Entries**: The input model of a timeline diagram ([`entry::Entry`], [`entry::Timeline`])
//! - **Diagnostics**: Advisory warnings raised while preparing a layout ([`diagnostic`] module)

pub mod diagnostic;
pub mod entry;
pub mod identifier;
