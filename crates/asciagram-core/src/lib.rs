//! Asciagram Core Types and Definitions
//!
//! This crate provides the foundational types for Asciagram diagrams. It
//! includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: The shape and text primitives a renderer consumes
//!   ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
