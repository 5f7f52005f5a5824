//! Standalone classroom utilities bundled alongside the web app.

pub mod credit;
pub mod dna;
pub mod mario;
pub mod readability;
pub mod roster;
