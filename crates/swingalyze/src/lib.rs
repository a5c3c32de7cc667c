//! Swingalyze client: plays a swing video, overlays the detected skeleton and
//! writes per-phase coaching notes.

pub mod app;
pub mod config;
