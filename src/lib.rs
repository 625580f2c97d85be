//! MentorHub - Mentor-Mentee Marketplace Backend
//!
//! This crate implements session booking between students and mentors:
//! slot generation from recurring weekly availability, conflict-aware
//! booking validation, session lifecycle management, and a background
//! auto-decline sweep with refund compensation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
