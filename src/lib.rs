pub mod app;
pub mod controls;
pub mod error;
pub mod generators;
pub mod maze;
pub mod navigator;
pub mod settings;
pub mod view;
