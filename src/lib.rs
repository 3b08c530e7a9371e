//! Voice Navigator - resolve spoken commands to UI controls and walk there

pub mod core;
pub mod demo;
pub mod graph;
pub mod llm;
pub mod navigation;
pub mod scene;
pub mod ui;
