// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Marknote - Main Entry Point
//!
//! A Markdown editor with live preview, smart paste, find and replace,
//! and a fuzzy command palette. Built with Rust and egui.

mod app;
mod commands;
mod config;
mod error;
mod export;
mod find;
mod markdown;
mod paste;
mod storage;
mod string_utils;
mod ui;

use app::MarknoteApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Marknote";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0]);

    // Apply maximized state
    let viewport = if window_size.maximized {
        viewport.with_maximized(true)
    } else {
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(MarknoteApp::new(cc)))),
    )
}
