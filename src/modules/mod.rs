// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

pub mod common;
pub mod context;
pub mod dialog;
pub mod error;
pub mod fileset;
pub mod logger;
pub mod monitor;
pub mod selection;
pub mod settings;
pub mod smtp;
pub mod transfer;
pub mod utils;
