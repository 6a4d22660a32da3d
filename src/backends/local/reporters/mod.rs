// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod console;
pub mod fanout;
pub mod json_file;

pub use console::*;
pub use fanout::*;
pub use json_file::*;
