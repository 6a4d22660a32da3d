// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod options;
pub mod processors;
pub mod reporters;
pub mod scanners;

pub use factory::LocalUnitFactory;
