// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod resilient_engine;
pub mod scrapfly_engine;
pub mod traits;
