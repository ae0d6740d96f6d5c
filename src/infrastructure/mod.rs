// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供外部服务集成：平台会话、CSV 输出和运行计数器
pub mod csv_sink;
pub mod metrics;
pub mod twitter_session;
