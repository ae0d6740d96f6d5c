// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：帖子标识、规范化记录和输出行
/// - 仓库接口（repositories）：帖子列表和输出写入的抽象接口
/// - 服务（services）：字段提取和帖子详情获取
///
/// 领域层不依赖任何具体的外部服务实现。
pub mod models;
pub mod repositories;
pub mod services;
