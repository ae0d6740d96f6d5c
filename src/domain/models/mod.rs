// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 帖子（tweet）：帖子标识和用户信息
/// - 帖子记录（tweet_record）：规范化后的详情字段和输出行
pub mod tweet;
pub mod tweet_record;
