// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义外部协作方的抽象：帖子列表来源和输出写入
pub mod post_lister;
pub mod record_sink;
