// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

/// 沿点分路径安全访问嵌套 JSON 值
///
/// 对象按键名访问，数组按数字下标访问。任何一段缺失、类型不符或
/// 最终值为 `null` 时返回 `None`，从不报错。
///
/// # 参数
///
/// * `value` - 根节点
/// * `path` - 点分路径，例如 `legacy.full_text` 或 `entries.0.entryId`
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|v| !v.is_null())
}

/// 读取字符串字段
pub fn get_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

/// 读取字符串字段并复制
pub fn get_string(value: &Value, path: &str) -> Option<String> {
    get_str(value, path).map(str::to_string)
}

/// 读取数组字段，缺失时返回空切片
pub fn get_array<'a>(value: &'a Value, path: &str) -> &'a [Value] {
    lookup(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
