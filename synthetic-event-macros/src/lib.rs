use proc_macro::TokenStream;

mod native_event;
mod utils;

/// 原生事件宏
/// - 为具名字段结构体实现 `::synthetic_event::native_event::NativeEvent`
/// - 字段名按 camelCase 暴露（`client_x` → `clientX`），值经 serde 转为 JSON
/// - 字段参数：`#[native(rename = "type")]`、`#[native(skip)]`
/// - 结构体参数：`#[native_event(prevent_default = method, stop_propagation = method)]`，
///   指定的方法签名为 `fn(&self)`，存在即视为具备对应的原生能力
#[proc_macro_attribute]
pub fn native_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    native_event::expand(attr, item)
}
