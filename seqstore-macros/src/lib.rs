//! seqstore 过程宏
//!
//! - `#[versioned]`：为实体组合 `version` 字段并实现 `::seqstore::Versioned`
//!
use proc_macro::TokenStream;

mod utils;
mod versioned;

/// 版本化实体宏
/// - 若缺失则追加字段 `version: ::seqstore::Version`，并置于字段最前
/// - 自动实现 `::seqstore::Versioned`（version/version_mut）
/// - 默认派生 `Debug, Clone, Default, serde::Serialize, serde::Deserialize`，与已有 derive 去重合并
/// - 支持参数：`#[versioned(debug = false)]`，关闭 Debug 派生以便自定义实现
#[proc_macro_attribute]
pub fn versioned(attr: TokenStream, item: TokenStream) -> TokenStream {
    versioned::expand(attr, item)
}
