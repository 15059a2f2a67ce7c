use crate::config::ShopConfig;
use crate::models::{CartItem, CartLinkResult};

/// `https://<domain>/cart/<id>:<qty>,<id>:<qty>,...` 形式のカートリンクを生成
///
/// コロンとカンマはそのまま出力する（URLエンコードしない）。
pub fn build_cart_link(items: &[CartItem], shop: &ShopConfig) -> CartLinkResult {
    let segments = items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",");

    CartLinkResult {
        url: format!("https://{}/cart/{}", shop.domain(), segments),
        item_count: items.len(),
    }
}
