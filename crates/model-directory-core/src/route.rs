//! Site routes for model pages.

/// Detail page: `/models/provider/{provider}/model/{slug}`.
pub fn model_route(provider: &str, slug: &str) -> String {
    format!("/models/provider/{provider}/model/{slug}")
}

/// Comparison page: `/compare/{provider}/{slug}`.
pub fn compare_route(provider: &str, slug: &str) -> String {
    format!("/compare/{provider}/{slug}")
}

/// Inverse of [`model_route`]: `(provider, slug)` for a detail path.
pub fn parse_model_route(path: &str) -> Option<(&str, &str)> {
    let rest = path.trim_end_matches('/').strip_prefix("/models/provider/")?;
    let (provider, slug) = rest.split_once("/model/")?;
    if provider.is_empty() || slug.is_empty() || slug.contains('/') {
        return None;
    }
    Some((provider, slug))
}
