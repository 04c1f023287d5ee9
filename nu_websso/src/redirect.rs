use crate::config::ProviderConfig;

/// Builds the identity provider's XUI login URL
///
/// The login tree is chosen by `second_factor_required`; `redirect_target`
/// is appended as the `goto` parameter exactly as given.
pub fn direct_login_url(
    config: &ProviderConfig,
    second_factor_required: bool,
    redirect_target: &str,
) -> String {
    format!(
        "{}/nusso/XUI/?realm={}#login&authIndexType=service&authIndexValue={}&goto={}",
        config.base_url(),
        config.realm,
        config.flow(second_factor_required),
        redirect_target
    )
}
