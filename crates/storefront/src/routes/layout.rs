//! Data shared by every full-page template (header and footer).

use crate::state::AppState;

/// Store name shown in the header and footer.
pub const STORE_NAME: &str = "Freedom Projet PM";

/// Header and footer display data.
#[derive(Clone)]
pub struct LayoutView {
    pub store_name: &'static str,
    pub cart_count: u32,
    pub instagram_url: String,
    pub facebook_url: String,
}

impl LayoutView {
    #[must_use]
    pub fn new(state: &AppState, cart_count: u32) -> Self {
        let social = &state.config().social;
        Self {
            store_name: STORE_NAME,
            cart_count,
            instagram_url: social.instagram.clone(),
            facebook_url: social.facebook.clone(),
        }
    }
}
