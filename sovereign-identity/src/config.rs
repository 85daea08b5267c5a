/// Administrator identity and the token signing key. Filled from
/// arguments or environment in main and handed to the API as managed
/// state, handlers never look at the environment themselves.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Email the administrator logs in with. Empty disables the root login.
    pub admin_email: String,
    /// Bcrypt hash of the administrator password, see the admin-hash tool.
    /// Empty disables the root login as well.
    pub admin_password_hash: String,
    /// HS256 key session tokens are signed with
    pub jwt_secret: String,
}
