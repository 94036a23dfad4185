mod env;
pub use env::EnvIdentityProvider;

mod r#static;
pub use r#static::StaticIdentityProvider;
