//! # Bakery
//!
//! `bakery` is a small HTTP API over two related entities: bakeries and the
//! baked goods they own.
//!
//! ## Data model
//!
//! A bakery exclusively owns its baked goods; deleting a bakery deletes its
//! goods through an `ON DELETE CASCADE` foreign key. `created_at` is set on
//! insert and never changes, `updated_at` is refreshed by the store on every
//! update. See [`store`].
//!
//! ## Serialization
//!
//! JSON shapes are bounded in depth: a bakery embeds its baked goods without
//! their back-reference, and a baked good embeds a flat summary of its bakery
//! without that bakery's goods.
//!
//! ## HTTP
//!
//! Mutating handlers locate the target (`404`), validate the form input
//! (`400`), then apply and commit inside a single transaction, rolling back
//! and answering `400` with the store's message on failure. See [`api`].

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
