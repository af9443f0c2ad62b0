//! Constraint naming convention shared by the schema and migration tooling.
//!
//! | kind | pattern |
//! |------|---------|
//! | index | `ix_<table>_<column>` |
//! | unique | `uq_<table>_<column>` |
//! | check | `ck_<table>_<constraint>` |
//!
//! The schema has no unique or check constraints yet, so only the names it
//! uses have helpers.
//! | foreign key | `fk_<table>_<column>_<referred_table>` |
//! | primary key | `pk_<table>` |

pub const BAKERIES: &str = "bakeries";
pub const BAKED_GOODS: &str = "baked_goods";

#[must_use]
pub fn index(table: &str, column: &str) -> String {
    format!("ix_{table}_{column}")
}

#[must_use]
pub fn foreign_key(table: &str, column: &str, referred_table: &str) -> String {
    format!("fk_{table}_{column}_{referred_table}")
}

#[must_use]
pub fn primary_key(table: &str) -> String {
    format!("pk_{table}")
}
